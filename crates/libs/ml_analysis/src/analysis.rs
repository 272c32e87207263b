use serde::Serialize;

/// The image handed to a provider: its stored file name and encoded bytes.
#[derive(Debug, Clone, Copy)]
pub struct ImageRef<'a> {
    pub stored_filename: &'a str,
    pub bytes: &'a [u8],
}

/// Title, description and tags suggested for an image. Empty when the backend had nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageAnalysis {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

impl ImageAnalysis {
    /// Trims every field, dropping blank values.
    #[must_use]
    pub fn normalized(self) -> Self {
        let clean = |s: Option<String>| s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        Self {
            name: clean(self.name),
            description: clean(self.description),
            tags: self
                .tags
                .into_iter()
                .map(|t| t.trim().to_owned())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.tags.is_empty()
    }
}
