use crate::{CameraMetadata, ImageSize, PrivacyLevel, StoredPrivacy, UserId, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub type PhotoId = Uuid;

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    #[schema(value_type = String, format = Uuid)]
    pub id: PhotoId,
    pub owner_id: UserId,
    /// Display title, never empty.
    pub name: String,
    pub description: Option<String>,
    /// Stored file name of the original upload.
    pub filename: String,
    pub filename_thumbnail: Option<String>,
    pub filename_tablet: Option<String>,
    pub filename_desktop: Option<String>,
    pub view_privacy: StoredPrivacy,
    pub view_count: u64,
    pub like_count: u64,
    rating: Option<u8>,
    #[serde(flatten)]
    pub camera: CameraMetadata,
    /// Capture time when the metadata carried one, otherwise the upload time.
    pub created_at: DateTime<Utc>,
    pub uploaded_at: DateTime<Utc>,
}

impl Photo {
    #[must_use]
    pub fn new(owner_id: UserId, name: String, filename: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description: None,
            filename,
            filename_thumbnail: None,
            filename_tablet: None,
            filename_desktop: None,
            view_privacy: StoredPrivacy::default(),
            view_count: 0,
            like_count: 0,
            rating: None,
            camera: CameraMetadata::default(),
            created_at: now,
            uploaded_at: now,
        }
    }

    /// Stored file name for the requested size, falling back to the original
    /// when that derivative was never generated.
    #[must_use]
    pub fn filename_for(&self, size: ImageSize) -> &str {
        let derivative = match size {
            ImageSize::Thumbnail => self.filename_thumbnail.as_deref(),
            ImageSize::Tablet => self.filename_tablet.as_deref(),
            ImageSize::Desktop => self.filename_desktop.as_deref(),
            ImageSize::Original => None,
        };
        derivative.unwrap_or(&self.filename)
    }

    pub fn set_derivative(&mut self, size: ImageSize, filename: String) {
        match size {
            ImageSize::Thumbnail => self.filename_thumbnail = Some(filename),
            ImageSize::Tablet => self.filename_tablet = Some(filename),
            ImageSize::Desktop => self.filename_desktop = Some(filename),
            ImageSize::Original => self.filename = filename,
        }
    }

    pub fn set_privacy(&mut self, level: PrivacyLevel) {
        self.view_privacy = level.into();
    }

    #[must_use]
    pub const fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn set_rating(&mut self, rating: Option<u8>) -> Result<(), ValidationError> {
        if let Some(r) = rating.filter(|r| !(1..=5).contains(r)) {
            return Err(ValidationError::InvalidRating(r));
        }
        self.rating = rating;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo() -> Photo {
        Photo::new(1, "Sunset".to_owned(), "sunset-abc.jpg".to_owned())
    }

    #[test]
    fn test_filename_falls_back_to_original() {
        let mut photo = photo();
        assert_eq!(photo.filename_for(ImageSize::Desktop), "sunset-abc.jpg");

        photo.set_derivative(ImageSize::Desktop, "sunset-abc_desktop.jpg".to_owned());
        assert_eq!(
            photo.filename_for(ImageSize::Desktop),
            "sunset-abc_desktop.jpg"
        );
        assert_eq!(photo.filename_for(ImageSize::Tablet), "sunset-abc.jpg");
        assert_eq!(photo.filename_for(ImageSize::Original), "sunset-abc.jpg");
    }

    #[test]
    fn test_rating_bounds() {
        let mut photo = photo();
        assert!(photo.set_rating(Some(5)).is_ok());
        assert_eq!(photo.rating(), Some(5));
        assert_eq!(
            photo.set_rating(Some(0)),
            Err(ValidationError::InvalidRating(0))
        );
        assert_eq!(
            photo.set_rating(Some(6)),
            Err(ValidationError::InvalidRating(6))
        );
        assert_eq!(photo.rating(), Some(5));
        assert!(photo.set_rating(None).is_ok());
    }

    #[test]
    fn test_privacy_setter() {
        let mut photo = photo();
        assert_eq!(photo.view_privacy.level(), Some(PrivacyLevel::Public));
        photo.set_privacy(PrivacyLevel::Family);
        assert_eq!(photo.view_privacy.level(), Some(PrivacyLevel::Family));
    }
}
