use crate::{AnalysisError, ImageAnalysis, ImageAnalysisProvider, ImageRef};
use async_trait::async_trait;

/// Used when no backend is configured. Every photo falls back to its file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

#[async_trait]
impl ImageAnalysisProvider for DisabledProvider {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn try_analyze(&self, _image: ImageRef<'_>) -> Result<ImageAnalysis, AnalysisError> {
        Ok(ImageAnalysis::default())
    }
}
