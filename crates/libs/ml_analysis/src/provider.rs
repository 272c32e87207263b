use crate::providers::{
    CustomHttpProvider, DisabledProvider, GoogleVisionProvider, OpenAiVisionProvider,
};
use crate::{AnalysisError, ImageAnalysis, ImageRef};
use app_state::{AnalyzerProvider, AnalyzerSettings};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// A backend that suggests a title, description and tags for an image.
///
/// Implementations only provide [`try_analyze`](Self::try_analyze). Callers use
/// [`analyze`](Self::analyze), which logs the request and turns every failure into
/// an empty [`ImageAnalysis`].
#[async_trait]
pub trait ImageAnalysisProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn try_analyze(&self, image: ImageRef<'_>) -> Result<ImageAnalysis, AnalysisError>;

    async fn analyze(&self, image: ImageRef<'_>) -> ImageAnalysis {
        let provider = self.name();
        let filename = image.stored_filename;
        let started = Instant::now();
        info!(provider, filename, "Image analysis started");

        match self.try_analyze(image).await {
            Ok(analysis) => {
                let analysis = analysis.normalized();
                info!(
                    provider,
                    filename,
                    duration_ms = started.elapsed().as_millis(),
                    tags = analysis.tags.len(),
                    has_name = analysis.name.is_some(),
                    "Image analysis succeeded"
                );
                analysis
            }
            Err(e) => {
                error!(
                    provider,
                    filename,
                    duration_ms = started.elapsed().as_millis(),
                    error = %e,
                    "Image analysis failed"
                );
                ImageAnalysis::default()
            }
        }
    }
}

/// Builds the provider chosen in the settings file.
pub fn provider_from_settings(
    settings: &AnalyzerSettings,
) -> Result<Arc<dyn ImageAnalysisProvider>, AnalysisError> {
    let provider: Arc<dyn ImageAnalysisProvider> = match settings.provider {
        AnalyzerProvider::Custom => Arc::new(CustomHttpProvider::new(&settings.custom)?),
        AnalyzerProvider::OpenAi => Arc::new(OpenAiVisionProvider::new(&settings.openai)?),
        AnalyzerProvider::Google => Arc::new(GoogleVisionProvider::new(&settings.google)?),
        AnalyzerProvider::Disabled => Arc::new(DisabledProvider),
    };
    info!("Image analysis provider: {}", provider.name());
    Ok(provider)
}
