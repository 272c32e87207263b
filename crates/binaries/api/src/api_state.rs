use app_state::AppSettings;
use axum::extract::FromRef;
use color_eyre::Result;
use common_services::api::access::AccessPolicy;
use common_services::api::album::interfaces::ShareOptions;
use common_services::api::upload::pipeline::IngestionPipeline;
use common_services::database::Database;
use common_services::notify::{LogNotifier, ShareNotifier};
use common_services::storage::{FsStorage, MediaStorage};
use ml_analysis::provider_from_settings;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct ApiContext {
    pub db: Database,
    pub settings: AppSettings,
    pub storage: Arc<dyn MediaStorage>,
    pub pipeline: IngestionPipeline,
    pub notifier: Arc<dyn ShareNotifier>,
    pub share_options: ShareOptions,
    pub policy: AccessPolicy,
    /// Cancelled on shutdown. Running uploads stop before their next file.
    pub shutdown: CancellationToken,
}

impl ApiContext {
    pub fn new(settings: AppSettings) -> Result<Self> {
        let db = Database::new();
        let storage: Arc<dyn MediaStorage> =
            Arc::new(FsStorage::new(settings.ingestion.upload_folder.clone()));
        let analyzer = provider_from_settings(&settings.ingestion.analyzer)?;
        let pipeline =
            IngestionPipeline::new(db.clone(), storage.clone(), analyzer, &settings.ingestion);

        Ok(Self {
            db,
            storage,
            pipeline,
            notifier: Arc::new(LogNotifier),
            share_options: ShareOptions::from_settings(&settings),
            policy: AccessPolicy::new(settings.access.admin_can_view_private),
            shutdown: CancellationToken::new(),
            settings,
        })
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(context: &ApiContext) -> Self {
        context.settings.clone()
    }
}

impl FromRef<ApiContext> for Database {
    fn from_ref(context: &ApiContext) -> Self {
        context.db.clone()
    }
}
