use xfer_config::XferConfig;
use xfer_db::service::XferService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: XferService,
    pub config: XferConfig,
}

impl AppContext {
    pub async fn init(config: XferConfig) -> anyhow::Result<Self> {
        let service = XferService::from_config(&config).await?;
        tracing::debug!(db = %config.database.path, "service ready");
        Ok(Self { service, config })
    }
}
