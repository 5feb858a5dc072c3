//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. Services are generic over repository traits; AppState pins
//! them to the SQLite implementations. Everything is built once at startup.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use doula_core::chat::service::ChatService;
use doula_core::llm::box_provider::BoxLlmProvider;
use doula_core::record::service::RecordService;
use doula_infra::config::{load_global_config, resolve_data_dir};
use doula_infra::llm::create_provider;
use doula_infra::secret::resolve_api_key;
use doula_infra::sqlite::pool::{DatabasePool, database_url};
use doula_infra::sqlite::record::SqlitePatientRecordRepository;
use doula_infra::sqlite::turn::SqliteTurnStore;
use doula_types::config::GlobalConfig;

pub type ConcreteChatService = ChatService<SqliteTurnStore>;
pub type ConcreteRecordService = RecordService<SqlitePatientRecordRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub record_service: Arc<ConcreteRecordService>,
    pub config: Arc<GlobalConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the
    /// database, resolve the provider key and wire services.
    ///
    /// Fails when the provider API key is missing.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_global_config(&data_dir).await;
        let db_pool = open_database(&data_dir).await?;

        let api_key = resolve_api_key(&config.provider)?;
        let provider = create_provider(&config.provider, api_key)
            .context("failed to configure completion provider")?;

        tracing::info!(
            data_dir = %data_dir.display(),
            provider = provider.name(),
            model = %config.provider.model,
            "Application state initialized"
        );

        Self::from_parts(config, db_pool, provider)
    }

    /// Wire services from already-built parts.
    ///
    /// Fails on chat settings no request could succeed with.
    pub fn from_parts(
        config: GlobalConfig,
        db_pool: DatabasePool,
        provider: BoxLlmProvider,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            config.chat.window_size > 0,
            "invalid config: chat.window_size must be positive"
        );

        let store = Arc::new(SqliteTurnStore::new(db_pool.clone()));
        let chat_service = ChatService::new(
            store,
            Arc::new(provider),
            &config.chat,
            &config.provider.model,
        );
        let record_service = RecordService::new(SqlitePatientRecordRepository::new(db_pool.clone()));

        Ok(Self {
            chat_service: Arc::new(chat_service),
            record_service: Arc::new(record_service),
            config: Arc::new(config),
            db_pool,
        })
    }
}

/// Create the data directory if needed and open (and migrate) the database.
///
/// Read-only CLI commands use this directly so they work without a provider key.
pub async fn open_database(data_dir: &Path) -> anyhow::Result<DatabasePool> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    let pool = DatabasePool::new(&database_url(data_dir))
        .await
        .context("failed to open database")?;
    Ok(pool)
}
