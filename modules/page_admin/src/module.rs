//! Module wiring: configuration, storage and transports

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::PageAdminApi;
use crate::domain::placeholders::FsTemplateLoader;
use crate::domain::{
    AdminSettings, AliasRepository, ContentRepository, EventPublisher, InMemoryPageCache,
    NoOpEventPublisher, PageRepository, PlaceholderRegistry, Service,
};
use crate::infra::storage::{SeaOrmAliasRepository, SeaOrmContentRepository, SeaOrmPageRepository};
use crate::infra::{InMemoryAliasStore, InMemoryContentStore, InMemoryPageTree};
use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Page admin module
pub struct PageAdminModule {
    service: Arc<Service>,
}

impl PageAdminModule {
    /// Build the module over arbitrary repositories
    pub fn new(
        config: Config,
        pages: Arc<dyn PageRepository>,
        contents: Arc<dyn ContentRepository>,
        aliases: Arc<dyn AliasRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Result<Self> {
        config.validate()?;
        let loader = FsTemplateLoader::new(config.template_dirs.clone());
        let registry = PlaceholderRegistry::from_config(&config, &loader)
            .context("failed to build the placeholder registry")?;
        let default_content = config.default_content_fallback;
        let settings = Arc::new(AdminSettings::new(config, registry));

        let service = Service::new(
            pages,
            contents,
            aliases,
            Arc::new(InMemoryPageCache::new()),
            event_publisher,
            settings,
        );
        let service = if default_content {
            service.with_default_content()
        } else {
            service
        };

        tracing::info!(default_content, "page admin initialized");
        Ok(Self {
            service: Arc::new(service),
        })
    }

    /// Module backed by the SeaORM repositories
    pub fn with_database(config: Config, db: DatabaseConnection) -> Result<Self> {
        let conn = Arc::new(db);
        Self::new(
            config,
            Arc::new(SeaOrmPageRepository::new(conn.clone())),
            Arc::new(SeaOrmContentRepository::new(conn.clone())),
            Arc::new(SeaOrmAliasRepository::new(conn)),
            Arc::new(NoOpEventPublisher),
        )
    }

    /// Module backed by the in-memory stores
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::new(
            config,
            Arc::new(InMemoryPageTree::new()),
            Arc::new(InMemoryContentStore::new()),
            Arc::new(InMemoryAliasStore::new()),
            Arc::new(NoOpEventPublisher),
        )
    }

    /// Apply the page admin migrations
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("page admin migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// Client for in-process callers
    pub fn client(&self) -> Arc<dyn PageAdminApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// Admin routes mounted on `router`
    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        tracing::info!("registering page admin REST routes");
        crate::api::rest::register_routes(router, self.service.clone())
    }
}
