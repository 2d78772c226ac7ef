use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use crate::auth::jwt::JwtIssuer;
use crate::auth::memory_repo::InMemoryUserStore;
use crate::auth::password::CredentialCodec;
use crate::auth::repo::{PgUserStore, UserProvider, UserSaver};
use crate::auth::services::AuthService;
use crate::config::{AppConfig, StorageKind};
use crate::db;

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub config: Arc<AppConfig>,
    /// Postgres pool backing the store, if any; closed on shutdown.
    pub db: Option<PgPool>,
}

impl AppState {
    /// Wire the service to the configured store. For Postgres this connects
    /// the pool and applies pending migrations.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let mut db = None;
        let (saver, provider): (Arc<dyn UserSaver>, Arc<dyn UserProvider>) = match config.storage
        {
            StorageKind::Postgres => {
                let db_cfg = config
                    .db
                    .as_ref()
                    .context("postgres storage selected without database settings")?;
                let pool = db::connect(db_cfg).await?;
                if let Err(e) = db::migrate(&pool).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }
                db = Some(pool.clone());
                let store = Arc::new(PgUserStore::new(pool));
                (
                    store.clone() as Arc<dyn UserSaver>,
                    store as Arc<dyn UserProvider>,
                )
            }
            StorageKind::Memory => {
                tracing::warn!("using in-memory user store; data is lost on restart");
                let store = Arc::new(InMemoryUserStore::new());
                (
                    store.clone() as Arc<dyn UserSaver>,
                    store as Arc<dyn UserProvider>,
                )
            }
        };
        let mut state = Self::from_parts(config, saver, provider)?;
        state.db = db;
        Ok(state)
    }

    pub fn from_parts(
        config: AppConfig,
        saver: Arc<dyn UserSaver>,
        provider: Arc<dyn UserProvider>,
    ) -> anyhow::Result<Self> {
        let codec = CredentialCodec::new(config.hash).context("invalid password hash settings")?;
        let issuer = JwtIssuer::from_config(&config.jwt);
        Ok(Self {
            auth: AuthService::new(saver, provider, codec, issuer),
            config: Arc::new(config),
            db: None,
        })
    }

    /// Release storage resources. Waits for checked-out connections to be
    /// returned, so call it after the server has drained.
    pub async fn close(&self) {
        if let Some(db) = &self.db {
            db.close().await;
            tracing::info!("database pool closed");
        }
    }
}
