//! Shared server state

use std::sync::Arc;

use crate::auth::{JwtService, generate_secret};
use crate::cart::CartStore;
use crate::core::Config;
use crate::db::DbService;
use crate::db::models::User;
use crate::db::repository::{
    CategoryRepository, ExpenseRepository, ProductRepository, ReportRepository, SaleRepository,
    UserRepository,
};
use crate::utils::AppResult;

/// Everything a request handler can reach: configuration, the database
/// pool, the token service and the process-wide cart store.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
    pub cart: Arc<CartStore>,
}

impl ServerState {
    /// Open the database, build the token service and seed the admin
    /// account if one is configured.
    pub async fn initialize(config: Config) -> AppResult<Self> {
        let db = DbService::new(&config.db_path).await?;

        let secret = match &config.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!(
                    "JWT_SECRET not set; using a random secret, tokens will not survive restarts"
                );
                generate_secret()?
            }
        };
        let jwt_service = Arc::new(JwtService::new(&secret, config.access_token_minutes));

        let state = Self {
            config: Arc::new(config),
            db,
            jwt_service,
            cart: Arc::new(CartStore::new()),
        };
        state.seed_admin().await?;
        Ok(state)
    }

    /// Create the configured admin account when it does not exist yet.
    async fn seed_admin(&self) -> AppResult<()> {
        let (Some(email), Some(password)) = (
            self.config.admin_email.as_deref(),
            self.config.admin_password.as_deref(),
        ) else {
            return Ok(());
        };

        let users = self.users();
        if users.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        let hash = User::hash_password(password)
            .map_err(|e| crate::utils::AppError::internal(format!("Password hashing: {e}")))?;
        let admin = users
            .create(&self.config.admin_username, email, &hash, true)
            .await?;
        tracing::info!(user_id = admin.id, email, "Seeded admin account");
        Ok(())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.db.pool.clone())
    }

    pub fn products(&self) -> ProductRepository {
        ProductRepository::new(self.db.pool.clone())
    }

    pub fn categories(&self) -> CategoryRepository {
        CategoryRepository::new(self.db.pool.clone())
    }

    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.db.pool.clone())
    }

    pub fn expenses(&self) -> ExpenseRepository {
        ExpenseRepository::new(self.db.pool.clone())
    }

    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.db.pool.clone())
    }
}
