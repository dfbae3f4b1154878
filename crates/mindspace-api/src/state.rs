//! Application state wiring all services together.
//!
//! Services are generic over repository/auth traits; AppState pins them to
//! the concrete infra implementations (SQLite, PASETO, argon2).

use std::path::PathBuf;
use std::sync::Arc;

use mindspace_core::realtime::ChatServer;
use mindspace_core::service::{AuthService, BookingService, ChatService, MaterialService};
use mindspace_infra::auth::{ArgonPasswordHasher, PasetoTokens};
use mindspace_infra::sqlite::{
    resolve_data_dir, DatabasePool, SqliteBookingRepository, SqliteChatRepository,
    SqliteMaterialRepository, SqliteUserRepository,
};

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, ArgonPasswordHasher, PasetoTokens>;

pub type ConcreteChatService = ChatService<SqliteChatRepository>;

pub type ConcreteBookingService = BookingService<SqliteBookingRepository, SqliteUserRepository>;

pub type ConcreteMaterialService = MaterialService<SqliteMaterialRepository>;

pub type ConcreteChatServer =
    ChatServer<SqliteChatRepository, SqliteUserRepository, PasetoTokens>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<ConcreteAuthService>,
    pub chat_service: Arc<ConcreteChatService>,
    pub booking_service: Arc<ConcreteBookingService>,
    pub material_service: Arc<ConcreteMaterialService>,
    pub chat_server: Arc<ConcreteChatServer>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("mindspace.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let secret = std::env::var("MINDSPACE_SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("MINDSPACE_SECRET_KEY not set, using development secret");
            "mindspace-dev-secret".to_string()
        });

        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool.clone()),
            ArgonPasswordHasher,
            PasetoTokens::new(&secret)?,
        );

        let chat_service = ChatService::new(SqliteChatRepository::new(db_pool.clone()));

        let booking_service = BookingService::new(
            SqliteBookingRepository::new(db_pool.clone()),
            SqliteUserRepository::new(db_pool.clone()),
        );

        let material_service =
            MaterialService::new(SqliteMaterialRepository::new(db_pool.clone()));

        // The realtime server verifies handshake tokens itself, so it gets
        // its own PasetoTokens instance derived from the same secret.
        let chat_server = ChatServer::new(
            SqliteChatRepository::new(db_pool.clone()),
            SqliteUserRepository::new(db_pool.clone()),
            PasetoTokens::new(&secret)?,
        );

        Ok(Self {
            auth_service: Arc::new(auth_service),
            chat_service: Arc::new(chat_service),
            booking_service: Arc::new(booking_service),
            material_service: Arc::new(material_service),
            chat_server: Arc::new(chat_server),
            data_dir,
            db_pool,
        })
    }
}
