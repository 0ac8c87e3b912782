use sqlx::SqlitePool;
use scoped_search::config::AppConfig;
use scoped_search::nonce::NonceIssuer;
use scoped_search::search::SqliteQueryEngine;
use scoped_search::store::SqliteStore;

pub struct AppState {
    pub db: SqlitePool,
    pub store: SqliteStore,
    pub engine: SqliteQueryEngine,
    /// Anti-forgery token issuer / 防伪令牌签发器
    pub nonces: NonceIssuer,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Result<Self, String> {
        let nonces = NonceIssuer::new(&config.security.nonce_secret, config.security.nonce_lifetime_secs)?;
        Ok(Self {
            store: SqliteStore::new(db.clone()),
            engine: SqliteQueryEngine::new(db.clone()),
            db,
            nonces,
            config,
        })
    }
}
