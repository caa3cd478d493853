//! Application state for univ-cloud

use sqlx::PgPool;

use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Razorpay credentials and plan ids, grouped for handlers
#[derive(Clone)]
pub struct RazorpayConfig {
    /// API key id (basic-auth user for REST calls)
    pub key_id: String,
    /// API key secret; also signs client payment confirmations
    pub key_secret: String,
    /// Webhook signing secret
    pub webhook_secret: String,
    /// Gateway plan id for the basic plan
    pub plan_basic: String,
    /// Gateway plan id for the pro plan
    pub plan_pro: String,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Razorpay credentials and plan catalog
    pub razorpay: RazorpayConfig,
    /// JWT secret for educator authentication
    pub jwt_secret: String,
    /// Base application domain for tenant subdomain resolution
    pub base_app_domain: String,
    /// Media upload service API key (public, handed to the browser)
    pub media_api_key: String,
    /// Media upload service API secret (signs upload params, never leaves the server)
    pub media_api_secret: String,
    /// Root folder signed uploads land in
    pub media_upload_folder: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            razorpay: RazorpayConfig {
                key_id: config.razorpay_key_id.clone(),
                key_secret: config.razorpay_key_secret.clone(),
                webhook_secret: config.razorpay_webhook_secret.clone(),
                plan_basic: config.razorpay_plan_basic.clone(),
                plan_pro: config.razorpay_plan_pro.clone(),
            },
            jwt_secret: config.jwt_secret.clone(),
            base_app_domain: config.base_app_domain.clone(),
            media_api_key: config.media_api_key.clone(),
            media_api_secret: config.media_api_secret.clone(),
            media_upload_folder: config.media_upload_folder.clone(),
        })
    }
}
