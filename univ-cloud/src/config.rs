//! Cloud server configuration
//!
//! All environment access happens here, once, at startup. Handlers receive
//! the resulting values through [`crate::state::AppState`].

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Cloud server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Base application domain for tenant subdomain resolution (e.g. univ.live)
    pub base_app_domain: String,
    /// JWT secret for educator authentication
    pub jwt_secret: String,
    /// Razorpay API key id
    pub razorpay_key_id: String,
    /// Razorpay API key secret (also signs client payment confirmations)
    pub razorpay_key_secret: String,
    /// Razorpay webhook signing secret
    pub razorpay_webhook_secret: String,
    /// Razorpay plan id for the basic plan
    pub razorpay_plan_basic: String,
    /// Razorpay plan id for the pro plan
    pub razorpay_plan_pro: String,
    /// Media upload service API key
    pub media_api_key: String,
    /// Media upload service API secret (signs direct browser uploads)
    pub media_api_secret: String,
    /// Root folder signed uploads land in
    pub media_upload_folder: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_app_domain: std::env::var("BASE_APP_DOMAIN")
                .unwrap_or_else(|_| "univ.live".into()),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            razorpay_key_id: Self::require_secret("RAZORPAY_KEY_ID", &environment)?,
            razorpay_key_secret: Self::require_secret("RAZORPAY_KEY_SECRET", &environment)?,
            razorpay_webhook_secret: Self::require_secret("RAZORPAY_WEBHOOK_SECRET", &environment)?,
            razorpay_plan_basic: std::env::var("RAZORPAY_PLAN_BASIC")
                .unwrap_or_else(|_| "plan_basic_monthly".into()),
            razorpay_plan_pro: std::env::var("RAZORPAY_PLAN_PRO")
                .unwrap_or_else(|_| "plan_pro_monthly".into()),
            media_api_key: Self::require_secret("MEDIA_API_KEY", &environment)?,
            media_api_secret: Self::require_secret("MEDIA_API_SECRET", &environment)?,
            media_upload_folder: std::env::var("MEDIA_UPLOAD_FOLDER")
                .unwrap_or_else(|_| "univ-media".into()),
            environment,
        })
    }
}
