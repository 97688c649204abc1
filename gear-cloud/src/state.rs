//! Application state

use aws_sdk_s3::Client as S3Client;
use aws_sdk_sesv2::Client as SesClient;
use sqlx::PgPool;

use crate::auth::rate_limit::RateLimiter;
use crate::config::Config;
use crate::db::PgCatalog;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Image object storage
#[derive(Clone)]
pub struct S3Storage {
    pub client: S3Client,
    pub bucket: String,
    /// Public base URL objects are served from
    pub cdn_base_url: String,
}

impl S3Storage {
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.cdn_base_url, key)
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Catalog store used by the resolver and importer
    pub catalog: PgCatalog,
    /// Image object storage
    pub s3: S3Storage,
    /// AWS SES client for sending emails
    pub ses: SesClient,
    /// SES sender email address
    pub ses_from_email: String,
    /// Front-end base URL
    pub app_host: String,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Token lifetime in days
    pub jwt_expiry_days: i64,
    /// Rate limiter for login/registration routes
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let s3 = S3Client::new(&aws_config);

        let ses = if let Ok(ses_region) = std::env::var("SES_REGION") {
            let ses_config = aws_config
                .to_builder()
                .region(aws_config::Region::new(ses_region))
                .build();
            SesClient::new(&ses_config)
        } else {
            SesClient::new(&aws_config)
        };

        Ok(Self {
            catalog: PgCatalog::new(pool.clone()),
            pool,
            s3: S3Storage {
                client: s3,
                bucket: config.s3_bucket.clone(),
                cdn_base_url: config.cdn_base_url.clone(),
            },
            ses,
            ses_from_email: config.ses_from_email.clone(),
            app_host: config.app_host.clone(),
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_days: config.jwt_expiry_days,
            rate_limiter: RateLimiter::new(),
        })
    }
}
