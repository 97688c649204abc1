//! Service configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Origins allowed when `CORS_ORIGINS` is unset
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "https://packstack.io",
];

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for user authentication
    pub jwt_secret: String,
    /// Token lifetime in days
    pub jwt_expiry_days: i64,
    /// S3 bucket for uploaded images
    pub s3_bucket: String,
    /// Public base URL the bucket is served from
    pub cdn_base_url: String,
    /// SES sender email address
    pub ses_from_email: String,
    /// Front-end base URL, used in password reset links
    pub app_host: String,
    /// Allowed CORS origins; an entry `https://*.example.com` matches subdomains
    pub cors_origins: Vec<String>,
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
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_days: std::env::var("JWT_EXPIRY_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(30),
            s3_bucket: std::env::var("S3_BUCKET").unwrap_or_else(|_| "packstack-images".into()),
            cdn_base_url: std::env::var("CDN_BASE_URL")
                .unwrap_or_else(|_| "https://images.packstack.io".into())
                .trim_end_matches('/')
                .to_string(),
            ses_from_email: std::env::var("SES_FROM_EMAIL")
                .unwrap_or_else(|_| "noreply@packstack.io".into()),
            app_host: std::env::var("APP_HOST")
                .unwrap_or_else(|_| "http://localhost:3000".into())
                .trim_end_matches('/')
                .to_string(),
            cors_origins: parse_origins(std::env::var("CORS_ORIGINS").ok().as_deref()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();
    if parsed.is_empty() {
        DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect()
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(parse_origins(None).len(), DEFAULT_CORS_ORIGINS.len());
        assert_eq!(parse_origins(Some(" ")).len(), DEFAULT_CORS_ORIGINS.len());
        assert_eq!(
            parse_origins(Some("https://a.io/, https://*.a.io")),
            vec!["https://a.io".to_string(), "https://*.a.io".to_string()]
        );
    }

    #[test]
    fn test_require_secret_development_fallback() {
        let val = Config::require_secret("GEAR_CLOUD_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-GEAR_CLOUD_TEST_UNSET_SECRET-not-for-production");
        assert!(Config::require_secret("GEAR_CLOUD_TEST_UNSET_SECRET", "production").is_err());
    }
}
