use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub payment: PaymentConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Absolute base URL used to build default checkout return URLs
    pub public_base_url: String,
    /// Number of listings shown on the landing page
    pub landing_preview_limit: i64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Secret material for signing cookies
#[derive(Clone)]
pub struct SessionConfig {
    pub secret_key: String,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret_key", &"***")
            .finish()
    }
}

/// Which hosted checkout provider handles paid listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentConfig {
    /// No provider configured: listings go live immediately
    Disabled,
    Stripe(StripeConfig),
    /// Local development provider, every session counts as paid
    Dummy(CheckoutUrls),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Clone, PartialEq, Eq)]
pub struct StripeConfig {
    pub secret_key: String,
    pub price_id: String,
    pub urls: CheckoutUrls,
    /// Webhook deliveries are rejected with 503 until this is set
    pub webhook_secret: Option<String>,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"***")
            .field("price_id", &self.price_id)
            .field("urls", &self.urls)
            .field("webhook_secret", &self.webhook_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        let app = AppConfig::from_env()?;
        let payment = PaymentConfig::from_env(&app.public_base_url)?;

        Ok(Config {
            database: DatabaseConfig::from_env()?,
            session: SessionConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
            app,
            payment,
        })
    }
}

impl AppConfig {
    const DEFAULT_LANDING_PREVIEW_LIMIT: i64 = 6;

    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let landing_preview_limit = env::var("LANDING_PREVIEW_LIMIT")
            .unwrap_or_else(|_| Self::DEFAULT_LANDING_PREVIEW_LIMIT.to_string())
            .parse::<i64>()
            .map_err(|_| "LANDING_PREVIEW_LIMIT must be a valid number".to_string())?;

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
            public_base_url,
            landing_preview_limit,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // A single SQLite file does not benefit from a large pool
    const DEFAULT_URL: &'static str = "sqlite://spectra_ai_directory.db";
    const DEFAULT_MAX_CONNECTIONS: u32 = 5;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_URL.to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, String> {
        let secret_key = env::var("SECRET_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SECRET_KEY environment variable is required".to_string())?;

        Ok(Self { secret_key })
    }
}

impl PaymentConfig {
    pub fn from_env(public_base_url: &str) -> Result<Self, String> {
        let var = |name: &str| env::var(name).ok().filter(|s| !s.trim().is_empty());

        Self::resolve(
            var("PAYMENT_PROVIDER").as_deref(),
            var("STRIPE_SECRET_KEY"),
            var("STRIPE_PRICE_ID"),
            var("STRIPE_SUCCESS_URL"),
            var("STRIPE_CANCEL_URL"),
            var("STRIPE_WEBHOOK_SECRET"),
            public_base_url,
        )
    }

    /// Decide the payment mode from raw settings.
    ///
    /// Stripe is only enabled when both the secret key and the price are present;
    /// anything less disables the payment step instead of failing startup.
    pub fn resolve(
        provider: Option<&str>,
        secret_key: Option<String>,
        price_id: Option<String>,
        success_url: Option<String>,
        cancel_url: Option<String>,
        webhook_secret: Option<String>,
        public_base_url: &str,
    ) -> Result<Self, String> {
        let urls = CheckoutUrls {
            success_url: success_url
                .unwrap_or_else(|| format!("{}/checkout/success", public_base_url)),
            cancel_url: cancel_url.unwrap_or_else(|| format!("{}/checkout/cancel", public_base_url)),
        };

        match provider.map(|p| p.to_ascii_lowercase()).as_deref() {
            None | Some("stripe") => match (secret_key, price_id) {
                (Some(secret_key), Some(price_id)) => Ok(Self::Stripe(StripeConfig {
                    secret_key,
                    price_id,
                    urls,
                    webhook_secret,
                })),
                _ => Ok(Self::Disabled),
            },
            Some("dummy") => Ok(Self::Dummy(urls)),
            Some("none") | Some("disabled") => Ok(Self::Disabled),
            Some(other) => Err(format!("Unknown PAYMENT_PROVIDER: {}", other)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        // Only use credentials if they are non-empty
        let username = env::var("SWAGGER_USERNAME").ok().filter(|s| !s.is_empty());
        let password = env::var("SWAGGER_PASSWORD").ok().filter(|s| !s.is_empty());
        let title =
            env::var("SWAGGER_TITLE").unwrap_or_else(|_| "Spectra AI Directory API".to_string());
        let version = env::var("SWAGGER_VERSION").unwrap_or_else(|_| "0.1.0".to_string());
        let description = env::var("SWAGGER_DESCRIPTION")
            .unwrap_or_else(|_| "Read-only catalog and submission API".to_string());

        Ok(Self {
            username,
            password,
            title,
            version,
            description,
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://localhost:5000";

    #[test]
    fn test_payment_disabled_without_price() {
        let config =
            PaymentConfig::resolve(None, Some("sk_test".into()), None, None, None, None, BASE)
                .unwrap();
        assert_eq!(config, PaymentConfig::Disabled);
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_payment_stripe_with_default_urls() {
        let config = PaymentConfig::resolve(
            Some("stripe"),
            Some("sk_test".into()),
            Some("price_123".into()),
            None,
            None,
            None,
            BASE,
        )
        .unwrap();

        match config {
            PaymentConfig::Stripe(stripe) => {
                assert_eq!(stripe.price_id, "price_123");
                assert_eq!(stripe.urls.success_url, "http://localhost:5000/checkout/success");
                assert_eq!(stripe.urls.cancel_url, "http://localhost:5000/checkout/cancel");
                assert!(stripe.webhook_secret.is_none());
            }
            other => panic!("expected stripe config, got {:?}", other),
        }
    }

    #[test]
    fn test_payment_dummy_and_unknown_provider() {
        let config =
            PaymentConfig::resolve(Some("Dummy"), None, None, None, None, None, BASE).unwrap();
        assert!(matches!(config, PaymentConfig::Dummy(_)));

        let err = PaymentConfig::resolve(Some("paypal"), None, None, None, None, None, BASE)
            .unwrap_err();
        assert!(err.contains("paypal"));
    }

    #[test]
    fn test_stripe_debug_hides_secrets() {
        let config = StripeConfig {
            secret_key: "sk_live_secret".into(),
            price_id: "price_1".into(),
            urls: CheckoutUrls {
                success_url: "https://a/s".into(),
                cancel_url: "https://a/c".into(),
            },
            webhook_secret: Some("whsec_secret".into()),
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk_live_secret"));
        assert!(!rendered.contains("whsec_secret"));
    }
}
