use std::env;
use std::str::FromStr;

use sea_orm::DatabaseConnection;

use crate::error::AppError;

/// What a relation filter (`is_favorited`, `is_in_shopping_cart`) does when
/// the caller is anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnonymousFilterPolicy {
    /// Drop the filter and list everything.
    #[default]
    Ignore,
    /// Answer 401.
    Reject,
}

impl FromStr for AnonymousFilterPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(ConfigError::Invalid("ANONYMOUS_FILTER_POLICY", other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expires_in: i64,
    pub page_size: u64,
    pub max_page_size: u64,
    pub recipes_limit: u64,
    pub anonymous_filter_policy: AnonymousFilterPolicy,
    pub run_migrations: bool,
    pub ingredients_fixture: Option<String>,
    pub admin: Option<AdminSeed>,
}

/// Staff account created at startup when all `ADMIN_*` variables are present.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, axum::extract::FromRef)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = parse_var("PORT", 8000u16)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        let jwt_expires_in = parse_var("JWT_EXPIRATION_MINUTES", 24 * 60i64)?;

        let page_size = parse_var("PAGE_SIZE", 6u64)?;
        let max_page_size = parse_var("MAX_PAGE_SIZE", 100u64)?;
        let recipes_limit = parse_var("RECIPES_LIMIT", 3u64)?;
        let anonymous_filter_policy = parse_var("ANONYMOUS_FILTER_POLICY", AnonymousFilterPolicy::Ignore)?;
        let run_migrations = parse_var("RUN_MIGRATIONS", true)?;

        let ingredients_fixture = env::var("INGREDIENTS_FIXTURE").ok().filter(|p| !p.is_empty());

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(username), Ok(password)) => Some(AdminSeed { email, username, password }),
            _ => None,
        };

        if page_size == 0 || max_page_size < page_size {
            return Err(ConfigError::Invalid("PAGE_SIZE", format!("{} (max {})", page_size, max_page_size)));
        }

        Ok(Config {
            server_host,
            server_port,
            database_url,
            jwt_secret,
            jwt_expires_in,
            page_size,
            max_page_size,
            recipes_limit,
            anonymous_filter_policy,
            run_migrations,
            ingredients_fixture,
            admin,
        })
    }

    /// Resolves `page`/`limit` query values into a valid `(page, limit)` pair.
    ///
    /// The row offset `(page - 1) * limit` must fit a signed 64-bit SQL value.
    pub fn page_window(&self, page: Option<u64>, limit: Option<u64>) -> Result<(u64, u64), AppError> {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(self.page_size).clamp(1, self.max_page_size);
        match (page - 1).checked_mul(limit) {
            Some(offset) if i64::try_from(offset).is_ok() => Ok((page, limit)),
            _ => Err(AppError::field("page", "out_of_range", "Page number is too large")),
        }
    }

    /// Number of recipes previewed per author in subscription views.
    pub fn recipes_preview_limit(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.recipes_limit).min(self.max_page_size)
    }
}

fn parse_var<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid(key, raw)),
        Err(_) => Ok(default),
    }
}
