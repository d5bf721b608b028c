use core_config::{
    AppInfo, ConfigError, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig,
};
use database::mongodb::MongoConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Collections the catalog reads and writes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub products_collection: String,
    pub categories_collection: String,
}

impl FromEnv for CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            products_collection: env_or_default(
                "CATALOG_PRODUCTS_COLLECTION",
                domain_catalog::mongodb::DEFAULT_PRODUCTS_COLLECTION,
            ),
            categories_collection: env_or_default(
                "CATALOG_CATEGORIES_COLLECTION",
                domain_catalog::mongodb::DEFAULT_CATEGORIES_COLLECTION,
            ),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub environment: Environment,
    /// Upper bound on post-signal cleanup (closing MongoDB); request
    /// draining itself is not time-limited
    pub shutdown_timeout: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mut mongodb = MongoConfig::from_env()?;
        if mongodb.app_name.is_none() {
            mongodb = mongodb.with_app_name(app_info!().name);
        }
        let server = ServerConfig::from_env()?;
        let catalog = CatalogConfig::from_env()?;
        let shutdown_timeout = Duration::from_secs(env_parse_or("SHUTDOWN_TIMEOUT_SECS", 30)?);

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            catalog,
            environment,
            shutdown_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONGO_VARS: [(&str, Option<&str>); 2] = [
        ("MONGODB_URL", Some("mongodb://localhost:27017")),
        ("MONGODB_DATABASE", Some("catalog_test")),
    ];

    #[test]
    fn test_config_defaults() {
        let vars = [
            MONGO_VARS[0],
            MONGO_VARS[1],
            ("CATALOG_PRODUCTS_COLLECTION", None),
            ("CATALOG_CATEGORIES_COLLECTION", None),
            ("SHUTDOWN_TIMEOUT_SECS", None),
        ];

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();

            assert_eq!(config.app.name, "catalog_api");
            assert_eq!(config.mongodb.database(), "catalog_test");
            assert_eq!(config.catalog.products_collection, "products");
            assert_eq!(config.catalog.categories_collection, "categories");
            assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
        });
    }

    #[test]
    fn test_config_overrides() {
        let vars = [
            MONGO_VARS[0],
            MONGO_VARS[1],
            ("CATALOG_PRODUCTS_COLLECTION", Some("items")),
            ("SHUTDOWN_TIMEOUT_SECS", Some("5")),
        ];

        temp_env::with_vars(vars, || {
            let config = Config::from_env().unwrap();

            assert_eq!(config.catalog.products_collection, "items");
            assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
        });
    }

    #[test]
    fn test_config_rejects_bad_timeout() {
        let vars = [
            MONGO_VARS[0],
            MONGO_VARS[1],
            ("SHUTDOWN_TIMEOUT_SECS", Some("soon")),
        ];

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn test_config_requires_mongodb_url() {
        let vars = [
            ("MONGODB_URL", None),
            ("MONGO_URL", None),
            ("MONGODB_DATABASE", Some("catalog_test")),
        ];

        temp_env::with_vars(vars, || {
            assert!(Config::from_env().is_err());
        });
    }
}
