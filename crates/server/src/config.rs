//! Environment configuration
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ADMIN_PASSWORD` | `admin123` |
//! | `PORT` | `8080` |
//! | `SERVICE_ACCOUNT_PATH` | `./service-account.json` |
//! | `FRONTEND_DIR` | `./static` |
//! | `GOOGLE_CLOUD_PROJECT` / `GCP_PROJECT` | none |
//! | `CLIENT_ID` | none |
//! | `STORE_BACKEND` | `firestore` |
//! | `FIRESTORE_EMULATOR_HOST` | none |
//! | `FIRESTORE_ACCESS_TOKEN` | none |
//! | `FIRESTORE_TIMEOUT_MS` | `10000` |
//!
//! Empty values count as unset.
//!
//! The hosted backend authenticates with, in order of precedence:
//! `FIRESTORE_ACCESS_TOKEN`, the emulator's `owner` token, the
//! service-account key, the compute metadata server.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use eventdesk_store::{RemoteConfig, ServiceAccount, TokenSource};
use thiserror::Error;
use tracing::{info, warn};

/// Tenant used by the memory backend when `CLIENT_ID` is unset
pub const LOCAL_TENANT: &str = "local";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but cannot be parsed
    #[error("invalid {key} value '{value}': {reason}")]
    Invalid {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
        /// Parser message
        reason: String,
    },

    /// No project id from the service account or the environment
    #[error("GOOGLE_CLOUD_PROJECT or GCP_PROJECT environment variable must be set")]
    MissingProject,

    /// No tenant id from the service account or the environment
    #[error("CLIENT_ID environment variable must be set when no service account file is present")]
    MissingClientId,

    /// The service-account file exists but is unusable
    #[error(transparent)]
    Credentials(#[from] eventdesk_store::Error),
}

/// Which document store backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Hosted Firestore database
    Firestore,
    /// Process memory, lost on exit
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "firestore" => Ok(Backend::Firestore),
            "memory" => Ok(Backend::Memory),
            other => Err(format!("expected 'firestore' or 'memory', got '{other}'")),
        }
    }
}

/// Server settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for admin routes
    pub admin_password: String,
    /// Listen port
    pub port: u16,
    /// Service-account key consulted for project and tenant
    pub service_account_path: PathBuf,
    /// Static frontend, served when the directory exists
    pub frontend_dir: PathBuf,
    /// Project id from the environment
    pub project_id: Option<String>,
    /// Tenant id from the environment
    pub client_id: Option<String>,
    /// Selected backend
    pub backend: Backend,
    /// `host:port` of a Firestore emulator
    pub emulator_host: Option<String>,
    /// Fixed bearer token, overriding every other token source
    pub access_token: Option<String>,
    /// Per-request timeout for the hosted database
    pub store_timeout: Duration,
}

impl Config {
    /// Read the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let admin_password = var("ADMIN_PASSWORD").unwrap_or_else(|| {
            warn!("ADMIN_PASSWORD not set, using default password");
            "admin123".to_string()
        });

        Ok(Self {
            admin_password,
            port: parse_or(&var, "PORT", 8080)?,
            service_account_path: PathBuf::from(or_default(
                &var,
                "SERVICE_ACCOUNT_PATH",
                "./service-account.json",
            )),
            frontend_dir: PathBuf::from(or_default(&var, "FRONTEND_DIR", "./static")),
            project_id: var("GOOGLE_CLOUD_PROJECT").or_else(|| var("GCP_PROJECT")),
            client_id: var("CLIENT_ID"),
            backend: parse_or(&var, "STORE_BACKEND", Backend::Firestore)?,
            emulator_host: var("FIRESTORE_EMULATOR_HOST"),
            access_token: var("FIRESTORE_ACCESS_TOKEN"),
            store_timeout: Duration::from_millis(parse_or(&var, "FIRESTORE_TIMEOUT_MS", 10_000u64)?),
        })
    }

    /// Resolve project, tenant and credentials for the hosted backend.
    ///
    /// A service-account file, when present, supplies project, tenant and
    /// signing key; otherwise the project id and `CLIENT_ID` must come from
    /// the environment and tokens come from the metadata server.
    pub fn remote_config(&self) -> Result<RemoteConfig, ConfigError> {
        let base = if self.service_account_path.exists() {
            let account = ServiceAccount::from_file(&self.service_account_path)?;
            info!(
                path = %self.service_account_path.display(),
                "Using project and tenant from service account"
            );
            RemoteConfig::from_service_account(&account)
        } else {
            let project = self.project_id.clone().ok_or(ConfigError::MissingProject)?;
            let client = self.client_id.clone().ok_or(ConfigError::MissingClientId)?;
            RemoteConfig::new(project, client)
        };

        let mut remote = base.with_timeout(self.store_timeout);
        if let Some(host) = &self.emulator_host {
            info!(host = %host, "Using Firestore emulator");
            remote = remote.with_emulator(host);
        }
        if let Some(token) = &self.access_token {
            info!("Using FIRESTORE_ACCESS_TOKEN");
            remote = remote.with_access_token(token.clone());
        }
        match &remote.token_source {
            TokenSource::ServiceAccount(key) => {
                info!(account = %key.client_email, "Signing tokens with service account key")
            }
            TokenSource::Metadata => info!("Fetching tokens from the metadata server"),
            TokenSource::Anonymous | TokenSource::Static(_) => {}
        }
        Ok(remote)
    }

    /// Tenant for the memory backend.
    pub fn memory_tenant(&self) -> String {
        self.client_id
            .clone()
            .unwrap_or_else(|| LOCAL_TENANT.to_string())
    }
}

fn or_default(var: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match var(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key,
                value: raw.clone(),
                reason: e.to_string(),
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.admin_password, "admin123");
        assert_eq!(config.port, 8080);
        assert_eq!(config.service_account_path, PathBuf::from("./service-account.json"));
        assert_eq!(config.frontend_dir, PathBuf::from("./static"));
        assert_eq!(config.backend, Backend::Firestore);
        assert_eq!(config.store_timeout, Duration::from_secs(10));
        assert_eq!(config.memory_tenant(), LOCAL_TENANT);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("ADMIN_PASSWORD", "s3cret"),
            ("PORT", "9000"),
            ("STORE_BACKEND", "Memory"),
            ("GCP_PROJECT", "fallback"),
            ("CLIENT_ID", "acme"),
            ("FIRESTORE_TIMEOUT_MS", "250"),
        ])
        .unwrap();
        assert_eq!(config.admin_password, "s3cret");
        assert_eq!(config.port, 9000);
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.project_id.as_deref(), Some("fallback"));
        assert_eq!(config.memory_tenant(), "acme");
        assert_eq!(config.store_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_primary_project_wins() {
        let config = config(&[("GOOGLE_CLOUD_PROJECT", "main"), ("GCP_PROJECT", "other")]).unwrap();
        assert_eq!(config.project_id.as_deref(), Some("main"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config(&[("ADMIN_PASSWORD", ""), ("PORT", "  ")]).unwrap();
        assert_eq!(config.admin_password, "admin123");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("STORE_BACKEND", "sqlite")]),
            Err(ConfigError::Invalid { key: "STORE_BACKEND", .. })
        ));
    }

    #[test]
    fn test_remote_requires_project_and_client_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        let missing = missing.to_str().unwrap();

        let no_project = config(&[("SERVICE_ACCOUNT_PATH", missing)]).unwrap();
        assert!(matches!(
            no_project.remote_config(),
            Err(ConfigError::MissingProject)
        ));

        let no_client = config(&[("SERVICE_ACCOUNT_PATH", missing), ("GCP_PROJECT", "demo")]).unwrap();
        assert!(matches!(
            no_client.remote_config(),
            Err(ConfigError::MissingClientId)
        ));

        let ok = config(&[
            ("SERVICE_ACCOUNT_PATH", missing),
            ("GOOGLE_CLOUD_PROJECT", "demo"),
            ("CLIENT_ID", "acme"),
            ("FIRESTORE_EMULATOR_HOST", "localhost:8081"),
            ("FIRESTORE_ACCESS_TOKEN", "pinned"),
        ])
        .unwrap()
        .remote_config()
        .unwrap();
        assert_eq!(ok.project_id, "demo");
        assert_eq!(ok.tenant_id, "acme");
        assert_eq!(ok.base_url, "http://localhost:8081/v1");
        assert_eq!(ok.token_source, TokenSource::Static("pinned".to_string()));
    }

    #[test]
    fn test_token_source_selection() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("none.json");
        let missing = missing.to_str().unwrap();
        let env = [
            ("SERVICE_ACCOUNT_PATH", missing),
            ("GOOGLE_CLOUD_PROJECT", "demo"),
            ("CLIENT_ID", "acme"),
        ];

        let cloud_run = config(&env).unwrap().remote_config().unwrap();
        assert_eq!(cloud_run.token_source, TokenSource::Metadata);

        let mut emulated = env.to_vec();
        emulated.push(("FIRESTORE_EMULATOR_HOST", "localhost:8081"));
        let emulator = config(&emulated).unwrap().remote_config().unwrap();
        assert_eq!(emulator.token_source, TokenSource::Static("owner".to_string()));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"project_id":"p","client_id":"c","client_email":"svc@p.iam.gserviceaccount.com","private_key":"pem"}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let keyed = config(&[("SERVICE_ACCOUNT_PATH", path.as_str())])
            .unwrap()
            .remote_config()
            .unwrap();
        match keyed.token_source {
            TokenSource::ServiceAccount(key) => {
                assert_eq!(key.client_email, "svc@p.iam.gserviceaccount.com")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_remote_prefers_service_account() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"project_id":"sa-project","client_id":"sa-tenant"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let remote = config(&[
            ("SERVICE_ACCOUNT_PATH", path.as_str()),
            ("GOOGLE_CLOUD_PROJECT", "env-project"),
            ("CLIENT_ID", "env-tenant"),
        ])
        .unwrap()
        .remote_config()
        .unwrap();
        assert_eq!(remote.project_id, "sa-project");
        assert_eq!(remote.tenant_id, "sa-tenant");
    }

    #[test]
    fn test_broken_service_account_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"project_id":"sa-project"}}"#).unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let result = config(&[("SERVICE_ACCOUNT_PATH", path.as_str())])
            .unwrap()
            .remote_config();
        assert!(matches!(result, Err(ConfigError::Credentials(_))));
    }
}
