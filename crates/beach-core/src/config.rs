use crate::error::{BeachError, Result};
use crate::seed::SeedCatalog;
use crate::store::oauth::ServiceAccountKey;
use crate::store::{firebase, BeachStore, Credential, FileStore, FirebaseStore, MemoryStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "beachsafe.yaml";

// ---------------------------------------------------------------------------
// StoreBackend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Firebase,
    File,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = BeachError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "firebase" => Ok(Self::Firebase),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(BeachError::Config(format!(
                "unknown store backend '{other}' (expected firebase, file, or memory)"
            ))),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Firebase => "firebase",
            Self::File => "file",
            Self::Memory => "memory",
        })
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Realtime Database URL. Derived from the service account when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    #[serde(default = "default_reference")]
    pub reference: String,
    /// Database secret or ID token, sent as the `auth` query parameter. Takes
    /// precedence over the service account when both are set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_reference() -> String {
    firebase::DEFAULT_REFERENCE.to_string()
}

fn default_data_file() -> PathBuf {
    PathBuf::from("beaches.json")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            database_url: None,
            reference: default_reference(),
            auth_token: None,
            data_file: default_data_file(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub store: StoreConfig,
    /// Catalog used to seed an empty store. The bundled catalog when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
    /// Firebase service-account JSON, as produced by the Firebase console.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_account: Option<Value>,
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            store: StoreConfig::default(),
            seed_file: None,
            service_account: None,
        }
    }
}

impl Config {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        match crate::io::read_if_exists(path)? {
            Some(data) => {
                let cfg: Config = serde_yaml::from_str(&data)?;
                Ok(cfg)
            }
            None => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let mut cfg = Self::load(path)?;
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    /// Override settings from variables provided by `lookup` (the process
    /// environment in production). Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e| BeachError::Config(format!("invalid PORT '{port}': {e}")))?;
        }
        if let Some(backend) = var("BEACH_STORE") {
            self.store.backend = backend.parse()?;
        }
        if let Some(url) = var("FIREBASE_DATABASE_URL") {
            self.store.database_url = Some(url);
        }
        if let Some(token) = var("FIREBASE_AUTH_TOKEN") {
            self.store.auth_token = Some(token);
        }
        if let Some(json) = var("FIREBASE_SERVICE_ACCOUNT") {
            self.service_account = Some(parse_service_account(&json)?);
        }
        if let Some(file) = var("BEACH_DATA_FILE") {
            self.store.data_file = PathBuf::from(file);
        }
        if let Some(file) = var("BEACH_SEED_FILE") {
            self.seed_file = Some(PathBuf::from(file));
        }
        Ok(())
    }

    /// `project_id` of the configured service account.
    pub fn project_id(&self) -> Option<&str> {
        self.service_account
            .as_ref()?
            .get("project_id")?
            .as_str()
            .filter(|s| !s.is_empty())
    }

    /// Explicit database URL, else the default URL for the service account's
    /// project.
    pub fn database_url(&self) -> Option<String> {
        if let Some(url) = &self.store.database_url {
            return Some(url.clone());
        }
        self.project_id()
            .map(|id| format!("https://{id}-default-rtdb.firebaseio.com"))
    }

    /// How the Firebase store authenticates: an explicit auth token, else the
    /// service account, else nothing.
    pub fn credential(&self) -> Result<Credential> {
        if let Some(token) = self.store.auth_token.as_ref().filter(|t| !t.is_empty()) {
            return Ok(Credential::Token(token.clone()));
        }
        match &self.service_account {
            Some(account) => Ok(Credential::ServiceAccount(ServiceAccountKey::from_value(
                account,
            )?)),
            None => Ok(Credential::None),
        }
    }

    /// Build the configured store. For Firebase this creates a blocking HTTP
    /// client, so call it outside of an async runtime.
    pub fn open_store(&self) -> Result<Arc<dyn BeachStore>> {
        match self.store.backend {
            StoreBackend::Firebase => {
                let url = self.database_url().ok_or_else(|| {
                    BeachError::Config(
                        "firebase store needs a database url or a service account (run `beachsafe setup`)"
                            .into(),
                    )
                })?;
                let credential = self.credential()?;
                let auth = match &credential {
                    Credential::None => "none",
                    Credential::Token(_) => "token",
                    Credential::ServiceAccount(_) => "service_account",
                };
                if matches!(credential, Credential::None) {
                    tracing::warn!("firebase store has no credentials; requests are unauthenticated");
                }
                tracing::info!(%url, reference = %self.store.reference, auth, "using firebase store");
                let store = FirebaseStore::new(
                    &url,
                    &self.store.reference,
                    credential,
                    Duration::from_secs(self.store.timeout_secs),
                )?;
                Ok(Arc::new(store))
            }
            StoreBackend::File => {
                tracing::info!(path = %self.store.data_file.display(), "using file store");
                Ok(Arc::new(FileStore::new(&self.store.data_file)))
            }
            StoreBackend::Memory => {
                tracing::info!("using in-memory store");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }

    pub fn seed_catalog(&self) -> Result<SeedCatalog> {
        match &self.seed_file {
            Some(path) => SeedCatalog::load(path),
            None => SeedCatalog::bundled(),
        }
    }
}

/// Parse and check a Firebase service-account JSON document: it must name a
/// project and carry a usable signing key.
pub fn parse_service_account(json: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(json)?;
    let obj = value
        .as_object()
        .ok_or_else(|| BeachError::Config("service account must be a JSON object".into()))?;
    if let Some(kind) = obj.get("type").and_then(Value::as_str) {
        if kind != "service_account" {
            return Err(BeachError::Config(format!(
                "expected a service_account credential, got '{kind}'"
            )));
        }
    }
    let has_project = obj
        .get("project_id")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !has_project {
        return Err(BeachError::Config(
            "service account is missing project_id".into(),
        ));
    }
    ServiceAccountKey::from_value(&value)?;
    Ok(value)
}
