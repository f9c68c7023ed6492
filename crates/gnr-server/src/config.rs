use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use gnr_core::error::CoreError;
use gnr_core::models::antibiotic::Target;
use gnr_core::models::snapshot::Hospital;
use gnr_encoder::{EncoderOptions, EncoderTables};
use gnr_models::ArtifactLayout;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const CONFIG_ENV: &str = "GNR_CONFIG";
pub const BIND_ADDR_ENV: &str = "GNR_BIND_ADDR";
pub const MODEL_DIR_ENV: &str = "GNR_MODEL_DIR";
/// Comma-separated site ids, e.g. `Sunnybrook,TOH`.
pub const HOSPITALS_ENV: &str = "GNR_HOSPITALS";
/// Comma-separated target ids, e.g. `Meropenem,Piptaz_or_Tobramycin`.
pub const TARGETS_ENV: &str = "GNR_TARGETS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,
    #[serde(default)]
    pub layout: ArtifactLayout,
    /// Sites whose artifacts are loaded at startup.
    #[serde(default = "default_hospitals")]
    pub hospitals: Vec<Hospital>,
    /// Targets assessed per request, in display order. Empty means the
    /// standard set.
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(default)]
    pub encoder: EncoderOptions,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_hospitals() -> Vec<Hospital> {
    vec![Hospital::Sunnybrook, Hospital::Toh]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            bind_addr: default_bind_addr(),
            model_dir: default_model_dir(),
            layout: ArtifactLayout::default(),
            hospitals: default_hospitals(),
            targets: Vec::new(),
            encoder: EncoderOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Encoder tables for this deployment's target list.
    pub fn encoder_tables(&self) -> EncoderTables {
        let tables = EncoderTables::standard();
        if self.targets.is_empty() {
            tables
        } else {
            tables.with_targets(self.targets.clone())
        }
    }

    /// Apply `GNR_*` environment overrides on top of the file.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> eyre::Result<()> {
        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            self.bind_addr = addr
                .parse()
                .map_err(|e| eyre::eyre!("invalid {BIND_ADDR_ENV} '{addr}': {e}"))?;
        }
        if let Some(dir) = lookup(MODEL_DIR_ENV) {
            self.model_dir = PathBuf::from(dir);
        }
        if let Some(list) = lookup(HOSPITALS_ENV) {
            self.hospitals = parse_list(HOSPITALS_ENV, &list)?;
        }
        if let Some(list) = lookup(TARGETS_ENV) {
            self.targets = parse_list(TARGETS_ENV, &list)?;
        }
        Ok(())
    }
}

fn parse_list<T>(var: &str, list: &str) -> eyre::Result<Vec<T>>
where
    T: FromStr<Err = CoreError>,
{
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| item.parse().map_err(|e| eyre::eyre!("invalid {var}: {e}")))
        .collect()
}

/// Load from the file named by `GNR_CONFIG` (defaults when unset), then
/// apply environment overrides.
pub fn load_config() -> eyre::Result<ServerConfig> {
    let mut config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config_file(Path::new(&path))?,
        None => {
            tracing::info!("{CONFIG_ENV} not set, using default config");
            ServerConfig::default()
        }
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}

pub fn load_config_file(path: &Path) -> eyre::Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    let config = parse_config(&contents)?;
    tracing::info!(path = %path.display(), "config loaded");
    Ok(config)
}

pub fn parse_config(contents: &str) -> eyre::Result<ServerConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: ServerConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 → v1: boolean `site_models` became `layout`
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(site_models) = obj.remove("site_models") {
            let layout = if site_models.as_bool().unwrap_or(true) {
                "per_site"
            } else {
                "shared"
            };
            obj.entry("layout")
                .or_insert(serde_json::Value::String(layout.to_string()));
        }
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (site_models → layout)");
    }

    Ok(json)
}
