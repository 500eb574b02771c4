use std::path::Path;

use crate::prelude::*;

const ENV_PREFIX: &str = "STARDUST";

fn default_base_uri() -> String {
    "stardust://".to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Settings {
    /// Prefix used when rendering cursor positions as URIs.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,

    /// `env_logger` filter directives, e.g. `info,stardust_core=debug`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Layers an optional settings file (any format `config` recognises by
    /// extension) under `STARDUST_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            if !path.exists() {
                bail!("settings file {} does not exist", path.display());
            }
            builder = builder.add_source(config::File::from(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("reading settings")?
            .try_deserialize::<Settings>()
            .context("parsing settings")?;
        if settings.base_uri.is_empty() {
            bail!("base_uri must not be empty");
        }
        Ok(settings)
    }
}

/// Installs `env_logger`, honouring `RUST_LOG` over the configured filter.
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging(settings: &Settings) {
    let env = env_logger::Env::default().default_filter_or(settings.log_filter.as_str());
    let _ = env_logger::Builder::from_env(env).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_sources() {
        let settings = Settings::load(None).expect("defaults");
        assert_eq!(settings.base_uri, "stardust://");
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn reads_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "base_uri = \"lab://\"").expect("write");
        let settings = Settings::load(Some(file.path())).expect("loaded");
        assert_eq!(settings.base_uri, "lab://");
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Settings::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"), "{err}");
    }

    #[test]
    fn init_logging_twice_is_harmless() {
        let settings = Settings::default();
        init_logging(&settings);
        init_logging(&settings);
    }
}
