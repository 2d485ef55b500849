//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["enzymeml.toml", ".enzymeml.toml"];
const ENV_PREFIX: &str = "ENZYMEML_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `ENZYMEML_` environment variables (`ENZYMEML_RETRY__TIMEOUT_MS=500`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./enzymeml.toml` or `./.enzymeml.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/enzymeml-llm/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(
            Self::global_config_path().as_deref(),
            Self::project_config_path().as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }
        // A missing explicit file is an error, not a silent fallback
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file_exact(path));
        }
        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("enzymeml-llm").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config sources being used, in priority order.
    pub fn describe_sources(explicit: Option<&PathBuf>) -> Vec<String> {
        let mut lines = Vec::new();
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };

        let env_set = std::env::vars().any(|(key, _)| key.starts_with(ENV_PREFIX));
        lines.push(format!("  {} Env:      {}*", mark(env_set), ENV_PREFIX));

        if let Some(path) = explicit {
            lines.push(format!("  {} Explicit: {}", mark(path.exists()), path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  {} Project:  {}", mark(true), path.display())),
            None => lines.push(format!(
                "  {} Project:  ./{} or ./{}",
                mark(false),
                PROJECT_FILES[0],
                PROJECT_FILES[1]
            )),
        }

        if let Some(path) = Self::global_config_path() {
            lines.push(format!("  {} Global:   {}", mark(path.exists()), path.display()));
        }

        lines.push("  [     ] Default:  built-in defaults".to_string());
        lines
    }
}
