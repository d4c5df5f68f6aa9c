//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_FILES: &[&str] = &["grocery-chat.toml", ".grocery-chat.toml"];

/// Prefix for environment overrides, e.g. `GROCERY_CHAT_API__BASE_URL`.
const ENV_PREFIX: &str = "GROCERY_CHAT_";

/// Shorthand for `api.base_url`.
const ENV_API_URL: &str = "GROCERY_API_URL";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `GROCERY_API_URL`, then `GROCERY_CHAT_*` (`__` nests)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./grocery-chat.toml` or `./.grocery-chat.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/grocery-chat/config.toml`
    /// 5. Default values
    ///
    /// Command-line flags are applied on top by the caller.
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = config_path
            && !path.exists()
        {
            return Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))));
        }

        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(
                Env::raw()
                    .only(&[ENV_API_URL])
                    .map(|_| "api.base_url".into()),
            )
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("grocery-chat").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");

        if std::env::var_os(ENV_API_URL).is_some() {
            println!("  [FOUND] Env:     {}", ENV_API_URL);
        } else {
            println!("  [     ] Env:     {} / {}*", ENV_API_URL, ENV_PREFIX);
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./grocery-chat.toml or ./.grocery-chat.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    /// Keep the host's global config out of the jail.
    fn isolate(jail: &mut Jail) {
        let home = jail.directory().join("xdg");
        jail.set_env("XDG_CONFIG_HOME", home.display());
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.chat.error_marker, "Error: ");
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("grocery-chat"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file(
                "grocery-chat.toml",
                r#"
[api]
base_url = "http://project:8000"

[voice]
language = "pt-BR"
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.api.base_url, "http://project:8000");
            assert_eq!(config.voice.language, "pt-BR");
            assert_eq!(config.chat.error_marker, "Error: ");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("grocery-chat.toml", "[api]\nbase_url = \"http://project\"\n")?;
            jail.create_file("custom.toml", "[api]\nbase_url = \"http://explicit\"\n")?;

            let path = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&path)).map_err(|e| *e)?;
            assert_eq!(config.api.base_url, "http://explicit");
            Ok(())
        });
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        Jail::expect_with(|jail| {
            isolate(jail);
            let path = PathBuf::from("missing.toml");
            assert!(ConfigLoader::load(Some(&path)).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_files() {
        Jail::expect_with(|jail| {
            isolate(jail);
            jail.create_file("grocery-chat.toml", "[api]\nbase_url = \"http://project\"\n")?;
            jail.set_env("GROCERY_CHAT_API__TIMEOUT_SECONDS", "15");
            jail.set_env("GROCERY_CHAT_OUTPUT__COLOR", "false");
            jail.set_env("GROCERY_API_URL", "http://env:9000");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.api.base_url, "http://env:9000");
            assert_eq!(config.api.timeout_seconds, Some(15));
            assert!(!config.output.color);
            Ok(())
        });
    }

    #[test]
    fn test_global_file_is_lowest_file_priority() {
        Jail::expect_with(|jail| {
            isolate(jail);
            std::fs::create_dir_all(jail.directory().join("xdg/grocery-chat"))
                .map_err(|e| e.to_string())?;
            jail.create_file(
                "xdg/grocery-chat/config.toml",
                "[chat]\nerror_marker = \"ERR:\"\n[api]\nbase_url = \"http://global\"\n",
            )?;
            jail.create_file("grocery-chat.toml", "[api]\nbase_url = \"http://project\"\n")?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.chat.error_marker, "ERR:");
            assert_eq!(config.api.base_url, "http://project");
            Ok(())
        });
    }
}
