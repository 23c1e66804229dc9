use std::fs;
use std::path::Path;
use std::{env, path::PathBuf};

use directories::ProjectDirs;
use intake::OptionCatalog;
use lazy_static::lazy_static;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,
    /// Where `JsonFileSink` writes submitted records.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub catalog: OptionCatalog,
}

const CONFIG_FILES: &[(&str, config::FileFormat)] = &[
    ("config.json5", config::FileFormat::Json5),
    ("config.toml", config::FileFormat::Toml),
];

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase();
    pub static ref DATA_FOLDER: Option<PathBuf> =
        env::var(format!("{}_DATA", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
    pub static ref CONFIG_FOLDER: Option<PathBuf> =
        env::var(format!("{}_CONFIG", PROJECT_NAME.clone()))
            .ok()
            .map(PathBuf::from);
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().into_owned())?
            .set_default("config_dir", config_dir.to_string_lossy().into_owned())?;

        for (file, format) in CONFIG_FILES {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder.build()?.try_deserialize()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.data_dir.join("submissions"))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.config.data_dir.join("logs")
    }

    /// Configuration files that were actually present when loading.
    pub fn loaded_files(&self) -> Vec<PathBuf> {
        existing_config_files(&self.config.config_dir)
    }
}

fn existing_config_files(config_dir: &Path) -> Vec<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|(file, _)| config_dir.join(file))
        .filter(|path| path.exists())
        .collect()
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = DATA_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(s) = CONFIG_FOLDER.clone() {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "intake", env!("CARGO_PKG_NAME"))
}

pub fn ensure_data_and_config_dirs_exist() -> std::io::Result<()> {
    for dir in [get_data_dir(), get_config_dir()] {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn output_dir_defaults_under_data_dir() {
        let cfg = Config {
            config: AppConfig {
                data_dir: PathBuf::from("/tmp/intake-data"),
                ..AppConfig::default()
            },
            ..Config::default()
        };
        assert_eq!(cfg.output_dir(), PathBuf::from("/tmp/intake-data/submissions"));
        assert_eq!(cfg.log_dir(), PathBuf::from("/tmp/intake-data/logs"));
    }

    #[test]
    fn loaded_files_come_from_config_dir() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("intake_config_{nanos}"));
        fs::create_dir_all(&dir).unwrap();

        let cfg = Config {
            config: AppConfig {
                config_dir: dir.clone(),
                ..AppConfig::default()
            },
            ..Config::default()
        };
        assert!(cfg.loaded_files().is_empty());

        fs::write(dir.join("config.toml"), "output_dir = \"/out\"\n").unwrap();
        assert_eq!(cfg.loaded_files(), vec![dir.join("config.toml")]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn catalog_section_overrides_defaults() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(
                r#"{ data_dir: "/d", output_dir: "/out", catalog: { regions: ["USA", "Brazil"] } }"#,
                config::FileFormat::Json5,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.output_dir(), PathBuf::from("/out"));
        assert_eq!(cfg.catalog.regions, vec!["USA".to_string(), "Brazil".to_string()]);
        assert_eq!(
            cfg.catalog.channels,
            OptionCatalog::default().channels,
            "unset catalog lists keep their defaults"
        );
    }
}
