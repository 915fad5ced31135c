use crate::errors::{AppError, AppResult};
use crate::models::metrics::Targets;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Overrides the configuration directory when set.
pub const HOME_ENV: &str = "RDAYDONE_HOME";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// User that commands apply to when `--user` is omitted.
    #[serde(default)]
    pub default_user: Option<i64>,
    #[serde(default = "default_daily_target")]
    pub daily_target: f64,
    #[serde(default = "default_weekly_target")]
    pub weekly_target: f64,
    #[serde(default = "default_monthly_target")]
    pub monthly_target: f64,
}

fn default_daily_target() -> f64 {
    Targets::default().daily
}
fn default_weekly_target() -> f64 {
    Targets::default().weekly
}
fn default_monthly_target() -> f64 {
    Targets::default().monthly
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            default_user: None,
            daily_target: default_daily_target(),
            weekly_target: default_weekly_target(),
            monthly_target: default_monthly_target(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(dir) = env::var(HOME_ENV) {
            return PathBuf::from(dir);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rdaydone")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".rdaydone")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rdaydone.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rdaydone.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        serde_yaml::from_str(&content).map_err(|_| AppError::ConfigLoad)
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        let mut file = fs::File::create(path).map_err(|_| AppError::ConfigSave)?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave)?;
        Ok(())
    }

    pub fn targets(&self) -> Targets {
        Targets {
            daily: self.daily_target,
            weekly: self.weekly_target,
            monthly: self.monthly_target,
        }
    }

    /// Initialize configuration and database files. Returns the database
    /// path. In test mode the configuration file is left untouched.
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(&name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => Self::database_file(),
        };

        if !is_test {
            let config = Self::with_database(db_path.clone());
            config.save_to(&Self::config_file())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        println!("✅ Database:    {:?}", db_path);

        Ok(db_path)
    }
}
