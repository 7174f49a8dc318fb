use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::{CoreError, CoreResult},
};

const TMP_SUFFIX: &str = "tmp";
const DEFAULT_MONTHLY_RENT_CENTS: i64 = 150_000;

/// Application settings shared by the billing and storage layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Flat rent owed for every month.
    pub monthly_rent: Decimal,
    pub currency: String,
    #[serde(default)]
    pub demo_card: DemoCard,
    /// Overrides the default data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// `tracing` filter directive, e.g. `rentdesk_core=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monthly_rent: Decimal::new(DEFAULT_MONTHLY_RENT_CENTS, 2),
            currency: "USD".into(),
            demo_card: DemoCard::default(),
            data_dir: None,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> CoreResult<()> {
        if self.monthly_rent <= Decimal::ZERO {
            return Err(CoreError::Config(format!(
                "monthly_rent must be positive, got {}",
                self.monthly_rent
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(CoreError::Config("currency must not be empty".into()));
        }
        Ok(())
    }

    /// Data directory for bucket files, relative to `base` unless overridden.
    pub fn data_dir_in(&self, base: &Path) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(base))
    }
}

/// The single card number accepted at checkout. No real gateway is involved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DemoCard {
    pub number: String,
    pub cvv: String,
}

impl Default for DemoCard {
    fn default() -> Self {
        Self {
            number: "4242 4242 4242 4242".into(),
            cvv: "123".into(),
        }
    }
}

impl DemoCard {
    /// Compares digits only, so spacing and dashes in the entered number are ignored.
    pub fn accepts(&self, number: &str, cvv: &str) -> bool {
        digits(number) == digits(&self.number) && cvv.trim() == self.cvv
    }
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Loads and saves [`Config`] as pretty JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn with_base_dir(base: PathBuf) -> CoreResult<Self> {
        ensure_dir(&base)?;
        Ok(Self::new(PathResolver::config_file_in(&base)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the default config when no file exists yet.
    pub fn load(&self) -> CoreResult<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data).map_err(|err| {
            CoreError::Config(format!("{}: {err}", self.path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> CoreResult<()> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = self.path.with_extension(format!("json.{TMP_SUFFIX}"));
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
