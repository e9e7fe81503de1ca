use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default country allowlist tracked by the pipeline.
pub const DEFAULT_COUNTRIES: [&str; 7] = [
    "India",
    "Brazil",
    "Russia",
    "United Kingdom",
    "Egypt",
    "Italy",
    "South Africa",
];

/// Default inclusive calendar-year window for snapshot retention.
pub const DEFAULT_YEAR_RANGE: (i32, i32) = (2021, 2023);

/// Persisted application configuration, saved to
/// `~/.covid-stats/config.json`.
///
/// The allowlist and year window are configuration, not embedded logic; the
/// defaults reproduce the conventions of the upstream snapshot feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Countries retained at ingestion; rows for any other country are
    /// dropped.
    pub countries: BTreeSet<String>,
    /// Inclusive (min, max) calendar-year window for report dates.
    pub year_range: (i32, i32),
    /// Directory holding the daily snapshot CSVs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Base directory for reports, exports, charts and the store file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            year_range: DEFAULT_YEAR_RANGE,
            data_dir: None,
            output_dir: None,
        }
    }
}

impl AppConfig {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".covid-stats").join("config.json")
    }

    /// Load the config from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write the config to the default path, creating parent
    /// directories if needed.
    pub fn save(&self) -> Result<(), std::io::Error> {
        self.save_to(&Self::config_path())
    }

    /// Atomically write the config to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;

        // Write to a temp file then rename for atomicity.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Whether `country` is in the configured allowlist.
    pub fn is_target_country(&self, country: &str) -> bool {
        self.countries.contains(country)
    }

    /// Whether `year` falls inside the inclusive retention window.
    pub fn year_in_range(&self, year: i32) -> bool {
        let (min, max) = self.year_range;
        year >= min && year <= max
    }

    /// Resolved output base directory, defaulting to `./output`.
    pub fn output_base(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("output"))
    }

    /// Directory for saved text reports.
    pub fn reports_dir(&self) -> PathBuf {
        self.output_base().join("reports")
    }

    /// Directory for CSV exports.
    pub fn exports_dir(&self) -> PathBuf {
        self.output_base().join("exports")
    }

    /// Directory for rendered chart images.
    pub fn graphics_dir(&self) -> PathBuf {
        self.output_base().join("graphics")
    }

    /// Path of the delimited store file holding cleaned records.
    pub fn store_path(&self) -> PathBuf {
        self.output_base().join("store").join("covid_data.csv")
    }
}
