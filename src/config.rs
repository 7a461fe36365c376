use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::loader::SheetLayout;
use crate::pages::Page;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV: &str = "SALES_DASHBOARD_CONFIG";
/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// One page's data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub layout: SheetLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub superstore: SourceConfig,
    pub supermarket: SourceConfig,
    pub start_page: Page,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            superstore: SourceConfig {
                path: PathBuf::from("SampleSuperstore.csv"),
                layout: SheetLayout::default(),
            },
            // The workbook keeps a title block above the table in B:R.
            supermarket: SourceConfig {
                path: PathBuf::from("supermarkt_sales.xlsx"),
                layout: SheetLayout {
                    sheet: Some("Sales".to_string()),
                    skip_rows: 3,
                    first_column: Some("B".to_string()),
                    last_column: Some("R".to_string()),
                    max_rows: Some(1000),
                },
            },
            start_page: Page::Superstore,
        }
    }
}

impl DashboardConfig {
    /// Resolve the config: `$SALES_DASHBOARD_CONFIG`, else `./dashboard.json`,
    /// else built-in defaults.
    pub fn load() -> Result<Self> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_path(local);
        }
        log::info!("No {DEFAULT_CONFIG_FILE} found, using built-in defaults");
        Ok(Self::default())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn source(&self, page: Page) -> &SourceConfig {
        match page {
            Page::Superstore => &self.superstore,
            Page::Supermarket => &self.supermarket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{ "superstore": { "path": "data/orders.parquet" }, "start_page": "supermarket" }"#,
        )
        .expect("write config");

        let config = DashboardConfig::from_path(&path).unwrap();
        assert_eq!(config.superstore.path, PathBuf::from("data/orders.parquet"));
        assert_eq!(config.superstore.layout, SheetLayout::default());
        assert_eq!(config.supermarket, DashboardConfig::default().supermarket);
        assert_eq!(config.start_page, Page::Supermarket);
    }

    #[test]
    fn malformed_config_reports_the_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").expect("write config");

        let err = DashboardConfig::from_path(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.json"));
    }

    #[test]
    fn default_supermarket_layout_matches_the_workbook() {
        let config = DashboardConfig::default();
        let layout = &config.source(Page::Supermarket).layout;
        assert_eq!(layout.sheet.as_deref(), Some("Sales"));
        assert_eq!(layout.skip_rows, 3);
        assert_eq!(layout.max_rows, Some(1000));
    }
}
