use crate::columns::DEFAULT_HEADER_SCAN_ROWS;
use crate::error::{DashboardError, Result};
use crate::notifications::DEFAULT_NOTIFICATION_RETENTION;
use serde::{Deserialize, Serialize};

/// CSV export of the reference "Cockpit" sheet.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1h3onr9mXLIaj6sTqEzWeQ3bi2Ct62BeENGyUMIJrn-A/export?format=csv&gid=671961262";

/// 30 minutes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 1800;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// User override for the sheet location.
    pub sheet_url: Option<String>,
    pub refresh_interval_secs: u64,
    pub notification_retention: usize,
    pub header_scan_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sheet_url: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            notification_retention: DEFAULT_NOTIFICATION_RETENTION,
            header_scan_rows: DEFAULT_HEADER_SCAN_ROWS,
        }
    }
}

impl DashboardConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_sheet_url(mut self, url: impl Into<String>) -> Self {
        self.sheet_url = Some(url.into());
        self
    }

    /// The override when it is set and non-blank, otherwise [`DEFAULT_SHEET_URL`].
    pub fn resolved_sheet_url(&self) -> &str {
        self.sheet_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_SHEET_URL)
    }

    pub fn validate(&self) -> Result<()> {
        if self.refresh_interval_secs == 0 {
            return Err(DashboardError::InvalidConfig(
                "refresh_interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.notification_retention == 0 {
            return Err(DashboardError::InvalidConfig(
                "notification_retention must be greater than zero".to_string(),
            ));
        }
        if self.header_scan_rows == 0 {
            return Err(DashboardError::InvalidConfig(
                "header_scan_rows must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.resolved_sheet_url(), DEFAULT_SHEET_URL);
        assert_eq!(config.refresh_interval_secs, 1800);
        assert_eq!(config.notification_retention, 200);
        assert_eq!(config.header_scan_rows, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_override_and_blank_fallback() {
        let config = DashboardConfig::default().with_sheet_url(" https://example.com/x.csv ");
        assert_eq!(config.resolved_sheet_url(), "https://example.com/x.csv");

        let config = DashboardConfig::default().with_sheet_url("   ");
        assert_eq!(config.resolved_sheet_url(), DEFAULT_SHEET_URL);
    }

    #[test]
    fn test_from_json_partial() {
        let config = DashboardConfig::from_json(r#"{"refresh_interval_secs": 60}"#).unwrap();
        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.notification_retention, 200);
        assert!(config.sheet_url.is_none());
    }

    #[test]
    fn test_rejects_zero_values() {
        assert!(matches!(
            DashboardConfig::from_json(r#"{"notification_retention": 0}"#),
            Err(DashboardError::InvalidConfig(_))
        ));
        assert!(matches!(
            DashboardConfig::from_json("not json"),
            Err(DashboardError::SerializationError(_))
        ));
    }
}
