use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";
pub const DEFAULT_SPREADSHEET_NAME: &str = "Mochi Health Takehome";
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";
pub const DEFAULT_DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub sheets: SheetsConfig,
}

/// Where the credential lives and which spreadsheet to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetsConfig {
    pub credentials_path: PathBuf,
    pub spreadsheet_name: String,
    pub sheets_api_base: String,
    pub drive_api_base: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            spreadsheet_name: DEFAULT_SPREADSHEET_NAME.to_string(),
            sheets_api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            drive_api_base: DEFAULT_DRIVE_API_BASE.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = SheetsConfig::default();

        let port = var("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            port,
            sheets: SheetsConfig {
                credentials_path: var("MOOD_CREDENTIALS_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.credentials_path),
                spreadsheet_name: var("MOOD_SPREADSHEET_NAME").unwrap_or(defaults.spreadsheet_name),
                sheets_api_base: var("MOOD_SHEETS_API_BASE").unwrap_or(defaults.sheets_api_base),
                drive_api_base: var("MOOD_DRIVE_API_BASE").unwrap_or(defaults.drive_api_base),
            },
        }
    }
}
