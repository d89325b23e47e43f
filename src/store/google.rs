use super::{SheetStore, Worksheet};
use crate::config::SheetsConfig;
use crate::errors::StoreError;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tracing::debug;

const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a Google service-account key file that are needed to sign in.
#[derive(Debug, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
    #[serde(default)]
    index: i64,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Google Sheets backend authenticated with a service-account key.
pub struct GoogleSheetsStore {
    http: Client,
    config: SheetsConfig,
}

impl GoogleSheetsStore {
    pub fn new(config: SheetsConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    async fn access_token(&self, key: &ServiceAccountKey) -> Result<String, StoreError> {
        let assertion = sign_assertion(key, Utc::now().timestamp())?;
        let response = self
            .http
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::InvalidCredentials(format!(
                "token request rejected ({status}): {body}"
            )));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn find_spreadsheet(&self, token: &str) -> Result<String, StoreError> {
        let name = &self.config.spreadsheet_name;
        let query = format!(
            "name = '{}' and mimeType = '{SPREADSHEET_MIME}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'")
        );
        let url = endpoint(&self.config.drive_api_base, &["files"])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await?;

        let list: FileList = expect_success(response).await?.json().await?;
        list.files
            .into_iter()
            .next()
            .map(|file| file.id)
            .ok_or_else(|| StoreError::SpreadsheetNotFound { name: name.clone() })
    }

    async fn first_sheet_title(&self, token: &str, spreadsheet_id: &str) -> Result<String, StoreError> {
        let url = endpoint(&self.config.sheets_api_base, &["spreadsheets", spreadsheet_id])?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties(title,index)")])
            .send()
            .await?;

        let meta: SpreadsheetMeta = expect_success(response).await?.json().await?;
        meta.sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .min_by_key(|properties| properties.index)
            .map(|properties| properties.title)
            .ok_or_else(|| StoreError::Transport(format!("spreadsheet {spreadsheet_id} has no worksheets")))
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsStore {
    async fn connect(&self) -> Result<Box<dyn Worksheet>, StoreError> {
        let key = load_key(&self.config.credentials_path).await?;
        let token = self.access_token(&key).await?;
        let spreadsheet_id = self.find_spreadsheet(&token).await?;
        let title = self.first_sheet_title(&token, &spreadsheet_id).await?;
        debug!(spreadsheet_id = %spreadsheet_id, sheet = %title, "connected to spreadsheet");

        Ok(Box::new(GoogleWorksheet {
            http: self.http.clone(),
            token,
            sheets_api_base: self.config.sheets_api_base.clone(),
            spreadsheet_id,
            title,
        }))
    }
}

struct GoogleWorksheet {
    http: Client,
    token: String,
    sheets_api_base: String,
    spreadsheet_id: String,
    title: String,
}

impl GoogleWorksheet {
    fn sheet_range(&self) -> String {
        quote_sheet_title(&self.title)
    }

    fn values_url(&self, range: &str) -> Result<Url, StoreError> {
        endpoint(
            &self.sheets_api_base,
            &["spreadsheets", &self.spreadsheet_id, "values", range],
        )
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let response = self
            .http
            .get(self.values_url(range)?)
            .bearer_auth(&self.token)
            .query(&[("majorDimension", "ROWS")])
            .send()
            .await?;

        let range: ValueRange = expect_success(response).await?.json().await?;
        Ok(range.values)
    }
}

#[async_trait]
impl Worksheet for GoogleWorksheet {
    async fn row_values(&self, row: usize) -> Result<Vec<String>, StoreError> {
        let range = format!("{}!{row}:{row}", self.sheet_range());
        Ok(self.get_values(&range).await?.into_iter().next().unwrap_or_default())
    }

    async fn all_values(&self) -> Result<Vec<Vec<String>>, StoreError> {
        self.get_values(&self.sheet_range()).await
    }

    async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        let url = self.values_url(&format!("{}!A1:append", self.sheet_range()))?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&serde_json::json!({ "majorDimension": "ROWS", "values": [values] }))
            .send()
            .await?;

        expect_success(response).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let url = self.values_url(&format!("{}:clear", self.sheet_range()))?;
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&serde_json::json!({}))
            .send()
            .await?;

        expect_success(response).await?;
        Ok(())
    }
}

pub async fn load_key(path: &Path) -> Result<ServiceAccountKey, StoreError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(StoreError::CredentialsMissing {
                path: path.to_path_buf(),
            });
        }
        Err(err) => {
            return Err(StoreError::InvalidCredentials(format!(
                "failed to read {}: {err}",
                path.display()
            )));
        }
    };

    serde_json::from_slice(&bytes).map_err(|err| {
        StoreError::InvalidCredentials(format!("failed to parse {}: {err}", path.display()))
    })
}

/// Builds the RS256 JWT bearer assertion exchanged for an access token.
pub fn sign_assertion(key: &ServiceAccountKey, issued_at: i64) -> Result<String, StoreError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|err| StoreError::InvalidCredentials(format!("unusable private key: {err}")))?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    let claims = Claims {
        iss: &key.client_email,
        scope: SCOPES,
        aud: &key.token_uri,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };

    jsonwebtoken::encode(&header, &claims, &encoding_key)
        .map_err(|err| StoreError::InvalidCredentials(format!("failed to sign assertion: {err}")))
}

fn quote_sheet_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

fn endpoint(base: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(base)
        .map_err(|err| StoreError::Transport(format!("invalid API base {base}: {err}")))?;
    url.path_segments_mut()
        .map_err(|_| StoreError::Transport(format!("API base {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn expect_success(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::InvalidCredentials(
            format!("request rejected ({status}): {body}"),
        )),
        _ => Err(StoreError::Transport(format!("unexpected status {status}: {body}"))),
    }
}
