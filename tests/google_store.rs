//! Runs the Google Sheets backend against a local fake of the token, Drive and
//! Sheets endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{Local, TimeZone};
use mood_tracker::config::SheetsConfig;
use mood_tracker::errors::StoreError;
use mood_tracker::models::{Mood, MoodEntry};
use mood_tracker::{GoogleSheetsStore, MoodLogRepository};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const TEST_KEY: &str = include_str!("fixtures/service_account_key.pem");
const ACCESS_TOKEN: &str = "test-access-token";
const SPREADSHEET_ID: &str = "mood-sheet-1";
const SPREADSHEET_NAME: &str = "Mochi Health Takehome";
const SHEET_TITLE: &str = "Mood Log";

#[derive(Clone, Default)]
struct FakeGoogle {
    rows: Arc<Mutex<Vec<Vec<String>>>>,
    append_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    reject_token: bool,
}

impl FakeGoogle {
    fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {ACCESS_TOKEN}").as_str())
}

async fn token(State(fake): State<FakeGoogle>, Form(form): Form<HashMap<String, String>>) -> Response {
    let grant_ok = form.get("grant_type").map(String::as_str)
        == Some("urn:ietf:params:oauth:grant-type:jwt-bearer");
    let assertion_ok = form
        .get("assertion")
        .is_some_and(|assertion| assertion.split('.').count() == 3);

    if fake.reject_token || !grant_ok || !assertion_ok {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "invalid_grant" }))).into_response();
    }

    Json(json!({ "access_token": ACCESS_TOKEN, "token_type": "Bearer", "expires_in": 3600 }))
        .into_response()
}

async fn list_files(headers: HeaderMap, Query(query): Query<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let q = query.get("q").cloned().unwrap_or_default();
    let files = if q.contains(&format!("name = '{SPREADSHEET_NAME}'")) && q.contains("trashed = false") {
        json!([{ "id": SPREADSHEET_ID, "name": SPREADSHEET_NAME }])
    } else {
        json!([])
    };
    Json(json!({ "files": files })).into_response()
}

async fn spreadsheet(headers: HeaderMap, Path(id): Path<String>) -> Response {
    if !authorized(&headers) || id != SPREADSHEET_ID {
        return StatusCode::NOT_FOUND.into_response();
    }

    Json(json!({
        "sheets": [
            { "properties": { "title": "Archive", "index": 1 } },
            { "properties": { "title": SHEET_TITLE, "index": 0 } }
        ]
    }))
    .into_response()
}

async fn get_values(
    State(fake): State<FakeGoogle>,
    headers: HeaderMap,
    Path((id, range)): Path<(String, String)>,
) -> Response {
    let sheet = format!("'{SHEET_TITLE}'");
    if !authorized(&headers) || id != SPREADSHEET_ID || !range.starts_with(&sheet) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let rows = fake.rows();
    let values: Vec<Vec<String>> = if range == format!("{sheet}!1:1") {
        rows.into_iter().take(1).collect()
    } else {
        rows
    };

    // The API leaves `values` out entirely for an empty range.
    if values.is_empty() {
        Json(json!({ "range": range, "majorDimension": "ROWS" })).into_response()
    } else {
        Json(json!({ "range": range, "majorDimension": "ROWS", "values": values })).into_response()
    }
}

async fn post_values(
    State(fake): State<FakeGoogle>,
    headers: HeaderMap,
    Path((id, range)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let sheet = format!("'{SHEET_TITLE}'");
    if !authorized(&headers) || id != SPREADSHEET_ID {
        return StatusCode::NOT_FOUND.into_response();
    }

    if range == format!("{sheet}!A1:append") {
        let mut row: Vec<String> = body["values"][0]
            .as_array()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.as_str().unwrap_or_default().to_string())
                    .collect()
            })
            .unwrap_or_default();
        while row.last().is_some_and(|cell| cell.is_empty()) {
            row.pop();
        }
        fake.rows.lock().unwrap().push(row);
        fake.append_queries.lock().unwrap().push(query);
        Json(json!({ "spreadsheetId": SPREADSHEET_ID })).into_response()
    } else if range == format!("{sheet}:clear") {
        fake.rows.lock().unwrap().clear();
        Json(json!({ "spreadsheetId": SPREADSHEET_ID, "clearedRange": sheet })).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn start_fake(fake: FakeGoogle) -> String {
    let app = Router::new()
        .route("/token", post(token))
        .route("/drive/files", get(list_files))
        .route("/sheets/spreadsheets/:id", get(spreadsheet))
        .route("/sheets/spreadsheets/:id/values/:range", get(get_values).post(post_values))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn write_credentials(dir: &TempDir, base_url: &str) -> std::path::PathBuf {
    let path = dir.path().join("credentials.json");
    let key = json!({
        "type": "service_account",
        "client_email": "mood-bot@mood-tracker.iam.gserviceaccount.com",
        "private_key_id": "test-key",
        "private_key": TEST_KEY,
        "token_uri": format!("{base_url}/token"),
    });
    std::fs::write(&path, key.to_string()).unwrap();
    path
}

async fn setup(fake: FakeGoogle, spreadsheet_name: &str) -> (MoodLogRepository, TempDir) {
    let base_url = start_fake(fake).await;
    let dir = tempfile::tempdir().unwrap();
    let config = SheetsConfig {
        credentials_path: write_credentials(&dir, &base_url),
        spreadsheet_name: spreadsheet_name.to_string(),
        sheets_api_base: format!("{base_url}/sheets"),
        drive_api_base: format!("{base_url}/drive"),
    };
    let repo = MoodLogRepository::new(Arc::new(GoogleSheetsStore::new(config)));
    (repo, dir)
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

#[tokio::test]
async fn append_then_load_round_trips_through_sheets_api() {
    let fake = FakeGoogle::default();
    let (repo, _dir) = setup(fake.clone(), SPREADSHEET_NAME).await;

    let table = repo.load().await.unwrap();
    assert!(table.is_empty());
    assert_eq!(fake.rows(), vec![row(&["timestamp", "mood", "note"])]);

    let at = Local.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let entry = MoodEntry::new(at, Mood::Happy, "queue calm");
    let table = repo.append(&entry).await.unwrap();
    assert_eq!(table.last(), Some(&entry));

    let reloaded = repo.load().await.unwrap();
    assert_eq!(reloaded, vec![entry]);
    assert_eq!(fake.rows()[1], row(&["2024-01-01 09:00:00", "😊", "queue calm"]));

    let queries = fake.append_queries.lock().unwrap().clone();
    let last = queries.last().unwrap();
    assert_eq!(last.get("valueInputOption").map(String::as_str), Some("RAW"));
    assert_eq!(last.get("insertDataOption").map(String::as_str), Some("INSERT_ROWS"));
}

#[tokio::test]
async fn empty_note_survives_trimmed_rows() {
    let fake = FakeGoogle::default();
    let (repo, _dir) = setup(fake.clone(), SPREADSHEET_NAME).await;

    let at = Local.with_ymd_and_hms(2024, 1, 2, 17, 30, 0).unwrap();
    let entry = MoodEntry::new(at, Mood::Sad, "");
    let table = repo.append(&entry).await.unwrap();

    assert_eq!(fake.rows()[1].len(), 2);
    assert_eq!(table, vec![entry]);
}

#[tokio::test]
async fn malformed_header_is_cleared_through_api() {
    let fake = FakeGoogle::default();
    *fake.rows.lock().unwrap() = vec![row(&["when", "how"]), row(&["yesterday", "fine"])];
    let (repo, _dir) = setup(fake.clone(), SPREADSHEET_NAME).await;

    assert!(repo.load().await.unwrap().is_empty());
    assert_eq!(fake.rows(), vec![row(&["timestamp", "mood", "note"])]);
}

#[tokio::test]
async fn unknown_spreadsheet_is_not_found() {
    let (repo, _dir) = setup(FakeGoogle::default(), "Some Other Sheet").await;
    let err = repo.load().await.unwrap_err();
    assert!(matches!(err, StoreError::SpreadsheetNotFound { ref name } if name == "Some Other Sheet"));
}

#[tokio::test]
async fn rejected_token_is_a_credential_error() {
    let fake = FakeGoogle {
        reject_token: true,
        ..FakeGoogle::default()
    };
    let (repo, _dir) = setup(fake, SPREADSHEET_NAME).await;
    let err = repo.load().await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidCredentials(_)), "{err}");
}

#[tokio::test]
async fn missing_credential_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = SheetsConfig {
        credentials_path: dir.path().join("credentials.json"),
        ..SheetsConfig::default()
    };
    let repo = MoodLogRepository::new(Arc::new(GoogleSheetsStore::new(config)));
    let err = repo.load().await.unwrap_err();
    assert!(matches!(err, StoreError::CredentialsMissing { .. }));
    assert!(err.user_message().contains("file not found"));
}
