use crate::errors::AppError;
use crate::models::{
    format_last_update, LogMoodForm, LogMoodRequest, LogMoodResponse, Mood, MoodEntry,
    MoodReport, RangeQuery, MOOD_CATALOG,
};
use crate::state::AppState;
use crate::stats::{build_report, picker_dates, resolve_range};
use crate::ui::{render_index, IndexView};
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::error;

pub const RANGE_ERROR: &str = "End date must be after start date";

/// Opening or refreshing the page starts a fresh session: the next report
/// reads the sheet again.
pub async fn index(State(state): State<AppState>, Query(query): Query<RangeQuery>) -> Html<String> {
    state.session.lock().await.table = None;

    let today = today();
    let (start, end) = picker_dates(query.start, query.end, today);
    let error = (end < start).then_some(RANGE_ERROR);

    Html(render_index(&IndexView {
        today,
        start,
        end,
        error,
    }))
}

pub async fn get_moods(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<MoodReport>, AppError> {
    let range = resolve_range(query.start, query.end, today())
        .ok_or_else(|| AppError::bad_request(RANGE_ERROR))?;

    let mut session = state.session.lock().await;
    if session.table.is_none() {
        match state.repository.load().await {
            Ok(table) => {
                session.table = Some(table);
                session.last_update = Some(Local::now());
            }
            Err(err) => {
                error!("failed to load mood data: {err}");
                return Err(err.into());
            }
        }
    }

    Ok(Json(build_report(
        session.table.as_deref(),
        range,
        &MOOD_CATALOG,
        session.last_update,
    )))
}

pub async fn log_mood(
    State(state): State<AppState>,
    Json(payload): Json<LogMoodRequest>,
) -> Result<Json<LogMoodResponse>, AppError> {
    let mood = parse_mood(&payload.mood)?;
    let response = record_mood(&state, mood, payload.note).await?;
    Ok(Json(response))
}

pub async fn log_mood_form(
    State(state): State<AppState>,
    Form(form): Form<LogMoodForm>,
) -> Result<Redirect, AppError> {
    resolve_range(form.start, form.end, today()).ok_or_else(|| AppError::bad_request(RANGE_ERROR))?;
    let mood = parse_mood(&form.mood)?;
    record_mood(&state, mood, form.note).await?;
    Ok(Redirect::to(&index_location(form.start, form.end)))
}

async fn record_mood(state: &AppState, mood: Mood, note: String) -> Result<LogMoodResponse, AppError> {
    let entry = MoodEntry::new(Local::now(), mood, note);

    let mut session = state.session.lock().await;
    match state.repository.append(&entry).await {
        Ok(table) => {
            session.table = Some(table);
            session.last_update = Some(Local::now());
        }
        Err(err) => {
            error!("failed to log mood: {err}");
            session.table = None;
            return Err(err.into());
        }
    }

    Ok(LogMoodResponse {
        entry,
        last_update: session.last_update.map(format_last_update),
    })
}

fn parse_mood(value: &str) -> Result<Mood, AppError> {
    Mood::parse(value).ok_or_else(|| {
        let allowed: Vec<&str> = MOOD_CATALOG.iter().map(|mood| mood.symbol()).collect();
        AppError::bad_request(format!("mood must be one of {}", allowed.join(" ")))
    })
}

fn index_location(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let params: Vec<String> = [("start", start), ("end", end)]
        .into_iter()
        .filter_map(|(key, date)| date.map(|date| format!("{key}={date}")))
        .collect();
    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
