use crate::errors::StoreError;
use crate::models::{MoodEntry, MoodTable};
use crate::schema::ensure_headers;
use crate::store::{records, Record, SheetStore};
use std::sync::Arc;
use tracing::info;

/// Reads and appends mood entries. The spreadsheet is the only source of
/// truth, so every append is followed by a full reload.
#[derive(Clone)]
pub struct MoodLogRepository {
    store: Arc<dyn SheetStore>,
}

impl MoodLogRepository {
    pub fn new(store: Arc<dyn SheetStore>) -> Self {
        Self { store }
    }

    pub async fn load(&self) -> Result<MoodTable, StoreError> {
        let sheet = self.store.connect().await?;
        ensure_headers(sheet.as_ref()).await?;

        let values = sheet.all_values().await?;
        let table: MoodTable = records(&values).into_iter().map(to_entry).collect();
        info!(rows = table.len(), "loaded mood log");
        Ok(table)
    }

    /// Appends one entry and returns the reloaded table.
    pub async fn append(&self, entry: &MoodEntry) -> Result<MoodTable, StoreError> {
        let sheet = self.store.connect().await?;
        ensure_headers(sheet.as_ref()).await?;

        sheet.append_row(&entry.to_row()).await?;
        info!(timestamp = %entry.timestamp, mood = %entry.mood, "logged mood");

        self.load().await
    }
}

fn to_entry(mut record: Record) -> MoodEntry {
    let mut field = |key: &str| record.remove(key).unwrap_or_default();
    MoodEntry {
        timestamp: field("timestamp"),
        mood: field("mood"),
        note: field("note"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Mood;
    use crate::store::MemoryStore;
    use chrono::{Local, TimeZone};

    fn repository(store: &MemoryStore) -> MoodLogRepository {
        MoodLogRepository::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn load_of_fresh_sheet_is_empty_and_headed() {
        let store = MemoryStore::new();
        let table = repository(&store).load().await.unwrap();
        assert!(table.is_empty());
        assert_eq!(store.rows().len(), 1);
    }

    #[tokio::test]
    async fn append_then_load_contains_entry() {
        let store = MemoryStore::new();
        let repo = repository(&store);
        let at = Local.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let entry = MoodEntry::new(at, Mood::Happy, "queue calm");

        let after_append = repo.append(&entry).await.unwrap();
        assert_eq!(after_append.last(), Some(&entry));

        let reloaded = repo.load().await.unwrap();
        assert!(reloaded.contains(&entry));
    }

    #[tokio::test]
    async fn append_sees_rows_written_by_other_sessions() {
        let store = MemoryStore::new();
        let repo = repository(&store);
        repo.load().await.unwrap();

        let other: Vec<String> = vec!["2024-01-01 08:00:00".into(), "😐".into(), "".into()];
        crate::store::Worksheet::append_row(&store, &other).await.unwrap();

        let at = Local.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let table = repo.append(&MoodEntry::new(at, Mood::Sad, "")).await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].mood, "😐");
        assert_eq!(table[0].note, "");
    }

    #[tokio::test]
    async fn missing_spreadsheet_propagates() {
        let store = MemoryStore::new();
        store.fail_not_found();
        let err = repository(&store).load().await.unwrap_err();
        assert!(matches!(err, StoreError::SpreadsheetNotFound { .. }));
    }
}
