use super::{SheetStore, Worksheet};
use crate::errors::StoreError;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-process worksheet with the same trimming behaviour as the Sheets API.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    rows: Vec<Vec<String>>,
    failure: Option<Failure>,
}

#[derive(Clone, Copy)]
enum Failure {
    NotFound,
    Transport,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        let store = Self::default();
        store.lock().rows = rows;
        store
    }

    /// Every later `connect` fails as if the spreadsheet did not exist.
    pub fn fail_not_found(&self) {
        self.lock().failure = Some(Failure::NotFound);
    }

    /// Every later `connect` fails with a transport error.
    pub fn fail_transport(&self) {
        self.lock().failure = Some(Failure::Transport);
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SheetStore for MemoryStore {
    async fn connect(&self) -> Result<Box<dyn Worksheet>, StoreError> {
        match self.lock().failure {
            Some(Failure::NotFound) => Err(StoreError::SpreadsheetNotFound {
                name: "memory".to_string(),
            }),
            Some(Failure::Transport) => Err(StoreError::Transport("memory store offline".into())),
            None => Ok(Box::new(self.clone())),
        }
    }
}

#[async_trait]
impl Worksheet for MemoryStore {
    async fn row_values(&self, row: usize) -> Result<Vec<String>, StoreError> {
        let inner = self.lock();
        Ok(row
            .checked_sub(1)
            .and_then(|idx| inner.rows.get(idx))
            .cloned()
            .unwrap_or_default())
    }

    async fn all_values(&self) -> Result<Vec<Vec<String>>, StoreError> {
        Ok(self.lock().rows.clone())
    }

    async fn append_row(&self, values: &[String]) -> Result<(), StoreError> {
        let mut row = values.to_vec();
        while row.last().is_some_and(|cell| cell.is_empty()) {
            row.pop();
        }
        self.lock().rows.push(row);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.lock().rows.clear();
        Ok(())
    }
}
