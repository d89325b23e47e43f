//! Spreadsheet backends.
//!
//! A [`SheetStore`] opens a connection to the configured spreadsheet and hands
//! back its first worksheet. Every user action connects afresh; nothing is
//! cached between calls.

mod google;
mod memory;

pub use google::GoogleSheetsStore;
pub use memory::MemoryStore;

use crate::errors::StoreError;
use async_trait::async_trait;
use std::collections::BTreeMap;

#[async_trait]
pub trait SheetStore: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Worksheet>, StoreError>;
}

/// Row access on one worksheet. Row numbers are 1-based like the sheet UI.
#[async_trait]
pub trait Worksheet: Send + Sync {
    async fn row_values(&self, row: usize) -> Result<Vec<String>, StoreError>;
    async fn all_values(&self) -> Result<Vec<Vec<String>>, StoreError>;
    async fn append_row(&self, values: &[String]) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

pub type Record = BTreeMap<String, String>;

/// Maps data rows onto the header row. Short rows are padded with empty
/// strings, cells beyond the header are ignored.
pub fn records(values: &[Vec<String>]) -> Vec<Record> {
    let Some((header, rows)) = values.split_first() else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .map(|(idx, key)| (key.clone(), row.get(idx).cloned().unwrap_or_default()))
                .collect()
        })
        .collect()
}
