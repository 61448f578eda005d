use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use super::{StoreError, Table};
use crate::db::queries;

/// Table backed by the local `sheet_rows` table, one logical sheet per name.
pub struct SqliteTable {
    db: Arc<Mutex<Connection>>,
    sheet: String,
}

impl SqliteTable {
    pub fn new(db: Arc<Mutex<Connection>>, sheet: impl Into<String>) -> Self {
        Self {
            db,
            sheet: sheet.into(),
        }
    }
}

#[async_trait]
impl Table for SqliteTable {
    async fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        let db = self
            .db
            .lock()
            .map_err(|_| StoreError::Local(anyhow::anyhow!("database lock poisoned")))?;
        queries::list_rows(&db, &self.sheet).map_err(StoreError::Local)
    }

    async fn is_empty(&self) -> Result<bool, StoreError> {
        let db = self
            .db
            .lock()
            .map_err(|_| StoreError::Local(anyhow::anyhow!("database lock poisoned")))?;
        Ok(queries::count_rows(&db, &self.sheet).map_err(StoreError::Local)? == 0)
    }

    async fn append_row(&self, cells: &[String]) -> Result<(), StoreError> {
        let db = self
            .db
            .lock()
            .map_err(|_| StoreError::Local(anyhow::anyhow!("database lock poisoned")))?;
        queries::append_row(&db, &self.sheet, cells).map_err(StoreError::Local)
    }
}
