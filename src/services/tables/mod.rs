pub mod google;
pub mod sqlite;

use async_trait::async_trait;

/// A worksheet-like table: rows of string cells, read in full and appended to.
/// The first row is the header by convention.
#[async_trait]
pub trait Table: Send + Sync {
    async fn rows(&self) -> Result<Vec<Vec<String>>, StoreError>;

    /// Whether the table has no rows at all, header included. Backends that
    /// can answer without reading every row should override this.
    async fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.rows().await?.is_empty())
    }

    async fn append_row(&self, cells: &[String]) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("table request timed out")]
    Timeout,

    #[error("table http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("invalid sheets API base url: {0}")]
    InvalidUrl(String),

    #[error("sheets authentication failed: {0}")]
    Auth(String),

    #[error("local table error: {0}")]
    Local(anyhow::Error),
}
