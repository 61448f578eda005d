use std::time::Duration;

use crate::models::appointment::{parse_timestamp, APPOINTMENT_HEADERS};
use crate::models::{AppointmentRecord, TimeInterval};
use crate::services::tables::{StoreError, Table};

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("appointment sheet has no {0} column")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} timestamp {value:?}")]
    InvalidRecord {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Appointment ledger on top of a [`Table`]. Append-only; records are never
/// updated or removed.
pub struct AppointmentStore {
    table: Box<dyn Table>,
    timeout: Duration,
}

impl AppointmentStore {
    pub fn new(table: Box<dyn Table>, timeout: Duration) -> Self {
        Self { table, timeout }
    }

    async fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
        tokio::time::timeout(self.timeout, self.table.rows())
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    pub async fn list_appointments(&self) -> Result<Vec<AppointmentRecord>, AppointmentError> {
        let rows = self.rows().await?;
        let Some((header, records)) = rows.split_first() else {
            return Ok(vec![]);
        };

        let column = |name: &'static str| header.iter().position(|h| h.trim() == name);
        let optional_cell = |row: &[String], idx: Option<usize>| {
            idx.and_then(|i| row.get(i)).cloned().unwrap_or_default()
        };

        let mut appointments = Vec::with_capacity(records.len());
        for (i, row) in records.iter().enumerate() {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            // Sheet rows are 1-based and the header takes row 1.
            let row_number = i + 2;

            let timestamp = |name: &'static str| -> Result<_, AppointmentError> {
                let idx = column(name).ok_or(AppointmentError::MissingColumn(name))?;
                let value = row.get(idx).map(String::as_str).unwrap_or("");
                parse_timestamp(value).map_err(|_| AppointmentError::InvalidRecord {
                    row: row_number,
                    column: name,
                    value: value.to_string(),
                })
            };
            let from = timestamp("From")?;
            let to = timestamp("To")?;

            appointments.push(AppointmentRecord {
                from,
                to,
                name: optional_cell(row, column("Name")),
                email: optional_cell(row, column("Email")),
                intent: optional_cell(row, column("Intent")),
            });
        }

        Ok(appointments)
    }

    pub async fn existing_intervals(&self) -> Result<Vec<TimeInterval>, AppointmentError> {
        Ok(self
            .list_appointments()
            .await?
            .iter()
            .map(AppointmentRecord::interval)
            .collect())
    }

    /// Appends the record, writing the header row first if the sheet is blank.
    pub async fn append_appointment(&self, record: &AppointmentRecord) -> Result<(), AppointmentError> {
        let blank = tokio::time::timeout(self.timeout, self.table.is_empty())
            .await
            .map_err(|_| StoreError::Timeout)??;
        if blank {
            let header: Vec<String> = APPOINTMENT_HEADERS.iter().map(|h| h.to_string()).collect();
            self.append(&header).await?;
        }
        self.append(&record.to_row()).await?;

        tracing::info!(from = %record.from, email = %record.email, "appointment recorded");
        Ok(())
    }

    async fn append(&self, cells: &[String]) -> Result<(), StoreError> {
        tokio::time::timeout(self.timeout, self.table.append_row(cells))
            .await
            .map_err(|_| StoreError::Timeout)?
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::NaiveDateTime;

    use super::*;
    use crate::db;
    use crate::db::queries;
    use crate::services::tables::sqlite::SqliteTable;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn setup() -> (AppointmentStore, Arc<Mutex<rusqlite::Connection>>) {
        let conn = Arc::new(Mutex::new(db::init_db(":memory:").unwrap()));
        let store = AppointmentStore::new(
            Box::new(SqliteTable::new(conn.clone(), "Sheet2")),
            Duration::from_secs(5),
        );
        (store, conn)
    }

    fn record(from: &str, to: &str) -> AppointmentRecord {
        AppointmentRecord {
            from: dt(from),
            to: dt(to),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            intent: "Consultation".to_string(),
        }
    }

    fn push_raw(conn: &Arc<Mutex<rusqlite::Connection>>, cells: &[&str]) {
        let cells: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
        queries::append_row(&conn.lock().unwrap(), "Sheet2", &cells).unwrap();
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let (store, _) = setup();
        assert!(store.list_appointments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_header_written_once() {
        let (store, conn) = setup();
        store
            .append_appointment(&record("2024-06-01 10:00", "2024-06-01 10:30"))
            .await
            .unwrap();
        store
            .append_appointment(&record("2024-06-01 11:00", "2024-06-01 11:30"))
            .await
            .unwrap();

        let rows = queries::list_rows(&conn.lock().unwrap(), "Sheet2").unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], APPOINTMENT_HEADERS.map(String::from).to_vec());
        assert_eq!(rows[1][0], "2024-06-01T10:00:00");
    }

    #[tokio::test]
    async fn test_round_trip_records() {
        let (store, _) = setup();
        let booked = record("2024-06-01 10:00", "2024-06-01 10:30");
        store.append_appointment(&booked).await.unwrap();

        let listed = store.list_appointments().await.unwrap();
        assert_eq!(listed, vec![booked]);
    }

    #[tokio::test]
    async fn test_header_only_sheet_is_empty() {
        let (store, conn) = setup();
        push_raw(&conn, &APPOINTMENT_HEADERS);
        assert!(store.list_appointments().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_columns_mapped_by_header_name() {
        let (store, conn) = setup();
        push_raw(&conn, &["Name", "To", "From"]);
        push_raw(&conn, &["Bob", "2024-06-01T10:30:00", "2024-06-01T10:00:00"]);

        let listed = store.list_appointments().await.unwrap();
        assert_eq!(listed[0].name, "Bob");
        assert_eq!(listed[0].from, dt("2024-06-01 10:00"));
        assert_eq!(listed[0].email, "");
    }

    #[tokio::test]
    async fn test_malformed_timestamp_reports_row() {
        let (store, conn) = setup();
        push_raw(&conn, &APPOINTMENT_HEADERS);
        push_raw(&conn, &["2024-06-01T10:00:00", "2024-06-01T10:30:00", "A", "a@x.io", "x"]);
        push_raw(&conn, &["next tuesday", "2024-06-01T10:30:00", "B", "b@x.io", "y"]);

        let err = store.list_appointments().await.unwrap_err();
        match err {
            AppointmentError::InvalidRecord { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, "From");
                assert_eq!(value, "next tuesday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_missing_column() {
        let (store, conn) = setup();
        push_raw(&conn, &["Start", "End"]);
        push_raw(&conn, &["2024-06-01T10:00:00", "2024-06-01T10:30:00"]);

        let err = store.list_appointments().await.unwrap_err();
        assert!(matches!(err, AppointmentError::MissingColumn("From")));
    }

    struct SlowTable;

    #[async_trait]
    impl Table for SlowTable {
        async fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }

        async fn append_row(&self, _cells: &[String]) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Remembers appended rows and counts full-sheet reads.
    #[derive(Clone, Default)]
    struct RecordingTable {
        rows: Arc<Mutex<Vec<Vec<String>>>>,
        full_reads: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl Table for RecordingTable {
        async fn rows(&self) -> Result<Vec<Vec<String>>, StoreError> {
            *self.full_reads.lock().unwrap() += 1;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn is_empty(&self) -> Result<bool, StoreError> {
            Ok(self.rows.lock().unwrap().is_empty())
        }

        async fn append_row(&self, cells: &[String]) -> Result<(), StoreError> {
            self.rows.lock().unwrap().push(cells.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_append_does_not_read_whole_sheet() {
        let table = RecordingTable::default();
        let store = AppointmentStore::new(Box::new(table.clone()), Duration::from_secs(5));

        let record = AppointmentRecord {
            from: dt("2024-06-01 10:00"),
            to: dt("2024-06-01 10:30"),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            intent: "Consultation".to_string(),
        };
        store.append_appointment(&record).await.unwrap();
        store.append_appointment(&record).await.unwrap();

        assert_eq!(*table.full_reads.lock().unwrap(), 0);
        let rows = table.rows.lock().unwrap().clone();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "From");
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let store = AppointmentStore::new(Box::new(SlowTable), Duration::from_millis(20));
        let err = store.list_appointments().await.unwrap_err();
        assert!(matches!(err, AppointmentError::Store(StoreError::Timeout)));
    }
}
