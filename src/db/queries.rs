use rusqlite::{params, Connection};

// ── Sheet rows ──

pub fn list_rows(conn: &Connection, sheet: &str) -> anyhow::Result<Vec<Vec<String>>> {
    let mut stmt = conn.prepare("SELECT cells FROM sheet_rows WHERE sheet = ?1 ORDER BY id ASC")?;

    let rows = stmt.query_map(params![sheet], |row| row.get::<_, String>(0))?;

    let mut result = vec![];
    for row in rows {
        let cells: Vec<String> = serde_json::from_str(&row?)?;
        result.push(cells);
    }
    Ok(result)
}

pub fn append_row(conn: &Connection, sheet: &str, cells: &[String]) -> anyhow::Result<()> {
    let cells_json = serde_json::to_string(cells)?;
    conn.execute(
        "INSERT INTO sheet_rows (sheet, cells) VALUES (?1, ?2)",
        params![sheet, cells_json],
    )?;
    Ok(())
}

pub fn count_rows(conn: &Connection, sheet: &str) -> anyhow::Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM sheet_rows WHERE sheet = ?1",
        params![sheet],
        |row| row.get(0),
    )?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_empty_sheet() {
        let conn = setup_db();
        assert!(list_rows(&conn, "Sheet1").unwrap().is_empty());
        assert_eq!(count_rows(&conn, "Sheet1").unwrap(), 0);
    }

    #[test]
    fn test_rows_keep_insertion_order() {
        let conn = setup_db();
        append_row(&conn, "Sheet2", &row(&["From", "To"])).unwrap();
        append_row(&conn, "Sheet2", &row(&["a", "b"])).unwrap();
        append_row(&conn, "Sheet2", &row(&["c", "d"])).unwrap();

        let rows = list_rows(&conn, "Sheet2").unwrap();
        assert_eq!(rows, vec![row(&["From", "To"]), row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn test_sheets_are_isolated() {
        let conn = setup_db();
        append_row(&conn, "Sheet1", &row(&["log"])).unwrap();
        append_row(&conn, "Sheet2", &row(&["appointment"])).unwrap();

        assert_eq!(count_rows(&conn, "Sheet1").unwrap(), 1);
        assert_eq!(list_rows(&conn, "Sheet2").unwrap(), vec![row(&["appointment"])]);
    }
}
