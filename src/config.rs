use std::env;
use std::time::Duration;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableBackend {
    Sheets,
    Sqlite,
}

impl TableBackend {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "sqlite" => TableBackend::Sqlite,
            _ => TableBackend::Sheets,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub table_backend: TableBackend,
    pub database_url: String,
    pub google_sheet_id: String,
    pub google_credentials_path: String,
    pub google_sheets_api: String,
    pub log_sheet: String,
    pub appointment_sheet: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
    pub coordinator_name: String,
    pub office_location: String,
    pub contact_number: String,
    pub outbound_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let smtp_username = env::var("SMTP_USERNAME").unwrap_or_default();
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5000),
            table_backend: TableBackend::parse(
                &env::var("TABLE_BACKEND").unwrap_or_else(|_| "sheets".to_string()),
            ),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "bookline.db".to_string()),
            google_sheet_id: env::var("GOOGLE_SHEET_ID").unwrap_or_default(),
            google_credentials_path: env::var("GOOGLE_CREDENTIALS_PATH")
                .unwrap_or_else(|_| "creds.json".to_string()),
            google_sheets_api: env::var("GOOGLE_SHEETS_API")
                .unwrap_or_else(|_| "https://sheets.googleapis.com".to_string()),
            log_sheet: env::var("LOG_SHEET").unwrap_or_else(|_| "Sheet1".to_string()),
            appointment_sheet: env::var("APPOINTMENT_SHEET")
                .unwrap_or_else(|_| "Sheet2".to_string()),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_default(),
            mail_from: env::var("MAIL_FROM")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| smtp_username.clone()),
            smtp_username,
            coordinator_name: env::var("COORDINATOR_NAME")
                .unwrap_or_else(|_| "Mr. Kushagra".to_string()),
            office_location: env::var("OFFICE_LOCATION")
                .unwrap_or_else(|_| "Mr. Kushagra's Office".to_string()),
            contact_number: env::var("CONTACT_NUMBER").unwrap_or_else(|_| "123456789".to_string()),
            outbound_timeout_secs: env::var("OUTBOUND_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v: &u64| *v > 0)
                .unwrap_or(10),
        }
    }

    pub fn outbound_timeout(&self) -> Duration {
        Duration::from_secs(self.outbound_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_backend_parse() {
        assert_eq!(TableBackend::parse("sqlite"), TableBackend::Sqlite);
        assert_eq!(TableBackend::parse("SQLite"), TableBackend::Sqlite);
        assert_eq!(TableBackend::parse("sheets"), TableBackend::Sheets);
        assert_eq!(TableBackend::parse("anything"), TableBackend::Sheets);
    }
}
