use anyhow::Result;
use diesel::prelude::*;
use diesel::{Connection, SqliteConnection};

use crate::model::{NewReport, Report};
use crate::schema::reports;

pub fn establish_connection(database_url: &str) -> Result<SqliteConnection> {
    let conn = SqliteConnection::establish(database_url)?;
    Ok(conn)
}

/// Creates the schema on first start; harmless when it already exists.
pub fn init(database_url: &str) -> Result<()> {
    let mut conn = establish_connection(database_url)?;
    diesel::sql_query(
        "CREATE TABLE IF NOT EXISTS reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            problem TEXT,
            explanation TEXT,
            location TEXT,
            attachment TEXT,
            submitted_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .execute(&mut conn)?;
    Ok(())
}

pub async fn run_blocking_db<T, F>(database_url: &str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
{
    let database_url = database_url.to_string();
    tokio::task::spawn_blocking(move || {
        let mut conn = establish_connection(&database_url)?;
        f(&mut conn)
    })
    .await?
}

pub async fn insert_report(database_url: &str, report: NewReport) -> Result<Report> {
    run_blocking_db(database_url, move |conn| {
        let saved: Report = diesel::insert_into(reports::table)
            .values(&report)
            .returning(Report::as_returning())
            .get_result(conn)?;
        Ok(saved)
    })
    .await
}
