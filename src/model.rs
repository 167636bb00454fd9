use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::reports;

/// A stored issue report.
#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Report {
    pub id: i32,
    pub problem: Option<String>,
    pub explanation: Option<String>,
    pub location: Option<String>,
    pub attachment: Option<String>,
    pub submitted_at: String,
}

/// Fields accepted from a submission. Missing fields persist as NULL.
#[derive(Debug, Clone, Default, Insertable, Deserialize)]
#[diesel(table_name = reports)]
pub struct NewReport {
    pub problem: Option<String>,
    pub explanation: Option<String>,
    pub location: Option<String>,
    pub attachment: Option<String>,
}
