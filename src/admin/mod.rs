//! Administrative commands, all expressed as plain InfluxQL statements
//! through the query path. No orchestration of their own.

mod database;
mod retention_policy;
mod user;

pub use user::Privilege;

use crate::{error::InfluxError, query::QueryResults, resultset::Record, InfluxClient, InfluxResult};

/// Rows of a single-statement `SHOW ...` response.
pub(crate) fn list_records(results: QueryResults) -> Vec<Record> {
    results
        .into_single()
        .map(|result_set| result_set.records().collect())
        .unwrap_or_default()
}

impl InfluxClient {
    /// The explicit database, or the client default.
    pub(crate) fn database_or_default(&self, database: Option<&str>) -> InfluxResult<String> {
        database
            .or_else(|| self.default_database())
            .map(str::to_string)
            .ok_or_else(|| {
                InfluxError::ValidationFailed(
                    "no database given and the client has no default database".to_string(),
                )
            })
    }
}
