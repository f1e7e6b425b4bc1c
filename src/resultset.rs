//! Parsed `/query` response bodies and record iteration.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{error::InfluxError, InfluxResult};

/// One row of a series as a JSON object: columns zipped with the row values,
/// with the series tags merged in.
pub type Record = Map<String, Value>;

/// Top-level `/query` response body.
#[derive(Debug, Default, Clone, Deserialize)]
pub(crate) struct QueryResponseBody {
    #[serde(default)]
    pub results: Vec<StatementResult>,
}

/// The raw result of one statement, as returned by the server.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub statement_id: Option<u64>,

    #[serde(default)]
    pub series: Vec<Series>,

    #[serde(default)]
    pub error: Option<String>,
}

/// One series inside a statement result.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub tags: Option<Map<String, Value>>,

    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// The parsed result of a single statement.
#[derive(Debug, Default, Clone)]
pub struct ResultSet {
    raw: StatementResult,
}

impl ResultSet {
    /// Wrap a statement result. With `raise_errors` a per-statement error
    /// embedded in the body is promoted to [`InfluxError::QueryError`];
    /// otherwise it stays inspectable through [`ResultSet::error`].
    pub(crate) fn new(raw: StatementResult, raise_errors: bool) -> InfluxResult<Self> {
        if raise_errors {
            if let Some(error) = &raw.error {
                return Err(InfluxError::QueryError(error.clone()));
            }
        }

        Ok(Self { raw })
    }

    /// The error the server embedded for this statement, if any.
    pub fn error(&self) -> Option<&str> {
        self.raw.error.as_deref()
    }

    pub fn series(&self) -> &[Series] {
        &self.raw.series
    }

    /// Iterate all rows of all series as [`Record`]s.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        self.raw.series.iter().flat_map(|series| {
            series.values.iter().map(move |row| {
                let mut record = Record::new();
                for (column, value) in series.columns.iter().zip(row.iter()) {
                    record.insert(column.clone(), value.clone());
                }
                if let Some(tags) = &series.tags {
                    for (key, value) in tags {
                        record.insert(key.clone(), value.clone());
                    }
                }
                record
            })
        })
    }
}

#[cfg(test)]
mod test_resultset {
    use crate::error::InfluxError;

    use super::{QueryResponseBody, ResultSet};

    fn parse(body: &str) -> QueryResponseBody {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_records_from_show_databases() {
        let body = parse(r#"{"results":[{"series":[{"values":[["db1"],["db2"]],"columns":["name"]}]}]}"#);
        let result_set = ResultSet::new(body.results.into_iter().next().unwrap(), true).unwrap();

        let records: Vec<_> = result_set.records().collect();
        assert_eq!(2, records.len());
        assert_eq!(records[0]["name"], "db1");
        assert_eq!(records[1]["name"], "db2");
    }

    #[test]
    fn test_series_tags_merged_into_records() {
        let body = parse(
            r#"{"results":[{"series":[
                {"name":"cpu","tags":{"host":"server01"},"columns":["time","value"],"values":[["2015-01-29T21:55:43Z",0.64]]}
            ]}]}"#,
        );
        let result_set = ResultSet::new(body.results.into_iter().next().unwrap(), true).unwrap();

        let records: Vec<_> = result_set.records().collect();
        assert_eq!(1, records.len());
        assert_eq!(records[0]["host"], "server01");
        assert_eq!(0.64, records[0]["value"].as_f64().unwrap());
    }

    #[test]
    fn test_embedded_error_promoted() {
        let body = parse(r#"{"results":[{"error":"database not found: missing"}]}"#);
        let result = ResultSet::new(body.results.into_iter().next().unwrap(), true);

        assert!(matches!(result, Err(InfluxError::QueryError(_))));
    }

    #[test]
    fn test_embedded_error_kept_inspectable() {
        let body = parse(r#"{"results":[{"error":"database not found: missing"}]}"#);
        let result_set = ResultSet::new(body.results.into_iter().next().unwrap(), false).unwrap();

        assert_eq!(Some("database not found: missing"), result_set.error());
        assert_eq!(0, result_set.records().count());
    }
}
