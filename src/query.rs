//! The `/query` operation.

use reqwest::{Method, StatusCode};

use crate::{
    add_per_request_options,
    error::InfluxError,
    model::Precision,
    resultset::{QueryResponseBody, ResultSet},
    InfluxClient, InfluxRequest, InfluxResult,
};

/// An InfluxQL statement to run through the `/query` endpoint.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// The statement text, sent as the `q` parameter.
    pub statement: String,

    /// Database to query. Falls back to the client's default database.
    pub database: Option<String>,

    /// When set, timestamps come back as epoch values of this precision
    /// instead of RFC3339 strings.
    pub epoch: Option<Precision>,

    /// Extra query-string parameters.
    pub params: Vec<(String, String)>,

    /// The status code that counts as success, 200 unless overridden.
    pub expected_status: StatusCode,

    /// Whether per-statement errors embedded in the response fail the call.
    pub raise_errors: bool,
}

impl QueryRequest {
    pub fn new(statement: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            database: None,
            epoch: None,
            params: Vec::new(),
            expected_status: StatusCode::OK,
            raise_errors: true,
        }
    }

    /// Query a database other than the client default.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());

        self
    }

    /// Return timestamps as epoch values of the given precision.
    pub fn epoch(mut self, epoch: Precision) -> Self {
        self.epoch = Some(epoch);

        self
    }

    /// Add an extra query-string parameter.
    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));

        self
    }

    /// Override the status code that counts as success.
    pub fn expected_status(mut self, status: StatusCode) -> Self {
        self.expected_status = status;

        self
    }

    /// Keep per-statement errors inspectable on the result set instead of
    /// failing the call.
    pub fn keep_errors(mut self) -> Self {
        self.raise_errors = false;

        self
    }

    pub(crate) fn validate(&self) -> InfluxResult<()> {
        if self.statement.is_empty() {
            return Err(InfluxError::ValidationFailed("query statement can not be empty".to_string()));
        }

        Ok(())
    }
}

/// Results of one `/query` call.
///
/// A body with exactly one element in its `results` array yields `Single`;
/// zero or several yield `Many`. Callers issuing one statement can match on
/// `Single` without indexing. The asymmetry is a documented part of the API
/// contract; callers may rely on it.
#[derive(Debug, Clone)]
pub enum QueryResults {
    Single(ResultSet),
    Many(Vec<ResultSet>),
}

impl QueryResults {
    /// The single result set, if the call produced exactly one.
    pub fn into_single(self) -> Option<ResultSet> {
        match self {
            QueryResults::Single(result_set) => Some(result_set),
            QueryResults::Many(_) => None,
        }
    }

    /// All result sets regardless of shape.
    pub fn into_vec(self) -> Vec<ResultSet> {
        match self {
            QueryResults::Single(result_set) => vec![result_set],
            QueryResults::Many(list) => list,
        }
    }
}

/// Parse a `/query` body into the single-or-many shape.
pub(crate) fn parse_query_body(body: &[u8], raise_errors: bool) -> InfluxResult<QueryResults> {
    let body: QueryResponseBody = serde_json::from_slice(body)?;

    let mut results = Vec::with_capacity(body.results.len());
    for raw in body.results {
        results.push(ResultSet::new(raw, raise_errors)?);
    }

    if results.len() == 1 {
        Ok(QueryResults::Single(results.remove(0)))
    } else {
        Ok(QueryResults::Many(results))
    }
}

#[derive(Debug, Clone)]
pub struct QueryOperation {
    client: InfluxClient,
    request: QueryRequest,
}

add_per_request_options!(QueryOperation);

impl QueryOperation {
    pub(crate) fn new(client: InfluxClient, request: QueryRequest) -> Self {
        Self { client, request }
    }

    /// Consume the builder and send the query.
    pub async fn send(self) -> InfluxResult<QueryResults> {
        self.request.validate()?;

        let Self { client, request } = self;

        let mut query = vec![("q".to_string(), request.statement)];
        let database = request
            .database
            .or_else(|| client.default_database().map(str::to_string));
        if let Some(database) = database {
            query.push(("db".to_string(), database));
        }
        if let Some(epoch) = request.epoch {
            query.push(("epoch".to_string(), epoch.to_string()));
        }
        query.extend(request.params);

        let req = InfluxRequest {
            method: Method::GET,
            path: "query",
            query,
            expected_status: request.expected_status,
            ..Default::default()
        };

        let response = client.send(req).await?;
        let body = response.bytes().await?;

        parse_query_body(&body, request.raise_errors)
    }
}

#[cfg(test)]
mod test_query {
    use crate::error::InfluxError;

    use super::{parse_query_body, QueryRequest, QueryResults};

    #[test]
    fn test_single_result_yields_single() {
        let body = br#"{"results":[{"series":[{"columns":["name"],"values":[["db1"],["db2"]]}]}]}"#;
        let results = parse_query_body(body, true).unwrap();

        match results {
            QueryResults::Single(result_set) => {
                assert_eq!(2, result_set.records().count());
            }
            QueryResults::Many(_) => panic!("expected a single result set"),
        }
    }

    #[test]
    fn test_zero_or_many_results_yield_many() {
        let results = parse_query_body(br#"{"results":[]}"#, true).unwrap();
        assert!(matches!(results, QueryResults::Many(ref list) if list.is_empty()));

        let body = br#"{"results":[{"statement_id":0},{"statement_id":1}]}"#;
        let results = parse_query_body(body, true).unwrap();
        assert!(matches!(results, QueryResults::Many(ref list) if list.len() == 2));
    }

    #[test]
    fn test_embedded_error_respects_raise_errors() {
        let body = br#"{"results":[{"error":"database not found: x"}]}"#;

        assert!(matches!(parse_query_body(body, true), Err(InfluxError::QueryError(_))));

        let results = parse_query_body(body, false).unwrap();
        let result_set = results.into_single().unwrap();
        assert_eq!(Some("database not found: x"), result_set.error());
    }

    #[test]
    fn test_malformed_body_is_a_json_error() {
        assert!(matches!(
            parse_query_body(b"not json", true),
            Err(InfluxError::JsonError(_))
        ));
    }

    #[test]
    fn test_empty_statement_fails_validation() {
        let request = QueryRequest::new("");
        assert!(matches!(request.validate(), Err(InfluxError::ValidationFailed(_))));
    }
}
