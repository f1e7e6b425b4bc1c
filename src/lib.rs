//! Async client for the InfluxDB 1.x HTTP API.
//!
//! Queries go through `/query`, point writes through `/write` (line protocol,
//! optionally split into bounded batches), and the administrative commands
//! (databases, retention policies, users, privileges) are plain InfluxQL
//! statements issued through the query path.
//!
//! # Examples
//!
//! ```no_run
//! use influxdb_client_rs::{InfluxClient, Point, QueryRequest, WriteRequest};
//!
//! # async fn demo() -> influxdb_client_rs::InfluxResult<()> {
//! let client = InfluxClient::new("localhost", 8086)
//!     .auth("root", "root")
//!     .database("mydb");
//!
//! client
//!     .write(
//!         WriteRequest::new()
//!             .point(Point::new("cpu").tag("host", "server01").field_float("value", 0.64))
//!             .batch_size(5000),
//!     )
//!     .send()
//!     .await?;
//!
//! let results = client
//!     .query(QueryRequest::new("SELECT * FROM cpu LIMIT 10"))
//!     .send()
//!     .await?;
//! # let _ = results;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use bytes::Bytes;
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method, Response, StatusCode,
};
use url::Url;

use crate::error::InfluxError;
use crate::query::QueryOperation;
use crate::write::WriteOperation;

pub mod admin;
pub mod error;
pub mod line_protocol;
pub mod macros;
pub mod model;
pub mod query;
pub mod quote;
pub mod resultset;
pub mod write;

#[cfg(test)]
pub mod test_util;

pub use admin::Privilege;
pub use model::{FieldValue, Point, Precision};
pub use query::{QueryRequest, QueryResults};
pub use resultset::{Record, ResultSet, Series};
pub use write::{WriteBody, WriteRequest};

const USER_AGENT: &str = "influxdb-client-rs/0.1.0";

const DEFAULT_PORT: u16 = 8086;

pub type InfluxResult<T> = Result<T, InfluxError>;

/// Tri-state classification of a response status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HttpOutcome {
    Success,
    ClientError,
    ServerError,
}

/// A 5xx status is a server error no matter what the caller expected; the
/// expected-code check only runs after that. Anything else is a client error.
pub(crate) fn classify_status(status: StatusCode, expected: StatusCode) -> HttpOutcome {
    if status.is_server_error() {
        HttpOutcome::ServerError
    } else if status == expected {
        HttpOutcome::Success
    } else {
        HttpOutcome::ClientError
    }
}

pub(crate) fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(header::ACCEPT, HeaderValue::from_static("text/plain"));
    headers
}

/// One request to send to the InfluxDB HTTP API.
#[derive(Debug, Clone)]
pub struct InfluxRequest {
    pub(crate) method: Method,
    pub(crate) path: &'static str,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
    pub(crate) expected_status: StatusCode,
}

impl Default for InfluxRequest {
    fn default() -> Self {
        Self {
            method: Method::GET,
            path: "query",
            query: Vec::new(),
            headers: default_headers(),
            body: Vec::new(),
            expected_status: StatusCode::OK,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InfluxClientOptions {
    pub timeout_ms: Option<u64>,
}

/// InfluxDB 1.x HTTP API client.
///
/// Credentials and the default database live on the client and can be changed
/// with [`switch_database`](Self::switch_database) and
/// [`switch_user`](Self::switch_user). Operation builders clone the client, so
/// an in-flight request keeps the credential snapshot it started with; a
/// switch only affects requests built afterwards.
#[derive(Clone)]
pub struct InfluxClient {
    host: String,
    port: u16,
    scheme: &'static str,
    username: String,
    password: String,
    database: Option<String>,
    verify_certs: bool,
    http_client: reqwest::Client,
    options: InfluxClientOptions,
}

impl std::fmt::Debug for InfluxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxClient")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("username", &self.username)
            .field("database", &self.database)
            .field("verify_certs", &self.verify_certs)
            .field("options", &self.options)
            .finish()
    }
}

impl InfluxClient {
    /// A client for `http://{host}:{port}` with the historical defaults:
    /// `root`/`root` credentials and no database selected.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            scheme: "http",
            username: "root".to_string(),
            password: "root".to_string(),
            database: None,
            verify_certs: true,
            http_client: reqwest::Client::new(),
            options: InfluxClientOptions::default(),
        }
    }

    /// Build a client from env values. `INFLUXDB_HOST` is required; also read
    /// are `INFLUXDB_PORT` (default 8086), `INFLUXDB_USERNAME`,
    /// `INFLUXDB_PASSWORD` and `INFLUXDB_DATABASE`.
    pub fn from_env() -> Self {
        let host = std::env::var("INFLUXDB_HOST").expect("env var INFLUXDB_HOST is missing");
        let port = std::env::var("INFLUXDB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let mut client = Self::new(host, port);

        if let (Ok(username), Ok(password)) = (std::env::var("INFLUXDB_USERNAME"), std::env::var("INFLUXDB_PASSWORD")) {
            client = client.auth(username, password);
        }

        if let Ok(database) = std::env::var("INFLUXDB_DATABASE") {
            client = client.database(database);
        }

        client
    }

    /// Set the credentials. Passing an empty username or password disables
    /// authentication: the `u`/`p` parameters are only sent when both are
    /// non-empty.
    pub fn auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();

        self
    }

    /// Select the default database for queries and writes.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());

        self
    }

    /// Switch the base URL to https. With `verify_certs` set to false the
    /// server certificate is not validated.
    pub fn https(mut self, verify_certs: bool) -> InfluxResult<Self> {
        self.scheme = "https";
        self.verify_certs = verify_certs;
        self.http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(!verify_certs)
            .build()?;

        Ok(self)
    }

    /// Change the client's default database.
    pub fn switch_database(&mut self, database: impl Into<String>) {
        self.database = Some(database.into());
    }

    /// Change the client's credentials.
    pub fn switch_user(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.username = username.into();
        self.password = password.into();
    }

    pub(crate) fn default_database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    /// Full URL for a request. The `u`/`p` auth parameters are injected ahead
    /// of the caller's pairs when both credentials are non-empty.
    pub(crate) fn request_url(&self, path: &str, query: &[(String, String)]) -> InfluxResult<Url> {
        let mut url = Url::parse(&self.base_url())?;
        url.set_path(path);

        let authenticated = !self.username.is_empty() && !self.password.is_empty();
        if authenticated || !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if authenticated {
                pairs.append_pair("u", &self.username);
                pairs.append_pair("p", &self.password);
            }
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Issue one request against the server and classify the response.
    ///
    /// A 5xx status maps to [`InfluxError::ServerError`] with the body
    /// verbatim, even ahead of the expected-status check; any other
    /// unexpected status maps to [`InfluxError::ClientError`] with status and
    /// body. Network failures surface as [`InfluxError::ReqwestError`]. No
    /// retries are performed at any level.
    pub async fn send(&self, req: InfluxRequest) -> InfluxResult<Response> {
        let InfluxRequest {
            method,
            path,
            query,
            headers,
            body,
            expected_status,
        } = req;

        let url = self.request_url(path, &query)?;
        log::debug!(">> {} /{}", method, path);

        let mut headers = headers;
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

        let mut request_builder = self
            .http_client
            .request(method, url)
            .headers(headers)
            .body(Bytes::from(body));

        // Handle per-request options
        if let Some(ms) = self.options.timeout_ms {
            request_builder = request_builder.timeout(Duration::from_millis(ms));
        }

        let response = request_builder.send().await?;

        let status = response.status();
        log::debug!("<< status {}", status);

        match classify_status(status, expected_status) {
            HttpOutcome::Success => Ok(response),
            HttpOutcome::ServerError => Err(InfluxError::ServerError(
                response.text().await.unwrap_or_default(),
            )),
            HttpOutcome::ClientError => Err(InfluxError::ClientError(
                status,
                response.text().await.unwrap_or_default(),
            )),
        }
    }

    /// Run an InfluxQL statement through `/query`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use influxdb_client_rs::{InfluxClient, QueryRequest};
    /// # async fn demo(client: InfluxClient) -> influxdb_client_rs::InfluxResult<()> {
    /// let results = client
    ///     .query(QueryRequest::new("SELECT * FROM cpu").database("telemetry"))
    ///     .send()
    ///     .await?;
    /// # let _ = results;
    /// # Ok(())
    /// # }
    /// ```
    pub fn query(&self, request: QueryRequest) -> QueryOperation {
        QueryOperation::new(self.clone(), request)
    }

    /// Write points (or pre-formatted line protocol) through `/write`.
    pub fn write(&self, request: WriteRequest) -> WriteOperation {
        WriteOperation::new(self.clone(), request)
    }
}

#[cfg(test)]
mod test_client {
    use reqwest::StatusCode;

    use super::{classify_status, HttpOutcome, InfluxClient, InfluxRequest};
    use crate::test_util::setup;

    #[test]
    fn test_classify_status() {
        let expected = StatusCode::OK;

        for code in [500u16, 502, 503, 599] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(HttpOutcome::ServerError, classify_status(status, expected));
        }

        assert_eq!(HttpOutcome::Success, classify_status(StatusCode::OK, expected));
        assert_eq!(
            HttpOutcome::Success,
            classify_status(StatusCode::NO_CONTENT, StatusCode::NO_CONTENT)
        );

        for code in [400u16, 401, 404, 204, 301] {
            let status = StatusCode::from_u16(code).unwrap();
            assert_eq!(HttpOutcome::ClientError, classify_status(status, expected));
        }

        // a 503 on the write path is a server error, not a mismatch
        assert_eq!(
            HttpOutcome::ServerError,
            classify_status(StatusCode::SERVICE_UNAVAILABLE, StatusCode::NO_CONTENT)
        );
    }

    #[test]
    fn test_request_url_with_auth() {
        setup();

        let client = InfluxClient::new("localhost", 8086).auth("admin", "secret");
        let url = client
            .request_url("query", &[("q".to_string(), "SHOW DATABASES".to_string())])
            .unwrap();

        assert_eq!("/query", url.path());
        let query = url.query().unwrap();
        assert!(query.contains("u=admin"));
        assert!(query.contains("p=secret"));
        assert!(query.contains("q=SHOW+DATABASES"));
    }

    #[test]
    fn test_request_url_without_auth() {
        // either side empty disables the auth parameters
        for (username, password) in [("", "secret"), ("admin", ""), ("", "")] {
            let client = InfluxClient::new("localhost", 8086).auth(username, password);
            let url = client.request_url("write", &[]).unwrap();

            assert!(url.query().is_none());
        }
    }

    #[test]
    fn test_request_url_encodes_utf8() {
        let client = InfluxClient::new("localhost", 8086).auth("", "");
        let url = client
            .request_url("query", &[("q".to_string(), "SHOW DATABASES — all".to_string())])
            .unwrap();

        assert!(url.query().unwrap().contains("%E2%80%94"));
    }

    #[test]
    fn test_switch_operations() {
        let mut client = InfluxClient::new("localhost", 8086);
        assert!(client.default_database().is_none());

        client.switch_database("metrics");
        assert_eq!(Some("metrics"), client.default_database());

        client.switch_user("reader", "hunter2");
        let url = client.request_url("query", &[]).unwrap();
        assert!(url.query().unwrap().contains("u=reader"));
    }

    #[test]
    fn test_default_request() {
        let req = InfluxRequest::default();
        assert_eq!(reqwest::Method::GET, req.method);
        assert_eq!(StatusCode::OK, req.expected_status);
        assert_eq!("application/json", req.headers.get("content-type").unwrap().to_str().unwrap());
        assert_eq!("text/plain", req.headers.get("accept").unwrap().to_str().unwrap());
    }
}
