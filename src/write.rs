//! The `/write` operation and its batching.

use std::collections::BTreeMap;

use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method, StatusCode,
};

use crate::{
    add_per_request_options, default_headers, line_protocol,
    model::{Point, Precision},
    InfluxClient, InfluxRequest, InfluxResult,
};

/// Body of a write: structured points, encoded to line protocol on send, or
/// pre-formatted line protocol strings passed through as-is.
#[derive(Debug, Clone)]
pub enum WriteBody {
    Points(Vec<Point>),
    Lines(Vec<String>),
}

impl WriteBody {
    fn len(&self) -> usize {
        match self {
            WriteBody::Points(points) => points.len(),
            WriteBody::Lines(lines) => lines.len(),
        }
    }
}

/// A write against the `/write` endpoint.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub body: WriteBody,

    /// Timestamp precision, sent as the `precision` parameter when set.
    pub precision: Option<Precision>,

    /// Target database. Falls back to the client's default database.
    pub database: Option<String>,

    /// Retention policy to write into, sent as the `rp` parameter when set.
    pub retention_policy: Option<String>,

    /// Tags applied to every point. Only meaningful for a points body; raw
    /// lines are never rewritten.
    pub tags: BTreeMap<String, String>,

    /// Split the write into batches of at most this many points. Unset or
    /// zero sends everything in one request.
    pub batch_size: Option<usize>,

    /// The status code that counts as success, 204 unless overridden.
    pub expected_status: StatusCode,
}

impl Default for WriteRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteRequest {
    /// A write of structured points.
    pub fn new() -> Self {
        Self {
            body: WriteBody::Points(Vec::new()),
            precision: None,
            database: None,
            retention_policy: None,
            tags: BTreeMap::new(),
            batch_size: None,
            expected_status: StatusCode::NO_CONTENT,
        }
    }

    /// A write of pre-formatted line protocol strings.
    pub fn from_lines(lines: impl IntoIterator<Item = String>) -> Self {
        Self {
            body: WriteBody::Lines(lines.into_iter().collect()),
            ..Self::new()
        }
    }

    /// Add one point. No effect on a line body.
    pub fn point(mut self, point: Point) -> Self {
        if let WriteBody::Points(points) = &mut self.body {
            points.push(point);
        }

        self
    }

    /// Replace the body with the given points.
    pub fn points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.body = WriteBody::Points(points.into_iter().collect());

        self
    }

    pub fn precision(mut self, precision: Precision) -> Self {
        self.precision = Some(precision);

        self
    }

    /// Write to a database other than the client default.
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());

        self
    }

    pub fn retention_policy(mut self, retention_policy: impl Into<String>) -> Self {
        self.retention_policy = Some(retention_policy.into());

        self
    }

    /// Add one tag applied to every point.
    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());

        self
    }

    /// Split the write into batches of at most `batch_size` points. Zero
    /// behaves like unset.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);

        self
    }

    /// Override the status code that counts as success.
    pub fn expected_status(mut self, status: StatusCode) -> Self {
        self.expected_status = status;

        self
    }

    /// Wire parameters for the `/write` call.
    pub(crate) fn params(&self, default_database: Option<&str>) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(database) = self.database.as_deref().or(default_database) {
            params.push(("db".to_string(), database.to_string()));
        }
        if let Some(precision) = self.precision {
            params.push(("precision".to_string(), precision.to_string()));
        }
        if let Some(retention_policy) = &self.retention_policy {
            params.push(("rp".to_string(), retention_policy.clone()));
        }

        params
    }

    /// Encode one contiguous slice of the body. Points go through the line
    /// protocol encoder with the global tags merged in; raw lines are joined
    /// with a guaranteed trailing newline.
    fn encode_batch(&self, start: usize, end: usize) -> Vec<u8> {
        match &self.body {
            WriteBody::Points(points) => {
                line_protocol::encode(&points[start..end], self.precision, &self.tags).into_bytes()
            }
            WriteBody::Lines(lines) => {
                let mut text = lines[start..end].join("\n");
                text.push('\n');
                text.into_bytes()
            }
        }
    }

    /// All request bodies this write will issue, in order. One element unless
    /// a positive batch size splits a non-empty body.
    pub(crate) fn batch_payloads(&self) -> Vec<Vec<u8>> {
        let total = self.body.len();

        match self.batch_size {
            Some(size) if size > 0 && total > 0 => (0..total)
                .step_by(size)
                .map(|start| self.encode_batch(start, usize::min(start + size, total)))
                .collect(),
            _ => vec![self.encode_batch(0, total)],
        }
    }
}

fn write_headers() -> HeaderMap {
    let mut headers = default_headers();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));

    headers
}

#[derive(Debug, Clone)]
pub struct WriteOperation {
    client: InfluxClient,
    request: WriteRequest,
}

add_per_request_options!(WriteOperation);

impl WriteOperation {
    pub(crate) fn new(client: InfluxClient, request: WriteRequest) -> Self {
        Self { client, request }
    }

    /// Consume the builder and send the write, one POST per batch when a
    /// positive batch size is set.
    ///
    /// Batches go out strictly in order, each awaited before the next starts.
    /// The first failing batch aborts the remainder and fails the whole call;
    /// batches the server already accepted stay written, there is no
    /// cross-batch rollback.
    pub async fn send(self) -> InfluxResult<()> {
        let Self { client, request } = self;

        let params = request.params(client.default_database());

        for payload in request.batch_payloads() {
            let req = InfluxRequest {
                method: Method::POST,
                path: "write",
                query: params.clone(),
                headers: write_headers(),
                body: payload,
                expected_status: request.expected_status,
            };

            client.send(req).await?;
        }

        Ok(())
    }
}
