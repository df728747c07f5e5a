//! Request and response model

use std::collections::BTreeMap;

use bce_sign::uri_encode;
use reqwest::{Method, Url};
use serde_json::Value;

/// Encoding of the request body fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/x-www-form-urlencoded` key/value pairs
    #[default]
    Form,
    /// A single JSON object
    Json,
}

/// One outbound call: target, headers, query parameters and body fields.
///
/// Header names are stored lower-cased. Query parameters end up in the URL;
/// body fields are rendered by `body_string()` according to `body_format`.
#[derive(Debug, Clone)]
pub struct AipRequest {
    method: Method,
    url: Url,
    headers: BTreeMap<String, String>,
    params: BTreeMap<String, String>,
    body: BTreeMap<String, Value>,
    body_format: BodyFormat,
}

impl AipRequest {
    /// A query string already on `url` is moved into the parameters, so
    /// the wire URL and the signed query see the same set.
    pub fn new(method: Method, mut url: Url) -> Self {
        let params: BTreeMap<String, String> = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.set_query(None);

        Self {
            method,
            url,
            headers: BTreeMap::new(),
            params,
            body: BTreeMap::new(),
            body_format: BodyFormat::Form,
        }
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Host as sent in the `Host` header: hostname plus any explicit port.
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn body(&self) -> &BTreeMap<String, Value> {
        &self.body
    }

    pub fn body_format(&self) -> BodyFormat {
        self.body_format
    }

    pub fn set_body_format(&mut self, format: BodyFormat) {
        self.body_format = format;
    }

    /// Insert or replace a header.
    pub fn add_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
    }

    pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.insert(key.into(), value.into());
    }

    pub fn add_body(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.body.insert(key.into(), value.into());
    }

    /// Merge caller-supplied optional fields into the body.
    pub fn extend_body<K, V, I>(&mut self, fields: I)
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in fields {
            self.add_body(key, value);
        }
    }

    /// The exact bytes that go on the wire, also the input to `Content-MD5`.
    ///
    /// Form fields render as `key=value` joined by `&`, both sides URI
    /// encoded; an empty or null value renders the key alone.
    pub fn body_string(&self) -> String {
        match self.body_format {
            BodyFormat::Form => self
                .body
                .iter()
                .map(|(key, value)| match form_value(value) {
                    Some(value) => {
                        format!("{}={}", uri_encode(key, true), uri_encode(&value, true))
                    }
                    None => uri_encode(key, true),
                })
                .collect::<Vec<_>>()
                .join("&"),
            BodyFormat::Json => {
                let object: serde_json::Map<String, Value> = self
                    .body
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                Value::Object(object).to_string()
            }
        }
    }

    /// Target URL with the query parameters appended.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.params {
                pairs.append_pair(key, value);
            }
        }
        url
    }
}

fn form_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AipResponse {
    pub status: u16,
    pub body: String,
}

impl AipResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// HTTP 200 with a non-empty body.
    pub fn is_success(&self) -> bool {
        self.status == 200 && !self.body.is_empty()
    }

    /// Body parsed as JSON, if it is JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}
