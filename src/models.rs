use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_METHOD;
use crate::error::{Error, Result};
use crate::headers::parse_headers;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    /// Every supported method, in menu order
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
        HttpMethod::HEAD,
        HttpMethod::OPTIONS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Lenient parse: surrounding whitespace and case are ignored,
    /// anything unknown (or empty) becomes GET.
    pub fn normalize(input: &str) -> HttpMethod {
        let wanted = input.trim().to_uppercase();
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .unwrap_or(DEFAULT_METHOD)
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        DEFAULT_METHOD
    }
}

impl From<String> for HttpMethod {
    fn from(value: String) -> Self {
        HttpMethod::normalize(&value)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header mapping; insertion order is what gets sent and displayed
pub type Headers = IndexMap<String, String>;

/// A named, persisted request template
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub method: HttpMethod,
    #[serde(default)]
    pub headers: Headers,
    #[serde(default)]
    pub body: String,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Endpoint {
            name: name.into(),
            url: url.into(),
            method: DEFAULT_METHOD,
            headers: Headers::new(),
            body: String::new(),
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Raw field values as typed by the user, before validation
#[derive(Clone, Debug, Default)]
pub struct EndpointForm {
    pub name: String,
    pub url: String,
    pub method: String,
    pub headers: String,
    pub body: String,
}

impl EndpointForm {
    /// Normalize and validate the fields into an [`Endpoint`].
    ///
    /// Name and URL are trimmed and required. The method falls back to GET.
    /// Headers go through [`parse_headers`]. The body only loses trailing newlines.
    pub fn into_endpoint(&self) -> Result<Endpoint> {
        let name = self.name.trim();
        let url = self.url.trim();

        if name.is_empty() {
            return Err(Error::Validation(
                "Enter a name to save the endpoint.".into(),
            ));
        }
        if url.is_empty() {
            return Err(Error::Validation("Enter the URL.".into()));
        }

        Ok(Endpoint {
            name: name.to_string(),
            url: url.to_string(),
            method: HttpMethod::normalize(&self.method),
            headers: parse_headers(&self.headers)?,
            body: self.body.trim_end_matches('\n').to_string(),
        })
    }
}

/// Output of one client invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResult {
    pub display_command: String,
    pub raw_output: String,
    pub exit_code: i32,
}

impl RawResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
