//! # EndpointTester
//!
//! Save named HTTP endpoint configurations, send them through an external
//! `curl` process and read the response with JSON bodies pretty-printed.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS
//! - Headers as a JSON object or `Key: Value` lines
//! - Atomic persistence to `endpoints.json`
//! - Copy-pasteable, shell-quoted curl command for every send
//! - cURL import
//! - Envelope-aware JSON pretty-printing of responses
//!
//! ## Pipeline
//! Store → Command builder → Process runner → Response formatter.
//! Everything runs on the caller's thread; a send blocks until curl exits.

pub mod config;
pub mod constants;
pub mod curl;
pub mod error;
pub mod format;
pub mod headers;
pub mod models;
pub mod runner;
pub mod session;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use curl::{build_command, parse_curl, to_curl, CurlCommand};
pub use error::{Error, Result};
pub use format::format_response;
pub use headers::{headers_to_text, parse_headers};
pub use models::{Endpoint, EndpointForm, Headers, HttpMethod, RawResult};
pub use runner::{CommandRunner, ProcessRunner};
pub use session::{SendOutcome, Session};
pub use storage::{EndpointStore, LoadOutcome, PreferencesStore};
