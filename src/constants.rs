//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

use crate::models::HttpMethod;

/// Method used when the input is empty or not one of the supported methods
pub const DEFAULT_METHOD: HttpMethod = HttpMethod::GET;

/// External HTTP client invoked for every request
pub const DEFAULT_CLIENT: &str = "curl";

/// Line inserted between captured stdout and stderr
pub const STDERR_MARKER: &str = "\n[stderr]\n";

/// Prefix the response formatter looks for to detach stderr.
/// Shorter than [`STDERR_MARKER`] so output without a trailing newline still splits.
pub const STDERR_SPLIT: &str = "\n[stderr]";

/// File holding the endpoint collection
pub const ENDPOINTS_FILE: &str = "endpoints.json";

/// File holding the opaque layout/preferences blob
pub const PREFERENCES_FILE: &str = "ui_state.json";

/// Log file written by the binary
pub const LOG_FILE: &str = "endpoint-tester.log";

/// Default data directory name under the home directory
pub const DATA_DIR_NAME: &str = ".endpoint-tester";

/// Environment variable overriding the data directory
pub const ENV_HOME: &str = "ENDPOINT_TESTER_HOME";

/// Environment variable overriding the client binary
pub const ENV_CLIENT: &str = "ENDPOINT_TESTER_CLIENT";

/// Application name
pub const APP_NAME: &str = "EndpointTester";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
