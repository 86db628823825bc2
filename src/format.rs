//! Response formatting - turns raw client output into something readable
//!
//! Raw output is `curl -i` text: an optional `HTTP/...` envelope, a blank line,
//! the body, and possibly a `[stderr]` block appended by the runner.
//! JSON bodies are re-indented; anything that cannot be fully reformatted is
//! returned exactly as received.

use serde_json::Value;

use crate::constants::STDERR_SPLIT;

/// Reformat raw client output for display.
///
/// Pure and deterministic. Returns `raw` untouched whenever the body is empty
/// or is not valid JSON.
pub fn format_response(raw: &str) -> String {
    let (main, stderr_suffix) = split_stderr(raw);

    let Some((header, body)) = split_envelope(main) else {
        // No envelope: the stderr block is not reattached on this path
        return match pretty_json(main) {
            Some(pretty) => pretty,
            None => raw.to_string(),
        };
    };

    if body.trim().is_empty() {
        return raw.to_string();
    }

    match pretty_json(body) {
        Some(pretty) => {
            tracing::debug!(header_len = header.len(), "Reformatted JSON body");
            format!("{}\n\n{}{}", header, pretty, stderr_suffix)
        }
        None => raw.to_string(),
    }
}

/// Split off an appended stderr block.
///
/// Returns the text before the marker (right-trimmed) and the marker onward, verbatim.
pub fn split_stderr(text: &str) -> (&str, &str) {
    match text.find(STDERR_SPLIT) {
        Some(idx) => (text[..idx].trim_end(), &text[idx..]),
        None => (text, ""),
    }
}

/// Split an HTTP envelope into header block and body.
///
/// The earliest of `\r\n\r\n` and `\n\n` separates them. Only accepted when
/// the header block starts with `HTTP/`.
pub fn split_envelope(text: &str) -> Option<(&str, &str)> {
    let crlf = text.find("\r\n\r\n").map(|idx| (idx, 4));
    let lf = text.find("\n\n").map(|idx| (idx, 2));

    let (idx, sep_len) = match (crlf, lf) {
        (Some(a), Some(b)) => {
            if a.0 <= b.0 {
                a
            } else {
                b
            }
        }
        (Some(a), None) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };

    let header = &text[..idx];
    if !header.trim().starts_with("HTTP/") {
        return None;
    }
    Some((header, &text[idx + sep_len..]))
}

/// Status code from the first line of an envelope, if there is one
pub fn status_code(raw: &str) -> Option<u16> {
    let (main, _) = split_stderr(raw);
    let (header, _) = split_envelope(main)?;
    header
        .trim_start()
        .lines()
        .next()?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

/// 2-space indented JSON, non-ASCII left unescaped; `None` when `text` is not JSON
fn pretty_json(text: &str) -> Option<String> {
    let value: Value = serde_json::from_str(text.trim()).ok()?;
    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_json_body() {
        assert_eq!(
            format_response("HTTP/1.1 200 OK\n\n{\"a\":1}"),
            "HTTP/1.1 200 OK\n\n{\n  \"a\": 1\n}"
        );
    }

    #[test]
    fn test_envelope_with_invalid_body_unchanged() {
        let raw = "HTTP/1.1 200 OK\n\nnot json";
        assert_eq!(format_response(raw), raw);
    }

    #[test]
    fn test_envelope_with_empty_body_unchanged() {
        let raw = "HTTP/1.1 204 No Content\r\nServer: x\r\n\r\n  \r\n";
        assert_eq!(format_response(raw), raw);
    }

    #[test]
    fn test_stderr_reattached_after_pretty_body() {
        assert_eq!(
            format_response("HTTP/1.1 200 OK\n\n{\"a\":1}\n[stderr]\nwarn"),
            "HTTP/1.1 200 OK\n\n{\n  \"a\": 1\n}\n[stderr]\nwarn"
        );
    }

    #[test]
    fn test_stderr_with_invalid_body_unchanged() {
        let raw = "HTTP/1.1 500 Oops\n\n<html>\n[stderr]\nwarn";
        assert_eq!(format_response(raw), raw);
    }

    #[test]
    fn test_no_envelope_json() {
        assert_eq!(format_response("{\"a\":1}"), "{\n  \"a\": 1\n}");
        assert_eq!(format_response("  [1, 2]\n"), "[\n  1,\n  2\n]");
    }

    #[test]
    fn test_no_envelope_drops_stderr_block() {
        // The envelope path reattaches stderr, this one does not
        assert_eq!(
            format_response("{\"a\":1}\n[stderr]\nwarn"),
            "{\n  \"a\": 1\n}"
        );
    }

    #[test]
    fn test_no_envelope_plain_text_unchanged() {
        let raw = "curl not found on this system.";
        assert_eq!(format_response(raw), raw);
        assert_eq!(format_response(""), "");
        let raw = "\n[stderr]\ncurl: (6) Could not resolve host: nope";
        assert_eq!(format_response(raw), raw);
    }

    #[test]
    fn test_crlf_envelope() {
        let raw = "HTTP/2 201\r\ncontent-type: application/json\r\n\r\n{\"id\":7,\"tags\":[]}";
        assert_eq!(
            format_response(raw),
            "HTTP/2 201\r\ncontent-type: application/json\n\n{\n  \"id\": 7,\n  \"tags\": []\n}"
        );
    }

    #[test]
    fn test_earliest_separator_wins() {
        // LF-LF comes first even though CRLF-CRLF exists later
        let raw = "HTTP/1.1 200 OK\n\n{\"a\":\"x\r\n\r\ny\"}";
        let (header, body) = split_envelope(raw).unwrap();
        assert_eq!(header, "HTTP/1.1 200 OK");
        assert_eq!(body, "{\"a\":\"x\r\n\r\ny\"}");

        let raw = "HTTP/1.1 200 OK\r\n\r\n{\"a\":\"\n\n\"}";
        let (header, body) = split_envelope(raw).unwrap();
        assert_eq!(header, "HTTP/1.1 200 OK");
        assert_eq!(body, "{\"a\":\"\n\n\"}");
    }

    #[test]
    fn test_header_must_start_with_http() {
        assert!(split_envelope("Hello\n\nWorld").is_none());
        assert!(split_envelope("no separator at all").is_none());
        let (header, body) = split_envelope("  HTTP/1.0 404 Not Found\r\n\r\n{}").unwrap();
        assert_eq!(header, "  HTTP/1.0 404 Not Found");
        assert_eq!(body, "{}");
    }

    #[test]
    fn test_non_ascii_preserved_and_order_kept() {
        let raw = "HTTP/1.1 200 OK\n\n{\"zeta\":\"ação\",\"alpha\":\"日本\"}";
        assert_eq!(
            format_response(raw),
            "HTTP/1.1 200 OK\n\n{\n  \"zeta\": \"ação\",\n  \"alpha\": \"日本\"\n}"
        );
    }

    #[test]
    fn test_large_numbers_survive() {
        let raw = "{\"id\":123456789012345678901234567890}";
        assert_eq!(
            format_response(raw),
            "{\n  \"id\": 123456789012345678901234567890\n}"
        );
    }

    #[test]
    fn test_multiple_envelopes_left_alone() {
        // redirects / 100-continue: the first body is another envelope, not JSON
        let raw = "HTTP/1.1 100 Continue\r\n\r\nHTTP/1.1 200 OK\r\n\r\n{\"a\":1}";
        assert_eq!(format_response(raw), raw);
    }

    #[test]
    fn test_split_stderr() {
        assert_eq!(split_stderr("body  \n[stderr]\nx"), ("body", "\n[stderr]\nx"));
        assert_eq!(split_stderr("body"), ("body", ""));
        assert_eq!(split_stderr("a\n[stderr]"), ("a", "\n[stderr]"));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(status_code("HTTP/1.1 404 Not Found\r\n\r\n"), Some(404));
        assert_eq!(status_code("HTTP/2 200\nserver: x\n\n{}"), Some(200));
        assert_eq!(status_code("{\"a\":1}"), None);
        assert_eq!(status_code("curl not found on this system."), None);
    }
}
