use crate::error::{Error, Result};
use crate::models::{Endpoint, Headers, HttpMethod};

/// An external client invocation: the argument vector and a shell-safe rendering of it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurlCommand {
    pub argv: Vec<String>,
    pub display: String,
}

/// Build the client invocation for a request.
///
/// Order is fixed: client, `-i`, `-X METHOD`, one `-H "Key: Value"` per header,
/// `--data-raw BODY` when the body is not empty, then the URL.
pub fn build_command(
    client: &str,
    method: HttpMethod,
    headers: &Headers,
    body: &str,
    url: &str,
) -> CurlCommand {
    let mut argv = vec![
        client.to_string(),
        "-i".to_string(),
        "-X".to_string(),
        method.as_str().to_string(),
    ];

    for (key, value) in headers {
        argv.push("-H".to_string());
        argv.push(format!("{}: {}", key, value));
    }

    if !body.is_empty() {
        argv.push("--data-raw".to_string());
        argv.push(body.to_string());
    }

    argv.push(url.to_string());

    let quoted = quote_args(&argv);
    tracing::debug!(command = %quoted, "Built client command");
    CurlCommand {
        argv,
        display: quoted,
    }
}

/// Format an endpoint as a client invocation
pub fn to_curl(endpoint: &Endpoint, client: &str) -> CurlCommand {
    build_command(
        client,
        endpoint.method,
        &endpoint.headers,
        &endpoint.body,
        &endpoint.url,
    )
}

/// Join arguments with spaces, quoting each for a POSIX shell
fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|arg| {
            shlex::try_quote(arg)
                .map(|quoted| quoted.into_owned())
                // only NUL bytes are unquotable
                .unwrap_or_else(|_| format!("{arg:?}"))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unsupported options that take an argument; the argument is skipped with them
const VALUE_FLAGS: &[&str] = &[
    "-u",
    "--user",
    "-A",
    "--user-agent",
    "-o",
    "--output",
    "-e",
    "--referer",
    "-b",
    "--cookie",
    "-c",
    "--cookie-jar",
    "-m",
    "--max-time",
    "--connect-timeout",
    "-F",
    "--form",
    "--data-urlencode",
    "-w",
    "--write-out",
    "-x",
    "--proxy",
    "-T",
    "--upload-file",
    "-E",
    "--cert",
    "--cacert",
    "--key",
    "-r",
    "--range",
    "--retry",
    "--resolve",
];

/// Parse a cURL command line into an endpoint called `name`
pub fn parse_curl(name: &str, input: &str) -> Result<Endpoint> {
    // Remove line continuations and normalize
    let normalized = input.replace("\\\r\n", " ").replace("\\\n", " ");

    let mut tokens = shlex::split(&normalized)
        .ok_or_else(|| Error::Validation("Unbalanced quotes in cURL command".into()))?
        .into_iter()
        .peekable();

    // Skip the client itself if present
    if tokens
        .peek()
        .is_some_and(|first| first == "curl" || first.ends_with("/curl"))
    {
        tokens.next();
    }

    let mut endpoint = Endpoint::new(name, "");
    let mut explicit_method = false;

    while let Some(token) = tokens.next() {
        let (flag, inline) = match token.split_once('=') {
            Some((flag, value)) if token.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (token.clone(), None),
        };

        match flag.as_str() {
            "-X" | "--request" => {
                if let Some(value) = inline.or_else(|| tokens.next()) {
                    endpoint.method = HttpMethod::normalize(&value);
                    explicit_method = true;
                }
            }
            "-H" | "--header" => {
                if let Some(value) = inline.or_else(|| tokens.next()) {
                    let (key, value) = value.split_once(':').ok_or_else(|| {
                        Error::Validation(format!("Invalid header format: {}", value))
                    })?;
                    endpoint
                        .headers
                        .insert(key.trim().to_string(), value.trim().to_string());
                }
            }
            "-d" | "--data" | "--data-raw" | "--data-binary" => {
                if let Some(value) = inline.or_else(|| tokens.next()) {
                    endpoint.body = value;
                    // Infer POST if not set
                    if !explicit_method {
                        endpoint.method = HttpMethod::POST;
                    }
                }
            }
            "--url" => {
                if let Some(value) = inline.or_else(|| tokens.next()) {
                    if endpoint.url.is_empty() {
                        endpoint.url = value;
                    }
                }
            }
            "-i" | "--include" | "--compressed" | "-k" | "--insecure" | "-L" | "--location"
            | "-s" | "--silent" | "-S" | "--show-error" | "-v" | "--verbose" => {
                // Ignored flags
            }
            _ if VALUE_FLAGS.contains(&flag.as_str()) => {
                // Ignored, along with their argument
                if inline.is_none() {
                    tokens.next();
                }
                tracing::debug!(flag = %flag, "Ignoring unsupported cURL option");
            }
            _ if token.starts_with("-X") && token.len() > 2 => {
                endpoint.method = HttpMethod::normalize(&token[2..]);
                explicit_method = true;
            }
            _ if token.starts_with('-') => {
                tracing::debug!(flag = %token, "Ignoring unsupported cURL flag");
            }
            _ => {
                if endpoint.url.is_empty() {
                    endpoint.url = token;
                }
            }
        }
    }

    if endpoint.url.is_empty() {
        return Err(Error::Validation("No URL found in cURL command".into()));
    }

    Ok(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_post_with_header_and_body() {
        let mut headers = Headers::new();
        headers.insert("Content-Type".into(), "application/json".into());
        let cmd = build_command("curl", HttpMethod::POST, &headers, "{}", "http://x");
        assert_eq!(
            cmd.argv,
            vec![
                "curl",
                "-i",
                "-X",
                "POST",
                "-H",
                "Content-Type: application/json",
                "--data-raw",
                "{}",
                "http://x"
            ]
        );
    }

    #[test]
    fn test_build_omits_empty_body() {
        let cmd = build_command("curl", HttpMethod::GET, &Headers::new(), "", "http://x/a");
        assert_eq!(cmd.argv, vec!["curl", "-i", "-X", "GET", "http://x/a"]);
        assert_eq!(cmd.display, "curl -i -X GET http://x/a");
    }

    #[test]
    fn test_build_keeps_header_order() {
        let ep = Endpoint::new("n", "http://x")
            .with_header("Z", "26")
            .with_header("A", "1")
            .with_header("M", "13");
        let cmd = to_curl(&ep, "curl");
        assert_eq!(
            cmd.argv,
            vec!["curl", "-i", "-X", "GET", "-H", "Z: 26", "-H", "A: 1", "-H", "M: 13", "http://x"]
        );
    }

    #[test]
    fn test_build_uses_configured_client() {
        let cmd = build_command("/opt/bin/curl", HttpMethod::HEAD, &Headers::new(), "", "u");
        assert_eq!(cmd.argv[0], "/opt/bin/curl");
        assert_eq!(cmd.argv[3], "HEAD");
    }

    #[test]
    fn test_display_is_shell_safe() {
        let ep = Endpoint::new("n", "http://x/search?q=a b&x=1")
            .with_method(HttpMethod::PUT)
            .with_header("Authorization", "Bearer it's $SECRET")
            .with_body("{\"msg\": \"it's \\\"quoted\\\"\"}\n`rm -rf`");
        let cmd = to_curl(&ep, "curl");
        assert!(cmd.display.starts_with("curl -i -X PUT -H "));
        assert_eq!(shlex::split(&cmd.display).unwrap(), cmd.argv);
    }

    #[test]
    fn test_parse_simple_get() {
        let ep = parse_curl("users", "curl https://api.example.com/users").unwrap();
        assert_eq!(ep.name, "users");
        assert_eq!(ep.url, "https://api.example.com/users");
        assert_eq!(ep.method, HttpMethod::GET);
    }

    #[test]
    fn test_parse_post_with_data() {
        let curl = r#"curl -X POST -H "Content-Type: application/json" -d '{"name":"test"}' https://api.example.com/users"#;
        let ep = parse_curl("create", curl).unwrap();
        assert_eq!(ep.method, HttpMethod::POST);
        assert_eq!(ep.body, r#"{"name":"test"}"#);
        assert_eq!(ep.headers.get("Content-Type").unwrap(), "application/json");
    }

    #[test]
    fn test_parse_data_infers_post_only_without_explicit_method() {
        let ep = parse_curl("a", "curl -d x=1 http://x").unwrap();
        assert_eq!(ep.method, HttpMethod::POST);

        let ep = parse_curl("a", "curl -X PUT --data-raw x=1 http://x").unwrap();
        assert_eq!(ep.method, HttpMethod::PUT);
    }

    #[test]
    fn test_parse_line_continuations_and_long_forms() {
        let curl = "curl --request=patch \\\n  --header='X-A: 1' \\\n  -XDELETE \\\n  'http://x/y'";
        let ep = parse_curl("a", curl).unwrap();
        assert_eq!(ep.method, HttpMethod::DELETE);
        assert_eq!(ep.headers.get("X-A").unwrap(), "1");
        assert_eq!(ep.url, "http://x/y");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_curl("a", "curl 'http://x"), Err(Error::Validation(_))));
        assert!(matches!(parse_curl("a", "curl -i -s"), Err(Error::Validation(_))));
        assert!(matches!(
            parse_curl("a", "curl -H nocolon http://x"),
            Err(Error::Validation(msg)) if msg.contains("nocolon")
        ));
    }

    #[test]
    fn test_parse_skips_arguments_of_ignored_options() {
        for curl in [
            "curl -u user:pass https://api.example.com/me",
            "curl -A agent/1.0 https://api.example.com/me",
            "curl -o out.json https://api.example.com/me",
            "curl --max-time 5 -s https://api.example.com/me",
            "curl --cookie=a=b -e http://ref.example.com https://api.example.com/me",
        ] {
            let ep = parse_curl("me", curl).unwrap();
            assert_eq!(ep.url, "https://api.example.com/me", "{curl}");
            assert_eq!(ep.method, HttpMethod::GET);
        }
    }

    #[test]
    fn test_parse_url_option() {
        let ep = parse_curl("a", "curl -H 'A: 1' --url http://x/y").unwrap();
        assert_eq!(ep.url, "http://x/y");
        let ep = parse_curl("a", "curl --url=http://x/z -X PUT").unwrap();
        assert_eq!(ep.url, "http://x/z");
        assert_eq!(ep.method, HttpMethod::PUT);
    }

    #[test]
    fn test_display_parses_back() {
        let ep = Endpoint::new("orders", "https://api.example.com/orders?page=2")
            .with_method(HttpMethod::OPTIONS)
            .with_header("Accept", "application/json")
            .with_header("X-Note", "it's a \"test\"")
            .with_body("line one\nline two");
        let cmd = to_curl(&ep, "curl");
        assert_eq!(parse_curl("orders", &cmd.display).unwrap(), ep);
    }
}
