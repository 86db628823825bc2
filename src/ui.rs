use crossterm::style::{style, Color, Stylize};

use crate::format::status_code;
use crate::headers::headers_to_text;
use crate::models::{Endpoint, HttpMethod};
use crate::session::SendOutcome;

/// Status code color
pub fn status_color(code: u16) -> Color {
    match code {
        200..=299 => Color::Green,
        300..=399 => Color::Cyan,
        400..=499 => Color::Red,
        500..=599 => Color::Magenta,
        _ => Color::Yellow,
    }
}

/// Method color
pub fn method_color(method: HttpMethod) -> Color {
    match method {
        HttpMethod::GET => Color::Green,
        HttpMethod::POST => Color::Yellow,
        HttpMethod::PUT => Color::Blue,
        HttpMethod::PATCH => Color::Cyan,
        HttpMethod::DELETE => Color::Red,
        HttpMethod::HEAD | HttpMethod::OPTIONS => Color::White,
    }
}

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        style(text).with(color).bold().to_string()
    } else {
        text.to_string()
    }
}

fn dim(text: &str, enabled: bool) -> String {
    paint(text, Color::DarkGrey, enabled)
}

/// Numbered list of saved endpoints
pub fn render_list<'a>(endpoints: impl IntoIterator<Item = &'a Endpoint>, color: bool) -> String {
    let lines: Vec<String> = endpoints
        .into_iter()
        .enumerate()
        .map(|(i, ep)| {
            let method = format!("{:7}", ep.method.as_str());
            format!(
                "{:>3}  {} {}  {}",
                i,
                paint(&method, method_color(ep.method), color),
                ep.name,
                dim(&ep.url, color)
            )
        })
        .collect();

    if lines.is_empty() {
        return dim("No endpoints saved yet.", color);
    }
    lines.join("\n")
}

/// Full view of one endpoint, headers in editable form
pub fn render_endpoint(endpoint: &Endpoint, color: bool) -> String {
    let mut out = format!(
        "{}\n{} {}\n",
        paint(&endpoint.name, Color::Cyan, color),
        paint(endpoint.method.as_str(), method_color(endpoint.method), color),
        endpoint.url
    );

    if !endpoint.headers.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", dim("Headers", color), headers_to_text(&endpoint.headers)));
    }
    if !endpoint.body.is_empty() {
        out.push_str(&format!("\n{}\n{}\n", dim("Body", color), endpoint.body));
    }
    out
}

/// Transcript of a send with a colored command line
pub fn render_outcome(outcome: &SendOutcome, color: bool) -> String {
    let command = format!("$ {}", outcome.result.display_command);
    let mut out = format!("{}\n\n{}", dim(&command, color), outcome.formatted);
    if let Some(code) = status_code(&outcome.result.raw_output) {
        out.push_str(&format!(
            "\n\n{}",
            paint(&format!("[{}]", code), status_color(code), color)
        ));
    }
    out
}

/// Status line colored by exit code
pub fn render_status(outcome: &SendOutcome, color: bool) -> String {
    let tint = if outcome.result.success() {
        Color::Green
    } else {
        Color::Red
    };
    paint(&outcome.status, tint, color)
}
