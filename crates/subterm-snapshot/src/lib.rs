//! Normalizes raw `browser_snapshot`/screenshot tool output into
//! [`NormalizedSnapshot`]. Hand-rolled line scanning, no regex; the format
//! is a handful of `Key:`-prefixed header lines followed by page content,
//! which a one-pass scan handles without pulling in a parser dependency.

use subterm_core::NormalizedSnapshot;

const URL_HEADER: &str = "Page URL:";
const TITLE_HEADER: &str = "Page Title:";
const SCREENSHOT_MARKER: &str = "Screenshot saved to:";

/// Parses a `browser_snapshot` tool result. Total: any input, including
/// malformed or empty text, produces a snapshot rather than an error. Lines
/// that don't match a known header are kept verbatim, in order, as content.
#[must_use]
pub fn normalize_snapshot(text: &str) -> NormalizedSnapshot {
    let mut url = String::new();
    let mut title = String::new();
    let mut content_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(URL_HEADER) {
            url = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(TITLE_HEADER) {
            title = rest.trim().to_string();
        } else {
            content_lines.push(line);
        }
    }

    NormalizedSnapshot {
        url,
        title,
        content: content_lines.join("\n"),
        screenshot_path: None,
    }
}

/// Parses a screenshot tool result. Only `screenshot_path` is populated;
/// `url`/`title`/`content` stay empty since a screenshot result carries no
/// page structure of its own.
#[must_use]
pub fn normalize_screenshot(text: &str) -> NormalizedSnapshot {
    let screenshot_path = text
        .lines()
        .find_map(|line| line.strip_prefix(SCREENSHOT_MARKER))
        .map(|rest| rest.trim().to_string());

    NormalizedSnapshot {
        screenshot_path,
        ..NormalizedSnapshot::empty()
    }
}
