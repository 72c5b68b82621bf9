//! Pipe-delimited source table parsing.
//!
//! Source tables look like:
//!
//! ```text
//! id|name|link|\r\n
//! SM|Space Marines|https://...|\r\n
//! ```
//!
//! Every line ends with a trailing delimiter, lines are CRLF separated and
//! the file may start with a BOM.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;

/// One table row keyed by camelCase column name.
pub type Row = HashMap<String, String>;

/// Field value, or `""` when the column is missing.
pub fn field<'a>(row: &'a Row, key: &str) -> &'a str {
    row.get(key).map(String::as_str).unwrap_or("")
}

/// `Some(value)` for a non-empty field.
pub fn optional_field(row: &Row, key: &str) -> Option<String> {
    let value = field(row, key);
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a whole table into rows.
///
/// The first line is the header. The final line (empty after the last
/// CRLF) is not a row, and the column after the trailing delimiter is
/// ignored.
pub fn parse_table(text: &str) -> Vec<Row> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.split("\r\n").collect();
    if lines.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = lines[0].split('|').map(camel_case).collect();

    lines[1..lines.len() - 1]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let cols: Vec<&str> = line.split('|').collect();
            let used = cols.len().saturating_sub(1);
            cols[..used]
                .iter()
                .enumerate()
                .filter_map(|(i, col)| headers.get(i).map(|h| (h.clone(), strip_html(col))))
                .collect()
        })
        .collect()
}

/// `"datasheet_id"` -> `"datasheetId"`, `"BS/WS"` -> `"bsWs"`.
pub fn camel_case(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut upper_next = false;

    for c in header.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            if upper_next && !out.is_empty() {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    out
}

fn whitespace() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("static whitespace pattern is valid"))
}

/// Reduce a cell containing markup to its text.
pub fn strip_html(input: &str) -> String {
    if !input.contains('<') {
        return input.trim().to_string();
    }

    let fragment = Html::parse_fragment(input);
    let text: String = fragment.root_element().text().collect();
    let text = text.replace("&nbsp;", " ").replace('\u{a0}', " ");
    whitespace().replace_all(&text, " ").trim().to_string()
}
