// ── Java-style properties ──
//
// The same file format `java.util.Properties::load` reads: `key=value`,
// `key: value` or `key value`; `#`/`!` comment lines; a trailing odd
// backslash continues the line with the next one's leading whitespace
// stripped; `\t \n \r \f \uXXXX` escapes, any other escaped char is itself.

use std::collections::BTreeMap;

use thiserror::Error;

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// A logical line that cannot be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {reason}")]
pub struct PropertiesError {
    pub line: usize,
    pub reason: String,
}

/// Parse properties text into a flat map. Later duplicates win.
pub fn parse(text: &str) -> Result<BTreeMap<String, String>, PropertiesError> {
    let mut map = BTreeMap::new();
    for (line, logical) in logical_lines(text) {
        let (key, value) = split_entry(&logical);
        map.insert(unescape(key, line)?, unescape(value, line)?);
    }
    Ok(map)
}

/// Join continuation lines; skip blanks and comments.
/// Each entry carries the 1-based number of its first physical line.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, physical) in text.lines().enumerate() {
        let trimmed = physical.trim_start_matches(WHITESPACE);
        let (start, mut buf) = match pending.take() {
            Some((start, mut buf)) => {
                buf.push_str(trimmed);
                (start, buf)
            }
            None if trimmed.is_empty() || trimmed.starts_with(['#', '!']) => continue,
            None => (idx + 1, trimmed.to_owned()),
        };

        if ends_with_odd_backslashes(&buf) {
            buf.pop();
            pending = Some((start, buf));
        } else {
            out.push((start, buf));
        }
    }
    // A continuation on the last line just ends the entry.
    out.extend(pending);
    out
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split at the first unescaped `=`, `:` or whitespace.
/// Whitespace may be followed by one `=` or `:`; a bare key has an empty value.
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..i], line[i + 1..].trim_start_matches(WHITESPACE)),
            ' ' | '\t' | '\x0c' => {
                let rest = line[i..].trim_start_matches(WHITESPACE);
                let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
                return (&line[..i], rest.trim_start_matches(WHITESPACE));
            }
            _ => {}
        }
    }
    (line, "")
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = (hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit()))
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .and_then(char::from_u32);
                let Some(decoded) = decoded else {
                    return Err(PropertiesError {
                        line,
                        reason: format!("malformed \\uxxxx escape '\\u{hex}'"),
                    });
                };
                out.push(decoded);
            }
            Some(other) => out.push(other),
            // Dangling backslash at end of input.
            None => {}
        }
    }
    Ok(out)
}
