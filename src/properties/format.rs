//! Java `.properties` text format
//!
//! Files are read as ISO-8859-1 and written as pure ASCII, with everything
//! outside printable ASCII escaped as `\uXXXX`, so a written file always
//! reads back unchanged.

use super::Properties;
use crate::errors::PropertiesError;
use std::fmt::Write as _;
use std::io::{self, Write};

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

/// Parses properties text
pub(super) fn parse(text: &str) -> Result<Properties, PropertiesError> {
    let normalized = text.replace("\r\n", "\n");
    let mut lines = normalized.split(['\n', '\r']).enumerate();
    let mut properties = Properties::new();

    while let Some((index, raw)) = lines.next() {
        let line = raw.trim_start_matches(WHITESPACE);
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(WHITESPACE)),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        let line_number = index + 1;
        properties.set(unescape(key, line_number)?, unescape(value, line_number)?);
    }

    Ok(properties)
}

/// An odd number of trailing backslashes joins the next line
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits a logical line at the first unescaped `=`, `:` or whitespace
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || WHITESPACE.contains(&c) {
            key_end = i;
            break;
        }
    }

    let rest = line[key_end..].trim_start_matches(WHITESPACE);
    let rest = rest
        .strip_prefix(['=', ':'])
        .unwrap_or(rest)
        .trim_start_matches(WHITESPACE);
    (&line[..key_end], rest)
}

fn unescape(raw: &str, line: usize) -> Result<String, PropertiesError> {
    let mut units: Vec<u16> = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();
    let mut buf = [0u16; 2];

    while let Some(c) = chars.next() {
        let decoded = if c == '\\' {
            match chars.next() {
                Some('u') => {
                    let hex: String = chars.by_ref().take(4).collect();
                    let unit = (hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit()))
                        .then(|| u16::from_str_radix(&hex, 16).ok())
                        .flatten()
                        .ok_or_else(|| PropertiesError::Parse {
                            line,
                            reason: "Malformed \\uxxxx encoding.".to_string(),
                        })?;
                    units.push(unit);
                    continue;
                }
                Some('t') => '\t',
                Some('n') => '\n',
                Some('r') => '\r',
                Some('f') => '\x0c',
                Some(other) => other,
                None => break,
            }
        } else {
            c
        };
        units.extend_from_slice(decoded.encode_utf16(&mut buf));
    }

    Ok(String::from_utf16_lossy(&units))
}

fn escape(text: &str, escape_space: bool, out: &mut String) {
    for (i, c) in text.chars().enumerate() {
        match c {
            ' ' if i == 0 || escape_space => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c if !(' '..='~').contains(&c) => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    let _ = write!(out, "\\u{unit:04X}");
                }
            }
            c => out.push(c),
        }
    }
}

/// Writes `properties` with an optional header comment and a timestamp line
pub(super) fn store<W: Write>(
    properties: &Properties,
    writer: &mut W,
    comment: Option<&str>,
) -> io::Result<()> {
    if let Some(comment) = comment {
        for line in comment.lines() {
            let mut escaped = String::with_capacity(line.len());
            for c in line.chars() {
                if c.is_ascii() {
                    escaped.push(c);
                } else {
                    escape(c.encode_utf8(&mut [0u8; 4]), false, &mut escaped);
                }
            }
            writeln!(writer, "#{escaped}")?;
        }
    }
    writeln!(
        writer,
        "#{}",
        chrono::Utc::now().format("%a %b %d %H:%M:%S UTC %Y")
    )?;

    let mut line = String::new();
    for (key, value) in properties.iter() {
        line.clear();
        escape(key, true, &mut line);
        line.push('=');
        escape(value, false, &mut line);
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
