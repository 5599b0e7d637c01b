//! JSONC reader: JSON with comments and trailing commas → `serde_json::Value`.
//!
//! A `winnow` pre-pass blanks out `//` and `/* */` comments and drops
//! trailing commas before `}` / `]`, leaving string literals untouched.
//! Newlines and columns are preserved, so `serde_json` error positions
//! still point into the original text.

use serde_json::Value;
use winnow::combinator::{alt, repeat};
use winnow::prelude::*;
use winnow::token::{any, take_till, take_until};

/// Parse a JSON or JSONC document.
///
/// # Errors
/// Returns a message with line/column when the text is not valid JSONC.
#[must_use = "parsing result should be used"]
pub fn parse_jsonc(input: &str) -> Result<Value, String> {
    let clean = strip_jsonc(input)?;
    serde_json::from_str(&clean).map_err(|e| format!("JSON parse error: {e}"))
}

/// Rewrite JSONC into plain JSON of identical line/column layout.
///
/// # Errors
/// Fails only on an unterminated block comment; every other malformation is
/// passed through for `serde_json` to report.
pub fn strip_jsonc(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while !rest.is_empty() {
        if rest.starts_with('"') {
            match string_literal.parse_next(&mut rest) {
                Ok(lit) => out.push_str(lit),
                Err(_) => {
                    // Unterminated string: let serde_json report it.
                    out.push_str(rest);
                    break;
                }
            }
        } else if rest.starts_with("//") {
            let comment = line_comment
                .parse_next(&mut rest)
                .map_err(|e| format!("JSON parse error: bad comment: {e}"))?;
            blank_out(&mut out, comment);
        } else if rest.starts_with("/*") {
            let comment = block_comment
                .parse_next(&mut rest)
                .map_err(|_| "JSON parse error: unterminated block comment".to_string())?;
            blank_out(&mut out, comment);
        } else if rest.starts_with(',') {
            rest = &rest[1..];
            if closes_after_trivia(rest) {
                out.push(' ');
            } else {
                out.push(',');
            }
        } else {
            let chunk: ModalResult<&str> = take_till(1.., ['"', '/', ',']).parse_next(&mut rest);
            match chunk {
                Ok(chunk) => out.push_str(chunk),
                Err(_) => {
                    // A lone '/': not a comment, and not valid JSON either.
                    out.push('/');
                    rest = &rest[1..];
                }
            }
        }
    }

    Ok(out)
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn string_literal<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    (
        '"',
        repeat::<_, _, (), _, _>(
            0..,
            alt((take_till(1.., ['"', '\\']).void(), ('\\', any).void())),
        ),
        '"',
    )
        .take()
        .parse_next(input)
}

fn line_comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    ("//", take_till(0.., '\n')).take().parse_next(input)
}

fn block_comment<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    ("/*", take_until(0.., "*/"), "*/").take().parse_next(input)
}

/// Skip whitespace and comments.
fn skip_trivia(input: &mut &str) {
    loop {
        *input = input.trim_start();
        let before = *input;
        if line_comment.parse_next(input).is_ok() || block_comment.parse_next(input).is_ok() {
            continue;
        }
        *input = before;
        break;
    }
}

/// Is the next significant character a closing bracket?
fn closes_after_trivia(rest: &str) -> bool {
    let mut look = rest;
    skip_trivia(&mut look);
    look.starts_with('}') || look.starts_with(']')
}

/// Replace a comment with spaces, keeping its newlines.
fn blank_out(out: &mut String, comment: &str) {
    out.extend(comment.chars().map(|c| if c == '\n' { '\n' } else { ' ' }));
}
