//! Comment stripping
//!
//! [`strip`] removes `//` and `/* ... */` comments in a single forward scan
//! that tracks whether it is inside a string or character literal, so that
//! comment-like text inside literals survives untouched. Newlines inside block
//! comments are kept so line numbers in the cleaned text match the original.

use super::scan::literal_end;

/// The subject program: raw text plus its comment-stripped copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub raw: String,
    pub cleaned: String,
}

impl SourceUnit {
    pub fn new(raw: &str) -> Self {
        SourceUnit {
            raw: raw.to_string(),
            cleaned: strip(raw),
        }
    }
}

/// Remove comments from `source`.
///
/// Never fails: an unterminated block comment swallows the rest of the input.
pub fn strip(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = literal_end(bytes, i);
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                out.push_str(&source[copied..i]);
                let end = source[i..].find('\n').map(|n| i + n).unwrap_or(bytes.len());
                copied = end;
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                out.push_str(&source[copied..i]);
                match source[i + 2..].find("*/") {
                    Some(n) => {
                        let end = i + 2 + n + 2;
                        let newlines = source[i..end].matches('\n').count();
                        out.extend(std::iter::repeat('\n').take(newlines));
                        copied = end;
                        i = end;
                    }
                    None => {
                        tracing::debug!(offset = i, "unterminated block comment, truncating");
                        return out;
                    }
                }
            }
            _ => i += 1,
        }
    }
    out.push_str(&source[copied..]);
    out
}
