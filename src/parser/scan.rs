//! Literal-aware text scanning helpers
//!
//! Every heuristic pass in the crate works on raw text rather than tokens, so
//! they all need the same few primitives: skipping over string and character
//! literals, finding the partner of a bracket, splitting on a separator only at
//! the top nesting level, and cutting a method body into statement segments.
//!
//! All delimiters recognised here are ASCII, so scanning is done over bytes and
//! every returned index is a valid `str` char boundary.

/// Returns true if `c` may start an identifier.
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

/// Returns true if `c` may continue an identifier.
pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Returns true if the whole of `s` is a single identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_char),
        _ => false,
    }
}

/// Given `start` pointing at an opening `"` or `'`, returns the index just past
/// the closing quote. Unterminated literals run to the end of the line.
pub fn literal_end(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Replaces the contents of string and character literals with spaces.
///
/// Quotes are kept and byte offsets are preserved, so indices found in the
/// masked text can be used to slice the original.
pub fn mask_literals(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut copied = 0;
    while i < bytes.len() {
        if bytes[i] == b'"' || bytes[i] == b'\'' {
            let end = literal_end(bytes, i);
            out.push_str(&text[copied..=i]);
            let close = if end > i + 1 && bytes[end - 1] == bytes[i] {
                end - 1
            } else {
                end
            };
            out.extend(std::iter::repeat(' ').take(close - (i + 1)));
            out.push_str(&text[close..end]);
            copied = end;
            i = end;
        } else {
            i += 1;
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// Finds the bracket that closes the one at `open`, skipping literals.
pub fn find_matching(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let (open_b, close_b) = match bytes.get(open)? {
        b'{' => (b'{', b'}'),
        b'(' => (b'(', b')'),
        b'[' => (b'[', b']'),
        b'<' => (b'<', b'>'),
        _ => return None,
    };
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' || b == b'\'' {
            i = literal_end(bytes, i);
            continue;
        }
        if b == open_b {
            depth += 1;
        } else if b == close_b {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// 1-based line number of byte offset `idx`.
pub fn line_of(text: &str, idx: usize) -> usize {
    text.as_bytes()[..idx.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

/// Byte offsets of every whole-word occurrence of `word` outside literals.
pub fn word_positions(text: &str, word: &str) -> Vec<usize> {
    let masked = mask_literals(text);
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(rel) = masked[from..].find(word) {
        let at = from + rel;
        let before = masked[..at].chars().next_back();
        let after = masked[at + word.len()..].chars().next();
        if !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char) {
            found.push(at);
        }
        from = at + word.len();
    }
    found
}

/// Reads the identifier starting at `start` (if any).
pub fn ident_at(text: &str, start: usize) -> Option<&str> {
    let rest = text.get(start..)?;
    let mut chars = rest.char_indices();
    match chars.next() {
        Some((_, c)) if is_ident_start(c) => {}
        _ => return None,
    }
    let end = rest
        .char_indices()
        .find(|&(_, c)| !is_ident_char(c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Skips ASCII whitespace forwards from `i`.
pub fn skip_ws(text: &str, mut i: usize) -> usize {
    let bytes = text.as_bytes();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Splits `text` on `sep` wherever it appears outside literals and brackets.
pub fn split_top_level(text: &str, sep: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = literal_end(bytes, i);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b if b == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&text[start..]);
    parts
}

/// Shape of a statement segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Text terminated by `;` (or by the end of the body).
    Statement,
    /// Text terminated by `{`; the text is the block header (possibly empty).
    BlockOpen,
    /// A lone `}`.
    BlockClose,
}

/// One statement-sized piece of a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub line: usize,
    pub kind: SegmentKind,
}

/// Cuts `body` into statement segments at top-level `;`, `{` and `}`.
///
/// Semicolons inside parentheses (the header of a `for`) do not split.
/// `first_line` is the source line on which `body` starts.
pub fn segments(body: &str, first_line: usize) -> Vec<Segment> {
    let bytes = body.as_bytes();
    let mut out = Vec::new();
    let mut parens = 0i32;
    let mut start = 0;
    let mut line = first_line;
    let mut seg_line = first_line;
    let mut pending = false;
    let mut i = 0;

    let push = |out: &mut Vec<Segment>, text: &str, line: usize, kind: SegmentKind| {
        let text = text.trim();
        if kind == SegmentKind::Statement && text.is_empty() {
            return;
        }
        out.push(Segment {
            text: text.to_string(),
            line,
            kind,
        });
    };

    while i < bytes.len() {
        let b = bytes[i];
        if !pending && !b.is_ascii_whitespace() {
            pending = true;
            seg_line = line;
        }
        match b {
            b'\n' => line += 1,
            b'"' | b'\'' => {
                i = literal_end(bytes, i);
                continue;
            }
            b'(' => parens += 1,
            b')' => parens -= 1,
            b';' if parens <= 0 => {
                push(&mut out, &body[start..i], seg_line, SegmentKind::Statement);
                start = i + 1;
                pending = false;
            }
            b'{' if parens <= 0 => {
                push(&mut out, &body[start..i], seg_line, SegmentKind::BlockOpen);
                start = i + 1;
                pending = false;
            }
            b'}' if parens <= 0 => {
                push(&mut out, &body[start..i], seg_line, SegmentKind::Statement);
                push(&mut out, "}", line, SegmentKind::BlockClose);
                start = i + 1;
                pending = false;
            }
            _ => {}
        }
        i += 1;
    }
    push(&mut out, &body[start..], seg_line, SegmentKind::Statement);
    out
}
