//! Format-string compiler.
//!
//! # Grammar
//! ```text
//! template  := "none" | "/" { literal | escape }
//! escape    := "%%" | "%p" | "%" index [ "." index ]
//! index     := [ "-" ] DIGIT [ "+" ]
//! ```
//!
//! # Design Decisions
//! - Templates are validated once, at configuration time
//! - Compilation is atomic: a malformed escape yields no template at all
//! - Runs of literal characters are stored as a single segment

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

/// Errors raised while compiling a document-root template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format string must be an absolute path, or 'none' (got {0:?})")]
    NotAbsolute(String),

    #[error("syntax error in format string at byte {position}")]
    Syntax { position: usize },
}

/// One side of a selector: which label (or character) to pick.
///
/// `value` is one-based; zero selects the whole range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Index {
    pub value: u8,
    /// `-` modifier: count from the right.
    pub from_end: bool,
    /// `+` modifier: extend the range to the far end.
    pub open_end: bool,
}

impl Index {
    /// The index that selects everything.
    pub const WHOLE: Index = Index {
        value: 0,
        from_end: false,
        open_end: false,
    };
}

/// A `%N.M` escape: a label range, then a character range inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector {
    pub label: Index,
    pub chars: Index,
}

/// A compiled piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Port,
    Select(Selector),
}

/// A validated document-root template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Original template text, as configured.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Result of compiling the first directive argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocRootMap {
    /// The literal `none`: mapping explicitly disabled.
    None,
    Template(Template),
}

/// Compile a template string, or the token `none`.
pub fn compile(raw: &str) -> Result<DocRootMap, FormatError> {
    if !raw.starts_with('/') {
        if raw.eq_ignore_ascii_case("none") {
            return Ok(DocRootMap::None);
        }
        return Err(FormatError::NotAbsolute(raw.to_string()));
    }
    parse(raw).map(DocRootMap::Template)
}

fn parse(source: &str) -> Result<Template, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        if chars.next_if(|&(_, c)| c == '%').is_some() {
            literal.push('%');
            continue;
        }

        let segment = if chars.next_if(|&(_, c)| c == 'p').is_some() {
            Segment::Port
        } else {
            let label = parse_index(&mut chars).ok_or(FormatError::Syntax { position })?;
            let within = if chars.next_if(|&(_, c)| c == '.').is_some() {
                parse_index(&mut chars).ok_or(FormatError::Syntax { position })?
            } else {
                Index::WHOLE
            };
            Segment::Select(Selector {
                label,
                chars: within,
            })
        };

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(segment);
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    Ok(Template {
        source: source.to_string(),
        segments,
    })
}

fn parse_index(chars: &mut Peekable<CharIndices<'_>>) -> Option<Index> {
    let from_end = chars.next_if(|&(_, c)| c == '-').is_some();
    let (_, digit) = chars.next_if(|&(_, c)| c.is_ascii_digit())?;
    let open_end = chars.next_if(|&(_, c)| c == '+').is_some();

    Some(Index {
        value: digit as u8 - b'0',
        from_end,
        open_end,
    })
}
