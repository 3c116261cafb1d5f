//! Parsing of `VirtualDocumentRoot*WithFallback` directive lines.
//!
//! ```text
//! VirtualDocumentRootWithFallback   <template|none> <fallback>
//! VirtualDocumentRootIPWithFallback <template|none> <fallback>
//! ```
//! Directive names are case-insensitive. Arguments are separated by
//! whitespace and may be double-quoted.

use thiserror::Error;

use crate::vhost::{compile, FormatError, Mode, VhostAlias};

pub const NAME_DIRECTIVE: &str = "VirtualDocumentRootWithFallback";
pub const IP_DIRECTIVE: &str = "VirtualDocumentRootIPWithFallback";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("empty directive")]
    Empty,

    #[error("unknown directive {0:?}")]
    Unknown(String),

    #[error("{name} takes two arguments, got {got}")]
    Arity { name: &'static str, got: usize },

    #[error("unterminated quote in directive")]
    UnterminatedQuote,

    #[error("fallback must be an absolute path (got {0:?})")]
    FallbackNotAbsolute(String),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// A parsed and compiled directive.
pub type Directive = VhostAlias;

/// Parse one directive line into a ready-to-use scope setting.
pub fn parse_directive(line: &str) -> Result<Directive, DirectiveError> {
    let words = split_words(line)?;
    let (head, args) = words.split_first().ok_or(DirectiveError::Empty)?;

    let (name, mode) = if head.eq_ignore_ascii_case(NAME_DIRECTIVE) {
        (NAME_DIRECTIVE, Mode::Name)
    } else if head.eq_ignore_ascii_case(IP_DIRECTIVE) {
        (IP_DIRECTIVE, Mode::Ip)
    } else {
        return Err(DirectiveError::Unknown(head.clone()));
    };

    let [map, fallback] = args else {
        return Err(DirectiveError::Arity {
            name,
            got: args.len(),
        });
    };

    let map = compile(map)?;
    if !fallback.starts_with('/') {
        return Err(DirectiveError::FallbackNotAbsolute(fallback.clone()));
    }

    Ok(VhostAlias::new(mode, map, fallback.as_str()))
}

fn split_words(line: &str) -> Result<Vec<String>, DirectiveError> {
    let mut words = Vec::new();
    let mut chars = line.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut word = String::new();
        if c == '"' {
            chars.next();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some(c) => word.push(c),
                    None => return Err(DirectiveError::UnterminatedQuote),
                }
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                word.push(c);
            }
        }
        words.push(word);
    }

    Ok(words)
}
