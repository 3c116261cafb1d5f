//! Dot-label boundaries of a host identity.

/// Number of boundaries tracked before the end of the string.
///
/// Includes the leading pseudo-boundary, so at most `MAX_DOTS - 1` dots are
/// recorded and a host yields at most `MAX_DOTS` labels. Text past the last
/// recorded dot stays in the final label.
pub const MAX_DOTS: usize = 19;

/// A host identity split into dot-delimited labels.
///
/// Offsets are in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelIndex {
    chars: Vec<char>,
    /// `edges[i]` is the offset where label `i + 1` starts. The last entry
    /// sits one past the end of the string, as if a dot followed it.
    edges: Vec<usize>,
}

impl LabelIndex {
    pub fn build(host: &str) -> Self {
        let chars: Vec<char> = host.chars().collect();
        let mut edges = Vec::with_capacity(MAX_DOTS + 1);
        edges.push(0);
        for (i, &c) in chars.iter().enumerate() {
            if c == '.' && edges.len() < MAX_DOTS {
                edges.push(i + 1);
            }
        }
        edges.push(chars.len() + 1);

        Self { chars, edges }
    }

    /// Number of labels (always at least one).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    /// Whether the host name itself was empty. The index still holds one
    /// (empty) label in that case.
    pub fn host_is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Start offset of the one-based label `n`.
    pub fn start_of(&self, n: usize) -> usize {
        self.edges[n - 1]
    }

    /// End offset (exclusive) of the one-based label `n`.
    pub fn end_of(&self, n: usize) -> usize {
        self.edges[n] - 1
    }

    /// The one-based label `n` as a string.
    pub fn label(&self, n: usize) -> String {
        self.chars[self.start_of(n)..self.end_of(n)].iter().collect()
    }
}
