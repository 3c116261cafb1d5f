//! Template expansion against a host's labels.
//!
//! # Selector resolution
//! ```text
//! %N       label N of the host          (N = 0: the whole host)
//! %-N      label N counted from the right
//! %N+      label N through the end of the host
//! %-N+     start of the host through label N from the right
//! %N.M     same rules again, over characters of the chosen labels
//! ```
//! An index past the end of its range yields the single character `_`.

use crate::vhost::format::{Index, Segment, Selector, Template};
use crate::vhost::labels::LabelIndex;

/// Substituted for any selector that points past the available range.
const PLACEHOLDER: &[char] = &['_'];

/// Expand `template` for one request, producing the mapped path suffix.
///
/// Selected text is lowercased; literals are copied verbatim. A single
/// trailing `/` is dropped so the suffix can be joined with a URI.
pub fn interpolate(template: &Template, labels: &LabelIndex, port: u16) -> String {
    let mut out = String::new();

    for segment in template.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Port => out.push_str(&port.to_string()),
            Segment::Select(selector) => {
                for c in select(selector, labels) {
                    out.extend(c.to_lowercase());
                }
            }
        }
    }

    if out.ends_with('/') {
        out.pop();
    }
    out
}

fn select<'a>(selector: &Selector, labels: &'a LabelIndex) -> &'a [char] {
    let host = label_range(selector.label, labels);
    char_range(selector.chars, host)
}

fn label_range(index: Index, labels: &LabelIndex) -> &[char] {
    let n = usize::from(index.value);
    let count = labels.len();
    let host = labels.chars();

    if n == 0 {
        return host;
    }
    if n > count {
        return PLACEHOLDER;
    }

    let (start, end) = if index.from_end {
        let label = count - n + 1;
        let start = if index.open_end { 0 } else { labels.start_of(label) };
        (start, labels.end_of(label))
    } else {
        let end = if index.open_end { host.len() } else { labels.end_of(n) };
        (labels.start_of(n), end)
    };
    &host[start..end]
}

fn char_range(index: Index, range: &[char]) -> &[char] {
    let m = usize::from(index.value);
    let len = range.len();

    if m == 0 {
        return range;
    }
    if m > len {
        return PLACEHOLDER;
    }

    let (start, end) = if index.from_end {
        let start = if index.open_end { 0 } else { len - m };
        (start, len - m + 1)
    } else {
        let end = if index.open_end { len } else { m };
        (m - 1, end)
    };
    &range[start..end]
}
