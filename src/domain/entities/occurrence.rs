//! Link occurrence entity produced by the extractor.

use std::borrow::Cow;
use std::ops::Range;

/// How an occurrence was recognised in the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccurrenceSource {
    /// Bare `http(s)://` text matched by pattern.
    Pattern,
    /// `href` attribute of an anchor element.
    Markup,
}

/// A single detected link inside a message.
///
/// `span` is the byte range of the link inside the original message. For an
/// `href` written with character references (`&amp;`), `url` holds the
/// decoded value while `span` covers the encoded text and `encoded` is set,
/// so the replacement is escaped the same way. `span` is `None` only when the
/// link could not be located at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOccurrence {
    pub index: usize,
    pub url: String,
    pub span: Option<Range<usize>>,
    pub source: OccurrenceSource,
    pub encoded: bool,
}

impl LinkOccurrence {
    /// Creates a new occurrence.
    pub fn new(
        index: usize,
        url: impl Into<String>,
        span: Option<Range<usize>>,
        source: OccurrenceSource,
    ) -> Self {
        Self {
            index,
            url: url.into(),
            span,
            source,
            encoded: false,
        }
    }

    /// Marks the span as covering the entity-encoded form of `url`.
    pub fn encoded(mut self) -> Self {
        self.encoded = true;
        self
    }

    /// Text written over the span in place of this occurrence.
    pub fn replacement<'a>(&self, short_url: &'a str) -> Cow<'a, str> {
        if self.encoded {
            Cow::Owned(escape_attribute(short_url))
        } else {
            Cow::Borrowed(short_url)
        }
    }

    /// Returns true if the occurrence maps to a concrete position in the message.
    pub fn is_located(&self) -> bool {
        self.span.is_some()
    }
}

/// Escapes a value for use inside a quoted HTML attribute.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
