//! Link extraction from raw chat messages.
//!
//! Two strategies are available and selected by [`ExtractionMode`]:
//!
//! - **Pattern** - bare `http://` / `https://` URLs, greedy up to the next
//!   whitespace character
//! - **Markup** - `href` targets of anchor elements, in document order
//!
//! Both return occurrences in first-to-last order and keep duplicates.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::domain::entities::{LinkOccurrence, OccurrenceSource, escape_attribute};

/// Bare URL grammar: `scheme "://" non-whitespace+`.
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    #[default]
    Pattern,
    Markup,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMode::Pattern => "pattern",
            ExtractionMode::Markup => "markup",
        }
    }
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pattern" | "regex" | "text" => Ok(ExtractionMode::Pattern),
            "markup" | "html" => Ok(ExtractionMode::Markup),
            other => Err(format!(
                "unknown extraction mode '{}', expected 'pattern' or 'markup'",
                other
            )),
        }
    }
}

/// Finds link occurrences in a message.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkExtractor {
    mode: ExtractionMode,
}

impl LinkExtractor {
    pub fn new(mode: ExtractionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    /// Returns every link occurrence in `message`, in order of appearance.
    ///
    /// Never fails: unparseable markup yields whatever anchors the parser
    /// could recover, possibly none.
    pub fn extract(&self, message: &str) -> Vec<LinkOccurrence> {
        match self.mode {
            ExtractionMode::Pattern => extract_pattern(message),
            ExtractionMode::Markup => extract_markup(message),
        }
    }
}

fn extract_pattern(message: &str) -> Vec<LinkOccurrence> {
    URL_REGEX
        .find_iter(message)
        .enumerate()
        .map(|(index, m)| {
            LinkOccurrence::new(
                index,
                m.as_str(),
                Some(m.range()),
                OccurrenceSource::Pattern,
            )
        })
        .collect()
}

/// Collects anchor targets that are absolute `http`/`https` URLs.
///
/// Fragment, `mailto:` and relative targets are not links the shortener can
/// accept, so they are left out rather than failing the whole batch.
fn extract_markup(message: &str) -> Vec<LinkOccurrence> {
    let fragment = Html::parse_fragment(message);

    let targets: Vec<String> = fragment
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .filter(|href| is_http_link(href))
        .map(str::to_string)
        .collect();

    // Attribute values come back decoded, so they are located in the raw text
    // with a forward cursor, either verbatim or in their escaped form.
    let mut cursor = 0;
    targets
        .into_iter()
        .enumerate()
        .map(|(index, href)| match locate(message, cursor, &href) {
            Some((span, encoded)) => {
                cursor = span.end;
                let occurrence =
                    LinkOccurrence::new(index, href, Some(span), OccurrenceSource::Markup);
                if encoded { occurrence.encoded() } else { occurrence }
            }
            None => LinkOccurrence::new(index, href, None, OccurrenceSource::Markup),
        })
        .collect()
}

/// Finds the earliest raw form of `href` at or after `cursor`.
///
/// Returns the byte range and whether the match is the entity-encoded form.
fn locate(message: &str, cursor: usize, href: &str) -> Option<(Range<usize>, bool)> {
    let rest = &message[cursor..];
    let escaped = [href.replace('&', "&amp;"), escape_attribute(href)];

    let verbatim = rest.find(href).map(|offset| (offset, href.len(), false));
    let encoded = escaped
        .iter()
        .filter(|form| form.as_str() != href)
        .filter_map(|form| rest.find(form.as_str()).map(|offset| (offset, form.len(), true)));

    verbatim
        .into_iter()
        .chain(encoded)
        .min_by_key(|(offset, _, _)| *offset)
        .map(|(offset, len, encoded)| (cursor + offset..cursor + offset + len, encoded))
}

fn is_http_link(href: &str) -> bool {
    Url::parse(href)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
