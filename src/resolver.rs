//! Presentation URL resolution
//!
//! Turns a user-supplied Google Slides link into a [`PresentationRef`] and
//! derives the embeddable viewer URL from it. Matching is permissive:
//! the path fragment may appear anywhere in the input, the id has
//! no length bound and whatever follows the id's closing slash is ignored.

use std::fmt;
use std::str::FromStr;

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::{Error, Result};

/// Host and path prefix every embed URL starts with
pub const EMBED_BASE: &str = "https://docs.google.com/presentation/d/";

/// Fixed viewer parameters: no autoplay, no looping, 3s transition delay
pub const EMBED_PARAMS: [(&str, &str); 3] = [("start", "false"), ("loop", "false"), ("delayms", "3000")];

/// Token prefix of "publish to web" presentation ids
pub const PUBLISHED_PREFIX: &str = "2PACX-";

const PUBLISHED_SEGMENT: &str = "e/";

/// A resolved reference to a Google Slides presentation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationRef {
    id: String,
    published: bool,
}

impl PresentationRef {
    /// Reference to a regular (editor-shared) presentation
    pub fn regular(id: impl Into<String>) -> Self {
        Self { id: id.into(), published: false }
    }

    /// Reference to a presentation shared via "publish to web"
    pub fn published(id: impl Into<String>) -> Self {
        Self { id: id.into(), published: true }
    }

    /// Presentation id; published ids include the `2PACX-` prefix
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_published(&self) -> bool {
        self.published
    }

    /// Build the embeddable viewer URL for this presentation.
    ///
    /// The result always carries exactly the [`EMBED_PARAMS`] query, in order.
    pub fn embed_url(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(EMBED_PARAMS)
            .finish();
        if self.published {
            format!("{}{}{}/embed?{}", EMBED_BASE, PUBLISHED_SEGMENT, self.id, query)
        } else {
            format!("{}{}/embed?{}", EMBED_BASE, self.id, query)
        }
    }
}

impl fmt::Display for PresentationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.published { "published" } else { "regular" };
        write!(f, "{} presentation {}", kind, self.id)
    }
}

impl FromStr for PresentationRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        resolve(s).ok_or_else(|| Error::InvalidUrl(s.to_string()))
    }
}

/// Resolve an input URL into a presentation reference.
///
/// The published form (`/presentation/d/e/2PACX-.../`) is tried first, then the
/// regular form (`/presentation/d/<id>/`). Returns `None` when neither matches.
pub fn resolve(input: &str) -> Option<PresentationRef> {
    find_published_id(input)
        .map(PresentationRef::published)
        .or_else(|| find_regular_id(input).map(PresentationRef::regular))
}

/// Embed URL for an optional reference; `None` maps to the empty string.
pub fn embed_url(reference: Option<&PresentationRef>) -> String {
    reference.map(PresentationRef::embed_url).unwrap_or_default()
}

/// Resolve `input` and build its embed URL in one step.
///
/// Unrecognized input is logged and yields the empty string, which callers
/// render as the invalid-URL placeholder.
pub fn embed_url_for(input: &str) -> String {
    let reference = resolve(input);
    if reference.is_none() {
        warn!("Invalid Google Slides URL: {:?}", input);
    }
    embed_url(reference.as_ref())
}

static PUBLISHED_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/presentation/d/e/(2PACX-[A-Za-z0-9_-]+)/").expect("published pattern"));
static REGULAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/presentation/d/([A-Za-z0-9_-]+)/").expect("regular pattern"));

fn find_published_id(input: &str) -> Option<&str> {
    PUBLISHED_PATTERN.captures(input).and_then(|cap| cap.get(1)).map(|m| m.as_str())
}

fn find_regular_id(input: &str) -> Option<&str> {
    REGULAR_PATTERN.captures(input).and_then(|cap| cap.get(1)).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_regular_edit_link() {
        let r = resolve("https://docs.google.com/presentation/d/1AbC_23-xyz/edit").unwrap();
        assert_eq!(r.id(), "1AbC_23-xyz");
        assert!(!r.is_published());
        assert_eq!(
            r.embed_url(),
            "https://docs.google.com/presentation/d/1AbC_23-xyz/embed?start=false&loop=false&delayms=3000"
        );
    }

    #[test]
    fn resolves_published_link() {
        let r = resolve("https://docs.google.com/presentation/d/e/2PACX-1vAbc-De_F2/pub?start=true").unwrap();
        assert_eq!(r, PresentationRef::published("2PACX-1vAbc-De_F2"));
        assert_eq!(
            r.embed_url(),
            "https://docs.google.com/presentation/d/e/2PACX-1vAbc-De_F2/embed?start=false&loop=false&delayms=3000"
        );
    }

    #[test]
    fn unrecognized_input_yields_empty_embed_url() {
        assert_eq!(resolve("https://example.com/not-a-slide"), None);
        assert_eq!(embed_url_for("https://example.com/not-a-slide"), "");
        assert_eq!(embed_url(None), "");
    }

    #[test]
    fn id_must_be_closed_by_a_slash() {
        assert_eq!(resolve("https://docs.google.com/presentation/d/abc"), None);
        assert_eq!(resolve("https://docs.google.com/presentation/d//edit"), None);
        assert_eq!(resolve("https://docs.google.com/presentation/d/ab.c/edit"), None);
    }

    #[test]
    fn published_segment_without_token_prefix_reads_as_regular() {
        // `e` itself satisfies the regular id pattern
        let r = resolve("https://docs.google.com/presentation/d/e/abc/pub").unwrap();
        assert_eq!(r, PresentationRef::regular("e"));

        let r = resolve("https://docs.google.com/presentation/d/e/2PACX-/pub").unwrap();
        assert_eq!(r, PresentationRef::regular("e"));
    }

    #[test]
    fn matching_is_unanchored() {
        let r = resolve("see docs.google.com/presentation/d/xyz/ for details").unwrap();
        assert_eq!(r.id(), "xyz");

        let r = resolve("/presentation/d/presentation/d/abc/").unwrap();
        assert_eq!(r.id(), "presentation");
    }

    #[test]
    fn empty_id_does_not_hide_a_later_path() {
        let r = resolve("/presentation/d//presentation/d/abc/").unwrap();
        assert_eq!(r.id(), "abc");
    }

    #[test]
    fn published_match_anywhere_wins_over_earlier_regular_match() {
        let input = "/presentation/d/first/ then /presentation/d/e/2PACX-second/";
        assert_eq!(resolve(input), Some(PresentationRef::published("2PACX-second")));
    }

    #[test]
    fn non_ascii_input_is_handled() {
        assert_eq!(resolve("https://ドキュメント/presentation/d/ünï/edit"), None);
        let r = resolve("→/presentation/d/ok/←").unwrap();
        assert_eq!(r.id(), "ok");
    }

    #[test]
    fn from_str_reports_invalid_url() {
        let err = "nope".parse::<PresentationRef>().unwrap_err();
        assert_eq!(err, Error::InvalidUrl("nope".into()));
        assert_eq!(err.to_string(), "Invalid Google Slides URL: nope");
    }

    #[test]
    fn embed_url_is_deterministic() {
        let input = "https://docs.google.com/presentation/d/1x/edit#slide=id.p";
        assert_eq!(embed_url_for(input), embed_url_for(input));
        let url = embed_url_for(input);
        let query = url.split_once('?').unwrap().1;
        assert_eq!(query.split('&').count(), 3);
    }
}
