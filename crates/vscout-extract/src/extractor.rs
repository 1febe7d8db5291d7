use crate::types::{Extraction, QueryHint};

/// A strategy for turning one unstructured result blob into venue drafts and
/// alert-keyword hits.
///
/// Implementations must not fail: text they cannot interpret yields zero
/// drafts, and keyword hits are reported independently of whether any venue
/// was found.
pub trait ResultExtractor {
    fn extract<'a>(&'a self, text: &'a str, hint: &'a QueryHint) -> Extraction<'a>;
}
