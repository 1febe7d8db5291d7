use serde::{Deserialize, Serialize};
use vscout_core::VenueDraft;

/// What the originating query knew about location. A fallback, not ground truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryHint {
    pub query: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Output of one extraction pass over a result blob.
///
/// `drafts` is lazy: candidates are parsed as the caller pulls them, and a
/// line that yields nothing is skipped without affecting the rest.
pub struct Extraction<'a> {
    /// Configured alert keywords found in the blob, verbatim and in
    /// configured order, each at most once.
    pub alert_hits: Vec<String>,
    pub drafts: Box<dyn Iterator<Item = VenueDraft> + 'a>,
}

impl std::fmt::Debug for Extraction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Extraction")
            .field("alert_hits", &self.alert_hits)
            .finish_non_exhaustive()
    }
}
