pub mod extractor;
pub mod heuristic;
pub mod keywords;
mod parse_helpers;
pub mod types;

pub use extractor::ResultExtractor;
pub use heuristic::{HeuristicExtractor, WEB_SEARCH_SOURCE};
pub use keywords::{find_keywords, sentence_containing};
pub use types::{Extraction, QueryHint};
