pub mod acts;
pub mod app_config;
pub mod config;
pub mod error;
pub mod exclusions;
pub mod history;
pub mod opportunities;
pub mod queries;
pub mod scout_config;
pub mod venue;

pub use acts::{matches, matching_acts, ActProfile};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ValidationError};
pub use exclusions::{exclusion_key, ExcludedVenue, ExclusionReason};
pub use history::{HistoryFilter, SearchHistoryEntry};
pub use opportunities::{Opportunity, OpportunityType};
pub use queries::{build_search_queries, CompiledTemplate, SearchQuery};
pub use scout_config::{
    load_scout_config, parse_scout_config, validate_scout_config, AlertConfig, QueryTemplate,
    RegionConfig, ScoutConfig, Settings,
};
pub use venue::{
    normalize_genre, normalize_key, Contact, Venue, VenueDraft, VenueId, VenueStatus,
    DEFAULT_STATE, UNKNOWN_CITY, VENUE_ID_LEN,
};
