//! The venue registry: the only writer of the `venues` table.

mod read;
mod types;
mod write;

pub use read::{count_venues, get_venue, list_active_venues, list_venues};
pub use types::VenueRow;
pub use write::{request_venue_status, upsert_venue};
