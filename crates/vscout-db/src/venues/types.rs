//! Row types for the `venues` table.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use vscout_core::{Contact, Venue, VenueId, VenueStatus};

use crate::{from_json, i64_to_u32, DbError};

pub(crate) const VENUE_COLUMNS: &str = "id, name, city, region, state, venue_type, capacity, \
     website, phone, email, address, booking_contact, genres, status, source, \
     first_seen, last_seen";

/// A row from the `venues` table, before JSON and enum columns are decoded.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VenueRow {
    pub id: String,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub state: String,
    pub venue_type: Option<String>,
    pub capacity: Option<i64>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub booking_contact: Option<String>,
    /// JSON array of genre labels.
    pub genres: String,
    pub status: String,
    pub source: Option<String>,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
}

impl TryFrom<VenueRow> for Venue {
    type Error = DbError;

    fn try_from(row: VenueRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<VenueStatus>()
            .map_err(|reason| DbError::InvalidColumn {
                column: "status",
                reason,
            })?;
        let genres: BTreeSet<String> = from_json("genres", &row.genres)?;
        let capacity = row
            .capacity
            .map(|c| i64_to_u32("capacity", c))
            .transpose()?;

        Ok(Venue {
            id: VenueId::from_stored(row.id),
            name: row.name,
            city: row.city,
            region: row.region,
            state: row.state,
            venue_type: row.venue_type,
            capacity,
            contact: Contact {
                website: row.website,
                phone: row.phone,
                email: row.email,
                address: row.address,
                booking_contact: row.booking_contact,
            },
            genres,
            status,
            source: row.source,
            first_seen: row.first_seen,
            last_seen: row.last_seen,
        })
    }
}
