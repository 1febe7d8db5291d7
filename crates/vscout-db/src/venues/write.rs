//! Write operations for the `venues` table.

use chrono::NaiveDate;
use sqlx::{Acquire, Sqlite, SqliteConnection};
use vscout_core::{Venue, VenueDraft, VenueId, VenueStatus};

use super::read::get_venue;
use crate::exclusions::is_excluded;
use crate::{to_json, DbError};

/// Insert or merge `draft` into the registry, as seen `today`.
///
/// Returns the stored venue and whether this call created it. All reads and
/// writes for one draft run in a single transaction; given a connection that
/// is already inside a transaction, that becomes a savepoint.
///
/// - A draft matching the exclusion list always lands as `excluded`. An
///   existing venue only has its status forced; nothing else (including
///   `last_seen`) changes.
/// - A new venue starts `unverified` with `first_seen = last_seen = today`.
/// - An existing venue is merged: see [`Venue::merge_draft`].
///
/// # Errors
///
/// Returns [`DbError::Validation`] for a draft without a name or with a zero
/// capacity (nothing is written), or another [`DbError`] if the transaction fails, in which case
/// the stored venue is left unchanged.
pub async fn upsert_venue<'c, A>(
    conn: A,
    draft: &VenueDraft,
    today: NaiveDate,
) -> Result<(Venue, bool), DbError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let incoming = Venue::from_draft(draft, today)?;

    let mut tx = conn.begin().await?;
    let excluded = is_excluded(&mut *tx, &incoming.name, &incoming.city).await?;
    let existing = get_venue(&mut *tx, &incoming.id).await?;

    let (venue, created) = match existing {
        None => {
            let mut venue = incoming;
            if excluded {
                venue.status = VenueStatus::Excluded;
            }
            insert_venue_row(&mut tx, &venue).await?;
            (venue, true)
        }
        Some(mut venue) if excluded => {
            if venue.status != VenueStatus::Excluded {
                venue.status = VenueStatus::Excluded;
                set_status(&mut tx, &venue).await?;
            }
            (venue, false)
        }
        Some(mut venue) => {
            venue.merge_draft(draft, today);
            update_venue_row(&mut tx, &venue).await?;
            (venue, false)
        }
    };

    tx.commit().await?;

    tracing::debug!(
        venue_id = %venue.id,
        name = %venue.name,
        city = %venue.city,
        status = %venue.status,
        created,
        "venue upserted"
    );
    Ok((venue, created))
}

/// Request a status change for the venue with `id`.
///
/// The request goes through [`VenueStatus::transition`], so a closed venue
/// is not reopened and an excluded one stays excluded. Returns the venue as
/// stored afterwards, or `None` when no venue has that id.
///
/// # Errors
///
/// Returns [`DbError`] if the transaction fails.
pub async fn request_venue_status<'c, A>(
    conn: A,
    id: &VenueId,
    requested: VenueStatus,
) -> Result<Option<Venue>, DbError>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut tx = conn.begin().await?;
    let Some(mut venue) = get_venue(&mut *tx, id).await? else {
        return Ok(None);
    };

    let next = venue.status.transition(requested);
    if next != venue.status {
        tracing::info!(
            venue_id = %venue.id,
            from = %venue.status,
            to = %next,
            "venue status changed"
        );
        venue.status = next;
        set_status(&mut tx, &venue).await?;
    }
    tx.commit().await?;
    Ok(Some(venue))
}

async fn insert_venue_row(conn: &mut SqliteConnection, venue: &Venue) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO venues \
             (id, name, city, region, state, venue_type, capacity, \
              website, phone, email, address, booking_contact, \
              genres, status, source, first_seen, last_seen) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
    )
    .bind(venue.id.as_str())
    .bind(&venue.name)
    .bind(&venue.city)
    .bind(&venue.region)
    .bind(&venue.state)
    .bind(&venue.venue_type)
    .bind(venue.capacity.map(i64::from))
    .bind(&venue.contact.website)
    .bind(&venue.contact.phone)
    .bind(&venue.contact.email)
    .bind(&venue.contact.address)
    .bind(&venue.contact.booking_contact)
    .bind(to_json("genres", &venue.genres)?)
    .bind(venue.status.as_str())
    .bind(&venue.source)
    .bind(venue.first_seen)
    .bind(venue.last_seen)
    .execute(conn)
    .await?;
    Ok(())
}

async fn update_venue_row(conn: &mut SqliteConnection, venue: &Venue) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE venues SET \
             region          = ?2, \
             venue_type      = ?3, \
             capacity        = ?4, \
             website         = ?5, \
             phone           = ?6, \
             email           = ?7, \
             address         = ?8, \
             booking_contact = ?9, \
             genres          = ?10, \
             status          = ?11, \
             source          = ?12, \
             last_seen       = ?13, \
             updated_at      = CURRENT_TIMESTAMP \
         WHERE id = ?1",
    )
    .bind(venue.id.as_str())
    .bind(&venue.region)
    .bind(&venue.venue_type)
    .bind(venue.capacity.map(i64::from))
    .bind(&venue.contact.website)
    .bind(&venue.contact.phone)
    .bind(&venue.contact.email)
    .bind(&venue.contact.address)
    .bind(&venue.contact.booking_contact)
    .bind(to_json("genres", &venue.genres)?)
    .bind(venue.status.as_str())
    .bind(&venue.source)
    .bind(venue.last_seen)
    .execute(conn)
    .await?;
    Ok(())
}

async fn set_status(conn: &mut SqliteConnection, venue: &Venue) -> Result<(), DbError> {
    sqlx::query("UPDATE venues SET status = ?2, updated_at = CURRENT_TIMESTAMP WHERE id = ?1")
        .bind(venue.id.as_str())
        .bind(venue.status.as_str())
        .execute(conn)
        .await?;
    Ok(())
}
