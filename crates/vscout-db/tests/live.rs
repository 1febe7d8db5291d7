//! Live integration tests for vscout-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated SQLite database created by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/vscout-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use std::collections::BTreeSet;

use chrono::{NaiveDate, TimeZone, Utc};
use sqlx::SqlitePool;
use vscout_core::{
    ExcludedVenue, ExclusionReason, HistoryFilter, Opportunity, OpportunityType,
    SearchHistoryEntry, VenueDraft, VenueId, VenueStatus,
};
use vscout_db::{
    append_search_history, count_venues, exclude_venue, get_venue, insert_opportunity,
    is_excluded, link_search_result_venue, list_active_venues, list_excluded_venues,
    list_opportunities, list_search_history, list_venues, ping, record_search_result,
    region_query_counts, request_venue_status, run_migrations, sync_config_exclusions,
    unexclude_venue, upsert_venue, DbError, NewSearchResult,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn draft(name: &str, city: &str) -> VenueDraft {
    VenueDraft {
        name: name.to_string(),
        city: Some(city.to_string()),
        region: Some("Hudson Valley".to_string()),
        state: Some("NY".to_string()),
        source: "web_search".to_string(),
        ..VenueDraft::default()
    }
}

fn genres(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn exclusion(name: &str, city: &str) -> ExcludedVenue {
    ExcludedVenue {
        name: name.to_string(),
        city: city.to_string(),
        reason: ExclusionReason::BadExperience,
        date_excluded: None,
        notes: Some("never paid the door".to_string()),
    }
}

fn opportunity(venue_id: &VenueId, query: &str, date: NaiveDate) -> Opportunity {
    Opportunity {
        venue_id: venue_id.clone(),
        opportunity_type: OpportunityType::SeekingArtists,
        matched_keywords: genres(&["seeking musicians"]),
        suitable_acts: vec!["blues-duo".to_string()],
        description: "Now seeking musicians for weekend slots".to_string(),
        source_query: query.to_string(),
        detected_date: date,
    }
}

// ---------------------------------------------------------------------------
// Pool / migrations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn migrations_already_applied_report_zero(pool: SqlitePool) {
    ping(&pool).await.expect("ping");
    assert_eq!(run_migrations(&pool).await.expect("migrate"), 0);
}

// ---------------------------------------------------------------------------
// Venue registry
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_creates_unverified_venue(pool: SqlitePool) {
    let (venue, created) = upsert_venue(&pool, &draft("Keegan Ales", "Kingston"), day(1))
        .await
        .expect("upsert");

    assert!(created);
    assert_eq!(venue.status, VenueStatus::Unverified);
    assert_eq!((venue.first_seen, venue.last_seen), (day(1), day(1)));

    let stored = get_venue(&pool, &venue.id).await.expect("get").expect("row");
    assert_eq!(stored, venue);
}

#[sqlx::test(migrations = "../../migrations")]
async fn equivalent_spellings_merge_into_one_venue(pool: SqlitePool) {
    let mut first = draft(" The Falcon ", "Marlboro");
    first.genres = genres(&["jazz"]);
    first.capacity = Some(200);
    let (a, created_a) = upsert_venue(&pool, &first, day(1)).await.unwrap();

    let mut second = draft("the falcon", "MARLBORO");
    second.genres = genres(&["blues"]);
    second.capacity = Some(999);
    second.venue_type = Some("bar".to_string());
    let (b, created_b) = upsert_venue(&pool, &second, day(4)).await.unwrap();

    assert!(created_a);
    assert!(!created_b);
    assert_eq!(a.id, b.id);
    assert_eq!(count_venues(&pool).await.unwrap(), 1);

    let stored = get_venue(&pool, &a.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "The Falcon");
    assert_eq!(stored.genres, genres(&["blues", "jazz"]));
    assert_eq!(stored.capacity, Some(200));
    assert_eq!(stored.venue_type.as_deref(), Some("bar"));
    assert_eq!((stored.first_seen, stored.last_seen), (day(1), day(4)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn active_venue_is_not_demoted(pool: SqlitePool) {
    let mut opening = draft("Hudson Hall Annex", "Kingston");
    opening.status = Some(VenueStatus::Active);
    let (venue, _) = upsert_venue(&pool, &opening, day(1)).await.unwrap();
    assert_eq!(venue.status, VenueStatus::Active);

    let mut plain = draft("Hudson Hall Annex", "Kingston");
    plain.status = Some(VenueStatus::Unverified);
    let (again, _) = upsert_venue(&pool, &plain, day(2)).await.unwrap();
    assert_eq!(again.status, VenueStatus::Active);
}

#[sqlx::test(migrations = "../../migrations")]
async fn closed_venue_stays_closed(pool: SqlitePool) {
    upsert_venue(&pool, &draft("Old Dutch Inn", "Kingston"), day(1))
        .await
        .unwrap();
    let mut closing = draft("Old Dutch Inn", "Kingston");
    closing.status = Some(VenueStatus::Closed);
    upsert_venue(&pool, &closing, day(2)).await.unwrap();

    let mut reopening = draft("Old Dutch Inn", "Kingston");
    reopening.status = Some(VenueStatus::Active);
    let (venue, _) = upsert_venue(&pool, &reopening, day(3)).await.unwrap();
    assert_eq!(venue.status, VenueStatus::Closed);
}

#[sqlx::test(migrations = "../../migrations")]
async fn verify_promotes_and_close_is_final(pool: SqlitePool) {
    let (venue, _) = upsert_venue(&pool, &draft("Tubby's", "Kingston"), day(1))
        .await
        .unwrap();
    assert_eq!(venue.status, VenueStatus::Unverified);

    let verified = request_venue_status(&pool, &venue.id, VenueStatus::Active)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(verified.status, VenueStatus::Active);
    assert_eq!(list_active_venues(&pool).await.unwrap().len(), 1);

    request_venue_status(&pool, &venue.id, VenueStatus::Closed)
        .await
        .unwrap();
    let reopened = request_venue_status(&pool, &venue.id, VenueStatus::Active)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reopened.status, VenueStatus::Closed);
    let stored = get_venue(&pool, &venue.id).await.unwrap().unwrap();
    assert_eq!(stored.status, VenueStatus::Closed);
}

#[sqlx::test(migrations = "../../migrations")]
async fn verify_leaves_excluded_venue_alone(pool: SqlitePool) {
    let (venue, _) = upsert_venue(&pool, &draft("The Anchor", "Kingston"), day(1))
        .await
        .unwrap();
    exclude_venue(&pool, &exclusion("The Anchor", "Kingston"), day(2))
        .await
        .unwrap();

    let after = request_venue_status(&pool, &venue.id, VenueStatus::Active)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, VenueStatus::Excluded);
}

#[sqlx::test(migrations = "../../migrations")]
async fn status_request_for_unknown_venue_is_none(pool: SqlitePool) {
    let id = VenueId::derive("Nowhere Lounge", "Kingston");
    assert!(request_venue_status(&pool, &id, VenueStatus::Active)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn zero_capacity_draft_is_rejected_without_writing(pool: SqlitePool) {
    let mut d = draft("Tubby's", "Kingston");
    d.capacity = Some(0);
    let err = upsert_venue(&pool, &d, day(1)).await.unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
    assert_eq!(count_venues(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn nameless_draft_is_rejected_without_writing(pool: SqlitePool) {
    let err = upsert_venue(&pool, &draft("   ", "Kingston"), day(1))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Validation(_)));
    assert_eq!(count_venues(&pool).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn missing_city_is_recorded_as_unknown(pool: SqlitePool) {
    let mut d = draft("Rough Draft Bar", "x");
    d.city = None;
    let (venue, _) = upsert_venue(&pool, &d, day(1)).await.unwrap();
    assert_eq!(venue.city, "Unknown");
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_active_venues_orders_by_region_city_name(pool: SqlitePool) {
    for (name, city, region) in [
        ("Zeppelin Hall", "Kingston", "Hudson Valley"),
        ("Bearsville Theater", "Woodstock", "Hudson Valley"),
        ("Keegan Ales", "Kingston", "Hudson Valley"),
        ("The Hollow", "Albany", "Capital District"),
        ("Quiet Place", "Beacon", "Hudson Valley"),
    ] {
        let mut d = draft(name, city);
        d.region = Some(region.to_string());
        if name != "Quiet Place" {
            d.status = Some(VenueStatus::Active);
        }
        upsert_venue(&pool, &d, day(1)).await.unwrap();
    }

    let names: Vec<String> = list_active_venues(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.name)
        .collect();
    assert_eq!(
        names,
        vec![
            "The Hollow",
            "Keegan Ales",
            "Zeppelin Hall",
            "Bearsville Theater"
        ]
    );
    assert_eq!(list_venues(&pool, None).await.unwrap().len(), 5);
}

// ---------------------------------------------------------------------------
// Exclusion list
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn excluded_pair_upserts_as_excluded(pool: SqlitePool) {
    exclude_venue(&pool, &exclusion("The Anchor", "Kingston"), day(1))
        .await
        .unwrap();

    let mut hopeful = draft("THE ANCHOR", " kingston ");
    hopeful.status = Some(VenueStatus::Active);
    hopeful.genres = genres(&["rock"]);
    let (venue, created) = upsert_venue(&pool, &hopeful, day(2)).await.unwrap();

    assert!(created);
    assert_eq!(venue.status, VenueStatus::Excluded);
    assert_eq!((venue.first_seen, venue.last_seen), (day(2), day(2)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn exclusion_is_sticky_for_existing_venue(pool: SqlitePool) {
    let (venue, _) = upsert_venue(&pool, &draft("The Anchor", "Kingston"), day(1))
        .await
        .unwrap();
    exclude_venue(&pool, &exclusion("The Anchor", "Kingston"), day(2))
        .await
        .unwrap();
    assert_eq!(
        get_venue(&pool, &venue.id).await.unwrap().unwrap().status,
        VenueStatus::Excluded
    );

    let mut positive = draft("The Anchor", "Kingston");
    positive.status = Some(VenueStatus::Active);
    positive.capacity = Some(120);
    let (after, created) = upsert_venue(&pool, &positive, day(9)).await.unwrap();

    assert!(!created);
    assert_eq!(after.status, VenueStatus::Excluded);
    assert_eq!(after.last_seen, day(1));
    assert_eq!(after.capacity, None);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unexclude_reinstates_active(pool: SqlitePool) {
    let (venue, _) = upsert_venue(&pool, &draft("The Anchor", "Kingston"), day(1))
        .await
        .unwrap();
    exclude_venue(&pool, &exclusion("The Anchor", "Kingston"), day(2))
        .await
        .unwrap();

    assert!(unexclude_venue(&pool, "the anchor", "KINGSTON").await.unwrap());
    assert!(!is_excluded(&pool, "The Anchor", "Kingston").await.unwrap());
    assert_eq!(
        get_venue(&pool, &venue.id).await.unwrap().unwrap().status,
        VenueStatus::Active
    );
    assert!(!unexclude_venue(&pool, "The Anchor", "Kingston").await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn exclude_is_idempotent_and_listed_newest_first(pool: SqlitePool) {
    assert!(exclude_venue(&pool, &exclusion("The Anchor", "Kingston"), day(1))
        .await
        .unwrap());
    assert!(!exclude_venue(&pool, &exclusion("the anchor", "Kingston"), day(5))
        .await
        .unwrap());
    exclude_venue(&pool, &exclusion("Stockade Tavern", "Kingston"), day(3))
        .await
        .unwrap();

    let listed = list_excluded_venues(&pool).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Stockade Tavern", "The Anchor"]);
    assert_eq!(listed[1].date_excluded, Some(day(1)));
    assert_eq!(listed[1].reason, ExclusionReason::BadExperience);
}

#[sqlx::test(migrations = "../../migrations")]
async fn config_exclusions_sync_once(pool: SqlitePool) {
    let seeds = vec![
        exclusion("Closed Corner Tavern", "Kingston"),
        exclusion("The Anchor", "Kingston"),
    ];
    assert_eq!(sync_config_exclusions(&pool, &seeds, day(1)).await.unwrap(), 2);
    assert_eq!(sync_config_exclusions(&pool, &seeds, day(2)).await.unwrap(), 0);
    assert_eq!(list_excluded_venues(&pool).await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn identical_search_result_is_recorded_once(pool: SqlitePool) {
    let result = NewSearchResult {
        query: "Kingston NY live music venues".to_string(),
        region: Some("Hudson Valley".to_string()),
        city: Some("Kingston".to_string()),
        result_text: "Keegan Ales - Kingston, NY".to_string(),
        searched_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    };

    let (id, new) = record_search_result(&pool, &result).await.unwrap();
    let (again, new_again) = record_search_result(&pool, &result).await.unwrap();
    assert!(new);
    assert!(!new_again);
    assert_eq!(id, again);

    let (venue, _) = upsert_venue(&pool, &draft("Keegan Ales", "Kingston"), day(1))
        .await
        .unwrap();
    link_search_result_venue(&pool, id, &venue.id).await.unwrap();
    link_search_result_venue(&pool, id, &venue.id).await.unwrap();

    let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM search_result_venues")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(links, 1);
}

// ---------------------------------------------------------------------------
// Opportunities
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn opportunity_natural_key_prevents_duplicates(pool: SqlitePool) {
    let (venue, _) = upsert_venue(&pool, &draft("The Anchor", "Kingston"), day(1))
        .await
        .unwrap();
    let opp = opportunity(&venue.id, "Kingston NY venues looking for musicians", day(1));

    assert!(insert_opportunity(&pool, &opp).await.unwrap());
    assert!(!insert_opportunity(&pool, &opp).await.unwrap());

    let other_query = opportunity(&venue.id, "Hudson Valley NY booking live music", day(1));
    assert!(insert_opportunity(&pool, &other_query).await.unwrap());

    let next_day = opportunity(&venue.id, "Kingston NY venues looking for musicians", day(2));
    assert!(insert_opportunity(&pool, &next_day).await.unwrap());

    let all = list_opportunities(&pool, None).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].detected_date, day(2));
    assert_eq!(all[0].matched_keywords, genres(&["seeking musicians"]));
    assert_eq!(all[0].suitable_acts, vec!["blues-duo"]);

    assert_eq!(list_opportunities(&pool, Some(day(2))).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn opportunity_requires_known_venue(pool: SqlitePool) {
    let opp = opportunity(&VenueId::derive("Ghost", "Nowhere"), "q", day(1));
    assert!(insert_opportunity(&pool, &opp).await.is_err());
}

// ---------------------------------------------------------------------------
// Search history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn history_filters_by_inclusive_range_and_region(pool: SqlitePool) {
    let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2026, 3, d, h, 0, 0).unwrap();
    for (query, region, when) in [
        ("Kingston NY live music venues", "Hudson Valley", at(1, 9)),
        ("Beacon NY live music venues", "Hudson Valley", at(2, 9)),
        ("Albany NY live music venues", "Capital District", at(2, 10)),
        ("Kingston NY jazz clubs", "Hudson Valley", at(3, 9)),
    ] {
        append_search_history(
            &pool,
            &SearchHistoryEntry {
                query_text: query.to_string(),
                region: Some(region.to_string()),
                executed_at: when,
                result_count: 4,
                new_venues: 1,
                opportunities: 0,
            },
        )
        .await
        .unwrap();
    }

    let all = list_search_history(&pool, &HistoryFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].query_text, "Kingston NY live music venues");
    assert_eq!(all[0].result_count, 4);

    let window = HistoryFilter {
        from: Some(at(2, 9)),
        to: Some(at(3, 9)),
        region: None,
    };
    assert_eq!(list_search_history(&pool, &window).await.unwrap().len(), 3);

    let hudson = HistoryFilter {
        region: Some("Hudson Valley".to_string()),
        ..window.clone()
    };
    let entries = list_search_history(&pool, &hudson).await.unwrap();
    let queries: Vec<&str> = entries.iter().map(|e| e.query_text.as_str()).collect();
    assert_eq!(
        queries,
        vec!["Beacon NY live music venues", "Kingston NY jazz clubs"]
    );

    let counts = region_query_counts(&pool, &window).await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].region.as_deref(), Some("Capital District"));
    assert_eq!(counts[0].queries, 1);
    assert_eq!(counts[1].queries, 2);
}
