//! Offline tests for vscout-db pool configuration and row decoding.
//! These tests do not require a database connection.

use std::path::PathBuf;

use chrono::NaiveDate;
use vscout_core::{AppConfig, Environment, Venue, VenueStatus};
use vscout_db::{content_hash, DbError, PoolConfig, VenueRow};

fn row(status: &str, genres: &str, capacity: Option<i64>) -> VenueRow {
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    VenueRow {
        id: "0123456789ab".to_string(),
        name: "Keegan Ales".to_string(),
        city: "Kingston".to_string(),
        region: Some("Hudson Valley".to_string()),
        state: "NY".to_string(),
        venue_type: Some("brewery".to_string()),
        capacity,
        website: None,
        phone: Some("845-555-0100".to_string()),
        email: None,
        address: None,
        booking_contact: None,
        genres: genres.to_string(),
        status: status.to_string(),
        source: Some("web_search".to_string()),
        first_seen: day,
        last_seen: day,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        config_path: PathBuf::from("./config/scout.yaml"),
        data_dir: PathBuf::from("./data"),
        db_max_connections: 4,
        db_acquire_timeout_secs: 9,
        max_queries: 20,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 4);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn venue_row_decodes_into_domain_venue() {
    let venue = Venue::try_from(row("active", r#"["blues","rock"]"#, Some(250))).unwrap();
    assert_eq!(venue.status, VenueStatus::Active);
    assert_eq!(venue.capacity, Some(250));
    assert!(venue.genres.contains("blues"));
    assert_eq!(venue.contact.phone.as_deref(), Some("845-555-0100"));
    assert_eq!(venue.id.as_str(), "0123456789ab");
}

#[test]
fn venue_row_with_unknown_status_is_rejected() {
    let err = Venue::try_from(row("open", "[]", None)).unwrap_err();
    assert!(matches!(err, DbError::InvalidColumn { column: "status", .. }));
}

#[test]
fn venue_row_with_bad_genre_json_is_rejected() {
    let err = Venue::try_from(row("active", "blues,rock", None)).unwrap_err();
    assert!(matches!(err, DbError::Serialization { column: "genres", .. }));
}

#[test]
fn venue_row_with_negative_capacity_is_rejected() {
    let err = Venue::try_from(row("active", "[]", Some(-5))).unwrap_err();
    assert!(matches!(err, DbError::InvalidColumn { column: "capacity", .. }));
}

#[test]
fn content_hash_depends_on_query() {
    assert_ne!(
        content_hash("Kingston NY live music", "same text"),
        content_hash("Beacon NY live music", "same text")
    );
}
