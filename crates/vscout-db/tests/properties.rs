//! Property checks for the venue registry against a temporary SQLite file.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;
use proptest::test_runner::Config;
use vscout_core::{VenueDraft, VenueId, VenueStatus};
use vscout_db::{connect_pool, count_venues, get_venue, run_migrations, upsert_venue, PoolConfig};

const SPELLINGS: [(&str, &str); 6] = [
    ("The Falcon", "Marlboro"),
    ("the falcon", "MARLBORO"),
    ("  THE FALCON ", " marlboro"),
    ("Keegan Ales", "Kingston"),
    ("keegan ales", "kingston "),
    ("BSP Kingston", "Kingston"),
];

fn sighting() -> impl Strategy<Value = (usize, Option<VenueStatus>)> {
    (
        0..SPELLINGS.len(),
        proptest::option::of(prop::sample::select(vec![
            VenueStatus::Unverified,
            VenueStatus::Active,
            VenueStatus::Closed,
        ])),
    )
}

/// Upsert every sighting in order and return the stored venue count plus the
/// stored status per id.
fn run_sightings(
    sightings: &[(usize, Option<VenueStatus>)],
) -> (i64, BTreeMap<VenueId, VenueStatus>) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime");
    runtime.block_on(async {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}", dir.path().join("registry.db").display());
        let pool = connect_pool(&url, PoolConfig::default())
            .await
            .expect("connect");
        run_migrations(&pool).await.expect("migrate");

        let today = NaiveDate::from_ymd_opt(2026, 3, 1).expect("date");
        let mut ids = Vec::new();
        for (spelling, status) in sightings {
            let (name, city) = SPELLINGS[*spelling];
            let draft = VenueDraft {
                name: name.to_string(),
                city: Some(city.to_string()),
                status: *status,
                source: "web_search".to_string(),
                ..VenueDraft::default()
            };
            let (venue, _) = upsert_venue(&pool, &draft, today).await.expect("upsert");
            ids.push(venue.id);
        }

        let mut stored = BTreeMap::new();
        for id in ids {
            let venue = get_venue(&pool, &id).await.expect("read").expect("stored");
            stored.insert(id, venue.status);
        }
        let count = count_venues(&pool).await.expect("count");
        pool.close().await;
        (count, stored)
    })
}

proptest! {
    #![proptest_config(Config::with_cases(24))]

    #[test]
    fn registry_holds_one_record_per_identity(
        sightings in prop::collection::vec(sighting(), 1..12),
    ) {
        let (count, stored) = run_sightings(&sightings);

        let mut expected: BTreeMap<VenueId, VenueStatus> = BTreeMap::new();
        for (spelling, status) in &sightings {
            let (name, city) = SPELLINGS[*spelling];
            let current = expected
                .entry(VenueId::derive(name, city))
                .or_insert(VenueStatus::Unverified);
            if let Some(requested) = status {
                *current = current.transition(*requested);
            }
        }

        prop_assert_eq!(usize::try_from(count).unwrap(), expected.len());
        prop_assert_eq!(stored, expected);
    }
}
