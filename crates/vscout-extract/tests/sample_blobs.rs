//! Extraction over realistic multi-line result blobs, through the trait object.

use vscout_core::{parse_scout_config, VenueId};
use vscout_extract::{HeuristicExtractor, QueryHint, ResultExtractor};

const CONFIG: &str = r"
regions:
  - name: Hudson Valley
    priority: 1
    cities: [Kingston, Woodstock]
alerts:
  seeking_artists_keywords: [seeking local musicians, booking live music]
  fee_mention_keywords: [guarantee]
";

const KINGSTON_BLOB: &str = "
BSP Kingston - Kingston, NY - Live music venue featuring indie and alternative acts.
Keegan Ales - Kingston, NY - Brewery with live music on weekends.
The Anchor - Kingston, New York - Bar and music venue, seeking local musicians.
Stockade Tavern - Kingston - Historic tavern with occasional live music.
Read more reviews on our partner site
";

fn extractor() -> Box<dyn ResultExtractor> {
    Box::new(HeuristicExtractor::from_config(
        &parse_scout_config(CONFIG).expect("config parses"),
    ))
}

#[test]
fn extracts_every_venue_line_and_the_alert() {
    let ex = extractor();
    let hint = QueryHint {
        query: "Kingston NY live music venues".to_string(),
        city: Some("Kingston".to_string()),
        region: Some("Hudson Valley".to_string()),
    };
    let extraction = ex.extract(KINGSTON_BLOB, &hint);
    assert_eq!(extraction.alert_hits, vec!["seeking local musicians"]);

    let drafts: Vec<_> = extraction.drafts.collect();
    let names: Vec<&str> = drafts.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["BSP Kingston", "Keegan Ales", "The Anchor", "Stockade Tavern"]
    );
    assert!(drafts
        .iter()
        .all(|d| d.city.as_deref() == Some("Kingston") && d.state.as_deref() == Some("NY")));
    assert_eq!(drafts[1].venue_type.as_deref(), Some("brewery"));
}

#[test]
fn spellings_that_differ_only_in_case_share_an_id() {
    let ex = extractor();
    let hint = QueryHint::default();
    let text = "The Falcon - Marlboro, NY\nthe falcon - MARLBORO, NY";
    let drafts: Vec<_> = ex.extract(text, &hint).drafts.collect();
    assert_eq!(drafts.len(), 2);
    let ids: Vec<VenueId> = drafts
        .iter()
        .map(|d| d.venue_id().expect("named draft"))
        .collect();
    assert_eq!(ids[0], ids[1]);
    assert_eq!(ids[0], VenueId::derive(" the falcon ", "marlboro"));
}

#[test]
fn empty_blob_yields_nothing() {
    let ex = extractor();
    let hint = QueryHint::default();
    let extraction = ex.extract("", &hint);
    assert!(extraction.alert_hits.is_empty());
    assert_eq!(extraction.drafts.count(), 0);
}
