//! Quad-tree index behavior beyond the in-crate unit tests: randomized
//! equivalence against the linear scan and priority resolution at scale.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use dropkit::{Point, Rect, SpatialIndex, ZoneId};

use crate::helpers::zone;

const VIEWPORT: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1000.0,
    height: 1000.0,
};

#[test]
fn index_matches_linear_scan_on_random_layouts() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for round in 0..5 {
        let zone_count = rng.gen_range(1..=200);
        let zones: Vec<_> = (0..zone_count)
            .map(|i| {
                let x = rng.gen_range(-50.0..950.0);
                let y = rng.gen_range(-50.0..950.0);
                let w = rng.gen_range(1.0..300.0);
                let h = rng.gen_range(1.0..300.0);
                let accepts: &[&str] = if rng.gen_bool(0.3) {
                    &["image"]
                } else {
                    &["card"]
                };
                let priority = rng.gen_range(-5..=5);
                zone(i, &format!("zone-{i}"), accepts, priority, Rect::new(x, y, w, h))
            })
            .collect();

        let index = SpatialIndex::from_zones(VIEWPORT, zones);

        for _ in 0..1000 {
            let p = Point::new(rng.gen_range(-100.0..1100.0), rng.gen_range(-100.0..1100.0));
            let indexed = index.hit_test(p, "card").map(|z| z.id);
            let linear = index.linear_hit_test(p, "card").map(|z| z.id);
            assert_eq!(
                indexed, linear,
                "divergence at {p:?} in round {round} with {zone_count} zones"
            );
        }
    }
}

#[test]
fn higher_priority_wins_among_overlapping_zones() {
    let zones = vec![
        zone(0, "low", &["card"], 5, Rect::new(0.0, 0.0, 400.0, 400.0)),
        zone(1, "high", &["card"], 10, Rect::new(0.0, 0.0, 400.0, 400.0)),
    ];
    let index = SpatialIndex::from_zones(VIEWPORT, zones);

    let hit = index.hit_test(Point::new(200.0, 200.0), "card").unwrap();
    assert_eq!(hit.name, "high");
    assert_eq!(hit.priority, 10);
}

#[test]
fn candidates_are_sorted_and_deduplicated() {
    // Many overlapping zones force node splits, which duplicate zone
    // entries across children.
    let zones: Vec<_> = (0..12)
        .map(|i| {
            zone(
                i,
                &format!("stack-{i}"),
                &["card"],
                (i % 3) as i32,
                Rect::new(100.0, 100.0, 500.0, 500.0),
            )
        })
        .collect();
    let index = SpatialIndex::from_zones(VIEWPORT, zones);

    let candidates = index.candidates(Point::new(300.0, 300.0));
    assert_eq!(candidates.len(), 12);

    let ids: Vec<ZoneId> = candidates.iter().map(|z| z.id).collect();
    let mut deduped = ids.clone();
    deduped.dedup();
    assert_eq!(ids, deduped);

    for pair in candidates.windows(2) {
        assert!(
            pair[0].priority > pair[1].priority
                || (pair[0].priority == pair[1].priority && pair[0].id < pair[1].id),
            "candidates out of order: {:?} before {:?}",
            (pair[0].priority, pair[0].id),
            (pair[1].priority, pair[1].id),
        );
    }
}

#[test]
fn zone_outside_viewport_is_still_hittable() {
    let zones = vec![zone(
        0,
        "offscreen",
        &["card"],
        0,
        Rect::new(1200.0, 1200.0, 100.0, 100.0),
    )];
    let index = SpatialIndex::from_zones(VIEWPORT, zones);

    let hit = index.hit_test(Point::new(1250.0, 1250.0), "card");
    assert!(hit.is_some());
}

#[test]
fn rebuild_replaces_prior_contents() {
    let mut index = SpatialIndex::from_zones(
        VIEWPORT,
        vec![zone(0, "old", &["card"], 0, Rect::new(0.0, 0.0, 100.0, 100.0))],
    );
    assert!(index.hit_test(Point::new(50.0, 50.0), "card").is_some());

    index.rebuild(
        VIEWPORT,
        vec![zone(1, "new", &["card"], 0, Rect::new(500.0, 500.0, 100.0, 100.0))],
    );
    assert!(index.hit_test(Point::new(50.0, 50.0), "card").is_none());
    assert_eq!(
        index.hit_test(Point::new(550.0, 550.0), "card").unwrap().name,
        "new"
    );
    assert_eq!(index.len(), 1);
}
