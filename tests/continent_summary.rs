use country_facts::continent::{best_available, list_regions, members_of, summarize, summarize_with};
use country_facts::estimate::{Completion, ModelEstimator, PopulationEstimator};
use country_facts::models::{Coordinates, PopulationEstimate, RegionMember};
use std::collections::HashMap;

fn member(name: &str, region: &str, area: f64, population: u64) -> RegionMember {
    RegionMember {
        common_name: name.into(),
        region: if region.is_empty() { None } else { Some(region.into()) },
        area,
        population,
        coordinates: None,
    }
}

/// Fixed answers per country; anything else is unavailable.
struct TableEstimator(HashMap<String, u64>);

impl PopulationEstimator for TableEstimator {
    fn estimate_2025_population(&self, country: &str) -> PopulationEstimate {
        match self.0.get(country) {
            Some(n) => PopulationEstimate::model(*n),
            None => PopulationEstimate::unavailable(),
        }
    }
}

#[test]
fn regions_are_distinct_sorted_and_non_empty() {
    let data = vec![
        member("Peru", "Americas", 1.0, 1),
        member("Chad", "Africa", 1.0, 1),
        member("Nowhere", "", 1.0, 1),
        member("Chile", "Americas", 1.0, 1),
        member("Japan", "Asia", 1.0, 1),
    ];
    assert_eq!(list_regions(&data), vec!["Africa", "Americas", "Asia"]);
}

#[test]
fn europe_tie_picks_first_largest_member() {
    let data = vec![
        member("Small", "Europe", 10.0, 1),
        member("BigFirst", "Europe", 50.0, 2),
        member("BigSecond", "Europe", 50.0, 3),
    ];
    let s = summarize("Europe", &data);
    assert_eq!(s.total_population, 6);
    assert_eq!(s.member_count, 3);
    assert_eq!(s.largest_member_name(), "BigFirst");
}

#[test]
fn empty_region_yields_zero_and_unknown() {
    let data = vec![member("Chad", "Africa", 1_284_000.0, 17_000_000)];
    let s = summarize("Antarctic", &data);
    assert_eq!(s.total_population, 0);
    assert_eq!(s.member_count, 0);
    assert!(s.largest_member.is_none());
    assert_eq!(s.largest_member_name(), "Unknown");
    assert!(s.member_coordinates.is_empty());

    let empty = summarize("Europe", &[]);
    assert_eq!(empty.total_population, 0);
}

#[test]
fn region_match_is_exact() {
    let data = vec![
        member("A", "Europe", 1.0, 5),
        member("B", "europe", 1.0, 7),
        member("C", "Europe ", 1.0, 11),
    ];
    assert_eq!(summarize("Europe", &data).total_population, 5);
    assert_eq!(members_of("Europe", &data).len(), 1);
}

#[test]
fn changing_one_population_moves_total_by_delta() {
    let mut data = vec![
        member("A", "Asia", 3.0, 100),
        member("B", "Asia", 2.0, 250),
        member("C", "Asia", 1.0, 0),
        member("D", "Africa", 9.0, 999),
    ];
    let before = summarize("Asia", &data).total_population;
    assert_eq!(before, 350);
    data[1].population += 42;
    let after = summarize("Asia", &data).total_population;
    assert_eq!(after - before, 42);
}

#[test]
fn all_zero_areas_keep_first_member() {
    let data = vec![member("A", "Oceania", 0.0, 1), member("B", "Oceania", 0.0, 1)];
    assert_eq!(summarize("Oceania", &data).largest_member_name(), "A");
}

#[test]
fn members_without_coordinates_are_skipped() {
    let mut data = vec![
        member("A", "Europe", 1.0, 1),
        member("B", "Europe", 1.0, 1),
        member("C", "Europe", 1.0, 1),
    ];
    data[0].coordinates = Some(Coordinates { lat: 1.0, lon: 2.0 });
    data[2].coordinates = Some(Coordinates { lat: 3.0, lon: 4.0 });
    let s = summarize("Europe", &data);
    assert_eq!(
        s.member_coordinates,
        vec![
            Coordinates { lat: 1.0, lon: 2.0 },
            Coordinates { lat: 3.0, lon: 4.0 }
        ]
    );
}

#[test]
fn estimates_override_census_per_member() {
    let data = vec![
        member("A", "Europe", 1.0, 10),
        member("B", "Europe", 2.0, 20),
        member("C", "Europe", 3.0, 0),
    ];
    let est = TableEstimator(HashMap::from([("A".to_string(), 15u64)]));
    // A: estimate 15, B: census 20, C: nothing -> 0
    let s = summarize_with("Europe", &data, &est, 1);
    assert_eq!(s.total_population, 35);
    assert_eq!(s.largest_member_name(), "C");
}

#[test]
fn worker_count_does_not_change_the_result() {
    let data: Vec<RegionMember> = (0..23)
        .map(|i| member(&format!("M{i}"), "Asia", (i % 5) as f64, i as u64))
        .collect();
    let table: HashMap<String, u64> = (0..23)
        .filter(|i| i % 3 == 0)
        .map(|i| (format!("M{i}"), 1000 + i as u64))
        .collect();
    let est = TableEstimator(table);
    let sequential = summarize_with("Asia", &data, &est, 1);
    for workers in [2, 4, 7, 64] {
        assert_eq!(summarize_with("Asia", &data, &est, workers), sequential);
    }
}

#[test]
fn best_available_prefers_estimate_then_census_then_zero() {
    assert_eq!(best_available(PopulationEstimate::model(5), 9), 5);
    assert_eq!(best_available(PopulationEstimate::unavailable(), 9), 9);
    assert_eq!(best_available(PopulationEstimate::unavailable(), 0), 0);
}

/// A model that answers every prompt with an absurdly large figure.
struct HugeReply;

impl Completion for HugeReply {
    fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
        Ok("18,000,000,000,000,000,000".to_string())
    }
}

#[test]
fn huge_model_estimates_saturate_the_total() {
    let data = vec![
        member("A", "Europe", 1.0, 5),
        member("B", "Europe", 2.0, 7),
        member("C", "Europe", 3.0, 9),
    ];
    let est = ModelEstimator::new(HugeReply);
    let s = summarize_with("Europe", &data, &est, 1);
    assert_eq!(s.member_count, 3);
    assert_eq!(s.total_population, u64::MAX);
    assert_eq!(s.largest_member_name(), "C");

    let s = summarize_with("Europe", &data, &est, 3);
    assert_eq!(s.total_population, u64::MAX);
}
