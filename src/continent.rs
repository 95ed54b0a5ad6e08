use crate::api::CountrySource;
use crate::error::LookupError;
use crate::estimate::{PopulationEstimator, estimate_many};
use crate::models::{ContinentSummary, PopulationEstimate, RegionMember};
use std::collections::BTreeSet;

/// Fetch the bulk dataset and convert it into region members (provider order).
pub fn load_members<S>(source: &S) -> Result<Vec<RegionMember>, LookupError>
where
    S: CountrySource + ?Sized,
{
    let raw = source.fetch_all()?;
    log::debug!("bulk dataset: {} countries", raw.len());
    Ok(raw.into_iter().map(RegionMember::from).collect())
}

/// Distinct, non-empty region labels, sorted ascending.
pub fn list_regions(members: &[RegionMember]) -> Vec<String> {
    members
        .iter()
        .filter_map(|m| m.region.as_deref())
        .filter(|r| !r.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Members whose region equals `region` exactly, in dataset order.
pub fn members_of<'a>(region: &str, members: &'a [RegionMember]) -> Vec<&'a RegionMember> {
    members
        .iter()
        .filter(|m| m.region.as_deref() == Some(region))
        .collect()
}

/// Summarize a region using the provider's population figures.
pub fn summarize(region: &str, members: &[RegionMember]) -> ContinentSummary {
    let subset = members_of(region, members);
    let best: Vec<u64> = subset.iter().map(|m| m.population).collect();
    build_summary(region, &subset, &best)
}

/// Summarize a region, asking `estimator` for every member's 2025 population.
///
/// Each member counts with its model estimate when one is available and with
/// the provider figure otherwise. `workers` bounds how many estimates run at
/// once; `1` issues them strictly one after another.
pub fn summarize_with<E>(
    region: &str,
    members: &[RegionMember],
    estimator: &E,
    workers: usize,
) -> ContinentSummary
where
    E: PopulationEstimator + Sync + ?Sized,
{
    let subset = members_of(region, members);
    let names: Vec<String> = subset.iter().map(|m| m.common_name.clone()).collect();
    let estimates = estimate_many(&names, estimator, workers);
    let best: Vec<u64> = subset
        .iter()
        .zip(estimates)
        .map(|(m, est)| best_available(est, m.population))
        .collect();
    build_summary(region, &subset, &best)
}

/// Best-available population: the estimate if present, else the provider figure (0 when missing).
pub fn best_available(estimate: PopulationEstimate, provider_population: u64) -> u64 {
    estimate.or_provider(provider_population).value_or_zero()
}

fn build_summary(region: &str, subset: &[&RegionMember], best: &[u64]) -> ContinentSummary {
    // Model replies can be arbitrarily large; the total saturates instead of overflowing.
    let total_population = best.iter().fold(0u64, |acc, v| acc.saturating_add(*v));

    // Strict comparison keeps the first member on ties.
    let mut largest: Option<&RegionMember> = None;
    for m in subset {
        match largest {
            Some(cur) if m.area <= cur.area => {}
            _ => largest = Some(*m),
        }
    }

    let member_coordinates = subset.iter().filter_map(|m| m.coordinates).collect();

    ContinentSummary {
        region: region.to_string(),
        member_count: subset.len(),
        total_population,
        largest_member: largest.cloned(),
        member_coordinates,
    }
}
