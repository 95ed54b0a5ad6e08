use crate::api::CountrySource;
use crate::error::LookupError;
use crate::estimate::PopulationEstimator;
use crate::models::{CountryRecord, PopulationEstimate};
use serde::{Deserialize, Serialize};

/// A resolved country plus the population figure to display for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryLookup {
    pub record: CountryRecord,
    pub population: PopulationEstimate,
}

/// Look up one country by its exact name and normalize the first candidate.
///
/// ### Errors
/// - [`LookupError::EmptyName`] for a blank name (no request is made)
/// - [`LookupError::NotFound`] when the provider has no exact match
/// - [`LookupError::Connection`] / [`LookupError::Decode`] for transport or body problems
pub fn resolve<S>(source: &S, name: &str) -> Result<CountryRecord, LookupError>
where
    S: CountrySource + ?Sized,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(LookupError::EmptyName);
    }
    let candidates = source.lookup_by_name(name)?;
    let first = candidates
        .into_iter()
        .next()
        .ok_or_else(|| LookupError::NotFound {
            name: name.to_string(),
        })?;
    log::debug!("resolved {:?} to {:?}", name, first.name.common);
    Ok(CountryRecord::from(first))
}

/// Resolve a country and pick its best-available population.
///
/// Without an estimator the provider figure is used directly and no model is
/// contacted. With one, the model estimate wins when it yields a number.
pub fn lookup<S>(
    source: &S,
    name: &str,
    estimator: Option<&dyn PopulationEstimator>,
) -> Result<CountryLookup, LookupError>
where
    S: CountrySource + ?Sized,
{
    let record = resolve(source, name)?;
    let population = match estimator {
        Some(est) => est
            .estimate_2025_population(&record.common_name)
            .or_provider(record.population),
        None => PopulationEstimate::provider(record.population),
    };
    Ok(CountryLookup { record, population })
}
