use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder used for textual fields the provider leaves out.
pub const NOT_AVAILABLE: &str = "N/A";

/// Raw country object as returned by the REST Countries v3.1 API.
///
/// Every field except `name` may be missing. The lookup endpoint returns the
/// full object, the bulk endpoint only the fields requested via `fields=`,
/// so the same type serves both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: RawName,
    pub capital: Option<Vec<String>>,
    pub region: Option<String>,
    pub subregion: Option<String>,
    pub area: Option<f64>,
    pub languages: Option<BTreeMap<String, String>>,
    pub currencies: Option<BTreeMap<String, Currency>>,
    pub flags: Option<Flags>,
    pub maps: Option<Maps>,
    pub population: Option<u64>,
    pub latlng: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    #[serde(default)]
    pub name: String,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flags {
    pub png: Option<String>,
    pub svg: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Maps {
    #[serde(rename = "googleMaps")]
    pub google_maps: Option<String>,
    #[serde(rename = "openStreetMaps")]
    pub open_street_maps: Option<String>,
}

/// A (latitude, longitude) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// The provider encodes positions as `[lat, lon]`; anything else is treated as absent.
    pub fn from_latlng(latlng: &[f64]) -> Option<Self> {
        match latlng {
            [lat, lon] => Some(Self { lat: *lat, lon: *lon }),
            _ => None,
        }
    }
}

/// Display-ready country record with every optional field resolved to its default.
///
/// | field        | default when missing |
/// |--------------|----------------------|
/// | `capital`    | `["N/A"]`            |
/// | `region`     | `"N/A"`              |
/// | `subregion`  | `"N/A"`              |
/// | `area`       | `0`                  |
/// | `languages`  | empty                |
/// | `currencies` | empty                |
/// | `flag_url`   | `""`                 |
/// | `map_url`    | `""` (no map link)   |
/// | `population` | `0`                  |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub common_name: String,
    pub official_name: String,
    pub capital: Vec<String>,
    pub region: String,
    pub subregion: String,
    pub area: f64,
    pub languages: BTreeMap<String, String>,
    pub currencies: BTreeMap<String, Currency>,
    pub flag_url: String,
    pub map_url: String,
    pub population: u64,
    pub coordinates: Option<Coordinates>,
}

impl From<RawCountry> for CountryRecord {
    fn from(raw: RawCountry) -> Self {
        let capital = match raw.capital {
            Some(c) if !c.is_empty() => c,
            _ => vec![NOT_AVAILABLE.to_string()],
        };
        Self {
            common_name: raw.name.common,
            official_name: raw.name.official,
            capital,
            region: raw.region.unwrap_or_else(|| NOT_AVAILABLE.into()),
            subregion: raw.subregion.unwrap_or_else(|| NOT_AVAILABLE.into()),
            area: non_negative(raw.area),
            languages: raw.languages.unwrap_or_default(),
            currencies: raw.currencies.unwrap_or_default(),
            flag_url: raw.flags.and_then(|f| f.png).unwrap_or_default(),
            map_url: raw.maps.and_then(|m| m.google_maps).unwrap_or_default(),
            population: raw.population.unwrap_or(0),
            coordinates: raw.latlng.as_deref().and_then(Coordinates::from_latlng),
        }
    }
}

/// One entry of the bulk dataset used by the continent explorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionMember {
    pub common_name: String,
    /// `None` when the provider omits the region or sends an empty string.
    pub region: Option<String>,
    pub area: f64,
    pub population: u64,
    pub coordinates: Option<Coordinates>,
}

impl From<RawCountry> for RegionMember {
    fn from(raw: RawCountry) -> Self {
        Self {
            common_name: raw.name.common,
            region: raw.region.filter(|r| !r.is_empty()),
            area: non_negative(raw.area),
            population: raw.population.unwrap_or(0),
            coordinates: raw.latlng.as_deref().and_then(Coordinates::from_latlng),
        }
    }
}

fn non_negative(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() && x > 0.0 => x,
        _ => 0.0,
    }
}

/// Result of summarizing one region of the bulk dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentSummary {
    pub region: String,
    pub member_count: usize,
    pub total_population: u64,
    /// `None` when the region has no members; displayed as "Unknown".
    pub largest_member: Option<RegionMember>,
    pub member_coordinates: Vec<Coordinates>,
}

impl ContinentSummary {
    pub fn largest_member_name(&self) -> &str {
        self.largest_member
            .as_ref()
            .map(|m| m.common_name.as_str())
            .unwrap_or("Unknown")
    }
}

/// Where a population figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PopulationSource {
    /// Extracted from a language-model reply.
    ModelEstimate,
    /// The provider's own (census) figure.
    ProviderFallback,
    /// Neither source produced a usable number.
    Unavailable,
}

/// A population figure together with its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationEstimate {
    /// Always strictly positive when present.
    pub value: Option<u64>,
    pub source: PopulationSource,
}

impl PopulationEstimate {
    pub fn model(value: u64) -> Self {
        if value == 0 {
            return Self::unavailable();
        }
        Self {
            value: Some(value),
            source: PopulationSource::ModelEstimate,
        }
    }

    /// Provider figure; zero means the provider has no data.
    pub fn provider(population: u64) -> Self {
        if population == 0 {
            return Self::unavailable();
        }
        Self {
            value: Some(population),
            source: PopulationSource::ProviderFallback,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            value: None,
            source: PopulationSource::Unavailable,
        }
    }

    pub fn is_available(&self) -> bool {
        self.value.is_some()
    }

    /// Apply the fallback policy: keep a model estimate, otherwise use the provider figure.
    pub fn or_provider(self, population: u64) -> Self {
        if self.is_available() {
            self
        } else {
            Self::provider(population)
        }
    }

    /// Value to use in sums; missing data counts as zero.
    pub fn value_or_zero(&self) -> u64 {
        self.value.unwrap_or(0)
    }
}
