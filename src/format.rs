//! Text helpers shared by the CLI and the GUI.
//!
//! These turn records into display strings; nothing here draws anything.

use crate::models::{ContinentSummary, CountryRecord, PopulationEstimate, PopulationSource};
use num_format::{Locale, ToFormattedString};

pub const SINGLE_LANGUAGE_NOTE: &str = "Only official languages are shown. Some speak many more.";
pub const POPULATION_NOT_AVAILABLE: &str = "population data not available";

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `en`, `us`, `en_US`, `de`, `de_DE`, `german`,
/// `fr`, `es`, `it`, `pt`, `nl`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'), // default
    }
}

/// Group digits, e.g. `67000000` -> `"67,000,000"` for `en`.
pub fn format_count(n: u64, locale_tag: &str) -> String {
    let (locale, _) = map_locale(locale_tag);
    n.to_formatted_string(locale)
}

/// Group the integer part and keep up to two decimals (trailing zeros trimmed).
pub fn format_decimal(v: f64, locale_tag: &str) -> String {
    let (locale, sep) = map_locale(locale_tag);
    if !v.is_finite() {
        return "NA".to_string();
    }
    let v = v.max(0.0);
    let s = format!("{:.2}", v);
    let (int_part, frac_part) = s.split_once('.').unwrap_or((s.as_str(), ""));
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        int_val.to_formatted_string(locale)
    } else {
        format!("{}{}{}", int_val.to_formatted_string(locale), sep, frac)
    }
}

/// Sentence describing a resolved population figure.
pub fn population_sentence(country: &str, population: &PopulationEstimate, locale_tag: &str) -> String {
    match (population.source, population.value) {
        (PopulationSource::ModelEstimate, Some(n)) => format!(
            "{}'s estimated 2025 population is {}.",
            country,
            format_count(n, locale_tag)
        ),
        (PopulationSource::ProviderFallback, Some(n)) => format!(
            "Based on last census, {}'s population is {}.",
            country,
            format_count(n, locale_tag)
        ),
        _ => POPULATION_NOT_AVAILABLE.to_string(),
    }
}

/// Display strings for one country.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryView {
    pub title: String,
    pub capital: String,
    pub region: String,
    pub subregion: String,
    pub area: String,
    /// Comma-separated official language names; empty when none are listed.
    pub languages: String,
    pub single_language_note: Option<&'static str>,
    pub currencies: String,
    /// `None` when the provider has no map link.
    pub map_link: Option<String>,
    pub flag_url: String,
    pub population: String,
}

impl CountryView {
    pub fn new(record: &CountryRecord, population: &PopulationEstimate, locale_tag: &str) -> Self {
        let languages: Vec<&str> = record.languages.values().map(String::as_str).collect();
        let currencies: Vec<&str> = record.currencies.values().map(|c| c.name.as_str()).collect();
        Self {
            title: format!("Information about {}", record.common_name),
            capital: record.capital.join(", "),
            region: record.region.clone(),
            subregion: record.subregion.clone(),
            area: format!("{} km²", format_decimal(record.area, locale_tag)),
            single_language_note: (languages.len() == 1).then_some(SINGLE_LANGUAGE_NOTE),
            languages: languages.join(", "),
            currencies: currencies.join(", "),
            map_link: (!record.map_url.is_empty()).then(|| record.map_url.clone()),
            flag_url: record.flag_url.clone(),
            population: population_sentence(&record.common_name, population, locale_tag),
        }
    }

    /// `label: value` lines in display order.
    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            format!("Capital: {}", self.capital),
            format!("Region: {}", self.region),
            format!("Subregion: {}", self.subregion),
            format!("Area: {}", self.area),
            format!("Languages: {}", self.languages),
        ];
        if let Some(note) = self.single_language_note {
            out.push(format!("Note: {}", note));
        }
        out.push(format!("Currency: {}", self.currencies));
        if let Some(link) = &self.map_link {
            out.push(format!("Map: {}", link));
        }
        if !self.flag_url.is_empty() {
            out.push(format!("Flag: {}", self.flag_url));
        }
        out.push(self.population.clone());
        out
    }
}

/// Display strings for a continent summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinentView {
    pub total_population: String,
    pub largest_member: String,
    pub members_with_coordinates: String,
}

impl ContinentView {
    pub fn new(summary: &ContinentSummary, locale_tag: &str) -> Self {
        Self {
            total_population: format!(
                "Total population in {}: {}",
                summary.region,
                format_count(summary.total_population, locale_tag)
            ),
            largest_member: format!(
                "Largest country by area: {}",
                summary.largest_member_name()
            ),
            members_with_coordinates: format!(
                "{} of {} countries have coordinates",
                summary.member_coordinates.len(),
                summary.member_count
            ),
        }
    }
}
