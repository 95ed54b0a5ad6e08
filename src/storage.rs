use crate::models::{ContinentSummary, CountryRecord, RegionMember};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix cells that a spreadsheet would evaluate as a formula.
fn guard_cell(s: &str) -> String {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{}", s),
        _ => s.to_string(),
    }
}

/// Save region members as CSV with header `name,region,area,census_population,lat,lon`.
///
/// The population column is always the provider figure, even when a summary
/// was built from model estimates.
pub fn save_members_csv<P: AsRef<Path>>(members: &[&RegionMember], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    wtr.serialize(("name", "region", "area", "census_population", "lat", "lon"))?;
    for m in members {
        wtr.serialize((
            guard_cell(&m.common_name),
            guard_cell(m.region.as_deref().unwrap_or("")),
            m.area,
            m.population,
            m.coordinates.map(|c| c.lat),
            m.coordinates.map(|c| c.lon),
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

fn save_pretty_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

/// Save one resolved country as pretty JSON.
pub fn save_country_json<P: AsRef<Path>>(record: &CountryRecord, path: P) -> Result<()> {
    save_pretty_json(record, path)
}

/// Save a continent summary as pretty JSON.
pub fn save_summary_json<P: AsRef<Path>>(summary: &ContinentSummary, path: P) -> Result<()> {
    save_pretty_json(summary, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;
    use tempfile::tempdir;

    #[test]
    fn guard_prefixes_formula_starters() {
        assert_eq!(guard_cell("=1+1"), "'=1+1");
        assert_eq!(guard_cell("@x"), "'@x");
        assert_eq!(guard_cell("France"), "France");
        assert_eq!(guard_cell(""), "");
    }

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let m = RegionMember {
            common_name: "Germany".into(),
            region: Some("Europe".into()),
            area: 357114.0,
            population: 83_240_525,
            coordinates: Some(Coordinates { lat: 51.0, lon: 9.0 }),
        };
        save_members_csv(&[&m], &csvp).unwrap();
        let summary = ContinentSummary {
            region: "Europe".into(),
            member_count: 1,
            total_population: m.population,
            largest_member: Some(m.clone()),
            member_coordinates: vec![Coordinates { lat: 51.0, lon: 9.0 }],
        };
        save_summary_json(&summary, &jsonp).unwrap();
        assert!(csvp.exists());
        assert!(jsonp.exists());
    }
}
