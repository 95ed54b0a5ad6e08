//! country_facts
//!
//! A lightweight Rust library for looking up country facts from the
//! REST Countries API and summarizing continents. Pairs with the `cfi` CLI
//! and the `cfi-gui` desktop app.
//!
//! ### Features
//! - Exact-name country lookup with documented defaults for every missing field
//! - Continent explorer: region list, total population, largest member by area,
//!   member coordinates
//! - Optional 2025 population estimates from a chat-completion model, with
//!   fallback to the census figure
//! - Save results as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use country_facts::{Client, continent, format, resolver};
//!
//! let client = Client::default();
//! let found = resolver::lookup(&client, "France", None)?;
//! println!("{}", format::CountryView::new(&found.record, &found.population, "en").population);
//!
//! let members = continent::load_members(&client)?;
//! let europe = continent::summarize("Europe", &members);
//! println!("{:#?}", europe);
//! # Ok::<(), country_facts::LookupError>(())
//! ```

pub mod api;
pub mod continent;
pub mod error;
pub mod estimate;
pub mod format;
pub mod models;
pub mod resolver;
pub mod storage;

pub use api::{Client, CountrySource};
pub use error::LookupError;
pub use estimate::{EstimatorConfig, ModelEstimator, PopulationEstimator};
pub use models::{
    ContinentSummary, Coordinates, CountryRecord, PopulationEstimate, PopulationSource,
    RegionMember,
};
