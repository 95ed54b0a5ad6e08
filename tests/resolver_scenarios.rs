use country_facts::api::{CountrySource, parse_bulk_response, parse_lookup_response};
use country_facts::estimate::PopulationEstimator;
use country_facts::format::CountryView;
use country_facts::models::{PopulationEstimate, PopulationSource, RawCountry};
use country_facts::{LookupError, resolver};
use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Canned provider: every lookup answers with the same status and body.
struct StubSource {
    status: u16,
    body: String,
    calls: Cell<usize>,
    last_name: RefCell<String>,
}

impl StubSource {
    fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            calls: Cell::new(0),
            last_name: RefCell::new(String::new()),
        }
    }
}

impl CountrySource for StubSource {
    fn lookup_by_name(&self, name: &str) -> Result<Vec<RawCountry>, LookupError> {
        self.calls.set(self.calls.get() + 1);
        *self.last_name.borrow_mut() = name.to_string();
        parse_lookup_response(name, self.status, &self.body)
    }

    fn fetch_all(&self) -> Result<Vec<RawCountry>, LookupError> {
        parse_bulk_response(self.status, &self.body)
    }
}

/// Estimator that counts how often it is asked.
struct CountingEstimator {
    reply: PopulationEstimate,
    calls: AtomicUsize,
}

impl PopulationEstimator for CountingEstimator {
    fn estimate_2025_population(&self, _country: &str) -> PopulationEstimate {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
    }
}

const FRANCE: &str = r#"[
  {
    "name": {"common": "France", "official": "French Republic"},
    "capital": ["Paris"],
    "region": "Europe",
    "subregion": "Western Europe",
    "area": 551695.0,
    "currencies": {"EUR": {"name": "Euro", "symbol": "€"}},
    "flags": {"png": "https://flagcdn.com/w320/fr.png"},
    "population": 67000000,
    "latlng": [46.0, 2.0]
  }
]"#;

#[test]
fn france_uses_census_figure_without_model_call() {
    let source = StubSource::new(200, FRANCE);
    let found = resolver::lookup(&source, "France", None).unwrap();

    assert_eq!(found.record.common_name, "France");
    assert_eq!(found.population.source, PopulationSource::ProviderFallback);
    assert_eq!(found.population.value, Some(67_000_000));
    assert!(found.record.languages.is_empty());

    let view = CountryView::new(&found.record, &found.population, "en");
    assert!(view.population.contains("67,000,000"), "{}", view.population);
    assert_eq!(view.languages, "");
    assert_eq!(view.single_language_note, None);
    assert_eq!(view.currencies, "Euro");
    assert_eq!(view.map_link, None);
}

#[test]
fn atlantis_is_not_found_and_no_population_is_computed() {
    let source = StubSource::new(404, r#"{"status":404,"message":"Not Found"}"#);
    let estimator = CountingEstimator {
        reply: PopulationEstimate::model(1),
        calls: AtomicUsize::new(0),
    };
    let err = resolver::lookup(&source, "Atlantis", Some(&estimator)).unwrap_err();
    assert!(matches!(err, LookupError::NotFound { ref name } if name == "Atlantis"));
    assert_eq!(err.user_message(), "Country not found. Please check spelling.");
    assert_eq!(estimator.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn server_errors_are_also_not_found() {
    let source = StubSource::new(500, "oops");
    let err = resolver::resolve(&source, "France").unwrap_err();
    assert!(matches!(err, LookupError::NotFound { .. }));
}

#[test]
fn empty_name_never_reaches_the_provider() {
    let source = StubSource::new(200, FRANCE);
    assert!(matches!(
        resolver::resolve(&source, "   "),
        Err(LookupError::EmptyName)
    ));
    assert_eq!(source.calls.get(), 0);
}

#[test]
fn name_is_trimmed_before_lookup() {
    let source = StubSource::new(200, FRANCE);
    resolver::resolve(&source, "  France ").unwrap();
    assert_eq!(source.last_name.borrow().as_str(), "France");
}

#[test]
fn first_candidate_wins() {
    let body = r#"[{"name":{"common":"First"}},{"name":{"common":"Second"}}]"#;
    let source = StubSource::new(200, body);
    let r = resolver::resolve(&source, "Either").unwrap();
    assert_eq!(r.common_name, "First");
}

#[test]
fn empty_success_array_is_not_found() {
    let source = StubSource::new(200, "[]");
    assert!(matches!(
        resolver::resolve(&source, "Ghost"),
        Err(LookupError::NotFound { .. })
    ));
}

#[test]
fn garbage_success_body_is_a_decode_error() {
    let source = StubSource::new(200, "<html>");
    assert!(matches!(
        resolver::resolve(&source, "France"),
        Err(LookupError::Decode(_))
    ));
}

#[test]
fn model_estimate_replaces_census_figure() {
    let source = StubSource::new(200, FRANCE);
    let estimator = CountingEstimator {
        reply: PopulationEstimate::model(68_500_000),
        calls: AtomicUsize::new(0),
    };
    let found = resolver::lookup(&source, "France", Some(&estimator)).unwrap();
    assert_eq!(estimator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(found.population.source, PopulationSource::ModelEstimate);
    assert_eq!(found.population.value, Some(68_500_000));
}

#[test]
fn unavailable_estimate_falls_back_to_census() {
    let source = StubSource::new(200, FRANCE);
    let estimator = CountingEstimator {
        reply: PopulationEstimate::unavailable(),
        calls: AtomicUsize::new(0),
    };
    let found = resolver::lookup(&source, "France", Some(&estimator)).unwrap();
    assert_eq!(found.population.source, PopulationSource::ProviderFallback);
    assert_eq!(found.population.value, Some(67_000_000));
}

#[test]
fn no_estimate_and_no_census_reports_not_available() {
    let source = StubSource::new(200, r#"[{"name":{"common":"Bouvet Island"}}]"#);
    let estimator = CountingEstimator {
        reply: PopulationEstimate::unavailable(),
        calls: AtomicUsize::new(0),
    };
    let found = resolver::lookup(&source, "Bouvet Island", Some(&estimator)).unwrap();
    assert_eq!(found.population.source, PopulationSource::Unavailable);
    let view = CountryView::new(&found.record, &found.population, "en");
    assert_eq!(view.population, "population data not available");
}
