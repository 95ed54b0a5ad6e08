/*!
 * GUI application for country-facts - Country Info Finder
 *
 * A cross-platform desktop application providing:
 * - Exact-name country lookup with capital, languages, currencies and population
 * - A continent explorer with total population and largest country by area
 * - Optional 2025 population estimates from a language model
 * - Export of the current results as JSON/CSV
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::Result;
use country_facts::estimate::{EstimatorConfig, ModelEstimator, PopulationEstimator};
use country_facts::format::{ContinentView, CountryView};
use country_facts::resolver::CountryLookup;
use country_facts::{Client, ContinentSummary, RegionMember, continent, resolver, storage};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

fn main() -> Result<(), eframe::Error> {
    // Enable logging for better debugging
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 640.0])
            .with_min_inner_size([520.0, 400.0])
            .with_title("Country Info Finder"),
        ..Default::default()
    };

    eframe::run_native(
        "Country Info Finder",
        options,
        Box::new(|_cc| Ok(Box::new(CfiApp::new()))),
    )
}

/// Main application state
struct CfiApp {
    // Input fields
    country_name: String,
    selected_region: String,
    locale: String,
    use_estimate: bool,
    estimator_config: Option<EstimatorConfig>,
    workers: usize,
    output_path: String,

    // Continent dataset, fetched once at startup
    members: Vec<RegionMember>,
    regions: Vec<String>,
    dataset_error: String,
    dataset_receiver: Option<mpsc::Receiver<Result<Vec<RegionMember>, String>>>,

    // Results
    country: Option<CountryLookup>,
    summary: Option<ContinentSummary>,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background operation
    operation_receiver: Option<(OperationKind, mpsc::Receiver<OperationResult>)>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OperationKind {
    Country,
    Continent,
}

#[derive(Debug)]
enum OperationResult {
    Country(Box<CountryLookup>),
    Continent(ContinentSummary),
    Error(String),
}

impl CfiApp {
    fn new() -> Self {
        // Default to user's home directory for output
        let home_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .to_string_lossy()
            .to_string();

        let estimator_config = match EstimatorConfig::from_env() {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                log::info!("2025 estimates disabled: {}", err);
                None
            }
        };

        let mut app = Self::with_settings(estimator_config, home_dir);
        app.start_dataset_fetch();
        app
    }

    fn with_settings(estimator_config: Option<EstimatorConfig>, output_path: String) -> Self {
        Self {
            country_name: String::new(),
            selected_region: String::new(),
            locale: "en".to_string(),
            use_estimate: false,
            estimator_config,
            workers: 1,
            output_path,

            members: Vec::new(),
            regions: Vec::new(),
            dataset_error: String::new(),
            dataset_receiver: None,

            country: None,
            summary: None,

            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            operation_receiver: None,
        }
    }

    fn start_dataset_fetch(&mut self) {
        let (sender, receiver) = mpsc::channel();
        self.dataset_receiver = Some(receiver);
        thread::spawn(move || {
            let result = continent::load_members(&Client::default()).map_err(|e| e.to_string());
            let _ = sender.send(result);
        });
    }

    fn estimator(&self) -> Option<EstimatorConfig> {
        if self.use_estimate {
            self.estimator_config.clone()
        } else {
            None
        }
    }

    fn start_country_lookup(&mut self) {
        if self.country_name.trim().is_empty() {
            self.error_message = "Please enter a country name.".to_string();
            return;
        }
        let name = self.country_name.trim().to_string();
        let estimator = self.estimator();
        self.spawn_operation(
            OperationKind::Country,
            format!("Looking up {}...", name),
            move || match perform_lookup(&name, estimator) {
                Ok(found) => OperationResult::Country(Box::new(found)),
                Err(err) => OperationResult::Error(err),
            },
        );
    }

    fn start_continent_summary(&mut self) {
        let region = self.selected_region.clone();
        let members = self.members.clone();
        let estimator = self.estimator();
        let workers = self.workers;
        self.spawn_operation(
            OperationKind::Continent,
            format!("Summarizing {}...", region),
            move || match perform_summary(&region, &members, estimator, workers) {
                Ok(summary) => OperationResult::Continent(summary),
                Err(err) => OperationResult::Error(err),
            },
        );
    }

    fn spawn_operation<F>(&mut self, kind: OperationKind, status: String, op: F)
    where
        F: FnOnce() -> OperationResult + Send + 'static,
    {
        self.is_loading = true;
        self.error_message.clear();
        self.status_message = status;

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some((kind, receiver));

        // Spawn background thread for the operation
        thread::spawn(move || {
            let _ = sender.send(op());
        });
    }

    /// Re-run the summary for the selected continent after the estimate toggle flips.
    fn estimate_toggled(&mut self) {
        self.summary = None;
        if !self.selected_region.is_empty() && self.dataset_error.is_empty() {
            self.start_continent_summary();
        }
    }

    fn check_dataset_result(&mut self) {
        let Some(receiver) = &self.dataset_receiver else {
            return;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err("dataset worker stopped".to_string()),
        };

        self.dataset_receiver = None;
        match result {
            Ok(members) => {
                self.regions = continent::list_regions(&members);
                self.members = members;
            }
            Err(err) => {
                log::warn!("bulk dataset fetch failed: {}", err);
                self.dataset_error = "Failed to fetch continent data.".to_string();
            }
        }
    }

    fn check_operation_result(&mut self) {
        let Some((kind, receiver)) = &self.operation_receiver else {
            return;
        };
        let kind = *kind;
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => {
                log::warn!("{:?} operation ended without a result", kind);
                OperationResult::Error("The operation stopped unexpectedly.".to_string())
            }
        };

        self.is_loading = false;
        self.operation_receiver = None;
        self.status_message.clear();

        match result {
            OperationResult::Country(found) => {
                self.country = Some(*found);
                self.error_message.clear();
            }
            OperationResult::Continent(summary) => {
                self.summary = Some(summary);
                self.error_message.clear();
            }
            OperationResult::Error(error) => {
                // Only the error is shown, never a stale result.
                match kind {
                    OperationKind::Country => self.country = None,
                    OperationKind::Continent => self.summary = None,
                }
                self.error_message = error;
            }
        }
    }

    fn save_results(&mut self) {
        match export_results(
            &self.output_path,
            self.country.as_ref(),
            self.summary.as_ref(),
            &self.members,
        ) {
            Ok(files) if files.is_empty() => {
                self.error_message = "Nothing to save yet.".to_string();
            }
            Ok(files) => {
                self.error_message.clear();
                self.status_message = format!("Files created:\n{}", files.join("\n"));
            }
            Err(err) => {
                self.error_message = format!("Failed to save: {}", err);
            }
        }
    }

    fn country_section(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("Country Info Search");
            ui.add_space(5.0);

            ui.horizontal(|ui| {
                ui.label("Country name:");
                let resp = ui
                    .text_edit_singleline(&mut self.country_name)
                    .on_hover_text("Full country name, e.g. France or United States");
                let submitted = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                let clicked = ui
                    .add_enabled(!self.is_loading, egui::Button::new("Look up"))
                    .clicked();
                if (submitted || clicked) && !self.is_loading {
                    self.start_country_lookup();
                }
            });

            if let Some(found) = &self.country {
                let view = CountryView::new(&found.record, &found.population, &self.locale);
                ui.add_space(5.0);
                ui.strong(&view.title);
                for line in view.lines() {
                    ui.label(line);
                }
            }
        });
    }

    fn continent_section(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label("Continent Explorer");
            ui.add_space(5.0);

            let ready = self.dataset_receiver.is_none() && self.dataset_error.is_empty();
            let previous = self.selected_region.clone();

            ui.horizontal(|ui| {
                ui.label("Choose a continent:");
                ui.add_enabled_ui(ready && !self.is_loading, |ui| {
                    egui::ComboBox::from_id_salt("continent")
                        .selected_text(&self.selected_region)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.selected_region, String::new(), "");
                            for region in &self.regions {
                                ui.selectable_value(&mut self.selected_region, region.clone(), region);
                            }
                        });
                });
                if self.dataset_receiver.is_some() {
                    ui.spinner();
                }
            });

            if !self.dataset_error.is_empty() {
                ui.colored_label(egui::Color32::RED, &self.dataset_error);
            }

            if self.selected_region != previous {
                self.summary = None;
                if !self.selected_region.is_empty() {
                    self.start_continent_summary();
                }
            }

            if let Some(summary) = &self.summary {
                let view = ContinentView::new(summary, &self.locale);
                ui.add_space(5.0);
                ui.label(view.total_population);
                ui.label(view.largest_member);
                ui.label(view.members_with_coordinates);
            }
        });
    }
}

impl eframe::App for CfiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background operations
        self.check_dataset_result();
        self.check_operation_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading || self.dataset_receiver.is_some() {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("Country Info Finder");
                ui.label("Enter a country name to get details, or explore by continent.");
                ui.add_space(10.0);

                self.country_section(ui);
                ui.add_space(10.0);
                self.continent_section(ui);
                ui.add_space(10.0);

                // Advanced options (collapsible)
                ui.collapsing("Options", |ui| {
                    let has_key = self.estimator_config.is_some();
                    let toggled = ui
                        .add_enabled(
                            has_key && !self.is_loading,
                            egui::Checkbox::new(&mut self.use_estimate, "Use 2025 population estimate"),
                        )
                        .on_disabled_hover_text("Set OPENAI_API_KEY to enable model estimates")
                        .changed();
                    if toggled {
                        self.estimate_toggled();
                    }

                    if self.use_estimate {
                        ui.horizontal(|ui| {
                            ui.label("Parallel requests:");
                            ui.add(egui::DragValue::new(&mut self.workers).range(1..=16));
                        });
                    }

                    ui.horizontal(|ui| {
                        ui.label("Locale:");
                        egui::ComboBox::from_id_salt("locale")
                            .selected_text(&self.locale)
                            .show_ui(ui, |ui| {
                                ui.selectable_value(&mut self.locale, "en".to_string(), "English (en)");
                                ui.selectable_value(&mut self.locale, "de".to_string(), "German (de)");
                                ui.selectable_value(&mut self.locale, "fr".to_string(), "French (fr)");
                                ui.selectable_value(&mut self.locale, "es".to_string(), "Spanish (es)");
                                ui.selectable_value(&mut self.locale, "it".to_string(), "Italian (it)");
                            });
                    });

                    ui.horizontal(|ui| {
                        ui.label("Output path:");
                        ui.text_edit_singleline(&mut self.output_path);
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_folder()
                        {
                            self.output_path = path.to_string_lossy().to_string();
                        }
                    });

                    if ui.button("Save results").clicked() {
                        self.save_results();
                    }
                });

                ui.add_space(10.0);

                if self.is_loading {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label("Processing...");
                    });
                }

                // Status messages
                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }

                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }
            });
        });
    }
}

type SharedEstimator = Box<dyn PopulationEstimator + Send + Sync>;

fn build_estimator(config: Option<EstimatorConfig>) -> Result<Option<SharedEstimator>, String> {
    match config {
        Some(cfg) => ModelEstimator::from_config(cfg)
            .map(|e| Some(Box::new(e) as SharedEstimator))
            .map_err(|e| format!("Could not set up the estimator: {}", e)),
        None => Ok(None),
    }
}

fn perform_lookup(name: &str, estimator: Option<EstimatorConfig>) -> Result<CountryLookup, String> {
    let estimator = build_estimator(estimator)?;
    let client = Client::default();
    let estimator = estimator.as_deref().map(|e| e as &dyn PopulationEstimator);
    resolver::lookup(&client, name, estimator).map_err(|e| e.user_message())
}

fn perform_summary(
    region: &str,
    members: &[RegionMember],
    estimator: Option<EstimatorConfig>,
    workers: usize,
) -> Result<ContinentSummary, String> {
    Ok(match build_estimator(estimator)? {
        Some(est) => continent::summarize_with(region, members, &*est, workers),
        None => continent::summarize(region, members),
    })
}

fn export_results(
    output_path: &str,
    country: Option<&CountryLookup>,
    summary: Option<&ContinentSummary>,
    members: &[RegionMember],
) -> Result<Vec<String>> {
    let output_dir = PathBuf::from(output_path);
    let mut output_files = Vec::new();

    if let Some(found) = country {
        let path = output_dir.join("cfi_country.json");
        storage::save_country_json(&found.record, &path)?;
        output_files.push(path.to_string_lossy().to_string());
    }

    if let Some(summary) = summary {
        let json_path = output_dir.join("cfi_continent.json");
        storage::save_summary_json(summary, &json_path)?;
        output_files.push(json_path.to_string_lossy().to_string());

        let csv_path = output_dir.join("cfi_members.csv");
        let subset = continent::members_of(&summary.region, members);
        storage::save_members_csv(&subset, &csv_path)?;
        output_files.push(csv_path.to_string_lossy().to_string());
    }

    Ok(output_files)
}
