use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use country_facts::estimate::{ChatClient, EstimatorConfig, ModelEstimator, PopulationEstimator};
use country_facts::format::{ContinentView, CountryView};
use country_facts::{Client, continent, resolver, storage};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "cfi",
    version,
    about = "Country Info Finder: look up country facts and explore continents"
)]
struct Cli {
    /// Locale for number formatting (en, de, fr, es, it, pt, nl).
    #[arg(long, global = true, default_value = "en")]
    locale: String,
    /// Override the REST Countries base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up one country by its exact name.
    Country(CountryArgs),
    /// List the regions (continents) known to the provider.
    Regions,
    /// Summarize one region: total population, largest country, coordinates.
    Continent(ContinentArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug, Clone)]
struct EstimateArgs {
    /// Ask a language model for the 2025 population (needs OPENAI_API_KEY).
    #[arg(long, default_value_t = false)]
    estimate: bool,
    /// Model identifier used with --estimate (default from CFI_MODEL or gpt-3.5-turbo).
    #[arg(long)]
    model: Option<String>,
}

#[derive(Args, Debug)]
struct CountryArgs {
    /// Full country name, e.g. "France" or "United States".
    #[arg(required = true, num_args = 1..)]
    name: Vec<String>,
    #[command(flatten)]
    estimate: EstimateArgs,
    /// Save the resolved record as JSON.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ContinentArgs {
    /// Region label, e.g. "Europe" (see `cfi regions`).
    region: String,
    #[command(flatten)]
    estimate: EstimateArgs,
    /// Number of model requests in flight with --estimate (1 = one after another).
    #[arg(long, default_value_t = 1)]
    workers: usize,
    /// Save the result (summary as JSON, members as CSV).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
    /// Print every member's coordinates.
    #[arg(long, default_value_t = false)]
    coords: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let client = match &cli.base_url {
        Some(url) => Client::with_base_url(url.as_str()),
        None => Client::default(),
    };
    match cli.cmd {
        Command::Country(args) => cmd_country(&client, args, &cli.locale),
        Command::Regions => cmd_regions(&client),
        Command::Continent(args) => cmd_continent(&client, args, &cli.locale),
    }
}

fn build_estimator(args: &EstimateArgs) -> Result<Option<ModelEstimator<ChatClient>>> {
    if !args.estimate {
        return Ok(None);
    }
    let mut cfg = EstimatorConfig::from_env().context("--estimate needs an API key")?;
    if let Some(model) = &args.model {
        cfg.model = model.clone();
    }
    Ok(Some(ModelEstimator::from_config(cfg)?))
}

fn infer_format(path: &Path, explicit: Option<&OutFormat>) -> String {
    match explicit {
        Some(OutFormat::Csv) => "csv".to_string(),
        Some(OutFormat::Json) => "json".to_string(),
        None => path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json")
            .to_ascii_lowercase(),
    }
}

fn cmd_country(client: &Client, args: CountryArgs, locale: &str) -> Result<()> {
    let estimator = build_estimator(&args.estimate)?;
    let name = args.name.join(" ");
    let estimator = estimator.as_ref().map(|e| e as &dyn PopulationEstimator);
    let found = match resolver::lookup(client, &name, estimator) {
        Ok(found) => found,
        Err(e) => bail!("{}", e.user_message()),
    };

    let view = CountryView::new(&found.record, &found.population, locale);
    println!("{}", view.title);
    for line in view.lines() {
        println!("  {}", line);
    }

    if let Some(path) = args.out.as_ref() {
        match infer_format(path, None).as_str() {
            "json" => storage::save_country_json(&found.record, path)?,
            other => bail!("unsupported format for a country: {}", other),
        }
        eprintln!("Saved {} to {}", found.record.common_name, path.display());
    }
    Ok(())
}

fn cmd_regions(client: &Client) -> Result<()> {
    let members = continent::load_members(client)
        .map_err(|e| anyhow::anyhow!("Failed to fetch continent data: {}", e))?;
    for region in continent::list_regions(&members) {
        println!("{}", region);
    }
    Ok(())
}

fn cmd_continent(client: &Client, args: ContinentArgs, locale: &str) -> Result<()> {
    let estimator = build_estimator(&args.estimate)?;
    let members = continent::load_members(client)
        .map_err(|e| anyhow::anyhow!("Failed to fetch continent data: {}", e))?;

    let regions = continent::list_regions(&members);
    if !regions.iter().any(|r| r == &args.region) {
        eprintln!(
            "Region {:?} has no countries. Known regions: {}",
            args.region,
            regions.join(", ")
        );
    }

    let summary = match &estimator {
        Some(est) => continent::summarize_with(&args.region, &members, est, args.workers),
        None => continent::summarize(&args.region, &members),
    };

    let view = ContinentView::new(&summary, locale);
    println!("{}", view.total_population);
    println!("{}", view.largest_member);
    println!("{}", view.members_with_coordinates);
    if args.coords {
        for c in &summary.member_coordinates {
            println!("  {:.4}, {:.4}", c.lat, c.lon);
        }
    }

    if let Some(path) = args.out.as_ref() {
        match infer_format(path, args.format.as_ref()).as_str() {
            "json" => storage::save_summary_json(&summary, path)?,
            "csv" => {
                let subset = continent::members_of(&args.region, &members);
                storage::save_members_csv(&subset, path)?
            }
            other => bail!("unsupported format: {}", other),
        }
        eprintln!("Saved {} to {}", summary.region, path.display());
    }
    Ok(())
}
