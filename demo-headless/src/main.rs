use anyhow::{Context, Result};
use clap::Parser;
use sounding_core::plugin::demo_location;
use sounding_core::{
    AtmosphericProfile, FixedProfile, PanelView, PluginConfig, SoundingPlugin,
    SoundingReport, DEMO_LOCATIONS,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Sounding overlay demo: analyze one location without a map
#[derive(Parser, Debug)]
#[command(name = "sounding-demo")]
#[command(about = "Severe-weather sounding parameters for a point", long_about = None)]
struct Args {
    /// Latitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lon", conflicts_with = "demo")]
    lat: Option<f64>,

    /// Longitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Named demo location (melbourne, sydney, tokyo, oklahoma)
    #[arg(short, long)]
    demo: Option<String>,

    /// JSON sounding (array of levels) to derive from instead of simulating
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Seed for reproducible simulated values
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON plugin configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the panel view as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rendered = run(&args)?;
    Ok(if rendered {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

/// Returns whether the panel ended up with a report.
fn run(args: &Args) -> Result<bool> {
    let (lat, lon) = location(args)?;

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            PluginConfig::from_json_str(&text)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        }
        None => PluginConfig::default(),
    };
    // no UI to keep responsive here
    config.simulated_latency_ms = 0;
    if args.seed.is_some() {
        config.simulation_seed = args.seed;
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("Failed to start runtime")?;

    let view = match &args.profile {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read profile: {}", path.display()))?;
            let profile: AtmosphericProfile = serde_json::from_str(&text)
                .with_context(|| format!("Invalid profile: {}", path.display()))?;
            let plugin = SoundingPlugin::with_source(config, FixedProfile(profile));
            runtime.block_on(plugin.load_location(lat, lon));
            plugin.view()
        }
        None => {
            let plugin = SoundingPlugin::simulated(config);
            runtime.block_on(plugin.load_location(lat, lon));
            plugin.view()
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&view)?;
        println!("{json}");
    } else {
        print_view(&view, args.profile.is_none());
    }
    Ok(matches!(view, PanelView::Ready { .. }))
}

fn location(args: &Args) -> Result<(f64, f64)> {
    if let Some(name) = &args.demo {
        let Some(demo) = demo_location(name) else {
            let names: Vec<_> = DEMO_LOCATIONS.iter().map(|d| d.name).collect();
            anyhow::bail!("Unknown demo location '{name}' (try {})", names.join(", "));
        };
        return Ok((demo.latitude, demo.longitude));
    }
    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => anyhow::bail!("Pass --lat/--lon or --demo"),
    }
}

fn print_view(view: &PanelView, simulated: bool) {
    match view {
        PanelView::Ready { report } => print_report(report, simulated),
        PanelView::Error { message } => println!("Error: {message}"),
        PanelView::Prompt => println!("Click on the map to analyze"),
        PanelView::Loading { coordinate } => println!("Loading {coordinate}..."),
    }
}

fn print_report(report: &SoundingReport, simulated: bool) {
    println!("=== Sounding Analysis ===\n");
    println!("Location: {}", report.location_label);
    if simulated {
        println!("Data: simulated");
    }
    println!(
        "Supercells: {} | Tornadoes: {}\n",
        report.headline.supercells, report.headline.tornadoes
    );

    for section in &report.sections {
        println!("{}", section.title);
        println!("------------|------------------|---------");
        for card in &section.cards {
            let value = if card.unit.is_empty() {
                card.value.clone()
            } else {
                format!("{} {}", card.value, card.unit)
            };
            println!("{:11} | {:>16} | {}", card.label, value, card.severity);
        }
        println!();
    }

    println!("Detailed analysis: {}", report.analysis_url);
}
