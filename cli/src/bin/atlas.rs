use atlas_cli::{detect, now_stamp, render_briefing, render_dashboard, BriefingConfig};
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use sar_detect::DetectionPreset;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "SAR port briefing renderer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect, compose and export a briefing (PNG, PDF, GeoJSON)
    Render {
        /// Path to a TOML or JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Input raster (overrides the configuration)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output directory (overrides the configuration)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Named threshold preset
        #[arg(long)]
        preset: Option<DetectionPreset>,
        /// Show the fixed demo KPI values instead of the computed ones
        #[arg(long)]
        lock_kpis: bool,
        /// TrueType font for labels
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// Run detection only and print the report
    Detect {
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        preset: Option<DetectionPreset>,
        #[arg(long)]
        seed: Option<u64>,
        /// Print GeoJSON instead of the JSON report
        #[arg(long)]
        geojson: bool,
    },
    /// Render the four-chart port indicator dashboard
    Dashboard {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        font: Option<PathBuf>,
    },
    /// List the detection presets and their parameters
    Presets,
    /// Print the JSON schema of the configuration file
    Schema,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { config, input, out_dir, seed, preset, lock_kpis, font } => {
            let mut config = load_config(config)?;
            config.input = input.or(config.input);
            config.output_dir = out_dir.unwrap_or(config.output_dir);
            config.preset = preset.or(config.preset);
            config.font = font.or(config.font);
            config.lock_kpis |= lock_kpis;
            if let Some(seed) = seed {
                config.detection.seed = seed;
            }
            run_render(&config)?;
        }
        Commands::Detect { input, preset, seed, geojson } => {
            let mut config = BriefingConfig {
                input,
                preset,
                ..Default::default()
            };
            if let Some(seed) = seed {
                config.detection.seed = seed;
            }
            let (report, notice) = detect(&config)?;
            if let Some(notice) = notice {
                warn!("{notice}");
            }
            if geojson {
                println!("{}", report.to_geojson_string()?);
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Dashboard { config, out_dir, seed, font } => {
            let mut config = load_config(config)?;
            config.output_dir = out_dir.unwrap_or(config.output_dir);
            config.font = font.or(config.font);
            if let Some(seed) = seed {
                config.series_seed = Some(seed);
            }
            let (exports, notices) = render_dashboard(&config, &now_stamp())?;
            for notice in notices {
                warn!("{notice}");
            }
            for path in exports.save(&config.output_dir, "dashboard")? {
                info!("Wrote {}", path.display());
            }
        }
        Commands::Presets => print_presets()?,
        Commands::Schema => {
            let schema = schemars::schema_for!(BriefingConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<BriefingConfig> {
    Ok(match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            BriefingConfig::from_file(path)?
        }
        None => BriefingConfig::default(),
    })
}

fn run_render(config: &BriefingConfig) -> Result<()> {
    let out = render_briefing(config, &now_stamp())?;
    let counts = out.report.detections.counts();
    info!(
        "Detections: {} vessels ({} raw), {} tanks ({} raw), {} piers ({} raw)",
        counts.vessels,
        out.report.raw_counts.vessels,
        counts.tanks,
        out.report.raw_counts.tanks,
        counts.piers,
        out.report.raw_counts.piers
    );
    for path in out.save(&config.output_dir)? {
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_presets() -> Result<()> {
    for name in DetectionPreset::names() {
        let preset: DetectionPreset = name.parse()?;
        println!("{name}: {}", preset.description());
        println!("{}", serde_json::to_string_pretty(&preset.params())?);
    }
    Ok(())
}
