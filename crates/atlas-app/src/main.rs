// `atlas` entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout is reserved for chart JSON)
// 2. Copy missing defaults into config/, load and validate config
// 3. Run the requested chart pipeline(s)
// 4. Print one chart document, or write every document plus a manifest

mod charts;
mod render;

use std::path::PathBuf;

use anyhow::Context;
use atlas_core::config;
use atlas_football::selector::{ShotView, ViolinMetric};
use clap::{Parser, Subcommand};
use tracing::info;

use charts::Chart;
use render::Exporter;

#[derive(Parser)]
#[command(name = "atlas")]
#[command(about = "World Cup squad and player performance charts", long_about = None)]
struct Cli {
    /// Directory holding defaults/ and config/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every pipeline and write one JSON document per chart
    Export {
        /// Output directory (defaults to [output] dir in dashboard.toml)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Completed passes by length for the selected attackers
    Passing,
    /// Tackles, blocks and interceptions for the selected defenders
    Defense,
    /// Shot outcomes per squad
    Shooting {
        /// "Overall" or "Per Match"
        #[arg(long, default_value = "Overall")]
        view: ShotView,
    },
    /// Actual minus expected per 90 for the focus squad's most used players
    Heatmap,
    /// Defensive actions per game for the reference teams
    RadarDefense,
    /// Possession style of the reference teams
    RadarPossession,
    /// Minutes or age distribution per squad
    Violin {
        /// "Min" or "Age"
        #[arg(long, default_value = "Min")]
        metric: ViolinMetric,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing
    init_tracing(cli.verbose)?;

    // 2. Load config
    let config = config::load_config(&cli.root).context("failed to load configuration")?;
    info!(
        "Config loaded: {} ({} matches), focus squad {}, data in {}",
        config.tournament.competition,
        config.tournament.matches_played,
        config.tournament.focus_squad,
        config.data.dir.display()
    );

    // 3-4. Run and emit
    let chart = match cli.command {
        Commands::Export { out } => {
            let out_dir = out.unwrap_or_else(|| config.output_dir.clone());
            let mut exporter = Exporter::new(&out_dir)?;
            for chart in Chart::all() {
                let built = charts::build(chart, &config)?;
                exporter.write(&built.document(&config))?;
            }
            let manifest = exporter.finish()?;
            println!("{}", manifest.display());
            return Ok(());
        }
        Commands::Passing => Chart::Passing,
        Commands::Defense => Chart::Defense,
        Commands::Shooting { view } => Chart::Shooting(view),
        Commands::Heatmap => Chart::Heatmap,
        Commands::RadarDefense => Chart::RadarDefense,
        Commands::RadarPossession => Chart::RadarPossession,
        Commands::Violin { metric } => Chart::Violin(metric),
    };

    let built = charts::build(chart, &config)?;
    println!("{}", built.document(&config).to_json()?);
    Ok(())
}

/// Initialize tracing to stderr, `RUST_LOG` overriding the default filter.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    // Target prefixes: "atlas" also covers atlas_core and atlas_football.
    let default_filter = if verbose {
        "atlas=debug,warn"
    } else {
        "atlas=info,warn"
    };

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
