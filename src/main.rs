use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Table};
use configuration::{load_settings, Overrides, Settings};
use core_types::{DashboardFilter, PlatformFilter, Region};
use dashboard::{render_pass, table::render_view};
use database::{SalesRepository, SalesStore};

mod logging;

/// The main entry point for the video game sales dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let settings = load_settings(&cli.overrides).context("Failed to load configuration")?;
    let _log_guard = logging::init(&settings.log)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve => web_server::run_server(&settings).await?,
        Commands::Report(args) => handle_report(args, &settings)?,
        Commands::Platforms => handle_platforms(&settings)?,
    }
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Sales analytics over a local, read-only DuckDB file of video game sales.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP.
    Serve,
    /// Print the four dashboard panels for one filter selection.
    Report(ReportArgs),
    /// List the platforms available for filtering.
    Platforms,
}

#[derive(Parser)]
struct ReportArgs {
    /// Sales region: Global, "North America", Europe, Japan or Other.
    #[arg(long, default_value = "Global")]
    region: Region,

    /// Restrict to this platform; repeat for several. None means all platforms.
    #[arg(long = "platform")]
    platforms: Vec<String>,

    /// Print the panels as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn open_repository(settings: &Settings) -> anyhow::Result<SalesRepository> {
    let store = SalesStore::open(&settings.database.path)?;
    Ok(SalesRepository::new(store))
}

/// Runs a single render pass and prints it.
fn handle_report(args: ReportArgs, settings: &Settings) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    tracing::info!(region = %args.region, platforms = args.platforms.len(), "Running report.");
    let filter = DashboardFilter::new(PlatformFilter::from_names(args.platforms), args.region);

    let view = render_pass(&repo, &filter)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_view(&view));
    }

    repo.close()?;
    Ok(())
}

fn handle_platforms(settings: &Settings) -> anyhow::Result<()> {
    let repo = open_repository(settings)?;
    let platforms = repo.list_platforms()?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Platform"]);
    for platform in &platforms {
        table.add_row(vec![platform]);
    }
    println!("{table}");
    println!("{} platform(s)", platforms.len());

    repo.close()?;
    Ok(())
}
