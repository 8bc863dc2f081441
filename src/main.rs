use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use ems_seed::config;
use ems_seed::executor::ExecutorConfig;
use ems_seed::geocode::{GeocodeCache, Geocoder, GsiAddressSearch};
use ems_seed::pipeline::{self, SeedConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "ems-seed")]
#[command(about = "Build and load a geocoded EMS seed script from municipal CSV exports")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, geocode, write the SQL script and execute it
    Seed(SeedArgs),
    /// Resolve a single address with the same fallback strategy
    Geocode(GeocodeArgs),
}

#[derive(Args)]
struct SeedArgs {
    /// Hospital directory CSV
    #[arg(long, default_value = config::DEFAULT_HOSPITALS_CSV)]
    hospitals: PathBuf,

    /// Team roster, one team name per line
    #[arg(long, default_value = config::DEFAULT_TEAMS_CSV)]
    teams: PathBuf,

    /// Env file holding DATABASE_URL
    #[arg(long, default_value = config::DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Where the generated SQL script is written
    #[arg(short, long, default_value = config::DEFAULT_SCRIPT_PATH)]
    output: PathBuf,

    /// Geocoding endpoint
    #[arg(long, default_value = config::GEOCODE_ENDPOINT)]
    endpoint: String,

    /// Delay after each uncached geocoding lookup, in milliseconds
    #[arg(long, default_value_t = config::GEOCODE_THROTTLE_MS)]
    throttle_ms: u64,

    /// Program that executes the script
    #[arg(long, default_value = config::DEFAULT_EXECUTOR)]
    executor: String,

    /// Executor argument template; `{script}` and `{database_url}` are substituted.
    /// Repeat for each argument. Defaults to psql arguments.
    #[arg(long = "executor-arg", allow_hyphen_values = true)]
    executor_args: Vec<String>,

    /// Write the script but skip execution
    #[arg(long)]
    dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GeocodeArgs {
    #[arg(long)]
    address: String,

    #[arg(long, default_value = "")]
    municipality: String,

    #[arg(long, default_value = config::GEOCODE_ENDPOINT)]
    endpoint: String,
}

fn build_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .enable_time()
        .build()
        .context("Failed to start async runtime")
}

fn run_seed(args: SeedArgs) -> Result<()> {
    let json_output = args.json;
    let executor = if args.executor_args.is_empty() {
        ExecutorConfig {
            program: args.executor,
            ..Default::default()
        }
    } else {
        ExecutorConfig {
            program: args.executor,
            args: args.executor_args,
        }
    };

    let seed_config = SeedConfig {
        hospitals_csv: args.hospitals,
        teams_csv: args.teams,
        env_file: args.env_file,
        script_path: args.output,
        endpoint: args.endpoint,
        throttle: Duration::from_millis(args.throttle_ms),
        executor,
        dry_run: args.dry_run,
    };

    let start = Instant::now();
    let summary = build_runtime()?.block_on(pipeline::run_seed(seed_config))?;
    if json_output {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{json}");
        return Ok(());
    }

    let stats = &summary.geocode_stats;

    println!();
    println!("=== Summary ===");
    println!("Total time:             {:.2}s", start.elapsed().as_secs_f64());
    println!("SQL script:             {}", summary.script_path.display());
    println!("Executed:               {}", if summary.executed { "yes" } else { "no (dry run)" });
    println!();
    println!("Hospitals loaded:       {}", summary.hospitals);
    println!("Hospitals geocoded:     {}", summary.geocoded);
    println!("Emergency teams loaded: {}", summary.teams);
    println!("Cases loaded:           {}", summary.cases);
    println!();
    println!("Geocode lookups:        {}", stats.lookups);
    println!("Cache hits:             {} ({:.1}%)", stats.cache_hits, stats.hit_rate() * 100.0);
    println!("Queries issued:         {}", stats.queries_issued);
    println!("Transient errors:       {}", stats.transient_errors);

    Ok(())
}

fn run_geocode(args: GeocodeArgs) -> Result<()> {
    let search = GsiAddressSearch::new(args.endpoint)?;
    let mut geocoder = Geocoder::new(search, GeocodeCache::new()).with_throttle(Duration::ZERO);

    let result = build_runtime()?.block_on(geocoder.resolve(&args.address, &args.municipality));
    match result {
        Some(c) => println!("{:.8}, {:.8}", c.latitude, c.longitude),
        None => println!("not found"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }

    let result = match cli.command {
        Commands::Seed(args) => run_seed(args),
        Commands::Geocode(args) => run_geocode(args),
    };

    match result {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
