//! Magic Puzzle Garden, headless.
//!
//! Reads lines from stdin: plain lines are treated as speech, lines
//! starting with `#` are on-screen actions. Announcements are printed.
//!
//! ```bash
//! cargo run -p garden -- --seed 42
//! ```

mod headless;

use anyhow::Context;
use garden_core::GardenConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("garden=info,garden_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mut config = GardenConfig::from_env().context("failed to load configuration")?;
    if let Some(seed) = flag_value(&args, "--seed") {
        let seed = seed
            .parse::<u64>()
            .with_context(|| format!("--seed expects a number, got '{seed}'"))?;
        config = config.with_seed(seed);
    }
    if let Some(levels) = flag_value(&args, "--levels") {
        let levels = levels
            .parse::<u32>()
            .with_context(|| format!("--levels expects a number, got '{levels}'"))?;
        anyhow::ensure!(levels > 0, "--levels must be at least 1");
        config = config.with_max_level(levels);
    }

    headless::run(config).await
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn print_help() {
    println!("Magic Puzzle Garden");
    println!();
    println!("Usage: garden [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --seed <N>      Fixed random seed");
    println!("  --levels <N>    Levels per minigame");
    println!("  -h, --help      Show this help");
    println!();
    println!("Environment:");
    println!("  GARDEN_CONFIG         Path to a JSON config file");
    println!("  GARDEN_SEED           Fixed random seed");
    println!("  GARDEN_MAX_LEVEL      Levels per minigame");
    println!("  GARDEN_VOICE_RETRIES  Speech restarts before giving up");
    println!("  RUST_LOG              Log filter (default: garden=info,garden_core=info)");
}
