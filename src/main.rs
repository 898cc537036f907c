use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use terraflora_lib::app::{App, Overrides};
use terraflora_lib::model::Season;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path (defaults to ./terraflora.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed grid width before expansion
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i32>,

    /// Seed grid height before expansion
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i32>,

    /// Number of resolution-doubling passes
    #[arg(short, long)]
    expand: Option<u32>,

    /// Seed string; omit for a non-reproducible map
    #[arg(short, long)]
    seed: Option<String>,

    /// Season of the first day (spring, summer, fall, winter)
    #[arg(long, value_parser = parse_season)]
    start_season: Option<Season>,

    /// Ticks to simulate after generation
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Ticks between ecosystem reports
    #[arg(long)]
    report_interval: Option<u64>,

    /// Write events and reports as JSON lines to this file
    #[arg(short, long)]
    journal: Option<PathBuf>,
}

fn parse_season(name: &str) -> Result<Season, String> {
    Season::parse(name).ok_or_else(|| format!("unknown season `{name}`"))
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "terraflora=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = App::load_config(args.config.as_deref())?;
    Overrides {
        width: args.width,
        height: args.height,
        expand_passes: args.expand,
        seed: args.seed,
        start_season: args.start_season,
        ticks: args.ticks,
        report_interval: args.report_interval,
    }
    .apply(&mut config);

    let mut app = App::new(config)?;
    if let Some(path) = &args.journal {
        app.attach_journal(path)?;
    }
    let stats = app.run()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
