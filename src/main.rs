use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use tracing::error;

use sf_schools::config::PipelineConfig;
use sf_schools::constants::USAGE;
use sf_schools::logging;
use sf_schools::metrics;
use sf_schools::pipeline::SchoolPipeline;

#[derive(Parser)]
#[command(name = "sf_schools")]
#[command(about = "Clean and merge San Francisco private and public school GeoJSON")]
#[command(version)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// Private schools GeoJSON FeatureCollection
    private_input: PathBuf,
    /// Public schools GeoJSON FeatureCollection
    public_input: PathBuf,
    /// Where to write the merged GeoJSON
    output: PathBuf,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let pipeline = SchoolPipeline::new(PipelineConfig::default());
    let result = pipeline
        .run(&cli.private_input, &cli.public_input, &cli.output)
        .with_context(|| {
            format!(
                "failed to merge {} and {}",
                cli.private_input.display(),
                cli.public_input.display()
            )
        })?;

    tracing::debug!(
        "Run summary: {}",
        serde_json::to_string(&result).unwrap_or_default()
    );
    if let Some(snapshot) = metrics::render_metrics() {
        tracing::debug!("Metrics snapshot:\n{}", snapshot);
    }
    Ok(())
}

fn main() {
    // Anything but exactly three paths, including --help, gets the usage line
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            println!("{}", USAGE);
            process::exit(1);
        }
    };

    logging::init_logging();
    metrics::init_metrics();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
