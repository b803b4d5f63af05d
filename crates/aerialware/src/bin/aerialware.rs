use std::path::PathBuf;

use aerialware::{plan_mission, MissionConfig, MissionReport, Session, Stage};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "aerialware",
    version,
    about = "Plan aerial photography flight paths over a georeferenced image"
)]
struct Cli {
    /// Mission config (JSON).
    config: PathBuf,

    /// Report path. Overrides `output_path` from the config.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit tracing events as JSON.
    #[cfg(feature = "tracing")]
    #[arg(long)]
    json_logs: bool,
}

fn init_logging(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let level = aerialware::core::verbosity_level(cli.verbose);
    #[cfg(feature = "tracing")]
    aerialware::core::init_tracing(cli.json_logs, level);
    #[cfg(not(feature = "tracing"))]
    aerialware::core::init_with_level(level)?;
    Ok(())
}

fn print_summary(session: &Session) {
    if let Some(grid) = session.grid() {
        println!(
            "grid: {} x {} cells, {} selected",
            grid.rows(),
            grid.cols(),
            session.selection().len()
        );
    }
    if let Some(paths) = session.paths() {
        for (name, path) in [("meridian", &paths.meridian), ("horizontal", &paths.horizontal)] {
            println!(
                "{name:>10}: {} legs, {:.1} m with turns, {:.1} m without",
                path.leg_count(),
                path.length_with_turns_m,
                path.length_without_turns_m
            );
        }
    }
    if let Some(camera) = session.camera_params() {
        println!(
            "camera: {} x {} px, focal length {:.3} mm",
            camera.camera.width_px, camera.camera.height_px, camera.focal_length_mm
        );
    }
    if session.stage() < Stage::PathsComputed {
        println!("no cells selected");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let cfg = MissionConfig::load_json(&cli.config)?;
    let output = cli.output.clone().unwrap_or_else(|| cfg.output_path());
    let mut report = MissionReport::new(&cfg, &cli.config);

    let result = plan_mission(&cfg);
    match &result {
        Ok(session) => {
            print_summary(session);
            report.set_plan(session);
        }
        Err(err) => report.set_error(err),
    }
    report.write_json(&output)?;
    log::info!("report written to {}", output.display());

    result?;
    Ok(())
}
