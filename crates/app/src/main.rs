use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use song_chart_core::{
    Beatmap, ChartConfig, ChartCursor, ChartError, CursorPosition, GraphLayout, PeakWarning,
    PlaybackClock, WarningState,
};
use tracing_subscriber::EnvFilter;

fn main() -> song_chart_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sections {
            beatmap,
            config,
            json,
        } => run_sections(&beatmap, config.as_deref(), json),
        Commands::Replay {
            beatmap,
            config,
            fps,
        } => run_replay(&beatmap, config.as_deref(), fps),
    }
}

fn load_config(path: Option<&Path>) -> song_chart_core::Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::load(path),
        None => Ok(ChartConfig::default()),
    }
}

fn run_sections(
    beatmap_path: &Path,
    config_path: Option<&Path>,
    json: bool,
) -> song_chart_core::Result<()> {
    let config = load_config(config_path)?;
    let beatmap = Beatmap::load(beatmap_path)?;
    let sections = beatmap.nps_sections(&config.bucketer())?;
    tracing::info!(?beatmap_path, sections = sections.len(), "built nps chart");

    if json {
        println!("{}", serde_json::to_string_pretty(&sections)?);
        return Ok(());
    }

    for (index, section) in sections.iter().enumerate() {
        println!(
            "Nps at section {}: {} (from [{}] to [{}])",
            index + 1,
            section.nps,
            section.from_time,
            section.to_time
        );
    }
    Ok(())
}

fn run_replay(
    beatmap_path: &Path,
    config_path: Option<&Path>,
    fps: u32,
) -> song_chart_core::Result<()> {
    if fps == 0 {
        return Err(ChartError::msg("--fps must be at least 1"));
    }

    let config = load_config(config_path)?;
    if !config.enabled {
        tracing::info!("chart is disabled in the configuration");
        return Ok(());
    }

    let beatmap = Beatmap::load(beatmap_path)?;
    let sections = beatmap.nps_sections(&config.bucketer())?;
    if sections.is_empty() {
        tracing::info!(?beatmap_path, "beatmap has no countable notes");
        return Ok(());
    }

    let values: Vec<f32> = sections.iter().map(|section| section.nps).collect();
    let layout = GraphLayout::new(&values, &config.graph);
    let cursor = ChartCursor::new(&sections);
    let mut warning = PeakWarning::new(&sections, &config.warning);
    tracing::info!(
        sections = sections.len(),
        peak = ?warning.peak(),
        song_duration = beatmap.song_duration,
        "replaying chart"
    );

    let mut clock = PlaybackClock::default();
    let step = 1.0 / fps as f32;
    let mut current_section = None;
    let mut warning_visible = false;
    loop {
        let time = clock.time_seconds;
        let position = cursor.advance(time);
        match position {
            CursorPosition::Tracking { section, .. } => {
                if current_section != Some(section) {
                    let sample = &sections[section];
                    tracing::info!(
                        time,
                        section,
                        nps = sample.nps,
                        from = sample.from_time,
                        to = sample.to_time,
                        marker = ?position.point(&layout),
                        "entered section"
                    );
                    current_section = Some(section);
                }
            }
            CursorPosition::Finished | CursorPosition::Idle => {
                tracing::info!(time, "reached the end of the chart");
                break;
            }
        }

        let state = warning.update(time);
        match state {
            WarningState::Visible(countdown) if countdown.appeared => {
                tracing::info!(time, "{}", countdown.message());
            }
            WarningState::Visible(countdown) => {
                tracing::debug!(time, alpha = countdown.alpha, "{}", countdown.message());
            }
            WarningState::Hidden if warning_visible => {
                tracing::info!(time, "peak warning hidden");
            }
            WarningState::Hidden => {}
        }
        warning_visible = state.is_visible();

        if time >= beatmap.song_duration {
            break;
        }
        clock.advance(step);
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Notes-per-second chart for rhythm game beatmaps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the notes-per-second sections of a beatmap.
    Sections {
        /// Beatmap JSON file.
        beatmap: PathBuf,
        /// Optional chart configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Emit the sections as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Play a beatmap back against the chart and log cursor and warning
    /// updates.
    Replay {
        /// Beatmap JSON file.
        beatmap: PathBuf,
        /// Optional chart configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Simulated frames per second.
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
}
