use clap::{ArgEnum, Args, Parser, Subcommand};
use eyre::eyre;
use ride_duel::align::period_of;
use ride_duel::export::{feature_collection, gap_readout};
use ride_duel::loader::{parse_gpx_file, parse_timestamp};
use ride_duel::{derive, Aligner, DistanceModel, Params, RiderLabel, Track, TrackSummary};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Debug logging on stderr
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a GeoJSON FeatureCollection with one point feature per sample of both riders.
    ///
    /// The GeoJSON will be written to stdout
    ToGeoJson(DuelArgs),
    /// Write the gap between both riders for every step of the ride as a JSON array.
    ///
    /// The JSON will be written to stdout
    GapTimeline(TimelineArgs),
    /// Write the gap between both riders at a single point in time as JSON.
    GapAt(GapAtArgs),
    /// Write distance, duration and speed statistics of both riders as JSON.
    Summary(DuelArgs),
}

#[derive(Args, Debug)]
struct DuelArgs {
    /// GPX file of rider A
    gpx_a: PathBuf,

    /// GPX file of rider B
    gpx_b: PathBuf,

    #[clap(long, default_value = "A")]
    name_a: String,

    #[clap(long, default_value = "B")]
    name_b: String,

    #[clap(long, default_value = "blue")]
    color_a: String,

    #[clap(long, default_value = "red")]
    color_b: String,

    /// JSON file with processing parameters, overridden by the flags below
    #[clap(long)]
    params: Option<PathBuf>,

    #[clap(long, arg_enum)]
    distance_model: Option<DistanceModelOpt>,

    /// Decimals kept for speeds and distances
    #[clap(long)]
    precision: Option<u32>,
}

#[derive(Args, Debug)]
struct TimelineArgs {
    #[clap(flatten)]
    duel: DuelArgs,

    /// Seconds between two timeline steps
    #[clap(long)]
    period_secs: Option<f64>,
}

#[derive(Args, Debug)]
struct GapAtArgs {
    #[clap(flatten)]
    duel: DuelArgs,

    /// ISO-8601 time, UTC when no offset is given
    time: String,
}

#[derive(ArgEnum, Clone, Copy, Debug)]
enum DistanceModelOpt {
    Haversine,
    Geodesic,
}

impl From<DistanceModelOpt> for DistanceModel {
    fn from(value: DistanceModelOpt) -> Self {
        match value {
            DistanceModelOpt::Haversine => DistanceModel::Haversine,
            DistanceModelOpt::Geodesic => DistanceModel::Geodesic,
        }
    }
}

struct Duel {
    params: Params,
    a: Track,
    b: Track,
}

fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| eyre!("failed to set up logging: {}", e))?;

    match &args.command {
        Command::ToGeoJson(duel_args) => {
            let duel = load_duel(duel_args, None)?;
            println!("{}", feature_collection(&[&duel.a, &duel.b])?);
        }
        Command::GapTimeline(timeline_args) => {
            let duel = load_duel(&timeline_args.duel, timeline_args.period_secs)?;
            let aligner = Aligner::new(&duel.a, &duel.b, &duel.params);
            let timeline = aligner.timeline(period_of(&duel.params)?)?;
            info!("{} timeline entries", timeline.len());
            println!("{}", serde_json::to_string(&timeline)?);
        }
        Command::GapAt(gap_args) => {
            let t = parse_timestamp(&gap_args.time)
                .ok_or_else(|| eyre!("can not parse time {:?}", gap_args.time))?;
            let duel = load_duel(&gap_args.duel, None)?;
            let result = Aligner::new(&duel.a, &duel.b, &duel.params).align_at(t);
            match result.as_ref() {
                Some(result) => info!("{}", gap_readout(result, duel.a.label(), duel.b.label())),
                None => info!("no alignment at {}, a track is empty", t),
            }
            println!("{}", serde_json::to_string(&result)?);
        }
        Command::Summary(duel_args) => {
            let duel = load_duel(duel_args, None)?;
            let summaries = vec![TrackSummary::of(&duel.a), TrackSummary::of(&duel.b)];
            println!("{}", serde_json::to_string(&summaries)?);
        }
    }
    Ok(())
}

fn build_params(args: &DuelArgs, period_secs: Option<f64>) -> eyre::Result<Params> {
    let mut params = match args.params.as_ref() {
        Some(path) => Params::from_json_str(&fs::read_to_string(path)?)?,
        None => Params::default(),
    };
    if let Some(model) = args.distance_model {
        params.distance_model = model.into();
    }
    if let Some(precision) = args.precision {
        params.precision = precision;
    }
    if let Some(period_secs) = period_secs {
        params.period_secs = period_secs;
    }
    params.validate()?;
    Ok(params)
}

fn load_track(path: &Path, label: RiderLabel, params: &Params) -> eyre::Result<Track> {
    let report = parse_gpx_file(path)?;
    info!(
        "{}: {} samples from {} ({} dropped, {} duplicate timestamps)",
        label.name,
        report.samples.len(),
        path.display(),
        report.dropped.len(),
        report.duplicates
    );
    Ok(derive(label, &report.samples, params))
}

fn load_duel(args: &DuelArgs, period_secs: Option<f64>) -> eyre::Result<Duel> {
    let params = build_params(args, period_secs)?;
    let a = load_track(
        &args.gpx_a,
        RiderLabel::new(args.name_a.as_str()).with_color(args.color_a.as_str()),
        &params,
    )?;
    let b = load_track(
        &args.gpx_b,
        RiderLabel::new(args.name_b.as_str()).with_color(args.color_b.as_str()),
        &params,
    )?;
    Ok(Duel { params, a, b })
}
