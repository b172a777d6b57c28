use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "searchreel", version, about = "Binary-search animation engine")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the animation headless and print phase spans and the outcome.
    Run(RunArgs),
    /// Print the probes of a plain binary search, without animation.
    Trace(TraceArgs),
    /// Render a single tick as PNG (or SVG).
    Frame(FrameArgs),
    /// Render the whole run to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Scene config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Pin the needle.
    #[arg(long, allow_negative_numbers = true)]
    needle: Option<i64>,

    /// Pin the ten values, comma separated, in spawn order.
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    values: Option<Vec<i64>>,

    /// Begin in this phase instead of START.
    #[arg(long)]
    start_phase: Option<String>,
}

impl SceneArgs {
    fn load(&self) -> anyhow::Result<searchreel::SceneConfig> {
        let mut config = match &self.config {
            Some(path) => searchreel::SceneConfig::from_path(path)?,
            None => searchreel::SceneConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(needle) = self.needle {
            config.needle = Some(needle);
        }
        if let Some(values) = &self.values {
            config.values = Some(values.clone());
        }
        if let Some(phase) = &self.start_phase {
            config.start_phase = phase.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = searchreel::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// Values to search, comma separated; sorted before searching.
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    values: Vec<i64>,

    #[arg(long, allow_negative_numbers = true)]
    needle: i64,

    /// Print the trace as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Tick to draw (1-based).
    #[arg(long)]
    tick: u64,

    /// Output path.
    #[arg(long)]
    out: PathBuf,

    /// Write the raw SVG document instead of a PNG.
    #[arg(long)]
    svg: bool,

    /// Extra font files for text rendering.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// END frames appended after the search settles.
    #[arg(long, default_value_t = 120)]
    hold: u64,

    /// Give up after this many ticks.
    #[arg(long, default_value_t = searchreel::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Extra font files for text rendering.
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.scene.load()?;
    let summary = searchreel::headless_run(&config, args.max_ticks)?;

    if args.json {
        let text = serde_json::to_string_pretty(&summary).context("serialize run summary")?;
        println!("{text}");
        return Ok(());
    }

    println!("values: {:?}", summary.dataset.values());
    println!("sorted: {:?}", summary.sorted);
    println!("needle: {}", summary.dataset.needle());
    for span in &summary.spans {
        println!(
            "{:>6}..{:<6} {:>5} ticks  {}",
            span.first_tick.0,
            span.last_tick.0,
            span.ticks(),
            span.phase
        );
    }
    println!("{}", describe(summary.outcome));
    println!("ticks: {}  fingerprint: {:016x}", summary.ticks, summary.fingerprint);
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let mut sorted = args.values;
    sorted.sort_unstable();
    let trace = searchreel::trace(&sorted, args.needle)?;

    if args.json {
        let text = serde_json::to_string_pretty(&trace).context("serialize trace")?;
        println!("{text}");
        return Ok(());
    }

    println!("sorted: {sorted:?}");
    for (step, probe) in trace.probes.iter().enumerate() {
        println!(
            "{}: low={} mid={} high={} value={}",
            step + 1,
            probe.low,
            probe.mid,
            probe.high,
            probe.value
        );
    }
    println!("{}", describe(trace.outcome));
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = args.scene.load()?;
    let tick = searchreel::TickIndex(args.tick);
    if args.svg {
        let svg = searchreel::render_tick_svg(&config, tick)?;
        searchreel::ensure_parent_dir(&args.out)?;
        std::fs::write(&args.out, svg)
            .with_context(|| format!("write svg '{}'", args.out.display()))?;
    } else {
        searchreel::render_tick_png(&config, tick, &args.out, args.font_dir.as_deref())?;
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    if !searchreel::is_ffmpeg_on_path() {
        anyhow::bail!("ffmpeg was not found on PATH");
    }
    let config = args.scene.load()?;
    let mut sink = searchreel::FfmpegSink::new(searchreel::FfmpegSinkOpts {
        out_path: args.out.clone(),
        overwrite: true,
        background: config.background,
    });
    let opts = searchreel::RenderRunOpts {
        hold_ticks: args.hold,
        max_ticks: args.max_ticks,
        font_dir: args.font_dir,
    };
    let stats = searchreel::render_run(&config, &mut sink, &opts)?;
    eprintln!(
        "wrote {} ({} frames, {})",
        args.out.display(),
        stats.frames_total,
        describe(stats.outcome)
    );
    Ok(())
}

fn describe(outcome: searchreel::SearchOutcome) -> String {
    match outcome {
        searchreel::SearchOutcome::Found { index, value } => {
            format!("found {value} at index {index}")
        }
        searchreel::SearchOutcome::NotFound { needle } => format!("{needle} not found"),
    }
}
