use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use slideframe::headless::{FullscreenSupport, HeadlessEvents, HeadlessViewport, ManualScheduler};
use slideframe::platform::{EventKind, ViewportController};
use slideframe::{resolve, EmbedConfig, FullscreenOptions, SlidesWidget, ToggleOutcome};
use tracing_subscriber::{fmt, EnvFilter};

const SAMPLE_URL: &str = "https://docs.google.com/presentation/d/1AbC_23-xyz/edit";

#[derive(Parser)]
#[command(author, version, about = "Google Slides embed widget tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a Google Slides URL to its embed URL
    Resolve {
        /// Presentation URL as a user would paste it
        url: String,
    },
    /// Print the widget markup for a URL or a JSON config file
    Render(RenderArgs),
    /// Drive a widget against an in-memory browser and print what it did
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct RenderArgs {
    #[arg(long)]
    url: Option<String>,
    /// Extra container classes
    #[arg(long)]
    class: Option<String>,
    /// JSON widget configuration; --url and --class override its fields
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value = SAMPLE_URL)]
    url: String,
    /// How the browser answers fullscreen requests
    #[arg(long, value_enum, default_value_t = Support::Reject)]
    support: Support,
    /// Simulated fullscreen without viewport pinning or chrome hiding
    #[arg(long)]
    minimal: bool,
    #[arg(long, default_value_t = 2)]
    toggles: u32,
}

#[derive(Clone, Copy, ValueEnum)]
enum Support {
    Granted,
    Reject,
    RejectAsync,
    Unsupported,
}

impl From<Support> for FullscreenSupport {
    fn from(s: Support) -> Self {
        match s {
            Support::Granted => FullscreenSupport::Granted,
            Support::Reject => FullscreenSupport::RejectSync,
            Support::RejectAsync => FullscreenSupport::RejectAsync,
            Support::Unsupported => FullscreenSupport::Unsupported,
        }
    }
}

fn main() -> ExitCode {
    let _ = fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .try_init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Resolve { url } => run_resolve(&url),
        Commands::Render(args) => run_render(args).map(|_| ExitCode::SUCCESS),
        Commands::Simulate(args) => run_simulate(args).map(|_| ExitCode::SUCCESS),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_resolve(url: &str) -> Result<ExitCode> {
    let Some(reference) = resolve(url) else {
        eprintln!("{}", slideframe::render::INVALID_URL_TEXT);
        return Ok(ExitCode::FAILURE);
    };
    println!("id:        {}", reference.id());
    println!("published: {}", reference.is_published());
    println!("embed:     {}", reference.embed_url());
    Ok(ExitCode::SUCCESS)
}

fn run_render(args: RenderArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            EmbedConfig::from_json(&json).with_context(|| format!("parsing {}", path.display()))?
        }
        None => EmbedConfig::default(),
    };
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(class) = args.class {
        config.class = Some(class);
    }

    let widget = SlidesWidget::new(config, HeadlessViewport::default(), ManualScheduler::new())?;
    println!("{}", widget.render_html());
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let options = if args.minimal { FullscreenOptions::minimal() } else { FullscreenOptions::default() };
    let config = EmbedConfig::new(args.url).with_fullscreen(options.clone());
    let events = HeadlessEvents::new();
    let mut widget = SlidesWidget::new(
        config,
        HeadlessViewport::new(args.support.into()),
        ManualScheduler::new(),
    )?;
    widget.mount(&events);
    println!("listeners: {}", events.total_listeners());

    // long enough for every chrome retry and resettle to come due
    let quiet = options.chrome_retry() + options.orientation_settle();
    for n in 1..=args.toggles {
        let outcome = widget.toggle_fullscreen();
        let controller = widget.controller_mut();
        controller.render_frame();
        controller.settle_platform();
        controller.advance(quiet);
        println!("toggle {}: {:?} -> {:?}", n, outcome, controller.state().mode());
        if let ToggleOutcome::EnteredSimulated(fallback) = outcome {
            println!("  fallback: {}", slideframe::Error::from(fallback));
        }
    }

    // an orientation change while fullscreen re-applies the layout
    if widget.is_fullscreen() && widget.handle_event(EventKind::OrientationChange) {
        widget.controller_mut().advance(quiet);
        println!("orientation change: resettled");
    }

    let viewport = widget.controller().viewport();
    println!("journal:");
    for call in viewport.journal() {
        println!("  {:?}", call);
    }
    println!("root style: {:?}", viewport.root_style());

    widget.unmount();
    println!("listeners after unmount: {}", events.total_listeners());
    println!("{}", widget.render_html());
    Ok(())
}
