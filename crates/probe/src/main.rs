use std::path::PathBuf;

use clap::Parser;
use miette::IntoDiagnostic;
use winit::event_loop::EventLoop;

mod app;
mod config;

#[derive(Debug, Parser)]
#[command(name = "gpick")]
#[command(about = "Picks a graphics device for a window and negotiates its swapchain")]
#[command(rename_all = "kebab-case")]
struct Cli {
    /// Path to a config file.
    /// Applied over the user config and `GPICK_` environment variables.
    #[arg(long = "config", value_name = "path")]
    config: Option<PathBuf>,

    /// Initial window width in logical pixels.
    #[arg(long = "width", value_name = "px")]
    width: Option<u32>,

    /// Initial window height in logical pixels.
    #[arg(long = "height", value_name = "px")]
    height: Option<u32>,

    /// Require the validation layer and route its messages to the log.
    #[arg(long = "validation")]
    validation: bool,

    /// Negotiate once, print the result and exit.
    #[arg(long = "once")]
    once: bool,

    /// Print every device with its score or rejection and exit.
    #[arg(long = "list", conflicts_with = "once")]
    list: bool,
}

fn main() -> miette::Result<()> {
    install_tracing_subscriber();

    let cli = Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    if cli.width.is_some() {
        config.width = cli.width;
    }
    if cli.height.is_some() {
        config.height = cli.height;
    }
    if cli.validation {
        config.validation = Some(true);
    }

    let mode = if cli.list {
        app::Mode::List
    } else if cli.once {
        app::Mode::Once
    } else {
        app::Mode::Run
    };

    let event_loop = EventLoop::new().into_diagnostic()?;
    let mut app = app::App::new(config.settings(), mode);
    event_loop.run_app(&mut app).into_diagnostic()?;
    app.finish()
}

fn install_tracing_subscriber() {
    use tracing_subscriber::layer::SubscriberExt as _;
    if let Err(err) = tracing::subscriber::set_global_default(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish()
            .with(tracing_error::ErrorLayer::default()),
    ) {
        panic!("Failed to install tracing subscriber: {}", err);
    }
}
