use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use crossterm::event::KeyEventKind;
use tracing::info;

use hostwatch::app::App;
use hostwatch::client::{ApiClient, FetchMode, PollSchedule, Poller};
use hostwatch::config::{Config, load_config, load_config_from_path};
use hostwatch::event::{Event, EventHandler};
use hostwatch::server::{self, router, shutdown_signal};
use hostwatch::system::SysinfoProvider;
use hostwatch::{telemetry, ui};

#[derive(Parser)]
#[command(
    name = "hostwatch",
    version,
    about = "Host telemetry server and terminal dashboard"
)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve metrics for this machine over HTTP
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
    },
    /// Poll a metrics server and show a live dashboard
    Dashboard {
        /// Server base URL (overrides HOSTWATCH_SERVER_URL)
        #[arg(long)]
        url: Option<String>,

        #[arg(long, value_enum)]
        fetch_mode: Option<FetchMode>,

        /// Color support: auto, 256, truecolor, mono
        #[arg(long)]
        color: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    match cli.command {
        Command::Serve { .. } => serve(config).await,
        Command::Dashboard { .. } => dashboard(config).await,
    }
}

/// File, then environment, then flags.
fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };
    config.apply_env(|key| std::env::var(key).ok());

    match &cli.command {
        Command::Serve { port, bind } => {
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(bind) = bind {
                config.server.bind = bind.clone();
            }
        }
        Command::Dashboard {
            url,
            fetch_mode,
            color,
        } => {
            if let Some(url) = url {
                config.dashboard.server_url = url.clone();
            }
            if let Some(mode) = fetch_mode {
                config.dashboard.fetch_mode = *mode;
            }
            if let Some(color) = color {
                config.colors.color_support = color.clone();
            }
        }
    }

    config
}

async fn serve(config: Config) -> Result<()> {
    telemetry::init_server_logging(&config.logging)?;

    let address = config.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("failed to bind {address}"))?;

    let provider = Arc::new(SysinfoProvider::new());
    let app = router(provider, config.server.settings());
    server::run(listener, app, shutdown_signal()).await?;
    Ok(())
}

async fn dashboard(config: Config) -> Result<()> {
    telemetry::init_dashboard_logging(&config.logging)?;

    let client = ApiClient::new(
        config.dashboard.server_url.clone(),
        config.dashboard.request_timeout(),
    )?;
    info!(url = client.base_url(), "dashboard starting");

    let schedule = PollSchedule {
        mode: config.dashboard.fetch_mode,
        intervals: config.intervals.to_intervals(),
    };

    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let poller = Poller::start(Arc::new(client), schedule);
    let result = run(&mut terminal, &config, poller).await;

    ratatui::restore();

    result
}

async fn run(
    terminal: &mut ratatui::DefaultTerminal,
    config: &Config,
    mut poller: Poller,
) -> Result<()> {
    let mut app = App::new(config);
    let mut events = EventHandler::new(config.dashboard.tick_rate());

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                match event {
                    Event::Key(key) => {
                        if key.kind == KeyEventKind::Press {
                            let action = app.map_key(key);
                            app.dispatch(action);
                            if app.take_refresh_request() {
                                poller.refresh_now();
                            }
                        }
                    }
                    Event::Tick | Event::Resize => {}
                }
            }
            update = poller.next() => {
                let Some(update) = update else { break };
                app.on_poll(update);
            }
        }
        terminal.draw(|frame| ui::draw(frame, &app))?;
    }

    poller.stop();
    Ok(())
}
