//! Live Dashboard
//!
//! - `serve`: run the HTTP/WebSocket server
//! - `watch`: run one session in the terminal
//! - `config`: print a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use live_dashboard::api::{serve, AppState};
use live_dashboard::config::{generate_default_config, Config, LoggingConfig};
use live_dashboard::scheduler::TokioScheduler;
use live_dashboard::session::{self, DashboardSession, SessionConfig};
use live_dashboard::views::{render_table, DashboardView};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "live-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Live dashboard of a simulated temperature sensor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the dashboard server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print live updates of a single session to the terminal
    Watch {
        /// Stop after this many readings (default: run until Ctrl+C)
        #[arg(short = 'n', long)]
        ticks: Option<u64>,
        /// Seed for a reproducible sequence
        #[arg(long)]
        seed: Option<u64>,
        /// Seconds between readings
        #[arg(short, long)]
        interval: Option<f64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.dashboard.validate()?;

            tracing::info!(
                interval_secs = config.dashboard.update_interval_secs,
                history = config.dashboard.history_max_length,
                range = %config.dashboard.value_range,
                "Dashboard settings"
            );

            let server = config.server.clone();
            serve(AppState::new(config), &server).await?;
        }
        Commands::Watch {
            ticks,
            seed,
            interval,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(secs) = interval {
                config.dashboard.update_interval_secs = secs;
            }
            config.dashboard.validate()?;

            let mut session_config = SessionConfig::from(&config.dashboard);
            if let Some(seed) = seed {
                session_config = session_config.with_seed(seed);
            }
            watch(session_config, ticks).await?;
        }
        Commands::Config { output } => write_default_config(output.as_ref())?,
    }

    Ok(())
}

/// Load configuration and start logging
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let config = match path {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load_default().context("loading default config")?,
    };

    init_tracing(&config.logging);
    tracing::info!("Live dashboard v{}", env!("CARGO_PKG_VERSION"));
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("live_dashboard={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn write_default_config(output: Option<&PathBuf>) -> anyhow::Result<()> {
    let content = generate_default_config();
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote default config to {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Run one session on the Tokio timer, printing every update
async fn watch(config: SessionConfig, ticks: Option<u64>) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<DashboardView>();

    let mut dashboard = DashboardSession::new(config).context("creating reading generator")?;
    dashboard.subscribe_view(move |view| {
        let _ = tx.send(view);
    });

    let dashboard = dashboard.into_shared();
    let mut ticker = DashboardSession::start(&dashboard, &TokioScheduler::new());

    tracing::info!(
        interval_secs = config.update_interval.as_secs_f64(),
        history = config.history_max_length,
        "Watching (Ctrl+C to stop)"
    );

    let mut seen = 0u64;
    loop {
        tokio::select! {
            update = rx.recv() => {
                let Some(view) = update else { break };
                print_view(&view);
                seen += 1;
                if ticks.is_some_and(|limit| seen >= limit) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    ticker.cancel();
    let snapshot = session::lock(&dashboard).snapshot();
    tracing::info!(recorded = snapshot.total_recorded, "Watch finished");
    Ok(())
}

fn print_view(view: &DashboardView) {
    println!("Current Temperature: {}", view.current_temperature);
    println!("{}", view.date_time);
    print!("{}", render_table(&view.readings, view.unit));
    if let Some(label) = &view.trend_label {
        println!("Trend: {}", label);
    }
    println!();
}
