//! Binary entrypoint for the inkbadge gateway CLI.
//!
//! Commands:
//! - `serve` - run the HTTP gateway and register known badges with the radio
//! - `init` - create a starter `config.toml`
//! - `peers` - list the persisted badge addresses
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};

use inkbadge::config::Config;
use inkbadge::gateway::{self, AppState, ChunkedSender};
use inkbadge::radio::{DisconnectedRadio, RadioTransport};
use inkbadge::storage::PeerStore;

#[derive(Parser)]
#[command(name = "inkbadge")]
#[command(about = "E-paper badge gateway for a short-range radio link")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP gateway
    Serve {
        /// Bind address (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Initialize a new gateway configuration
    Init,
    /// List the persisted badge addresses
    Peers,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Serve { bind } => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            info!("Starting inkbadge v{}", env!("CARGO_PKG_VERSION"));

            let store = PeerStore::open(&config.storage.data_dir)?;

            // No physical radio is wired in yet; the gateway still serves its
            // HTTP surface and sends report a failed status, mirroring a
            // device-less start.
            let radio: Arc<dyn RadioTransport> = Arc::new(DisconnectedRadio);
            warn!("no radio device attached; sends will be rejected until one is");

            for peer in store.list()? {
                match radio.register_peer(peer) {
                    Ok(()) => info!("registered known badge {}", peer),
                    Err(e) => warn!("could not register {}: {}", peer, e),
                }
            }

            let sender = ChunkedSender::new(
                radio.clone(),
                config.gateway.effective_chunk_size(),
                Duration::from_millis(config.gateway.chunk_delay_ms),
            );
            let state = Arc::new(AppState {
                store,
                radio,
                sender,
                bitmap_len: config.badge.bitmap_len(),
            });

            let bind = bind.unwrap_or_else(|| config.gateway.bind.clone());
            gateway::run(state, &bind).await?;
        }
        Commands::Init => {
            info!("Initializing new gateway configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Peers => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let store = PeerStore::open(&config.storage.data_dir)?;
            let peers = store.list()?;
            if peers.is_empty() {
                println!("No badges registered.");
            } else {
                for peer in peers {
                    println!("{}", peer);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // Base level from CLI verbosity overrides config
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));

            // If stdout is a terminal, write to both file and console.
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        } else {
            default_format(&mut builder);
        }
    } else {
        default_format(&mut builder);
    }
    let _ = builder.try_init();
}

fn default_format(builder: &mut env_logger::Builder) {
    use std::io::Write;
    builder.format(|fmt, record| {
        writeln!(
            fmt,
            "{} [{}] {}",
            chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
            record.level(),
            record.args()
        )
    });
}
