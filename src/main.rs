//! Binary entrypoint for the forgebot CLI.
//!
//! Commands:
//! - `start [--console]` - run the bot server, optionally with the stdin
//!   console connector for credential-less local play
//! - `init` - create a starter `config.toml`
//! - `status` - print a ledger summary without starting the server
//!
//! See the library crate docs for module-level details: `forgebot::`.
use anyhow::Result;
use clap::{Parser, Subcommand};
use log::{info, warn};

use forgebot::bot::BotServer;
use forgebot::config::Config;
use forgebot::game::EconomyEngine;
use forgebot::storage::Storage;
use forgebot::{gateway, web};

#[derive(Parser)]
#[command(name = "forgebot")]
#[command(about = "A chat-platform bot running an item-enhancement economy game")]
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
    /// Start the bot server
    Start {
        /// Attach the stdin/stdout console connector
        #[arg(long)]
        console: bool,
    },
    /// Initialize a new bot configuration
    Init,
    /// Show ledger status and statistics
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config early to configure logging (except for Init which writes it)
    let pre_config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&pre_config, cli.verbose);

    match cli.command {
        Commands::Start { console } => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            info!("Starting forgebot v{}", env!("CARGO_PKG_VERSION"));

            if gateway::token_from_env().is_some() {
                info!("gateway credential present (FORGEBOT_TOKEN)");
            } else {
                warn!("FORGEBOT_TOKEN not set; platform connectors cannot authenticate");
            }

            let storage = Storage::new(&config.storage.data_dir).await?;
            let engine = EconomyEngine::load(storage).await?;
            let (server, channels) = BotServer::new(engine, config.command_prefix());

            // Status endpoint runs beside the server loop and is cancelled
            // when the loop returns.
            let web_task = if config.web.enabled {
                let listener = web::bind(config.web_port()).await?;
                Some(tokio::spawn(web::serve(listener, config.bot.name.clone())))
            } else {
                None
            };

            // Without a connector the channel pair must stay alive so the
            // server loop idles instead of seeing a closed event source.
            let _standby = if console {
                gateway::start_console(channels);
                None
            } else {
                info!("no connector attached; waiting for an external gateway (use --console for local play)");
                Some(channels)
            };

            let result = server.run().await;
            if let Some(task) = web_task {
                task.abort();
            }
            result?;
        }
        Commands::Init => {
            info!("Initializing new bot configuration");
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Status => {
            let config = match pre_config {
                Some(config) => config,
                None => Config::load(&cli.config).await?,
            };
            let storage = Storage::new(&config.storage.data_dir).await?;
            let engine = EconomyEngine::load(storage).await?;
            let best = engine.best_record();
            println!("forgebot v{}", env!("CARGO_PKG_VERSION"));
            println!("users: {}", engine.user_count());
            println!("total gold in circulation: {}", engine.total_gold());
            println!(
                "best record: {} — {} (+{})",
                best.username, best.item_name, best.level
            );
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
    let log_file = config.as_ref().and_then(|c| c.logging.file.clone());
    if let Some(file) = log_file {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // When stdout is a TTY, mirror the file log to the console.
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
            builder.format(default_log_format);
        }
    } else {
        builder.format(default_log_format);
    }
    let _ = builder.try_init();
}

fn default_log_format(
    fmt: &mut env_logger::fmt::Formatter,
    record: &log::Record,
) -> std::io::Result<()> {
    use std::io::Write;
    writeln!(
        fmt,
        "{} [{}] {}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
        record.level(),
        record.args()
    )
}
