use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use forestbot::cli::{env_file_problem, Cli, Commands};
use forestbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TelegramNotifier};
use forestcore::core::{init_logger, log_configuration};
use forestcore::{AppConfig, MemoryRecordStore, Moderator, RecordStore, RegistrationFlow, SessionStore, SheetsStore};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the selected subcommand.
///
/// # Errors
/// Returns an error if initialization fails (configuration, logging, store, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env if present
    let env_problem = env_file_problem(&dotenv());

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            let err = anyhow::Error::from(e);
            return Err(match env_problem {
                Some(problem) => err.context(problem),
                None => err,
            });
        }
    };
    init_logger(&config.log_file_path)?;
    if let Some(problem) = &env_problem {
        log::warn!("⚠️ {}", problem);
    }
    log_configuration(&config);

    match cli.command {
        Some(Commands::Run { memory_store }) => run_bot(config, memory_store).await,
        Some(Commands::SetupSheets) => setup_sheets(&config).await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(config, false).await
        }
    }
}

/// Writes the header row of the record sheet
async fn setup_sheets(config: &AppConfig) -> Result<()> {
    let store = SheetsStore::from_config(config)?;
    store.setup_headers().await?;
    log::info!("✅ Header row written to spreadsheet {}", config.spreadsheet_id);
    Ok(())
}

async fn run_bot(config: Arc<AppConfig>, memory_store: bool) -> Result<()> {
    log::info!("Starting bot...");

    let store: Arc<dyn RecordStore> = if memory_store {
        log::warn!("Using the in-memory record store; records are lost on exit");
        Arc::new(MemoryRecordStore::new())
    } else {
        Arc::new(SheetsStore::from_config(&config)?)
    };

    let bot = create_bot(&config)?;

    let me = bot.get_me().await?;
    log::info!("Bot username: {:?}, Bot ID: {}", me.username.as_deref(), me.id);

    setup_bot_commands(&bot).await?;

    let sessions = Arc::new(SessionStore::new());
    let flow = Arc::new(RegistrationFlow::new(Arc::clone(&store), sessions));
    let notifier = Arc::new(TelegramNotifier::new(bot.clone()));
    let moderator = Arc::new(Moderator::new(Arc::clone(&store), notifier));
    let deps = HandlerDeps::new(config.admin_id, store, flow, moderator);

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, schema(deps))
        .dependencies(DependencyMap::new())
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
