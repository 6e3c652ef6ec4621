mod command;
mod config;
mod conversation;
mod database;
mod error;
mod handlers;
mod menu;
mod models;
mod registration;
mod reply;
mod state;

use std::{env, process, sync::Arc};

use log::{error, info, warn};
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*, utils::command::BotCommands};

use crate::{
    command::Command,
    config::{Config, STORE_CREDENTIALS_VAR, TOKEN_VAR},
    database::ProfileStore,
    state::State,
};

fn initialize() -> Option<Config> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    match Config::from_env() {
        Ok(config) => Some(config),
        Err(err) => {
            error!("{err}. The bot is stopping.");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    let Some(config) = initialize() else {
        process::exit(1);
    };

    info!("Initializing the profile store before polling...");
    let has_credentials = config.store_credentials.is_some();
    let store = Arc::new(ProfileStore::new(config.store_credentials));
    store.initialize().await;

    info!("{TOKEN_VAR} found: yes");
    info!("{STORE_CREDENTIALS_VAR} found: {}", if has_credentials { "yes" } else { "no" });
    info!("Isolation mode at start: {}", store.is_isolated());

    let bot = Bot::new(config.bot_token);

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        warn!("Failed to register bot commands: {err}");
    }

    info!("Starting bot...");

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![InMemStorage::<State>::new(), store])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
