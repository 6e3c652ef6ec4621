//! Routes one inbound event for one user: commands, the home menu, and the
//! registration steps. Returns the user's next dialogue state and the replies
//! to send, without touching the chat transport.

use chrono::NaiveDate;
use log::{error, info, warn};
use teloxide::utils::command::BotCommands;

use crate::{
    command::Command,
    database::ProfileStore,
    menu,
    models::{
        callback::CallbackData,
        event::{Event, Sender},
        profile::Profile,
    },
    registration::{self, Outcome, Step},
    reply::Reply,
    state::State,
};

pub const LOADING: &str = "Loading...";
pub const PROFILE_SAVED: &str = "✅ Profile saved!";
pub const SAVE_FAILED: &str = "⚠ Failed to save your profile (database unavailable). \
    You can keep going, but your data was not stored.";
pub const UNRECOGNIZED: &str = "I don't recognize that. Use /start to begin.";
pub const NOTHING_TO_CANCEL: &str = "There is nothing to cancel.";

#[derive(Debug)]
pub struct Turn {
    pub state: State,
    pub replies: Vec<Reply>,
}

impl Turn {
    fn idle(replies: Vec<Reply>) -> Self {
        Turn {
            state: State::Start,
            replies,
        }
    }
}

pub async fn handle(
    store: &ProfileStore,
    sender: &Sender,
    state: State,
    event: Event,
    today: NaiveDate,
) -> Turn {
    match event {
        Event::Command(Command::Help) => Turn {
            state,
            replies: vec![Reply::text(Command::descriptions().to_string())],
        },
        Event::Command(Command::Start) => {
            if state.is_registering() {
                info!("user {} restarted, registration draft dropped", sender.id);
            }
            Turn::idle(start(store, sender).await)
        }
        Event::Callback(CallbackData::StartRegistration) => {
            info!("user {} started registration", sender.id);
            finish_step(store, sender, registration::begin()).await
        }
        Event::Callback(CallbackData::GoHome) => Turn {
            state,
            replies: show_home(store, sender).await,
        },
        Event::Callback(CallbackData::Menu(action)) => Turn {
            state,
            replies: vec![menu::acknowledge(action)],
        },
        event if state.is_registering() => {
            let step = registration::advance(state, event, today);
            finish_step(store, sender, step).await
        }
        Event::Command(Command::Cancel) => Turn::idle(vec![Reply::text(NOTHING_TO_CANCEL)]),
        // Stale photo buttons from an abandoned registration.
        Event::Callback(_) => Turn::idle(Vec::new()),
        _ => Turn::idle(vec![Reply::text(UNRECOGNIZED)]),
    }
}

/// `/start`: home menu for registered users, registration prompt otherwise.
pub async fn start(store: &ProfileStore, sender: &Sender) -> Vec<Reply> {
    let mut replies = vec![Reply::RemoveKeyboard(LOADING.to_string())];

    match store.get_profile(sender.id).await {
        Some(profile) if profile.is_complete() => replies.push(menu::home(&profile)),
        _ => replies.push(menu::welcome()),
    }

    replies
}

pub async fn show_home(store: &ProfileStore, sender: &Sender) -> Vec<Reply> {
    match store.get_profile(sender.id).await {
        Some(profile) if profile.is_complete() => vec![menu::home(&profile)],
        _ => vec![Reply::text(menu::PROFILE_NOT_FOUND), menu::welcome()],
    }
}

async fn finish_step(store: &ProfileStore, sender: &Sender, step: Step) -> Turn {
    let Step {
        outcome,
        mut replies,
    } = step;

    match outcome {
        Outcome::Continue(state) => Turn { state, replies },
        Outcome::Cancelled => Turn::idle(replies),
        Outcome::Completed(draft) => {
            match draft.finish(sender) {
                Some(profile) => replies.extend(save(store, profile).await),
                None => {
                    error!("user {} finished registration with missing fields", sender.id);
                    replies.push(Reply::RemoveKeyboard(
                        "Something went wrong. Use /start to try again.".to_string(),
                    ));
                }
            }
            Turn::idle(replies)
        }
    }
}

/// The home menu is shown even if the write fails; the user then has no
/// stored profile until they register again.
async fn save(store: &ProfileStore, profile: Profile) -> Vec<Reply> {
    let saved = match profile.to_fields() {
        Ok(fields) => store.upsert_profile(profile.user_id, fields).await,
        Err(err) => {
            error!("profile {} could not be encoded: {err}", profile.user_id);
            false
        }
    };

    let notice = if saved {
        info!("profile {} saved", profile.user_id);
        PROFILE_SAVED
    } else {
        warn!("profile {} was not saved, continuing without it", profile.user_id);
        SAVE_FAILED
    };

    vec![
        Reply::RemoveKeyboard(notice.to_string()),
        menu::home(&profile),
    ]
}
