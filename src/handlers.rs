use std::sync::Arc;

use chrono::Local;
use log::{debug, warn};
use teloxide::{
    dispatching::{
        dialogue::{self, InMemStorage},
        UpdateHandler,
    },
    prelude::*,
    types::{
        ButtonRequest, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
        KeyboardMarkup, KeyboardRemove, MessageId,
    },
};

use crate::{
    command::Command,
    conversation,
    database::ProfileStore,
    models::{
        callback::CallbackData,
        event::{Event, Sender},
    },
    reply::{Button, Reply},
    state::State,
};

pub type Dialog = Dialogue<State, InMemStorage<State>>;
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

const SEND_LOCATION: &str = "📍 Send location";

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = teloxide::filter_command::<Command, _>().endpoint(receive_command);

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(receive_message));

    let callback_query_handler = Update::filter_callback_query().endpoint(receive_callback);

    dialogue::enter::<Update, InMemStorage<State>, State, _>()
        .branch(message_handler)
        .branch(callback_query_handler)
}

async fn receive_command(
    bot: Bot,
    dialog: Dialog,
    state: State,
    msg: Message,
    cmd: Command,
    store: Arc<ProfileStore>,
) -> HandlerResult {
    let Some(sender) = msg.from().map(Sender::from) else {
        debug!("command without a sender in chat {}", msg.chat.id);
        return Ok(());
    };

    run(&bot, &dialog, &store, &sender, state, Event::Command(cmd), None).await
}

async fn receive_message(
    bot: Bot,
    dialog: Dialog,
    state: State,
    msg: Message,
    store: Arc<ProfileStore>,
) -> HandlerResult {
    let Some(sender) = msg.from().map(Sender::from) else {
        debug!("message without a sender in chat {}", msg.chat.id);
        return Ok(());
    };

    run(&bot, &dialog, &store, &sender, state, Event::from(&msg), None).await
}

async fn receive_callback(
    bot: Bot,
    dialog: Dialog,
    state: State,
    q: CallbackQuery,
    store: Arc<ProfileStore>,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q
        .data
        .as_deref()
        .and_then(|data| data.parse::<CallbackData>().ok())
    else {
        warn!("ignoring unknown callback data {:?}", q.data);
        return Ok(());
    };

    let origin = q.message.as_ref().map(|msg| msg.id);
    let sender = Sender::from(&q.from);

    run(&bot, &dialog, &store, &sender, state, Event::Callback(data), origin).await
}

async fn run(
    bot: &Bot,
    dialog: &Dialog,
    store: &ProfileStore,
    sender: &Sender,
    state: State,
    event: Event,
    origin: Option<MessageId>,
) -> HandlerResult {
    debug!("user {}: {:?} <- {:?}", sender.id, state, event);

    let today = Local::now().date_naive();
    let turn = conversation::handle(store, sender, state, event, today).await;

    dialog.update(turn.state).await?;
    send_replies(bot, dialog.chat_id(), origin, turn.replies).await
}

fn inline_keyboard(buttons: &[Vec<Button>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(buttons.iter().map(|row| {
        row.iter()
            .map(|button| {
                InlineKeyboardButton::callback(button.label.clone(), button.data.to_string())
            })
            .collect::<Vec<_>>()
    }))
}

fn location_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new([[KeyboardButton::new(SEND_LOCATION).request(ButtonRequest::Location)]])
        .resize_keyboard(true)
        .one_time_keyboard(true)
}

async fn send_replies(
    bot: &Bot,
    chat_id: ChatId,
    origin: Option<MessageId>,
    replies: Vec<Reply>,
) -> HandlerResult {
    for reply in replies {
        match reply {
            Reply::Text(text) => {
                bot.send_message(chat_id, text).await?;
            }
            Reply::Buttons { text, buttons } => {
                bot.send_message(chat_id, text)
                    .reply_markup(inline_keyboard(&buttons))
                    .await?;
            }
            Reply::Edit { text, buttons } => match origin {
                Some(message_id) if buttons.is_empty() => {
                    bot.edit_message_text(chat_id, message_id, text).await?;
                }
                Some(message_id) => {
                    bot.edit_message_text(chat_id, message_id, text)
                        .reply_markup(inline_keyboard(&buttons))
                        .await?;
                }
                None if buttons.is_empty() => {
                    bot.send_message(chat_id, text).await?;
                }
                None => {
                    bot.send_message(chat_id, text)
                        .reply_markup(inline_keyboard(&buttons))
                        .await?;
                }
            },
            Reply::RequestLocation(text) => {
                bot.send_message(chat_id, text)
                    .reply_markup(location_keyboard())
                    .await?;
            }
            Reply::RemoveKeyboard(text) => {
                if let Err(err) = bot
                    .send_message(chat_id, text)
                    .reply_markup(KeyboardRemove::new())
                    .await
                {
                    warn!("Failed to clear the reply keyboard in chat {chat_id}: {err}");
                }
            }
        }
    }

    Ok(())
}
