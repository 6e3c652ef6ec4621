use teloxide::types::{Message, User};

use crate::{command::Command, models::callback::CallbackData};

/// Inbound update, reduced to what the conversation cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Command(Command),
    Text(String),
    /// Photo message; carries the file id of the largest size.
    Media { file_id: String },
    Location { latitude: f64, longitude: f64 },
    Callback(CallbackData),
    /// Anything else, including slash-commands the bot does not know.
    Unsupported,
}

impl From<&Message> for Event {
    fn from(msg: &Message) -> Self {
        if let Some(photo) = msg.photo().and_then(|sizes| sizes.last()) {
            Event::Media {
                file_id: photo.file.id.clone(),
            }
        } else if let Some(location) = msg.location() {
            Event::Location {
                latitude: location.latitude,
                longitude: location.longitude,
            }
        } else if let Some(text) = msg.text().filter(|text| !text.starts_with('/')) {
            Event::Text(text.to_owned())
        } else {
            Event::Unsupported
        }
    }
}

/// The user an event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    pub id: u64,
    pub username: Option<String>,
}

impl From<&User> for Sender {
    fn from(user: &User) -> Self {
        Sender {
            id: user.id.0,
            username: user.username.clone(),
        }
    }
}
