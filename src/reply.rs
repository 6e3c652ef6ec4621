use crate::models::callback::CallbackData;

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    pub label: String,
    pub data: CallbackData,
}

impl Button {
    pub fn new(label: impl Into<String>, data: CallbackData) -> Self {
        Button {
            label: label.into(),
            data,
        }
    }
}

/// Outbound message, rendered onto the chat by the handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Buttons {
        text: String,
        buttons: Vec<Vec<Button>>,
    },
    /// Replaces the message whose button was pressed. Sent as a new message
    /// when there is nothing to edit.
    Edit {
        text: String,
        buttons: Vec<Vec<Button>>,
    },
    /// Text with a one-time reply keyboard asking for the user's location.
    RequestLocation(String),
    /// Text that clears any reply keyboard. Failing to send it is not fatal.
    RemoveKeyboard(String),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }
}

#[cfg(test)]
impl Reply {
    pub fn body(&self) -> &str {
        match self {
            Reply::Text(text)
            | Reply::Buttons { text, .. }
            | Reply::Edit { text, .. }
            | Reply::RequestLocation(text)
            | Reply::RemoveKeyboard(text) => text,
        }
    }

    pub fn buttons(&self) -> &[Vec<Button>] {
        match self {
            Reply::Buttons { buttons, .. } | Reply::Edit { buttons, .. } => buttons,
            _ => &[],
        }
    }
}
