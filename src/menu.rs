use crate::{
    models::{callback::CallbackData, profile::Profile},
    reply::{Button, Reply},
};

pub const WELCOME: &str =
    "Welcome to Cari Teman Sekitar!\nPlease complete your profile first.";
pub const PROFILE_NOT_FOUND: &str = "Profile not found or failed to load.";

/// Home menu entries. None of them do anything yet beyond acknowledging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Swipe,
    Match,
    Store,
    Premium,
}

impl MenuAction {
    pub fn title(&self) -> &'static str {
        match self {
            MenuAction::Swipe => "Swipe",
            MenuAction::Match => "Match",
            MenuAction::Store => "Store",
            MenuAction::Premium => "Premium",
        }
    }
}

pub fn home(profile: &Profile) -> Reply {
    let name = if profile.name.is_empty() {
        "User"
    } else {
        profile.name.as_str()
    };

    Reply::Buttons {
        text: format!("Welcome, {name}!\nYou're signed in. Pick a menu below:"),
        buttons: vec![
            vec![
                Button::new("▶️ SWIPE", CallbackData::Menu(MenuAction::Swipe)),
                Button::new("💌 MATCH", CallbackData::Menu(MenuAction::Match)),
            ],
            vec![
                Button::new("💎 STORE", CallbackData::Menu(MenuAction::Store)),
                Button::new("✨ PREMIUM", CallbackData::Menu(MenuAction::Premium)),
            ],
        ],
    }
}

/// Registration entry prompt for users without a complete profile.
pub fn welcome() -> Reply {
    Reply::Buttons {
        text: WELCOME.to_string(),
        buttons: vec![vec![Button::new(
            "Create profile",
            CallbackData::StartRegistration,
        )]],
    }
}

pub fn acknowledge(action: MenuAction) -> Reply {
    Reply::Edit {
        text: format!(
            "You pressed the {} menu.\nPress HOME to go back.",
            action.title()
        ),
        buttons: vec![vec![Button::new("🏠 HOME", CallbackData::GoHome)]],
    }
}
