use std::{fmt, str::FromStr};

use crate::menu::MenuAction;

/// Payload carried by an inline button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackData {
    StartRegistration,
    AddPhoto,
    SkipPhoto,
    Menu(MenuAction),
    GoHome,
}

impl CallbackData {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackData::StartRegistration => "start_reg",
            CallbackData::AddPhoto => "add_pic",
            CallbackData::SkipPhoto => "skip_pic",
            CallbackData::Menu(MenuAction::Swipe) => "swipe",
            CallbackData::Menu(MenuAction::Match) => "match",
            CallbackData::Menu(MenuAction::Store) => "store",
            CallbackData::Menu(MenuAction::Premium) => "premium",
            CallbackData::GoHome => "go_home",
        }
    }
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallbackData {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start_reg" => Ok(CallbackData::StartRegistration),
            "add_pic" => Ok(CallbackData::AddPhoto),
            "skip_pic" => Ok(CallbackData::SkipPhoto),
            "swipe" => Ok(CallbackData::Menu(MenuAction::Swipe)),
            "match" => Ok(CallbackData::Menu(MenuAction::Match)),
            "store" => Ok(CallbackData::Menu(MenuAction::Store)),
            "premium" => Ok(CallbackData::Menu(MenuAction::Premium)),
            "go_home" => Ok(CallbackData::GoHome),
            other => Err(format!("unknown callback data: {other}")),
        }
    }
}
