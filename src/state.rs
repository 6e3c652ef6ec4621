use chrono::NaiveDate;

use crate::models::{
    event::Sender,
    profile::{Location, Profile},
};

/// Profile fields collected so far during registration.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Draft {
    pub photos: Vec<String>,
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub age: Option<u8>,
    pub height_cm: Option<u16>,
    pub bio: Option<String>,
    pub location: Option<Location>,
}

impl Draft {
    /// Builds the profile to store, or `None` if any step is still missing.
    pub fn finish(self, sender: &Sender) -> Option<Profile> {
        if self.photos.is_empty() {
            return None;
        }
        let location = self.location?;

        Some(Profile {
            user_id: sender.id,
            photos: self.photos,
            name: self.name?,
            date_of_birth: Some(self.date_of_birth?),
            age: self.age?,
            height_cm: self.height_cm?,
            bio: self.bio?,
            latitude: location.latitude,
            longitude: location.longitude,
            profile_complete: true,
            diamond_count: 1,
            match_count: 0,
            is_premium: false,
            is_ghost_mode_on: false,
            username: sender.username.clone(),
        })
    }
}

#[derive(Clone, Default, Debug, PartialEq)]
pub enum State {
    #[default]
    Start,
    ReceivePhoto {
        draft: Draft,
    },
    AskMorePhotos {
        draft: Draft,
    },
    ReceiveName {
        draft: Draft,
    },
    ReceiveBirthDate {
        draft: Draft,
    },
    ReceiveHeight {
        draft: Draft,
    },
    ReceiveBio {
        draft: Draft,
    },
    ReceiveLocation {
        draft: Draft,
    },
}

impl State {
    pub fn is_registering(&self) -> bool {
        !matches!(self, State::Start)
    }
}
