use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Partial document handed to the store for a merge update.
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Stored profile document. Missing fields load as defaults, so a partially
/// written document reads back with `profile_complete == false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub user_id: u64,
    pub photos: Vec<String>,
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub age: u8,
    pub height_cm: u16,
    pub bio: String,
    pub latitude: f64,
    pub longitude: f64,
    pub profile_complete: bool,
    pub diamond_count: u32,
    pub match_count: u32,
    pub is_premium: bool,
    pub is_ghost_mode_on: bool,
    pub username: Option<String>,
}

impl Profile {
    pub fn is_complete(&self) -> bool {
        self.profile_complete
    }

    pub fn to_fields(&self) -> Result<Fields, StoreError> {
        into_fields(serde_json::to_value(self)?)
    }
}

pub fn into_fields(value: Value) -> Result<Fields, StoreError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::NotADocument(other.to_string())),
    }
}
