use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex as TokioMutex;

use crate::{
    error::StoreError,
    models::profile::{Fields, Profile},
};

pub const PROFILES: &str = "profiles";

/// Contents of the credentials blob.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreCredentials {
    /// SQLite file holding the documents, or `:memory:`.
    pub database_path: String,
}

impl StoreCredentials {
    pub fn parse(blob: &str) -> Result<Self, StoreError> {
        serde_json::from_str(blob).map_err(|e| StoreError::MalformedCredentials(e.to_string()))
    }
}

/// Document store for profiles.
///
/// Starts out isolated. Every operation tries to connect once while isolated
/// and soft-fails if that does not work: lookups return `None`, writes return
/// `false`. A missing profile and an unreachable store look the same to
/// callers.
pub struct ProfileStore {
    credentials: Option<String>,
    connection: TokioMutex<Option<Connection>>,
    isolated: AtomicBool,
}

impl ProfileStore {
    pub fn new(credentials: Option<String>) -> Self {
        ProfileStore {
            credentials,
            connection: TokioMutex::new(None),
            isolated: AtomicBool::new(true),
        }
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated.load(Ordering::SeqCst)
    }

    /// Connects if not connected yet. Returns whether the store is usable.
    pub async fn initialize(&self) -> bool {
        let mut connection = self.connection.lock().await;
        if connection.is_some() && !self.is_isolated() {
            return true;
        }

        match self.connect() {
            Ok(conn) => {
                *connection = Some(conn);
                self.isolated.store(false, Ordering::SeqCst);
                info!("Profile store connected, isolation mode: false");
                true
            }
            Err(err) => {
                *connection = None;
                self.isolated.store(true, Ordering::SeqCst);
                error!("Failed to initialize the profile store: {err}");
                false
            }
        }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let blob = self
            .credentials
            .as_deref()
            .ok_or(StoreError::MissingCredentials)?;
        let credentials = StoreCredentials::parse(blob)?;

        let connection = Connection::open(&credentials.database_path)?;
        connection.execute(
            "CREATE TABLE IF NOT EXISTS documents (
                  collection TEXT NOT NULL,
                  id TEXT NOT NULL,
                  data TEXT NOT NULL,
                  PRIMARY KEY (collection, id)
                  )",
            [],
        )?;
        Ok(connection)
    }

    async fn ensure_connected(&self) -> bool {
        !self.is_isolated() || self.initialize().await
    }

    pub async fn get_profile(&self, user_id: u64) -> Option<Profile> {
        if !self.ensure_connected().await {
            return None;
        }

        match self.read_profile(user_id).await {
            Ok(profile) => profile,
            Err(err) => {
                error!("Failed to load profile {user_id}: {err}");
                None
            }
        }
    }

    /// Merges `fields` into the user's document, creating it if needed.
    pub async fn upsert_profile(&self, user_id: u64, fields: Fields) -> bool {
        if !self.ensure_connected().await {
            return false;
        }

        match self.merge_profile(user_id, fields).await {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to save profile {user_id}: {err}");
                false
            }
        }
    }

    async fn read_profile(&self, user_id: u64) -> Result<Option<Profile>, StoreError> {
        let connection = self.connection.lock().await;
        let connection = connection.as_ref().ok_or(StoreError::Isolated)?;

        match read_document(connection, PROFILES, &user_id.to_string())? {
            Some(document) => Ok(Some(serde_json::from_value(Value::Object(document))?)),
            None => Ok(None),
        }
    }

    async fn merge_profile(&self, user_id: u64, fields: Fields) -> Result<(), StoreError> {
        let connection = self.connection.lock().await;
        let connection = connection.as_ref().ok_or(StoreError::Isolated)?;
        let id = user_id.to_string();

        let mut document = read_document(connection, PROFILES, &id)?.unwrap_or_default();
        merge(&mut document, fields);

        connection.execute(
            "INSERT INTO documents (collection, id, data) VALUES (?1, ?2, ?3)
             ON CONFLICT(collection, id) DO UPDATE SET data = excluded.data",
            params![PROFILES, id, Value::Object(document).to_string()],
        )?;
        Ok(())
    }
}

fn read_document(
    connection: &Connection,
    collection: &str,
    id: &str,
) -> Result<Option<Fields>, StoreError> {
    let data: Option<String> = connection
        .query_row(
            "SELECT data FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id],
            |row| row.get(0),
        )
        .optional()?;

    match data {
        Some(data) => Ok(Some(serde_json::from_str(&data)?)),
        None => Ok(None),
    }
}

/// Nested objects are merged key by key; anything else is overwritten.
fn merge(target: &mut Fields, fields: Fields) {
    for (key, value) in fields {
        match value {
            Value::Object(update) => match target.get_mut(&key) {
                Some(Value::Object(existing)) => merge(existing, update),
                _ => {
                    target.insert(key, Value::Object(update));
                }
            },
            value => {
                target.insert(key, value);
            }
        }
    }
}
