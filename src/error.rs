//! Error types.

/// Startup configuration errors. Any of these stops the bot before it polls.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Failures inside the profile store. These never leave `ProfileStore`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store credentials are not configured")]
    MissingCredentials,

    #[error("malformed store credentials: {0}")]
    MalformedCredentials(String),

    #[error("store is in isolation mode")]
    Isolated,

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotADocument(String),
}

/// Rejected registration input. The message is what the user is told to fix.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Wrong format! Use DD-MM-YYYY.")]
    DateFormat,

    #[error("Age must be 18-99 years, not {0}. Use the DD-MM-YYYY format.")]
    AgeOutOfRange(i32),

    #[error("Height must be a number only.")]
    HeightNotANumber,

    #[error("Height must be in cm (100-250), not {0}.")]
    HeightOutOfRange(i64),

    #[error("Bio is too long ({0} characters). At most 500 characters.")]
    BioTooLong(usize),
}
