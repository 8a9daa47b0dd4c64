use thiserror::Error;

/// Errors produced by the crate
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Query or connection failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Seed definitions that cannot be read, parsed or validated
    #[error("Invalid seed data: {message}")]
    SeedData { message: String },

    /// No tenant has the requested code
    #[error("Tenant not found: {code}")]
    TenantNotFound { code: String },

    /// JSON output failure
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
