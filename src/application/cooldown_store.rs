// Port for the persisted AI-attempt cooldown
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cooldown store read failed: {0}")]
    Read(String),
    #[error("cooldown store write failed: {0}")]
    Write(String),
}

/// Persists the "last AI attempt" timestamp so the rate limit survives
/// process restarts. A single last-writer-wins scalar; evaluation is already
/// serialized by the controller's single-flight guard.
#[async_trait]
pub trait CooldownStore: Send + Sync {
    /// `None` means no attempt has ever been recorded, permitting an
    /// immediate first attempt.
    async fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError>;

    async fn write(&self, at: DateTime<Utc>) -> Result<(), StoreError>;
}
