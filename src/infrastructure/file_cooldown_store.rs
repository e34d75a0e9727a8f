// File-backed cooldown store - survives process restarts
use crate::application::cooldown_store::{CooldownStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct CooldownRecord {
    last_ai_attempt_ms: i64,
}

/// Persists the last-AI-attempt timestamp as a small JSON file, one file per
/// farm. A missing file means no attempt has ever been made.
#[derive(Debug, Clone)]
pub struct FileCooldownStore {
    path: PathBuf,
}

impl FileCooldownStore {
    pub fn for_farm(dir: &Path, farm_id: &str) -> Self {
        Self {
            path: dir.join(format!("cooldown-{farm_id}.json")),
        }
    }
}

#[async_trait]
impl CooldownStore for FileCooldownStore {
    async fn read(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Read(e.to_string())),
        };

        let record: CooldownRecord = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Read(format!("corrupt cooldown file: {e}")))?;

        Utc.timestamp_millis_opt(record.last_ai_attempt_ms)
            .single()
            .map(Some)
            .ok_or_else(|| {
                StoreError::Read(format!(
                    "timestamp out of range: {}",
                    record.last_ai_attempt_ms
                ))
            })
    }

    async fn write(&self, at: DateTime<Utc>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Write(e.to_string()))?;
        }

        let record = CooldownRecord {
            last_ai_attempt_ms: at.timestamp_millis(),
        };
        let bytes = serde_json::to_vec(&record).map_err(|e| StoreError::Write(e.to_string()))?;

        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))
    }
}
