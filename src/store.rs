//! Local persistence of the signed-in identity and the last vote.
//!
//! Each value lives in its own JSON file. Reads never fail: a missing, empty or
//! corrupt file reads back as "absent".

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::domain::{AuthIdentity, VoteRecord};
use crate::error::AppError;

const AUTH_FILE: &str = "auth.json";
const VOTE_FILE: &str = "vote.json";

#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn load_auth(&self) -> Option<AuthIdentity> {
        self.load(AUTH_FILE)
    }

    pub fn save_auth(&self, auth: Option<&AuthIdentity>) -> Result<(), AppError> {
        self.save(AUTH_FILE, &auth)
    }

    pub fn load_vote(&self) -> Option<VoteRecord> {
        self.load(VOTE_FILE)
    }

    pub fn save_vote(&self, vote: Option<&VoteRecord>) -> Result<(), AppError> {
        self.save(VOTE_FILE, &vote)
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let path = self.dir.join(name);
        let raw = fs::read_to_string(&path).ok()?;
        if raw.trim().is_empty() {
            return None;
        }
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring corrupt state file");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::io(format!("Failed to create state dir '{}': {e}", self.dir.display()))
        })?;
        let path = self.dir.join(name);
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| AppError::io(format!("Failed to encode {name}: {e}")))?;
        fs::write(&path, json)
            .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", path.display())))
    }
}
