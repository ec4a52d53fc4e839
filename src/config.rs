//! Runtime settings from the environment (and `.env`).

use std::path::PathBuf;

use crate::data::socrata::{DEFAULT_ENDPOINT, DEFAULT_ROW_LIMIT};
use crate::error::AppError;

const STATE_DIR_NAME: &str = ".warehouse-sales";

#[derive(Debug, Clone)]
pub struct Settings {
    pub dataset_url: String,
    pub row_limit: usize,
    /// Identity Toolkit web API key; `None` disables remote auth.
    pub firebase_api_key: Option<String>,
    /// Firestore project; `None` disables remote vote persistence.
    pub firebase_project_id: Option<String>,
    /// Local state (identity, vote) and log file location.
    pub state_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup (empty values count as unset).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let dataset_url = get("WRS_DATASET_URL").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let row_limit = match get("WRS_ROW_LIMIT") {
            None => DEFAULT_ROW_LIMIT,
            Some(raw) => match raw.parse::<usize>() {
                Ok(v) if v > 0 => v,
                _ => {
                    return Err(AppError::config(format!(
                        "Invalid WRS_ROW_LIMIT '{raw}' (expected a positive integer)."
                    )));
                }
            },
        };

        let firebase_api_key = get("FIREBASE_WEB_API_KEY").or_else(|| get("FIREBASE_API_KEY"));
        let firebase_project_id = get("FIREBASE_PROJECT_ID");

        let state_dir = get("WRS_STATE_DIR")
            .map(PathBuf::from)
            .or_else(|| get("HOME").map(|home| PathBuf::from(home).join(STATE_DIR_NAME)))
            .or_else(|| get("USERPROFILE").map(|home| PathBuf::from(home).join(STATE_DIR_NAME)))
            .unwrap_or_else(|| PathBuf::from(STATE_DIR_NAME));

        Ok(Self {
            dataset_url,
            row_limit,
            firebase_api_key,
            firebase_project_id,
            state_dir,
        })
    }
}
