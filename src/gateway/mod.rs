//! Remote identity and vote services behind one trait.
//!
//! Both halves are optional. A missing API key turns auth off, a missing
//! project id turns remote vote logging off, and [`LocalOnly`] has both off.

pub mod identity;
pub mod votes;

use tracing::{info, warn};

use crate::config::Settings;
use crate::domain::{AuthIdentity, AuthMode, Credentials};
use crate::error::AppError;

pub use identity::{IdentityClient, extract_error_message};
pub use votes::{VoteClient, VoteDocument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub auth_enabled: bool,
    pub persistence_enabled: bool,
}

/// Shared with worker threads, so implementations must be `Send + Sync`.
pub trait Gateway: Send + Sync {
    fn capabilities(&self) -> Capabilities;

    fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthIdentity, AppError>;

    fn write_vote(&self, id_token: &str, vote: &VoteDocument) -> Result<(), AppError>;
}

/// Identity Toolkit + Firestore, each present only when configured.
pub struct RemoteGateway {
    identity: Option<IdentityClient>,
    votes: Option<VoteClient>,
}

impl RemoteGateway {
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.firebase_api_key.is_none() {
            info!("no Firebase API key; auth runs in local demo mode");
        }
        if settings.firebase_project_id.is_none() {
            warn!("FIREBASE_PROJECT_ID not set; votes are stored locally only");
        }
        let gateway = Self {
            identity: settings.firebase_api_key.clone().map(IdentityClient::new),
            votes: settings.firebase_project_id.clone().map(VoteClient::new),
        };
        info!(capabilities = ?gateway.capabilities(), "gateway configured");
        gateway
    }
}

impl Gateway for RemoteGateway {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            auth_enabled: self.identity.is_some(),
            persistence_enabled: self.votes.is_some(),
        }
    }

    fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthIdentity, AppError> {
        match &self.identity {
            Some(client) => client.authenticate(mode, credentials),
            None => Err(AppError::config(
                "Firebase auth is not configured (missing API key)",
            )),
        }
    }

    fn write_vote(&self, id_token: &str, vote: &VoteDocument) -> Result<(), AppError> {
        match &self.votes {
            Some(client) => client.write(id_token, vote),
            None => Err(AppError::config(
                "Firestore not configured (missing project id)",
            )),
        }
    }
}

/// No remote services at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOnly;

impl Gateway for LocalOnly {
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn authenticate(&self, _: AuthMode, _: &Credentials) -> Result<AuthIdentity, AppError> {
        Err(AppError::config("Remote auth is disabled"))
    }

    fn write_vote(&self, _: &str, _: &VoteDocument) -> Result<(), AppError> {
        Err(AppError::config("Remote vote logging is disabled"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_follow_settings() {
        let settings = Settings::from_lookup(|key| match key {
            "FIREBASE_API_KEY" => Some("k".to_string()),
            _ => None,
        })
        .unwrap();
        let gateway = RemoteGateway::from_settings(&settings);
        assert_eq!(
            gateway.capabilities(),
            Capabilities {
                auth_enabled: true,
                persistence_enabled: false
            }
        );
        let err = gateway
            .write_vote(
                "tok",
                &VoteDocument {
                    stance: "support".into(),
                    email: String::new(),
                    dataset: String::new(),
                    item_type: String::new(),
                    metric: String::new(),
                    created_at: chrono::Utc::now(),
                },
            )
            .unwrap_err();
        assert!(err.message().contains("project id"));
    }

    #[test]
    fn local_only_has_nothing_enabled() {
        assert_eq!(LocalOnly.capabilities(), Capabilities::default());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_firebase_settings_are_reported_by_the_gateway() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let settings = Settings::from_lookup(|_| None).unwrap();
            assert!(captured.0.lock().unwrap().is_empty());
            RemoteGateway::from_settings(&settings);
        });

        let out = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(out.contains("local demo mode"));
        assert!(out.contains("FIREBASE_PROJECT_ID not set"));
    }
}
