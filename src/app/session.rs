//! UI-agnostic dashboard state.
//!
//! Both front-ends drive a [`Session`]: the CLI for one-shot commands, the TUI
//! for its whole lifetime. Identity and vote are mirrored to the [`LocalStore`]
//! on every change.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    AuthIdentity, AuthMode, CategoryFilter, Credentials, DATASET_LABEL, Metric, RawRecord, Stance,
    VoteRecord,
};
use crate::error::AppError;
use crate::gateway::{Capabilities, Gateway, VoteDocument};
use crate::series::categories;
use crate::store::LocalStore;

use super::pipeline::{Derived, Pipeline};

/// Token and uid of the identity used when remote auth is not configured.
pub const LOCAL_DEMO_TOKEN: &str = "local-demo";
pub const MISSING_CREDENTIALS: &str = "Please enter an email and password.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

/// What happened to the remote copy of a vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteVote {
    /// No identity token or remote logging disabled.
    Skipped,
    Saved,
    Failed(String),
}

/// A vote write that still has to reach the remote store.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingVote {
    pub id_token: String,
    pub document: VoteDocument,
}

impl PendingVote {
    pub fn send(&self, gateway: &dyn Gateway) -> Result<(), AppError> {
        gateway.write_vote(&self.id_token, &self.document)
    }
}

/// How a validated auth form gets its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStep {
    /// Remote auth is off; sign in with the local demo identity.
    Local(AuthIdentity),
    Remote(Credentials),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoteOutcome {
    pub record: VoteRecord,
    pub remote: RemoteVote,
}

pub struct Session {
    gateway: Arc<dyn Gateway>,
    store: LocalStore,
    rows: Arc<[RawRecord]>,
    categories: Vec<String>,
    status: LoadStatus,
    filter: CategoryFilter,
    metric: Metric,
    pipeline: Pipeline,
    auth: Option<AuthIdentity>,
    vote: Option<VoteRecord>,
    auth_error: Option<String>,
    vote_error: Option<String>,
}

impl Session {
    /// Restore identity and vote from `store`.
    pub fn new(gateway: Arc<dyn Gateway>, store: LocalStore) -> Self {
        let auth = store.load_auth();
        let vote = store.load_vote();
        info!(
            signed_in = auth.is_some(),
            has_vote = vote.is_some(),
            "session restored"
        );
        Self {
            gateway,
            store,
            rows: Arc::from(Vec::new()),
            categories: Vec::new(),
            status: LoadStatus::Idle,
            filter: CategoryFilter::All,
            metric: Metric::Total,
            pipeline: Pipeline::new(),
            auth,
            vote,
            auth_error: None,
            vote_error: None,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.gateway.capabilities()
    }

    pub fn begin_load(&mut self) {
        self.status = LoadStatus::Loading;
    }

    pub fn set_rows(&mut self, rows: impl Into<Arc<[RawRecord]>>) {
        self.rows = rows.into();
        self.categories = categories(&self.rows);
        self.status = LoadStatus::Success;
        info!(
            rows = self.rows.len(),
            categories = self.categories.len(),
            "rows loaded"
        );
    }

    /// Record a load failure. Rows from an earlier load are dropped.
    pub fn fail_load(&mut self, err: &AppError) {
        warn!(error = %err, "dataset load failed");
        self.rows = Arc::from(Vec::new());
        self.categories.clear();
        self.status = LoadStatus::Error(err.message().to_string());
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn rows(&self) -> &Arc<[RawRecord]> {
        &self.rows
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<CategoryFilter>) {
        self.filter = filter.into();
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn set_metric(&mut self, metric: Metric) {
        self.metric = metric;
    }

    /// Buckets, chart points and KPIs for the current selection (memoized).
    pub fn derived(&mut self) -> Derived {
        self.pipeline.derive(&self.rows, &self.filter, self.metric)
    }

    pub fn auth(&self) -> Option<&AuthIdentity> {
        self.auth.as_ref()
    }

    pub fn vote(&self) -> Option<&VoteRecord> {
        self.vote.as_ref()
    }

    pub fn auth_error(&self) -> Option<&str> {
        self.auth_error.as_deref()
    }

    pub fn vote_error(&self) -> Option<&str> {
        self.vote_error.as_deref()
    }

    /// Shared handle for running remote calls off the caller's thread.
    pub fn gateway(&self) -> Arc<dyn Gateway> {
        Arc::clone(&self.gateway)
    }

    /// Record a vote locally, then mirror it remotely if possible.
    ///
    /// A remote failure leaves the local vote in place and sets the vote-save
    /// warning.
    pub fn cast_vote(&mut self, stance: Stance) -> VoteOutcome {
        let (record, pending) = self.record_vote(stance);
        let remote = match pending {
            Some(pending) => {
                let result = pending.send(self.gateway.as_ref());
                self.finish_vote(result)
            }
            None => RemoteVote::Skipped,
        };
        VoteOutcome { record, remote }
    }

    /// Local half of [`Session::cast_vote`]. Returns the remote write still to
    /// be sent, if the vote should be mirrored.
    pub fn record_vote(&mut self, stance: Stance) -> (VoteRecord, Option<PendingVote>) {
        self.vote_error = None;
        let record = VoteRecord {
            stance,
            at: Utc::now(),
            category: self.filter.clone(),
            metric: self.metric,
        };
        self.vote = Some(record.clone());
        if let Err(e) = self.store.save_vote(self.vote.as_ref()) {
            warn!(error = %e, "failed to persist vote locally");
        }
        info!(stance = stance.as_str(), category = record.category.as_str(), "vote recorded");

        let pending = match &self.auth {
            Some(auth) if self.gateway.capabilities().persistence_enabled => Some(PendingVote {
                id_token: auth.id_token.clone(),
                document: VoteDocument {
                    stance: stance.as_str().to_string(),
                    email: auth.email.clone(),
                    dataset: DATASET_LABEL.to_string(),
                    item_type: record.category.as_str().to_string(),
                    metric: record.metric.wire_name().to_string(),
                    created_at: record.at,
                },
            }),
            _ => None,
        };
        (record, pending)
    }

    /// Apply the result of a remote vote write.
    pub fn finish_vote(&mut self, result: Result<(), AppError>) -> RemoteVote {
        match result {
            Ok(()) => {
                info!("vote saved remotely");
                RemoteVote::Saved
            }
            Err(e) => {
                warn!(error = %e, "remote vote write failed");
                self.vote_error = Some(e.message().to_string());
                RemoteVote::Failed(e.message().to_string())
            }
        }
    }

    /// Sign in or sign up. On failure the message is kept in `auth_error`.
    pub fn submit_auth(
        &mut self,
        mode: AuthMode,
        email: &str,
        password: &str,
    ) -> Result<&AuthIdentity, AppError> {
        let result = match self.begin_auth(email, password)? {
            AuthStep::Local(identity) => Ok(identity),
            AuthStep::Remote(credentials) => self.gateway.authenticate(mode, &credentials),
        };
        self.finish_auth(mode, result)
    }

    /// Validate the form input and decide how to authenticate.
    pub fn begin_auth(&mut self, email: &str, password: &str) -> Result<AuthStep, AppError> {
        self.auth_error = None;
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.auth_error = Some(MISSING_CREDENTIALS.to_string());
            return Err(AppError::auth(MISSING_CREDENTIALS));
        }

        if self.gateway.capabilities().auth_enabled {
            Ok(AuthStep::Remote(Credentials {
                email: email.to_string(),
                password: password.to_string(),
            }))
        } else {
            Ok(AuthStep::Local(AuthIdentity {
                email: email.to_string(),
                id_token: LOCAL_DEMO_TOKEN.to_string(),
                local_id: LOCAL_DEMO_TOKEN.to_string(),
            }))
        }
    }

    /// Adopt (and persist) the identity, or keep the failure in `auth_error`.
    pub fn finish_auth(
        &mut self,
        mode: AuthMode,
        result: Result<AuthIdentity, AppError>,
    ) -> Result<&AuthIdentity, AppError> {
        let identity = match result {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, mode = mode.display_name(), "authentication failed");
                self.auth_error = Some(e.message().to_string());
                return Err(e);
            }
        };

        info!(email = %identity.email, "signed in");
        self.auth_error = None;
        let identity: &AuthIdentity = self.auth.insert(identity);
        if let Err(e) = self.store.save_auth(Some(identity)) {
            warn!(error = %e, "failed to persist identity");
        }
        Ok(identity)
    }

    pub fn log_out(&mut self) {
        self.auth = None;
        self.auth_error = None;
        if let Err(e) = self.store.save_auth(None) {
            warn!(error = %e, "failed to persist logout");
        }
        info!("signed out");
    }
}
