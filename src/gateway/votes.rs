//! Vote documents written to the Firestore REST API.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::blocking::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::error::AppError;

use super::identity::extract_error_message;

pub const FIRESTORE_API: &str = "https://firestore.googleapis.com/v1";

/// One vote as stored remotely.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteDocument {
    pub stance: String,
    pub email: String,
    pub dataset: String,
    pub item_type: String,
    pub metric: String,
    pub created_at: DateTime<Utc>,
}

impl VoteDocument {
    /// Firestore typed-field encoding.
    pub fn to_fields(&self) -> Value {
        let email = if self.email.is_empty() {
            "unknown"
        } else {
            self.email.as_str()
        };
        json!({
            "fields": {
                "stance": { "stringValue": self.stance },
                "email": { "stringValue": email },
                "dataset": { "stringValue": self.dataset },
                "itemType": { "stringValue": self.item_type },
                "metric": { "stringValue": self.metric },
                "createdAt": {
                    "timestampValue": self.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
                },
            }
        })
    }
}

pub struct VoteClient {
    client: Client,
    base_url: String,
    project_id: String,
}

impl VoteClient {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_base_url(FIRESTORE_API, project_id)
    }

    pub fn with_base_url(base_url: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            project_id: project_id.into(),
        }
    }

    pub fn collection_url(&self) -> String {
        collection_url(&self.base_url, &self.project_id)
    }

    pub fn write(&self, id_token: &str, vote: &VoteDocument) -> Result<(), AppError> {
        info!(stance = %vote.stance, item_type = %vote.item_type, "writing vote");
        let resp = self
            .client
            .post(self.collection_url())
            .bearer_auth(id_token)
            .json(&vote.to_fields())
            .send()
            .map_err(|e| AppError::network(format!("Firestore write failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            let fallback = format!("Firestore write failed ({})", status.as_u16());
            return Err(AppError::remote(extract_error_message(&body, &fallback)));
        }
        Ok(())
    }
}

fn collection_url(base_url: &str, project_id: &str) -> String {
    format!(
        "{}/projects/{project_id}/databases/(default)/documents/votes",
        base_url.trim_end_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn vote(email: &str) -> VoteDocument {
        VoteDocument {
            stance: "support".into(),
            email: email.into(),
            dataset: "Warehouse and Retail Sales (Montgomery County, MD)".into(),
            item_type: "WINE".into(),
            metric: "totalSales".into(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn encodes_typed_fields() {
        let body = vote("me@x.io").to_fields();
        let fields = &body["fields"];
        assert_eq!(fields["stance"]["stringValue"], "support");
        assert_eq!(fields["email"]["stringValue"], "me@x.io");
        assert_eq!(fields["itemType"]["stringValue"], "WINE");
        assert_eq!(fields["metric"]["stringValue"], "totalSales");
        assert_eq!(fields["createdAt"]["timestampValue"], "2024-03-01T12:30:00.000Z");
    }

    #[test]
    fn empty_email_becomes_unknown() {
        let body = vote("").to_fields();
        assert_eq!(body["fields"]["email"]["stringValue"], "unknown");
    }

    #[test]
    fn collection_path() {
        assert_eq!(
            VoteClient::new("demo").collection_url(),
            "https://firestore.googleapis.com/v1/projects/demo/databases/(default)/documents/votes"
        );
    }

    const VOTES_PATH: &str = "/projects/demo/databases/(default)/documents/votes";

    #[test]
    fn write_sends_bearer_token_and_fields() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", VOTES_PATH)
            .match_header("authorization", "Bearer id-token-1")
            .match_body(mockito::Matcher::PartialJson(json!({
                "fields": { "stance": { "stringValue": "support" } }
            })))
            .with_status(200)
            .with_body("{}")
            .create();

        let client = VoteClient::with_base_url(server.url(), "demo");
        client.write("id-token-1", &vote("me@x.io")).unwrap();
        mock.assert();
    }

    #[test]
    fn rejected_write_reports_remote_message_or_status() {
        let mut server = mockito::Server::new();
        let denied = server
            .mock("POST", VOTES_PATH)
            .match_header("authorization", "Bearer stale")
            .with_status(403)
            .with_body(r#"{"error":{"code":403,"message":"PERMISSION_DENIED"}}"#)
            .create();
        let bare = server
            .mock("POST", VOTES_PATH)
            .match_header("authorization", "Bearer other")
            .with_status(500)
            .with_body("")
            .create();

        let client = VoteClient::with_base_url(server.url(), "demo");
        let err = client.write("stale", &vote("")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Remote);
        assert_eq!(err.message(), "PERMISSION_DENIED");

        let err = client.write("other", &vote("")).unwrap_err();
        assert_eq!(err.message(), "Firestore write failed (500)");
        denied.assert();
        bare.assert();
    }
}
