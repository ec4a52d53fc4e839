//! Email/password accounts through the Identity Toolkit REST API.

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domain::{AuthIdentity, AuthMode, Credentials};
use crate::error::AppError;

pub const IDENTITY_TOOLKIT: &str = "https://identitytoolkit.googleapis.com/v1";

pub struct IdentityClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    #[serde(default)]
    email: Option<String>,
    id_token: String,
    local_id: String,
}

impl IdentityClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(IDENTITY_TOOLKIT, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn authenticate(
        &self,
        mode: AuthMode,
        credentials: &Credentials,
    ) -> Result<AuthIdentity, AppError> {
        let url = account_url(&self.base_url, mode, &self.api_key);
        info!(mode = mode.display_name(), email = %credentials.email, "identity request");

        let resp = self
            .client
            .post(&url)
            .json(&account_body(credentials))
            .send()
            .map_err(|e| AppError::network(format!("Request failed: {e}")))?;

        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        if !status.is_success() {
            let fallback = format!("Request failed ({})", status.as_u16());
            return Err(AppError::auth(extract_error_message(&body, &fallback)));
        }

        parse_account(&body, &credentials.email)
    }
}

pub(crate) fn account_url(base_url: &str, mode: AuthMode, api_key: &str) -> String {
    let action = match mode {
        AuthMode::SignUp => "accounts:signUp",
        AuthMode::SignIn => "accounts:signInWithPassword",
    };
    format!("{}/{action}?key={api_key}", base_url.trim_end_matches('/'))
}

pub(crate) fn account_body(credentials: &Credentials) -> Value {
    json!({
        "email": credentials.email,
        "password": credentials.password,
        "returnSecureToken": true,
    })
}

pub(crate) fn parse_account(body: &str, submitted_email: &str) -> Result<AuthIdentity, AppError> {
    let account: AccountResponse = serde_json::from_str(body)
        .map_err(|e| AppError::parse(format!("Unexpected identity response: {e}")))?;
    Ok(AuthIdentity {
        email: account
            .email
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| submitted_email.to_string()),
        id_token: account.id_token,
        local_id: account.local_id,
    })
}

/// `error.message` from a Google REST error body, or `fallback`.
pub fn extract_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_per_mode() {
        assert_eq!(
            account_url(IDENTITY_TOOLKIT, AuthMode::SignUp, "k"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp?key=k"
        );
        assert_eq!(
            account_url("http://localhost:9099/v1/", AuthMode::SignIn, "k"),
            "http://localhost:9099/v1/accounts:signInWithPassword?key=k"
        );
    }

    #[test]
    fn body_requests_a_secure_token() {
        let body = account_body(&Credentials {
            email: "a@b.c".into(),
            password: "pw".into(),
        });
        assert_eq!(body["email"], "a@b.c");
        assert_eq!(body["password"], "pw");
        assert_eq!(body["returnSecureToken"], true);
    }

    #[test]
    fn parses_account_and_falls_back_to_submitted_email() {
        let id = parse_account(r#"{"idToken":"t","localId":"u","refreshToken":"r"}"#, "me@x.io")
            .unwrap();
        assert_eq!(id.email, "me@x.io");
        assert_eq!(id.id_token, "t");
        assert_eq!(id.local_id, "u");

        assert!(parse_account("{}", "me@x.io").is_err());
    }

    #[test]
    fn error_message_extraction() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#;
        assert_eq!(extract_error_message(body, "Request failed (400)"), "EMAIL_EXISTS");
        assert_eq!(
            extract_error_message("<html>", "Request failed (502)"),
            "Request failed (502)"
        );
        assert_eq!(
            extract_error_message(r#"{"error":{}}"#, "Request failed (500)"),
            "Request failed (500)"
        );
    }

    #[test]
    fn sign_up_posts_credentials_and_reads_identity() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/accounts:signUp")
            .match_query(mockito::Matcher::UrlEncoded("key".into(), "k".into()))
            .match_body(mockito::Matcher::Json(json!({
                "email": "me@x.io",
                "password": "pw",
                "returnSecureToken": true,
            })))
            .with_status(200)
            .with_body(r#"{"email":"me@x.io","idToken":"tok","localId":"uid"}"#)
            .create();

        let client = IdentityClient::with_base_url(format!("{}/v1", server.url()), "k");
        let identity = client
            .authenticate(
                AuthMode::SignUp,
                &Credentials {
                    email: "me@x.io".into(),
                    password: "pw".into(),
                },
            )
            .unwrap();
        mock.assert();
        assert_eq!(identity.id_token, "tok");
        assert_eq!(identity.local_id, "uid");
    }

    #[test]
    fn rejected_sign_in_surfaces_the_service_message() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/accounts:signInWithPassword")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":{"code":400,"message":"EMAIL_EXISTS"}}"#)
            .create();

        let client = IdentityClient::with_base_url(format!("{}/v1", server.url()), "k");
        let err = client
            .authenticate(
                AuthMode::SignIn,
                &Credentials {
                    email: "me@x.io".into(),
                    password: "pw".into(),
                },
            )
            .unwrap_err();
        mock.assert();
        assert_eq!(err.kind(), crate::error::ErrorKind::Auth);
        assert_eq!(err.message(), "EMAIL_EXISTS");
    }
}
