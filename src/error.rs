/// Broad failure category carried by every [`AppError`].
///
/// Front-ends branch on this (e.g. a fetch banner vs. an auth form error); the
/// CLI only cares about the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Network,
    /// Non-2xx response from a remote service.
    Http(u16),
    Parse,
    Auth,
    Remote,
    Io,
    Terminal,
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(2, ErrorKind::Config, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(4, ErrorKind::Network, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::new(4, ErrorKind::Http(status), message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(4, ErrorKind::Parse, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(4, ErrorKind::Auth, message)
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(4, ErrorKind::Remote, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(2, ErrorKind::Io, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(4, ErrorKind::Terminal, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status for `ErrorKind::Http` failures.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Http(status) => Some(status),
            _ => None,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
