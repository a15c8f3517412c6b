use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;

pub const PAGE_SIZE_MIN: usize = 1;
pub const PAGE_SIZE_MAX: usize = 100;

/// Transport-level user identifier.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the next message from a user will mean. A single explicit mode
/// keeps routing to one exhaustive match instead of a chain of
/// order-sensitive expecting-flag checks.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    #[default]
    Idle,
    Browsing { category: String, page_index: usize },
    AwaitingDigitQuery,
    AwaitingLetterQuery,
    AwaitingPageSize { category: String },
}

/// Per-user conversational state. Created lazily on first interaction;
/// every mode except `Browsing` consumes exactly one text input and
/// drops back to `Idle`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub mode: SessionMode,
    pub active_category: Option<String>,
    pub page_size: usize,
}

impl UserSession {
    pub fn new(page_size: usize) -> Self {
        Self { mode: SessionMode::Idle, active_category: None, page_size }
    }

    /// Return-to-menu reset: the mode and pagination cursor go away, the
    /// chosen page size is a user preference and survives.
    pub fn clear(&mut self) {
        self.mode = SessionMode::Idle;
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("page size `{given}` is not a number in {PAGE_SIZE_MIN}..={PAGE_SIZE_MAX}")]
    InvalidPageSize { given: String },
}

/// Parses a user-supplied page size. Non-numeric and out-of-range input
/// both fail; the caller reports the failure and resets the session to
/// `Idle` rather than re-prompting in place, which keeps a hostile or
/// confused user out of a retry loop.
pub fn parse_page_size(input: &str) -> Result<usize, SessionError> {
    let given = input.trim();
    match given.parse::<usize>() {
        Ok(size) if (PAGE_SIZE_MIN..=PAGE_SIZE_MAX).contains(&size) => Ok(size),
        _ => Err(SessionError::InvalidPageSize { given: given.to_owned() }),
    }
}

/// Session state partitioned strictly by user id. The dispatcher owns the
/// store exclusively; a snapshot is taken and the lock released before
/// any catalog load, so slow source I/O never blocks other users.
#[derive(Clone)]
pub struct SessionStore {
    default_page_size: usize,
    inner: Arc<Mutex<HashMap<UserId, UserSession>>>,
}

impl SessionStore {
    pub fn new(default_page_size: usize) -> Self {
        Self { default_page_size, inner: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// Copy of one user's session, creating the default on first use.
    pub async fn snapshot(&self, user: UserId) -> UserSession {
        let mut sessions = self.inner.lock().await;
        sessions.entry(user).or_insert_with(|| UserSession::new(self.default_page_size)).clone()
    }

    pub async fn put(&self, user: UserId, session: UserSession) {
        self.inner.lock().await.insert(user, session);
    }

    /// Explicit return-to-menu clear for one user.
    pub async fn clear(&self, user: UserId) {
        let mut sessions = self.inner.lock().await;
        if let Some(session) = sessions.get_mut(&user) {
            session.clear();
        }
    }

    pub async fn session_count(&self) -> usize {
        self.inner.lock().await.len()
    }
}
