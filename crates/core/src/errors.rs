use thiserror::Error;

use crate::query::QueryError;
use crate::session::SessionError;

/// Failures local to a single user's turn. None of them terminate the
/// dispatcher or touch another user's session; each maps to a fixed
/// user-safe message while the detail stays in logs.
///
/// Two outcomes deliberately live outside this enum: a malformed source
/// row is recovered by skip-and-count inside the loader and never
/// surfaces per-row, and an empty search result is not an error at all,
/// it renders as its own "nothing found" message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("source `{source_id}` is unavailable: {reason}")]
    SourceUnavailable { source_id: String, reason: String },
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl EngineError {
    /// Fixed user-facing text, in the bot's language. Source identifiers
    /// and other internals never leak here.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SourceUnavailable { .. } => {
                "Каталог временно недоступен. Попробуйте позже."
            }
            Self::Query(QueryError::EmptyQuery) => {
                "В запросе нет цифр или букв для поиска. Выберите поиск в меню и попробуйте ещё раз."
            }
            Self::Session(SessionError::InvalidPageSize { .. }) => {
                "Размер страницы должен быть числом от 1 до 100. Возвращаю в меню."
            }
        }
    }
}
