//! Catalog search & browse engine for the plate-listing bot.
//!
//! Everything here is transport-agnostic: records come in through a
//! `RecordSource` capability (see `platey-source`), messages go out
//! through a `Delivery` capability (see `platey-bot`). This crate owns
//! the pure middle — normalization, search predicates, session state,
//! pagination and chunking, configuration, and the error taxonomy.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod page;
pub mod query;
pub mod session;

pub use catalog::index::Catalog;
pub use catalog::record::{normalize, NormalizeError, PlateRecord, RawRow};
pub use config::{AppConfig, CatalogBinding, ConfigError, LoadOptions, SourceSpec};
pub use errors::EngineError;
pub use page::{chunk_text, paginate};
pub use query::{digit_match, letter_match, DigitQuery, DigitStrategy, LetterQuery, QueryError};
pub use session::{
    parse_page_size, SessionError, SessionMode, SessionStore, UserId, UserSession,
};
