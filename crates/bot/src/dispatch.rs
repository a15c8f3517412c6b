use tracing::{debug, info, warn};

use platey_core::{
    digit_match, letter_match, paginate, parse_page_size, AppConfig, DigitQuery, DigitStrategy,
    EngineError, LetterQuery, PlateRecord, SessionMode, SessionStore, UserId, UserSession,
};
use platey_source::{CatalogProvider, LoadedCatalog, SourceError};

use crate::menu::{next_page_choice, return_to_menu_choice, MenuSurface};
use crate::outbox::{Choice, Delivery, DeliveryError, Outbox};
use crate::render;
use crate::update::{InboundUpdate, MenuCommand, UserInput};

/// Per-turn metadata threaded through for log correlation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnContext {
    pub correlation_id: String,
}

impl Default for TurnContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied,
    Ignored,
}

/// The slice of configuration the dispatcher acts on.
#[derive(Clone, Debug)]
pub struct DispatchSettings {
    pub max_results: usize,
    pub digit_strategy: DigitStrategy,
    pub ask_page_size: bool,
    pub default_category: Option<String>,
}

impl DispatchSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_results: config.search.max_results,
            digit_strategy: config.search.digit_strategy,
            ask_page_size: config.search.ask_page_size,
            default_category: config.default_category().map(str::to_owned),
        }
    }
}

/// Routes one inbound update per call: the session mode decides what the
/// user's text means, an exhaustive match decides what happens next.
///
/// The dispatcher owns the session store exclusively. A session snapshot
/// is taken and the lock released before any catalog load, so one user's
/// slow source never stalls another's turn; engine failures are rendered
/// to their user and never escape, only transport failures propagate.
pub struct Dispatcher<P, D> {
    settings: DispatchSettings,
    menu: MenuSurface,
    sessions: SessionStore,
    provider: P,
    outbox: Outbox<D>,
}

impl<P, D> Dispatcher<P, D>
where
    P: CatalogProvider,
    D: Delivery,
{
    pub fn new(
        settings: DispatchSettings,
        menu: MenuSurface,
        sessions: SessionStore,
        provider: P,
        outbox: Outbox<D>,
    ) -> Self {
        Self { settings, menu, sessions, provider, outbox }
    }

    pub async fn handle(
        &self,
        update: &InboundUpdate,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DeliveryError> {
        match &update.input {
            UserInput::Menu(command) => self.handle_menu(update.user, command, ctx).await,
            UserInput::Text(text) => self.handle_text(update.user, text, ctx).await,
        }
    }

    async fn handle_menu(
        &self,
        user: UserId,
        command: &MenuCommand,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DeliveryError> {
        match command {
            MenuCommand::MainMenu | MenuCommand::ReturnToMenu => {
                self.sessions.clear(user).await;
                self.send_menu(user).await?;
                Ok(TurnOutcome::Replied)
            }
            MenuCommand::Browse { category } => {
                if self.menu.label_for(category).is_none() {
                    warn!(
                        correlation_id = %ctx.correlation_id,
                        user = %user,
                        category = %category,
                        "browse request for unknown category"
                    );
                    self.send_menu(user).await?;
                    return Ok(TurnOutcome::Replied);
                }

                let mut session = self.sessions.snapshot(user).await;
                session.active_category = Some(category.clone());

                if self.settings.ask_page_size {
                    session.mode = SessionMode::AwaitingPageSize { category: category.clone() };
                    self.sessions.put(user, session).await;
                    self.outbox.send(user, &render::page_size_prompt(), None).await?;
                    Ok(TurnOutcome::Replied)
                } else {
                    self.browse_page(user, session, category.clone(), 0, ctx).await
                }
            }
            MenuCommand::NextPage => {
                let session = self.sessions.snapshot(user).await;
                let SessionMode::Browsing { category, page_index } = session.mode.clone() else {
                    debug!(
                        correlation_id = %ctx.correlation_id,
                        user = %user,
                        "next-page press with no browse in progress"
                    );
                    self.send_menu(user).await?;
                    return Ok(TurnOutcome::Replied);
                };
                self.browse_page(user, session, category, page_index + 1, ctx).await
            }
            MenuCommand::SearchByDigits => {
                let mut session = self.sessions.snapshot(user).await;
                session.mode = SessionMode::AwaitingDigitQuery;
                self.sessions.put(user, session).await;
                self.outbox.send(user, &render::digit_prompt(), None).await?;
                Ok(TurnOutcome::Replied)
            }
            MenuCommand::SearchByLetters => {
                let mut session = self.sessions.snapshot(user).await;
                session.mode = SessionMode::AwaitingLetterQuery;
                self.sessions.put(user, session).await;
                self.outbox.send(user, &render::letter_prompt(), None).await?;
                Ok(TurnOutcome::Replied)
            }
        }
    }

    async fn handle_text(
        &self,
        user: UserId,
        text: &str,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DeliveryError> {
        let session = self.sessions.snapshot(user).await;

        match session.mode.clone() {
            SessionMode::AwaitingPageSize { category } => match parse_page_size(text) {
                Ok(page_size) => {
                    let mut session = session;
                    session.page_size = page_size;
                    self.browse_page(user, session, category, 0, ctx).await
                }
                Err(error) => {
                    // Deliberately resets instead of re-prompting: the
                    // user reselects from the menu, never loops in place.
                    info!(
                        correlation_id = %ctx.correlation_id,
                        user = %user,
                        given = text,
                        "invalid page size input"
                    );
                    let mut session = session;
                    session.clear();
                    self.sessions.put(user, session).await;
                    let error = EngineError::from(error);
                    self.outbox
                        .send(user, &render::error_message(&error), Some(&[return_to_menu_choice()]))
                        .await?;
                    Ok(TurnOutcome::Replied)
                }
            },
            SessionMode::AwaitingDigitQuery => {
                self.run_digit_search(user, session, text, ctx).await
            }
            SessionMode::AwaitingLetterQuery => {
                self.run_letter_search(user, session, text, ctx).await
            }
            // Free text with nothing pending is an implicit digit query
            // against the last or default category.
            SessionMode::Idle | SessionMode::Browsing { .. } => {
                self.run_digit_search(user, session, text, ctx).await
            }
        }
    }

    async fn run_digit_search(
        &self,
        user: UserId,
        session: UserSession,
        text: &str,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DeliveryError> {
        let category = self.query_category(&session);
        self.finish_turn(user, session).await;

        let Some(category) = category else {
            self.send_menu(user).await?;
            return Ok(TurnOutcome::Replied);
        };

        let query = match DigitQuery::parse(text) {
            Ok(query) => query,
            Err(error) => {
                let error = EngineError::from(error);
                self.outbox.send(user, &render::error_message(&error), None).await?;
                return Ok(TurnOutcome::Replied);
            }
        };

        let Some(loaded) = self.load_reporting(user, &category, ctx).await? else {
            return Ok(TurnOutcome::Replied);
        };

        let strategy = self.settings.digit_strategy;
        let hits = loaded
            .catalog
            .search(|record| digit_match(record, &query, strategy), self.settings.max_results);

        info!(
            correlation_id = %ctx.correlation_id,
            user = %user,
            category = %category,
            strategy = ?strategy,
            hits = hits.len(),
            "digit search completed"
        );
        self.send_search_results(user, &hits).await?;
        Ok(TurnOutcome::Replied)
    }

    async fn run_letter_search(
        &self,
        user: UserId,
        session: UserSession,
        text: &str,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DeliveryError> {
        let category = self.query_category(&session);
        self.finish_turn(user, session).await;

        let Some(category) = category else {
            self.send_menu(user).await?;
            return Ok(TurnOutcome::Replied);
        };

        let query = match LetterQuery::parse(text) {
            Ok(query) => query,
            Err(error) => {
                let error = EngineError::from(error);
                self.outbox.send(user, &render::error_message(&error), None).await?;
                return Ok(TurnOutcome::Replied);
            }
        };

        let Some(loaded) = self.load_reporting(user, &category, ctx).await? else {
            return Ok(TurnOutcome::Replied);
        };

        let hits = loaded
            .catalog
            .search(|record| letter_match(record, &query), self.settings.max_results);

        info!(
            correlation_id = %ctx.correlation_id,
            user = %user,
            category = %category,
            hits = hits.len(),
            "letter search completed"
        );
        self.send_search_results(user, &hits).await?;
        Ok(TurnOutcome::Replied)
    }

    async fn browse_page(
        &self,
        user: UserId,
        mut session: UserSession,
        category: String,
        page_index: usize,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DeliveryError> {
        session.active_category = Some(category.clone());

        let Some(loaded) = self.load_reporting(user, &category, ctx).await? else {
            session.clear();
            self.sessions.put(user, session).await;
            return Ok(TurnOutcome::Replied);
        };

        let (page, has_more) = paginate(loaded.catalog.records(), page_index, session.page_size);

        if page.is_empty() {
            // The cursor stays put: pressing "next" on the last page
            // again keeps answering with the same message.
            session.mode = SessionMode::Browsing {
                category,
                page_index: page_index.saturating_sub(1),
            };
            self.sessions.put(user, session).await;
            self.outbox
                .send(user, &render::no_more_message(), Some(&[return_to_menu_choice()]))
                .await?;
            return Ok(TurnOutcome::Replied);
        }

        session.mode = SessionMode::Browsing { category: category.clone(), page_index };
        self.sessions.put(user, session).await;

        let label = self.menu.label_for(&category).unwrap_or(&category);
        let text = render::page_message(label, page);
        let choices = if has_more {
            vec![next_page_choice(), return_to_menu_choice()]
        } else {
            vec![return_to_menu_choice()]
        };
        self.outbox.send(user, &text, Some(&choices)).await?;
        Ok(TurnOutcome::Replied)
    }

    /// A search consumes the turn no matter how it ends: the pending
    /// mode drops back to `Idle` before any result is produced.
    async fn finish_turn(&self, user: UserId, mut session: UserSession) {
        session.clear();
        self.sessions.put(user, session).await;
    }

    fn query_category(&self, session: &UserSession) -> Option<String> {
        session.active_category.clone().or_else(|| self.settings.default_category.clone())
    }

    /// Loads one category, reporting `SourceUnavailable` to the user as
    /// the generic try-later message. `None` means "already reported".
    async fn load_reporting(
        &self,
        user: UserId,
        category: &str,
        ctx: &TurnContext,
    ) -> Result<Option<LoadedCatalog>, DeliveryError> {
        match self.provider.load(category).await {
            Ok(loaded) => Ok(Some(loaded)),
            Err(SourceError::Unavailable { source_id, reason }) => {
                warn!(
                    correlation_id = %ctx.correlation_id,
                    user = %user,
                    source_id = %source_id,
                    reason = %reason,
                    "catalog load failed"
                );
                let error = EngineError::SourceUnavailable { source_id, reason };
                self.outbox.send(user, &render::error_message(&error), None).await?;
                Ok(None)
            }
        }
    }

    async fn send_search_results(
        &self,
        user: UserId,
        hits: &[&PlateRecord],
    ) -> Result<(), DeliveryError> {
        let text = if hits.is_empty() {
            render::no_matches_message()
        } else {
            render::search_results_message(hits)
        };
        self.outbox.send(user, &text, Some(&[return_to_menu_choice()])).await
    }

    async fn send_menu(&self, user: UserId) -> Result<(), DeliveryError> {
        let choices: Vec<Choice> = self.menu.main_menu();
        self.outbox.send(user, &render::menu_prompt(), Some(&choices)).await
    }

    #[cfg(test)]
    pub(crate) fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}
