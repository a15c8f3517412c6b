//! Chat interface for the plate catalog engine.
//!
//! This crate is the seam between the transport and the engine:
//! - **Updates** (`update`) - inbound model: menu presses and free text
//! - **Menu** (`menu`) - the button surface, generated from config bindings
//! - **Dispatch** (`dispatch`) - per-user session routing, one turn per update
//! - **Outbox** (`outbox`) - delivery capability with pre-send chunking
//! - **Poll** (`poll`) - long-poll runner with reconnect backoff
//!
//! # Architecture
//!
//! ```text
//! Transport updates → PollRunner → Dispatcher → CatalogProvider loads
//!                          ↓            ↓
//!                     acknowledge   Outbox (chunked) → Delivery
//! ```
//!
//! The concrete chat transport implements `UpdateTransport` and
//! `Delivery`; everything in between is transport-agnostic and covered
//! by in-memory fakes in tests.

pub mod dispatch;
pub mod menu;
pub mod outbox;
pub mod poll;
pub mod render;
pub mod update;

pub use dispatch::{DispatchSettings, Dispatcher, TurnContext, TurnOutcome};
pub use menu::MenuSurface;
pub use outbox::{Choice, Delivery, DeliveryError, NoopDelivery, Outbox};
pub use poll::{NoopUpdateTransport, PollRunner, ReconnectPolicy, TransportError, UpdateTransport};
pub use update::{parse_menu_token, InboundUpdate, MenuCommand, UserInput};
