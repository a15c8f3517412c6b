use std::{sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use platey_source::CatalogProvider;

use crate::dispatch::{Dispatcher, TurnContext};
use crate::outbox::Delivery;
use crate::update::InboundUpdate;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("transport failed to connect: {0}")]
    Connect(String),
    #[error("transport read failed: {0}")]
    Receive(String),
    #[error("transport ack failed: {0}")]
    Acknowledge(String),
    #[error("transport disconnect failed: {0}")]
    Disconnect(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 250, max_delay_ms: 5_000 }
    }
}

impl ReconnectPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier).min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }
}

/// The inbound half of the chat transport: a long-poll loop that yields
/// updates one at a time. `next_update` returning `None` means the
/// stream closed cleanly.
#[async_trait]
pub trait UpdateTransport: Send + Sync {
    async fn connect(&self) -> Result<(), TransportError>;
    async fn next_update(&self) -> Result<Option<InboundUpdate>, TransportError>;
    async fn acknowledge(&self, update_id: u64) -> Result<(), TransportError>;
    async fn disconnect(&self) -> Result<(), TransportError>;
}

/// Stand-in transport for wiring and tests: connects, yields nothing,
/// disconnects.
#[derive(Default)]
pub struct NoopUpdateTransport;

#[async_trait]
impl UpdateTransport for NoopUpdateTransport {
    async fn connect(&self) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_update(&self) -> Result<Option<InboundUpdate>, TransportError> {
        Ok(None)
    }

    async fn acknowledge(&self, _update_id: u64) -> Result<(), TransportError> {
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Pumps updates from the transport into the dispatcher. Transport
/// failures reconnect with exponential backoff; a failed turn is logged
/// and never takes the runner down with it.
pub struct PollRunner<P, D> {
    transport: Arc<dyn UpdateTransport>,
    dispatcher: Dispatcher<P, D>,
    reconnect_policy: ReconnectPolicy,
}

impl<P, D> PollRunner<P, D>
where
    P: CatalogProvider,
    D: Delivery,
{
    pub fn new(
        transport: Arc<dyn UpdateTransport>,
        dispatcher: Dispatcher<P, D>,
        reconnect_policy: ReconnectPolicy,
    ) -> Self {
        Self { transport, dispatcher, reconnect_policy }
    }

    pub async fn start(&self) -> Result<()> {
        for attempt in 0..=self.reconnect_policy.max_retries {
            match self.connect_and_pump(attempt).await {
                Ok(()) => return Ok(()),
                Err(transport_error) => {
                    warn!(
                        attempt,
                        max_retries = self.reconnect_policy.max_retries,
                        error = %transport_error,
                        "update transport failed"
                    );

                    if attempt >= self.reconnect_policy.max_retries {
                        warn!(
                            max_retries = self.reconnect_policy.max_retries,
                            "update transport retries exhausted; continuing process without crash"
                        );
                        return Ok(());
                    }

                    let delay = self.reconnect_policy.backoff(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Ok(())
    }

    async fn connect_and_pump(&self, attempt: u32) -> Result<(), TransportError> {
        info!(attempt, "opening update transport connection");
        self.transport.connect().await?;
        info!(attempt, "update transport connected");

        loop {
            let Some(update) = self.transport.next_update().await? else {
                info!(attempt, "update transport stream closed");
                self.transport.disconnect().await?;
                return Ok(());
            };

            let correlation_id = Uuid::new_v4().to_string();
            debug!(
                update_id = update.update_id,
                user = %update.user,
                correlation_id = %correlation_id,
                "received update"
            );

            if let Err(error) = self.transport.acknowledge(update.update_id).await {
                warn!(
                    update_id = update.update_id,
                    correlation_id = %correlation_id,
                    error = %error,
                    "failed to acknowledge update"
                );
            }

            let context = TurnContext { correlation_id: correlation_id.clone() };
            match self.dispatcher.handle(&update, &context).await {
                Ok(outcome) => {
                    debug!(
                        update_id = update.update_id,
                        correlation_id = %correlation_id,
                        outcome = ?outcome,
                        "turn handled"
                    );
                }
                Err(error) => {
                    warn!(
                        update_id = update.update_id,
                        user = %update.user,
                        correlation_id = %correlation_id,
                        error = %error,
                        "turn failed; continuing poll loop"
                    );
                }
            }
        }
    }
}
