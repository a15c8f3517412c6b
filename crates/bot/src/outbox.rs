use async_trait::async_trait;
use thiserror::Error;

use platey_core::{chunk_text, UserId};

/// A button offered under an outgoing message. `data` is the callback
/// token the transport echoes back on a press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub data: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self { label: label.into(), data: data.into() }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("delivery to user {user} failed: {reason}")]
    Send { user: UserId, reason: String },
}

/// Capability that puts text in front of a user, optionally with
/// choices. The concrete chat transport implements this; the engine
/// never talks to it directly.
#[async_trait]
pub trait Delivery: Send + Sync {
    async fn send_text(
        &self,
        user: UserId,
        text: &str,
        choices: Option<&[Choice]>,
    ) -> Result<(), DeliveryError>;
}

/// Stand-in delivery for wiring and tests: logs and drops outgoing
/// messages.
#[derive(Default)]
pub struct NoopDelivery;

#[async_trait]
impl Delivery for NoopDelivery {
    async fn send_text(
        &self,
        user: UserId,
        text: &str,
        choices: Option<&[Choice]>,
    ) -> Result<(), DeliveryError> {
        tracing::debug!(
            user = %user,
            chars = text.chars().count(),
            choices = choices.map_or(0, <[Choice]>::len),
            "dropping outgoing message (noop delivery)"
        );
        Ok(())
    }
}

/// Wraps a `Delivery` and enforces the transport size limit: anything
/// longer than `message_limit_chars` is split into ordered chunks and
/// sent in sequence, with the choices attached to the final chunk only.
pub struct Outbox<D> {
    delivery: D,
    message_limit_chars: usize,
}

impl<D> Outbox<D>
where
    D: Delivery,
{
    pub fn new(delivery: D, message_limit_chars: usize) -> Self {
        Self { delivery, message_limit_chars }
    }

    pub async fn send(
        &self,
        user: UserId,
        text: &str,
        choices: Option<&[Choice]>,
    ) -> Result<(), DeliveryError> {
        let chunks = chunk_text(text, self.message_limit_chars);
        let last = chunks.len() - 1;

        for (index, chunk) in chunks.iter().enumerate() {
            let chunk_choices = if index == last { choices } else { None };
            self.delivery.send_text(user, chunk, chunk_choices).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Mutex;

    use platey_core::UserId;

    use super::{Choice, Delivery, DeliveryError, Outbox};

    #[derive(Clone, Default)]
    struct RecordingDelivery {
        sent: Arc<Mutex<Vec<(UserId, String, Option<Vec<Choice>>)>>>,
    }

    #[async_trait]
    impl Delivery for RecordingDelivery {
        async fn send_text(
            &self,
            user: UserId,
            text: &str,
            choices: Option<&[Choice]>,
        ) -> Result<(), DeliveryError> {
            self.sent.lock().await.push((user, text.to_owned(), choices.map(<[_]>::to_vec)));
            Ok(())
        }
    }

    #[tokio::test]
    async fn short_messages_pass_through_unchunked() {
        let delivery = RecordingDelivery::default();
        let outbox = Outbox::new(delivery.clone(), 4000);

        outbox.send(UserId(1), "привет", None).await.expect("send");

        let sent = delivery.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1, "привет");
    }

    #[tokio::test]
    async fn long_messages_arrive_as_ordered_chunks_with_choices_on_the_last() {
        let delivery = RecordingDelivery::default();
        let outbox = Outbox::new(delivery.clone(), 10);
        let choices = vec![Choice::new("Дальше", "next")];

        outbox.send(UserId(1), &"x".repeat(25), Some(&choices)).await.expect("send");

        let sent = delivery.sent.lock().await;
        assert_eq!(sent.len(), 3);
        let rejoined: String = sent.iter().map(|(_, text, _)| text.as_str()).collect();
        assert_eq!(rejoined, "x".repeat(25));
        assert_eq!(sent[0].2, None);
        assert_eq!(sent[1].2, None);
        assert_eq!(sent[2].2.as_deref(), Some(choices.as_slice()));
    }
}
