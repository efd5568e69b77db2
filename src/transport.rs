//! Direct delivery transports.
//!
//! The [`Mailer`](crate::Mailer) keeps a transport so that listeners know
//! where a message will end up, but it never delivers through it once a bus
//! is wired in. Delivery happens later, on the consuming side of the bus.

use std::sync::Arc;

use crate::{bus::EnvelopeId, error::TransportError, internal, message::Message};

/// Something that can deliver a ready-to-send message.
pub trait Transport: Send + Sync {
    /// Human readable name, e.g. `smtp://localhost:25`.
    fn name(&self) -> String;

    ///
    /// Deliver the message.
    ///
    /// # Errors
    ///
    /// If the transport cannot deliver this message.
    ///
    fn send(&self, message: &Message) -> Result<SentMessage, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn send(&self, message: &Message) -> Result<SentMessage, TransportError> {
        (**self).send(message)
    }
}

/// Receipt of a direct delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: EnvelopeId,
    pub transport: String,
}

/// Transport that accepts structured messages and discards them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn name(&self) -> String {
        "null://".to_string()
    }

    fn send(&self, message: &Message) -> Result<SentMessage, TransportError> {
        if message.is_raw() {
            return Err(TransportError::UnsupportedMessage {
                transport: self.name(),
                kind: message.kind(),
            });
        }

        let sent = SentMessage {
            message_id: EnvelopeId::generate(),
            transport: self.name(),
        };
        internal!(level = DEBUG, "Discarded {} message {}", message.kind(), sent.message_id);

        Ok(sent)
    }
}
