//! Error types for the courier crate.
//!
//! The mailer itself can only fail in two observable ways: the message is a
//! raw payload that the bus cannot route, or the bus refused the envelope.
//! The remaining types belong to the collaborators shipped with the crate.

use std::io;

use thiserror::Error;

/// Errors returned by [`Mailer::send`](crate::Mailer::send).
///
/// `E` is the error type of the configured [`MessageBus`](crate::MessageBus);
/// it is carried untouched in [`MailerError::Submission`].
#[derive(Debug, Error)]
pub enum MailerError<E> {
    /// The message kind cannot be dispatched through the bus.
    ///
    /// Raised before any listener is notified or the bus is called.
    #[error("Unsupported message: {0} messages cannot be dispatched through the message bus")]
    UnsupportedMessage(&'static str),

    /// The template context could not be serialized and the configured
    /// [`ContextPolicy`](crate::ContextPolicy) forbids clearing it.
    #[error("Unserializable template context: {0}")]
    UnserializableContext(#[source] SerializationError),

    /// The bus failed to accept the envelope.
    #[error(transparent)]
    Submission(E),
}

impl<E> MailerError<E> {
    /// Returns `true` if the message was rejected for its kind.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedMessage(_))
    }

    /// Returns `true` if the error came from the bus.
    #[must_use]
    pub const fn is_submission(&self) -> bool {
        matches!(self, Self::Submission(_))
    }

    /// Recover the bus error exactly as the bus returned it.
    pub fn into_submission(self) -> Option<E> {
        match self {
            Self::Submission(err) => Some(err),
            _ => None,
        }
    }
}

/// Failure to encode an envelope.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// Bincode serialization failed.
    #[error("Bincode encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// An encoder-specific failure.
    #[error("{0}")]
    Custom(String),
}

/// Errors raised by the [`InMemoryBus`](crate::InMemoryBus).
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus already holds as many envelopes as it is allowed to.
    #[error("Bus capacity exceeded: {len}/{capacity} envelopes")]
    CapacityExceeded { len: usize, capacity: usize },

    /// The envelope could not be encoded for the queue.
    #[error("Serialization error: {0}")]
    Serialization(#[from] SerializationError),

    /// Internal error (lock poisoning, etc.).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl<T> From<std::sync::PoisonError<T>> for BusError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Self::Internal(format!("Lock poisoned: {e}"))
    }
}

/// Errors raised by [`Transport`](crate::Transport) implementations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The transport does not accept this kind of message.
    #[error("Transport {transport} does not support {kind} messages")]
    UnsupportedMessage {
        transport: String,
        kind: &'static str,
    },

    /// Delivery failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Errors raised while parsing an [`Address`](crate::Address).
#[derive(Debug, Error)]
pub enum AddressError {
    /// The input is not a valid RFC 5322 address.
    #[error("Invalid address {input:?}: {source}")]
    Parse {
        input: String,
        #[source]
        source: mailparse::MailParseError,
    },

    /// The input parsed, but not into exactly one mailbox.
    #[error("Expected a single mailbox, found {0:?}")]
    NotSingle(String),
}

/// Errors raised while loading a [`MailerConfig`](crate::MailerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The configuration is not valid RON for this schema.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use super::*;

    #[test]
    fn test_mailer_error_classification() {
        let err: MailerError<BusError> = MailerError::UnsupportedMessage("raw");
        assert!(err.is_unsupported());
        assert!(!err.is_submission());
        assert_eq!(
            err.to_string(),
            "Unsupported message: raw messages cannot be dispatched through the message bus"
        );

        let err: MailerError<BusError> = MailerError::Submission(BusError::CapacityExceeded {
            len: 1,
            capacity: 1,
        });
        assert!(err.is_submission());
        assert!(!err.is_unsupported());
    }

    #[test]
    fn test_submission_is_transparent() {
        let err: MailerError<BusError> =
            MailerError::Submission(BusError::Internal("broker offline".to_string()));
        assert_eq!(err.to_string(), "Internal error: broker offline");

        let inner = err.into_submission().unwrap();
        assert!(matches!(inner, BusError::Internal(msg) if msg == "broker offline"));
    }

    #[test]
    fn test_unserializable_context_keeps_source() {
        let err: MailerError<BusError> = MailerError::UnserializableContext(
            SerializationError::Custom("file handle".to_string()),
        );
        assert!(err.source().is_some());
        assert!(err.into_submission().is_none());
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::UnsupportedMessage {
            transport: "null://".to_string(),
            kind: "raw",
        };
        assert_eq!(
            err.to_string(),
            "Transport null:// does not support raw messages"
        );
    }
}
