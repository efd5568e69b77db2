//! Capability probe: can a message be queued as it is?
//!
//! Plain emails are always queue-safe. For templated emails the only
//! reliable answer comes from serializing them with the same encoder the
//! queue uses, since context values are arbitrary objects.

use crate::{envelope::Envelope, error::SerializationError, internal, message::Message};

/// Serializer used to turn an [`Envelope`] into bytes for the queue.
pub trait EnvelopeEncoder: Send + Sync {
    ///
    /// Encode the envelope.
    ///
    /// # Errors
    ///
    /// If any part of the envelope refuses to be serialized.
    ///
    fn encode(&self, envelope: &Envelope<'_>) -> Result<Vec<u8>, SerializationError>;
}

/// Bincode (serde, standard config) envelope encoder.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeEncoder;

impl EnvelopeEncoder for BincodeEncoder {
    fn encode(&self, envelope: &Envelope<'_>) -> Result<Vec<u8>, SerializationError> {
        Ok(bincode::serde::encode_to_vec(
            envelope,
            bincode::config::standard(),
        )?)
    }
}

/// Outcome of [`inspect`].
#[derive(Debug)]
pub enum QueueSafety {
    Safe,
    /// Serialization failed; the error is kept for diagnostics only.
    Unsafe(SerializationError),
}

impl QueueSafety {
    #[must_use]
    pub const fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

///
/// Decide whether `message` can be handed to the queue unchanged.
///
/// Serialization failures are converted into [`QueueSafety::Unsafe`] and
/// never escape this function.
///
pub fn inspect<E: EnvelopeEncoder + ?Sized>(message: &Message, encoder: &E) -> QueueSafety {
    if !matches!(message, Message::Templated(_)) {
        return QueueSafety::Safe;
    }

    match encoder.encode(&Envelope::new(message)) {
        Ok(_) => QueueSafety::Safe,
        Err(err) => {
            internal!(level = DEBUG, "Message is not queue-safe: {err}");
            QueueSafety::Unsafe(err)
        }
    }
}
