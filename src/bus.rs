//! The queue side of the mailer.
//!
//! A [`MessageBus`] accepts an [`Envelope`] and answers with a receipt. The
//! mailer treats the call as a single synchronous request/response; whether
//! the bus persists, replicates or retries is its own business.

use std::sync::{Arc, RwLock};

use crate::{
    envelope::Envelope,
    error::BusError,
    internal,
    probe::{BincodeEncoder, EnvelopeEncoder},
};

/// Queue submitter consumed by the [`Mailer`](crate::Mailer).
pub trait MessageBus: Send + Sync {
    /// Confirmation handed back to the caller of `send`.
    type Receipt;
    /// Failure type, passed through to the caller unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    ///
    /// Accept an envelope for later delivery.
    ///
    /// # Errors
    ///
    /// Whatever the bus implementation considers a failed submission.
    ///
    fn dispatch(&self, envelope: Envelope<'_>) -> Result<Self::Receipt, Self::Error>;
}

impl<B: MessageBus + ?Sized> MessageBus for Arc<B> {
    type Receipt = B::Receipt;
    type Error = B::Error;

    fn dispatch(&self, envelope: Envelope<'_>) -> Result<Self::Receipt, Self::Error> {
        (**self).dispatch(envelope)
    }
}

/// Identifier for a queued envelope
///
/// ULIDs are lexicographically sortable by creation time, so envelopes can be
/// ordered by their identifiers alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnvelopeId {
    id: ulid::Ulid,
}

impl EnvelopeId {
    /// Generate a new unique identifier
    #[must_use]
    pub fn generate() -> Self {
        Self {
            id: ulid::Ulid::new(),
        }
    }

    #[must_use]
    pub const fn ulid(&self) -> ulid::Ulid {
        self.id
    }

    /// Milliseconds since the Unix epoch encoded in the identifier
    #[must_use]
    pub const fn timestamp_ms(&self) -> u64 {
        self.id.timestamp_ms()
    }
}

impl std::fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// An envelope as stored by the [`InMemoryBus`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEnvelope {
    pub id: EnvelopeId,
    /// Encoded envelope, message and stamps included.
    pub payload: Vec<u8>,
    pub stamp_count: usize,
}

/// In-memory message bus
///
/// Encodes every envelope it accepts and keeps the bytes in a `Vec`
/// protected by an `RwLock`. Intended for tests and for wiring a mailer
/// before a real broker is available.
///
/// # Capacity Management
/// With a capacity set, dispatching fails with
/// [`BusError::CapacityExceeded`] once the bus is full.
#[derive(Debug, Clone)]
pub struct InMemoryBus<E = BincodeEncoder> {
    envelopes: Arc<RwLock<Vec<QueuedEnvelope>>>,
    encoder: E,
    capacity: Option<usize>,
}

impl InMemoryBus {
    /// Create an unbounded bus using the bincode encoder
    #[must_use]
    pub fn new() -> Self {
        Self::with_encoder(BincodeEncoder)
    }

    /// Create a bus that holds at most `capacity` envelopes
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryBus<E> {
    #[must_use]
    pub fn with_encoder(encoder: E) -> Self {
        Self {
            envelopes: Arc::new(RwLock::new(Vec::new())),
            encoder,
            capacity: None,
        }
    }

    /// Get the current number of queued envelopes
    ///
    /// Recovers gracefully if the lock is poisoned by accessing the underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.envelopes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the configured capacity (None = unlimited)
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Snapshot of the queued envelopes, oldest first
    ///
    /// # Errors
    /// If the lock is poisoned
    pub fn envelopes(&self) -> Result<Vec<QueuedEnvelope>, BusError> {
        Ok(self.envelopes.read()?.clone())
    }

    /// Remove and return every queued envelope, oldest first
    ///
    /// # Errors
    /// If the lock is poisoned
    pub fn drain(&self) -> Result<Vec<QueuedEnvelope>, BusError> {
        Ok(std::mem::take(&mut *self.envelopes.write()?))
    }
}

impl<E: EnvelopeEncoder> MessageBus for InMemoryBus<E> {
    type Receipt = EnvelopeId;
    type Error = BusError;

    fn dispatch(&self, envelope: Envelope<'_>) -> Result<Self::Receipt, Self::Error> {
        let payload = self.encoder.encode(&envelope)?;

        let mut envelopes = self.envelopes.write()?;
        if let Some(capacity) = self.capacity
            && envelopes.len() >= capacity
        {
            return Err(BusError::CapacityExceeded {
                len: envelopes.len(),
                capacity,
            });
        }

        let id = EnvelopeId::generate();
        let size = payload.len();
        envelopes.push(QueuedEnvelope {
            id,
            payload,
            stamp_count: envelope.stamps().len(),
        });

        internal!(level = DEBUG, "Queued envelope {id} ({size} bytes)");

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        message::{Email, Message},
        stamp::{DelayStamp, SharedStamp},
    };

    #[test]
    fn dispatch_queues_encoded_envelopes() {
        let bus = InMemoryBus::new();
        let message = Message::from(Email::new().subject("queued"));
        let stamp: SharedStamp = Arc::new(DelayStamp { delay_ms: 5 });

        let id = bus
            .dispatch(Envelope::with_stamps(&message, vec![stamp]))
            .unwrap();

        let queued = bus.envelopes().unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].id, id);
        assert_eq!(queued[0].stamp_count, 1);
        assert!(!queued[0].payload.is_empty());
    }

    #[test]
    fn capacity_is_enforced() {
        let bus = InMemoryBus::with_capacity(1);
        assert_eq!(bus.capacity(), Some(1));

        let message = Message::from(Email::new());
        bus.dispatch(Envelope::new(&message)).unwrap();

        let err = bus.dispatch(Envelope::new(&message)).unwrap_err();
        assert!(matches!(
            err,
            BusError::CapacityExceeded {
                len: 1,
                capacity: 1
            }
        ));
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn drain_empties_the_bus() {
        let bus = InMemoryBus::new();
        let message = Message::from(Email::new());
        let first = bus.dispatch(Envelope::new(&message)).unwrap();
        let second = bus.dispatch(Envelope::new(&message)).unwrap();

        let drained = bus.drain().unwrap();
        assert_eq!(
            drained.iter().map(|queued| queued.id).collect::<Vec<_>>(),
            vec![first, second]
        );
        assert!(bus.is_empty());
    }

    #[test]
    fn envelope_ids_expose_their_ulid() {
        let before = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        let id = EnvelopeId::generate();

        assert_eq!(id.ulid().to_string(), id.to_string());
        assert_eq!(id.timestamp_ms(), id.ulid().timestamp_ms());
        assert!(id.timestamp_ms() >= before);
    }
}
