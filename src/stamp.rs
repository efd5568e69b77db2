//! Opaque metadata attached to an [`Envelope`](crate::Envelope).
//!
//! The mailer never looks inside a stamp; it only forwards the stamps that
//! listeners added during event publication, in the order they were added.

use std::{fmt::Debug, sync::Arc};

use serde::Serialize;

/// Marker attached to an envelope by a [`MessageListener`](crate::MessageListener).
///
/// Stamps travel with the envelope to the bus, so they must be serializable.
#[typetag::serialize]
pub trait Stamp: Debug + Send + Sync {}

/// Shared handle to a stamp. Identity is preserved end to end.
pub type SharedStamp = Arc<dyn Stamp>;

/// Ask the bus to hold the envelope back for `delay_ms` milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DelayStamp {
    pub delay_ms: u64,
}

#[typetag::serialize]
impl Stamp for DelayStamp {}

/// Restrict which bus transports may carry the envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransportNamesStamp {
    pub names: Vec<String>,
}

#[typetag::serialize]
impl Stamp for TransportNamesStamp {}

/// Name the bus the envelope was dispatched on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BusNameStamp {
    pub name: String,
}

#[typetag::serialize]
impl Stamp for BusNameStamp {}
