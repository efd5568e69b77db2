//! Recording doubles for mailer integration tests
//!
//! - [`RecordingBus`] remembers every envelope it is handed
//! - [`CountingHook`] counts publications while delegating to a listener chain
//! - [`CountingTransport`] counts direct deliveries
#![allow(dead_code)] // Test utility module - not all helpers used in every test

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use courier::{
    Address, BincodeEncoder, Email, Envelope, EnvelopeEncoder, EventHook, ListenerChain, Message,
    MessageBus, MessageEvent, NullTransport, SentMessage, SharedStamp, Transport, TransportError,
};

/// Confirmation returned by the [`RecordingBus`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub sequence: usize,
}

/// Failure injected into the [`RecordingBus`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("broker unavailable: {0}")]
pub struct Unavailable(pub String);

/// What the bus saw for one dispatch
#[derive(Debug)]
pub struct Dispatched {
    /// Address of the message the envelope borrowed
    pub message_addr: usize,
    /// Copy of the message as it was at dispatch time
    pub message: Message,
    pub stamps: Vec<SharedStamp>,
    /// Bincode encoding of the envelope, or the encoder's error
    pub encoded: Result<Vec<u8>, String>,
    pub receipt: Receipt,
}

#[derive(Debug, Default)]
pub struct RecordingBus {
    dispatched: Mutex<Vec<Dispatched>>,
    failure: Option<Unavailable>,
}

impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that refuses every envelope with `reason`
    pub fn failing(reason: &str) -> Self {
        Self {
            failure: Some(Unavailable(reason.to_string())),
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.dispatched.lock().expect("RecordingBus mutex poisoned").len()
    }

    /// Run `f` against everything dispatched so far
    pub fn with_dispatched<R>(&self, f: impl FnOnce(&[Dispatched]) -> R) -> R {
        f(&self.dispatched.lock().expect("RecordingBus mutex poisoned"))
    }
}

impl MessageBus for RecordingBus {
    type Receipt = Receipt;
    type Error = Unavailable;

    fn dispatch(&self, envelope: Envelope<'_>) -> Result<Self::Receipt, Self::Error> {
        let encoded = BincodeEncoder
            .encode(&envelope)
            .map_err(|err| err.to_string());

        let mut dispatched = self.dispatched.lock().expect("RecordingBus mutex poisoned");
        let receipt = Receipt {
            sequence: dispatched.len(),
        };

        let (message, stamps) = envelope.into_parts();
        dispatched.push(Dispatched {
            message_addr: address_of(message),
            message: message.clone(),
            stamps,
            encoded,
            receipt: receipt.clone(),
        });

        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(receipt),
        }
    }
}

/// Event hook that counts publications
#[derive(Debug, Default)]
pub struct CountingHook {
    chain: ListenerChain,
    published: AtomicUsize,
}

impl CountingHook {
    pub fn new(chain: ListenerChain) -> Self {
        Self {
            chain,
            published: AtomicUsize::new(0),
        }
    }

    pub fn published(&self) -> usize {
        self.published.load(Ordering::SeqCst)
    }
}

impl EventHook for CountingHook {
    fn publish<'m>(&self, event: MessageEvent<'m>) -> MessageEvent<'m> {
        self.published.fetch_add(1, Ordering::SeqCst);
        self.chain.publish(event)
    }
}

/// Transport that counts every direct delivery attempt
#[derive(Debug, Default)]
pub struct CountingTransport {
    sends: AtomicUsize,
}

impl CountingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sends(&self) -> usize {
        self.sends.load(Ordering::SeqCst)
    }
}

impl Transport for CountingTransport {
    fn name(&self) -> String {
        "counting://".to_string()
    }

    fn send(&self, message: &Message) -> Result<SentMessage, TransportError> {
        self.sends.fetch_add(1, Ordering::SeqCst);
        NullTransport.send(message)
    }
}

pub fn address_of(message: &Message) -> usize {
    std::ptr::from_ref(message) as usize
}

pub fn address(input: &str) -> Address {
    Address::parse(input).expect("valid test address")
}

/// The email used throughout the scenarios
pub fn symfony_email() -> Email {
    Email::new()
        .from(address("hello@example.com"))
        .to(address("you@example.com"))
        .subject("Time for Symfony Mailer!")
        .text("Sending emails is fun again!")
}
