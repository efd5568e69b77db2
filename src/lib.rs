#![doc = include_str!("../README.md")]

pub mod address;
pub mod bus;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod event;
pub mod logging;
pub mod mailer;
pub mod message;
pub mod probe;
pub mod stamp;
pub mod transport;

pub use tracing;

pub use address::{Address, AddressList};
pub use bus::{EnvelopeId, InMemoryBus, MessageBus, QueuedEnvelope};
pub use config::{ContextPolicy, MailerConfig, MemoryBusConfig};
pub use context::{ContextValue, FileHandle, TemplateContext};
pub use envelope::Envelope;
pub use error::{
    AddressError, BusError, ConfigError, MailerError, SerializationError, TransportError,
};
pub use event::{EventHook, ListenerChain, MessageEvent, MessageListener};
pub use mailer::Mailer;
pub use message::{Email, Message, RawMessage, TemplatedEmail};
pub use probe::{BincodeEncoder, EnvelopeEncoder, QueueSafety};
pub use stamp::{BusNameStamp, DelayStamp, SharedStamp, Stamp, TransportNamesStamp};
pub use transport::{NullTransport, SentMessage, Transport};
