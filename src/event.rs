//! Delivery events and the listeners that observe them.
//!
//! A [`MessageEvent`] is created for every send attempt and published once
//! through an [`EventHook`]. Listeners run synchronously, in registration
//! order, on the caller's stack and may attach stamps to the event. The hook
//! hands the same event back, so every stamp added is visible afterwards.

use std::{fmt, sync::Arc};

use crate::{internal, message::Message, stamp::SharedStamp};

/// Carrier published once per send attempt.
#[derive(Debug)]
pub struct MessageEvent<'m> {
    message: &'m Message,
    stamps: Vec<SharedStamp>,
    transport: String,
    queued: bool,
}

impl<'m> MessageEvent<'m> {
    #[must_use]
    pub fn new(message: &'m Message, transport: impl Into<String>, queued: bool) -> Self {
        Self {
            message,
            stamps: Vec::new(),
            transport: transport.into(),
            queued,
        }
    }

    #[must_use]
    pub const fn message(&self) -> &'m Message {
        self.message
    }

    /// Name of the transport that will eventually deliver the message.
    #[must_use]
    pub fn transport(&self) -> &str {
        &self.transport
    }

    /// Whether the message is being deferred to the bus rather than
    /// delivered immediately.
    #[must_use]
    pub const fn is_queued(&self) -> bool {
        self.queued
    }

    /// Attach a stamp. Stamps keep the order in which they were added.
    pub fn add_stamp(&mut self, stamp: SharedStamp) {
        self.stamps.push(stamp);
    }

    #[must_use]
    pub fn stamps(&self) -> &[SharedStamp] {
        &self.stamps
    }

    #[must_use]
    pub fn into_stamps(self) -> Vec<SharedStamp> {
        self.stamps
    }
}

/// Observer notified for every [`MessageEvent`].
///
/// Listeners are invoked synchronously and should avoid heavy or blocking
/// work.
pub trait MessageListener: Send + Sync {
    fn on_message(&self, event: &mut MessageEvent<'_>);
}

impl<F> MessageListener for F
where
    F: Fn(&mut MessageEvent<'_>) + Send + Sync,
{
    fn on_message(&self, event: &mut MessageEvent<'_>) {
        self(event);
    }
}

/// Publishes events to observers and returns the (possibly stamped) event.
pub trait EventHook: Send + Sync {
    fn publish<'m>(&self, event: MessageEvent<'m>) -> MessageEvent<'m>;
}

impl<H: EventHook + ?Sized> EventHook for Arc<H> {
    fn publish<'m>(&self, event: MessageEvent<'m>) -> MessageEvent<'m> {
        (**self).publish(event)
    }
}

/// Ordered list of listeners, notified one after another.
#[derive(Clone, Default)]
pub struct ListenerChain {
    listeners: Vec<Arc<dyn MessageListener>>,
}

impl ListenerChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener; it runs after every listener already registered.
    pub fn push(&mut self, listener: impl MessageListener + 'static) {
        self.listeners.push(Arc::new(listener));
    }

    #[must_use]
    pub fn with(mut self, listener: impl MessageListener + 'static) -> Self {
        self.push(listener);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ListenerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerChain")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventHook for ListenerChain {
    fn publish<'m>(&self, mut event: MessageEvent<'m>) -> MessageEvent<'m> {
        internal!(
            "Publishing {} event to {} listeners",
            event.message().kind(),
            self.listeners.len()
        );

        for listener in &self.listeners {
            listener.on_message(&mut event);
        }

        event
    }
}
