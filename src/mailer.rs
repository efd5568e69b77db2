//! The dispatch-or-defer mailer.
//!
//! [`Mailer::send`] never delivers directly. Every structured message is
//! published to the listeners, made queue-safe if needed, and handed to the
//! bus together with the stamps the listeners attached.

use crate::{
    bus::{InMemoryBus, MessageBus},
    config::{ContextPolicy, MailerConfig},
    envelope::Envelope,
    error::MailerError,
    event::{EventHook, ListenerChain, MessageEvent, MessageListener},
    internal,
    message::Message,
    outgoing,
    probe::{self, BincodeEncoder, EnvelopeEncoder, QueueSafety},
    transport::Transport,
};

/// Routes messages to a [`MessageBus`].
///
/// Generic parameters:
/// - `T`: transport the consumer of the bus will deliver through
/// - `B`: bus accepting the envelopes
/// - `H`: hook publishing the [`MessageEvent`]
/// - `E`: encoder used to probe whether a message is queue-safe
///
/// Collaborators are fixed at construction; a `Mailer` holds no other
/// state and can be shared between threads.
#[derive(Debug)]
pub struct Mailer<T, B, H = ListenerChain, E = BincodeEncoder> {
    transport: T,
    bus: B,
    hook: H,
    encoder: E,
    policy: ContextPolicy,
}

impl<T, B> Mailer<T, B>
where
    T: Transport,
    B: MessageBus,
{
    /// Create a mailer with no listeners, the bincode encoder and the
    /// default [`ContextPolicy`].
    pub fn new(transport: T, bus: B) -> Self {
        Self {
            transport,
            bus,
            hook: ListenerChain::new(),
            encoder: BincodeEncoder,
            policy: ContextPolicy::default(),
        }
    }
}

impl<T: Transport> Mailer<T, InMemoryBus> {
    /// Create a mailer backed by an [`InMemoryBus`] built from `config.bus`,
    /// applying `config.context_policy`.
    pub fn from_config(transport: T, config: MailerConfig) -> Self {
        Mailer::new(transport, config.bus.into_bus()).with_policy(config.context_policy)
    }
}

impl<T, B, E> Mailer<T, B, ListenerChain, E> {
    /// Register a listener after those already registered.
    #[must_use]
    pub fn listener(mut self, listener: impl MessageListener + 'static) -> Self {
        self.hook.push(listener);
        self
    }
}

impl<T, B, H, E> Mailer<T, B, H, E>
where
    T: Transport,
    B: MessageBus,
    H: EventHook,
    E: EnvelopeEncoder,
{
    /// Replace the event hook while keeping all other collaborators.
    pub fn with_hook<H2: EventHook>(self, hook: H2) -> Mailer<T, B, H2, E> {
        Mailer {
            transport: self.transport,
            bus: self.bus,
            hook,
            encoder: self.encoder,
            policy: self.policy,
        }
    }

    /// Replace the encoder used to probe messages.
    ///
    /// This should be the encoder the bus itself uses.
    pub fn with_encoder<E2: EnvelopeEncoder>(self, encoder: E2) -> Mailer<T, B, H, E2> {
        Mailer {
            transport: self.transport,
            bus: self.bus,
            hook: self.hook,
            encoder,
            policy: self.policy,
        }
    }

    /// Choose what happens to a template context that cannot be serialized.
    #[must_use]
    pub const fn with_policy(mut self, policy: ContextPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The transport listeners are told about.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// The bus envelopes are dispatched to.
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    /// The active context policy.
    pub const fn policy(&self) -> ContextPolicy {
        self.policy
    }

    /// Hand a message to the bus.
    ///
    /// The message is published to the event hook first; the stamps
    /// listeners attach are forwarded to the bus in the order they were
    /// added. The bus receives this very `message`, not a copy, and its
    /// receipt is returned unchanged.
    ///
    /// **Side effect:** if `message` is a templated email whose context
    /// cannot be serialized, the context is cleared *in place* before the
    /// message is queued (under the default [`ContextPolicy::Clear`]). The
    /// caller observes an empty context afterwards. Sharing one message
    /// between concurrent sends is therefore not supported.
    ///
    /// # Errors
    ///
    /// - [`MailerError::UnsupportedMessage`] for raw messages, before any
    ///   listener or the bus is called.
    /// - [`MailerError::UnserializableContext`] when the context cannot be
    ///   serialized and the policy is [`ContextPolicy::Reject`].
    /// - [`MailerError::Submission`] carrying the bus error untouched.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(kind = message.kind(), transport = %self.transport.name())
    )]
    pub fn send(&self, message: &mut Message) -> Result<B::Receipt, MailerError<B::Error>> {
        if message.is_raw() {
            internal!(
                level = WARN,
                "Refusing to dispatch a raw message; the bus requires a structured email"
            );
            return Err(MailerError::UnsupportedMessage(message.kind()));
        }

        let event = MessageEvent::new(message, self.transport.name(), true);
        let stamps = self.hook.publish(event).into_stamps();

        if let QueueSafety::Unsafe(err) = probe::inspect(message, &self.encoder) {
            match self.policy {
                ContextPolicy::Clear => {
                    if let Some(context) = message.context_mut() {
                        internal!(
                            level = INFO,
                            "Clearing {} unserializable template variables: {err}",
                            context.len()
                        );
                        context.clear();
                    }
                }
                ContextPolicy::Reject => {
                    internal!(level = WARN, "Rejecting message with unserializable context: {err}");
                    return Err(MailerError::UnserializableContext(err));
                }
            }
        }

        outgoing!(
            level = DEBUG,
            "Dispatching {} message with {} stamps",
            message.kind(),
            stamps.len()
        );

        self.bus
            .dispatch(Envelope::with_stamps(message, stamps))
            .map_err(MailerError::Submission)
    }
}
