use serde::Serialize;

use crate::{message::Message, stamp::SharedStamp};

/// A message together with the stamps collected for it.
///
/// The envelope borrows the caller's message rather than copying it, so the
/// bus sees exactly the instance passed to [`Mailer::send`](crate::Mailer::send).
#[derive(Debug, Serialize)]
pub struct Envelope<'m> {
    message: &'m Message,
    stamps: Vec<SharedStamp>,
}

impl<'m> Envelope<'m> {
    /// Wrap a message with no stamps.
    #[must_use]
    pub const fn new(message: &'m Message) -> Self {
        Self {
            message,
            stamps: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_stamps(message: &'m Message, stamps: Vec<SharedStamp>) -> Self {
        Self { message, stamps }
    }

    #[must_use]
    pub const fn message(&self) -> &'m Message {
        self.message
    }

    #[must_use]
    pub fn stamps(&self) -> &[SharedStamp] {
        &self.stamps
    }

    /// Split the envelope back into its parts.
    #[must_use]
    pub fn into_parts(self) -> (&'m Message, Vec<SharedStamp>) {
        (self.message, self.stamps)
    }
}
