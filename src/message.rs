use std::sync::Arc;

use serde::Serialize;

use crate::{
    address::{Address, AddressList},
    context::{ContextValue, TemplateContext},
};

/// Any message handed to the [`Mailer`](crate::Mailer).
///
/// Only structured emails can travel over the bus; a [`RawMessage`] has no
/// envelope metadata and is always rejected there.
#[derive(Clone, Debug, Serialize)]
pub enum Message {
    Email(Email),
    Templated(TemplatedEmail),
    Raw(RawMessage),
}

impl Message {
    /// Short name of the variant, used in logs and errors.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::Templated(_) => "templated",
            Self::Raw(_) => "raw",
        }
    }

    #[must_use]
    pub const fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    /// The structured email, if this is not a raw payload.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        match self {
            Self::Email(email) => Some(email),
            Self::Templated(templated) => Some(&templated.email),
            Self::Raw(_) => None,
        }
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.email().and_then(|email| email.subject.as_deref())
    }

    /// The template context, only present on templated emails.
    #[must_use]
    pub const fn context(&self) -> Option<&TemplateContext> {
        match self {
            Self::Templated(templated) => Some(&templated.context),
            _ => None,
        }
    }

    pub const fn context_mut(&mut self) -> Option<&mut TemplateContext> {
        match self {
            Self::Templated(templated) => Some(&mut templated.context),
            _ => None,
        }
    }
}

impl From<Email> for Message {
    fn from(value: Email) -> Self {
        Self::Email(value)
    }
}

impl From<TemplatedEmail> for Message {
    fn from(value: TemplatedEmail) -> Self {
        Self::Templated(value)
    }
}

impl From<RawMessage> for Message {
    fn from(value: RawMessage) -> Self {
        Self::Raw(value)
    }
}

/// A fully self-contained email.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: AddressList,
    pub to: AddressList,
    pub cc: AddressList,
    pub bcc: AddressList,
    pub reply_to: AddressList,
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
}

impl Email {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from(mut self, address: Address) -> Self {
        self.from.push(address);
        self
    }

    #[must_use]
    pub fn to(mut self, address: Address) -> Self {
        self.to.push(address);
        self
    }

    #[must_use]
    pub fn cc(mut self, address: Address) -> Self {
        self.cc.push(address);
        self
    }

    #[must_use]
    pub fn bcc(mut self, address: Address) -> Self {
        self.bcc.push(address);
        self
    }

    #[must_use]
    pub fn reply_to(mut self, address: Address) -> Self {
        self.reply_to.push(address);
        self
    }

    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.text = Some(body.into());
        self
    }

    #[must_use]
    pub fn html(mut self, body: impl Into<String>) -> Self {
        self.html = Some(body.into());
        self
    }
}

/// An email whose body is rendered later from templates and a context.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TemplatedEmail {
    pub email: Email,
    pub html_template: Option<String>,
    pub text_template: Option<String>,
    pub context: TemplateContext,
}

impl TemplatedEmail {
    #[must_use]
    pub fn new(email: Email) -> Self {
        Self {
            email,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn html_template(mut self, template: impl Into<String>) -> Self {
        self.html_template = Some(template.into());
        self
    }

    #[must_use]
    pub fn text_template(mut self, template: impl Into<String>) -> Self {
        self.text_template = Some(template.into());
        self
    }

    /// Replace the whole context.
    #[must_use]
    pub fn context(mut self, context: TemplateContext) -> Self {
        self.context = context;
        self
    }

    /// Add a single variable to the context.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ContextValue + 'static) -> Self {
        self.context.insert(name, value);
        self
    }

    /// Add a single shared variable to the context.
    #[must_use]
    pub fn with_shared(mut self, name: impl Into<String>, value: Arc<dyn ContextValue>) -> Self {
        self.context.insert_shared(name, value);
        self
    }
}

/// An opaque, already rendered payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RawMessage(Vec<u8>);

impl RawMessage {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
