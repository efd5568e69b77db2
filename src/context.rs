//! Template context carried by [`TemplatedEmail`](crate::TemplatedEmail).
//!
//! Values are arbitrary [`ContextValue`] trait objects. Whether a context can
//! be queued is only known by actually serializing it, which is what the
//! [`probe`](crate::probe) does.

use std::{fmt::Debug, path::PathBuf, sync::Arc};

use serde::{Serialize, Serializer, ser::SerializeMap};

/// A value made available to a template.
///
/// Implementations are serialized through `typetag`, so any `Serialize`
/// type can be registered with `#[typetag::serialize]`. A value whose
/// `Serialize` impl fails makes the whole message queue-unsafe.
#[typetag::serialize(tag = "type", content = "value")]
pub trait ContextValue: Debug + Send + Sync {}

#[typetag::serialize(name = "string")]
impl ContextValue for String {}

#[typetag::serialize(name = "bool")]
impl ContextValue for bool {}

#[typetag::serialize(name = "int")]
impl ContextValue for i64 {}

#[typetag::serialize(name = "uint")]
impl ContextValue for u64 {}

#[typetag::serialize(name = "float")]
impl ContextValue for f64 {}

#[typetag::serialize(name = "list")]
impl ContextValue for Vec<String> {}

/// A handle to a file on disk, e.g. an attachment to be embedded by the
/// template.
///
/// Handles refer to live filesystem state and can never be serialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Serialize for FileHandle {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Err(serde::ser::Error::custom(format!(
            "file handle {} cannot be serialized",
            self.path.display()
        )))
    }
}

#[typetag::serialize(name = "file")]
impl ContextValue for FileHandle {}

/// Insertion-ordered mapping from variable name to value.
#[derive(Clone, Debug, Default)]
pub struct TemplateContext {
    entries: Vec<(String, Arc<dyn ContextValue>)>,
}

impl TemplateContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing (in place) any value already stored under
    /// `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ContextValue + 'static) {
        self.insert_shared(name, Arc::new(value));
    }

    /// Insert an already shared value.
    pub fn insert_shared(&mut self, name: impl Into<String>, value: Arc<dyn ContextValue>) {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(key, _)| *key == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ContextValue>> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn ContextValue>)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TemplateContext {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
