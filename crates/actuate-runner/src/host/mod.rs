//! Locator resolution and the four element primitives.
//!
//! A [`Host`] is whatever owns the element tree being automated: a live
//! browser page, or the in-memory [`MemoryHost`]. Hosts apply no policy of
//! their own; delays, retries and fault interception live in the runner.

mod browser;
mod memory;

pub use memory::{Invocation, MemoryElement, MemoryHost};

use async_trait::async_trait;
use std::fmt;

/// A resolved element.
///
/// Opaque to the runner. Browser hosts carry the selector that matched;
/// the memory host carries the locator key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    /// Wrap a host-specific element key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the element key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unexpected host condition raised while applying a primitive.
///
/// Distinct from "not found": a fault means the element was located but
/// the operation on it did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault {
    #[error("element '{locator}' detached before it could be used")]
    Detached { locator: String },

    #[error("host error: {0}")]
    Host(String),

    #[error("action panicked: {0}")]
    Panicked(String),
}

impl From<eoka::Error> for Fault {
    fn from(e: eoka::Error) -> Self {
        Fault::Host(e.to_string())
    }
}

/// The element tree an action runs against.
///
/// `resolve` never fails: host errors during lookup are reported as `None`.
/// Primitives may fault; they never retry.
#[async_trait(?Send)]
pub trait Host {
    /// Find the first element matching `locator`.
    async fn resolve(&self, locator: &str) -> Option<ElementHandle>;

    /// Invoke the element's primary action (a click).
    async fn activate(&self, element: &ElementHandle) -> Result<(), Fault>;

    /// Overwrite the element's editable value.
    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<(), Fault>;

    /// Give the element input focus.
    async fn focus(&self, element: &ElementHandle) -> Result<(), Fault>;

    /// Read the element's text content without changing anything.
    async fn read_text(&self, element: &ElementHandle) -> Result<String, Fault>;
}
