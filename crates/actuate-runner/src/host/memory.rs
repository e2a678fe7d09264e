//! In-memory element table.
//!
//! Replays descriptors without a browser. Faults can be scripted per locator
//! and every primitive call is logged with its (tokio) timestamp, which makes
//! the retry and delay behaviour observable in tests.

use super::{ElementHandle, Fault, Host};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tokio::time::Instant;
use tracing::debug;

/// State of a single in-memory element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    pub value: String,
    pub text: String,
    pub focused: bool,
    pub activations: u32,
}

impl MemoryElement {
    /// Create an empty, unfocused element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

/// One primitive call as seen by the host.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub locator: String,
    pub primitive: &'static str,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy)]
enum FailurePlan {
    Next(u32),
    Always,
}

#[derive(Debug, Default)]
struct State {
    elements: HashMap<String, MemoryElement>,
    failures: HashMap<String, FailurePlan>,
    invocations: Vec<Invocation>,
}

/// A [`Host`] backed by a locator-keyed element table.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<State>,
}

impl MemoryHost {
    /// Create a host with no elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_element(self, locator: impl Into<String>, element: MemoryElement) -> Self {
        self.insert(locator, element);
        self
    }

    /// Add or replace an element.
    pub fn insert(&self, locator: impl Into<String>, element: MemoryElement) {
        self.lock().elements.insert(locator.into(), element);
    }

    /// Remove an element. Handles resolved earlier now fault as detached.
    pub fn remove(&self, locator: &str) -> Option<MemoryElement> {
        self.lock().elements.remove(locator)
    }

    /// Snapshot of an element's current state.
    pub fn element(&self, locator: &str) -> Option<MemoryElement> {
        self.lock().elements.get(locator).cloned()
    }

    /// Make the next `times` primitive calls on `locator` fault.
    pub fn fail_next(&self, locator: impl Into<String>, times: u32) {
        self.lock()
            .failures
            .insert(locator.into(), FailurePlan::Next(times));
    }

    /// Make every primitive call on `locator` fault.
    pub fn fail_always(&self, locator: impl Into<String>) {
        self.lock()
            .failures
            .insert(locator.into(), FailurePlan::Always);
    }

    /// Primitive calls made against `locator`, in call order.
    pub fn invocations(&self, locator: &str) -> Vec<Invocation> {
        self.lock()
            .invocations
            .iter()
            .filter(|i| i.locator == locator)
            .cloned()
            .collect()
    }

    /// Number of primitive calls made against `locator`.
    pub fn invocation_count(&self, locator: &str) -> usize {
        self.lock()
            .invocations
            .iter()
            .filter(|i| i.locator == locator)
            .count()
    }

    /// Number of primitive calls across all locators.
    pub fn total_invocations(&self) -> usize {
        self.lock().invocations.len()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log the call, consult the failure plan, then run `op` on the element.
    fn apply<T>(
        &self,
        element: &ElementHandle,
        primitive: &'static str,
        op: impl FnOnce(&mut State, &str) -> T,
    ) -> Result<T, Fault> {
        let locator = element.as_str();
        let mut state = self.lock();
        state.invocations.push(Invocation {
            locator: locator.to_string(),
            primitive,
            at: Instant::now(),
        });

        let scripted = match state.failures.get_mut(locator) {
            Some(FailurePlan::Always) => true,
            Some(FailurePlan::Next(n)) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        };
        if scripted {
            debug!("scripted {} failure on '{}'", primitive, locator);
            return Err(Fault::Host(format!(
                "scripted {} failure on '{}'",
                primitive, locator
            )));
        }

        if !state.elements.contains_key(locator) {
            return Err(Fault::Detached {
                locator: locator.to_string(),
            });
        }
        Ok(op(&mut *state, locator))
    }
}

#[async_trait(?Send)]
impl Host for MemoryHost {
    async fn resolve(&self, locator: &str) -> Option<ElementHandle> {
        self.lock()
            .elements
            .contains_key(locator)
            .then(|| ElementHandle::new(locator))
    }

    async fn activate(&self, element: &ElementHandle) -> Result<(), Fault> {
        self.apply(element, "activate", |state, locator| {
            if let Some(el) = state.elements.get_mut(locator) {
                el.activations += 1;
            }
        })
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<(), Fault> {
        self.apply(element, "set_value", |state, locator| {
            if let Some(el) = state.elements.get_mut(locator) {
                el.value = value.to_string();
            }
        })
    }

    async fn focus(&self, element: &ElementHandle) -> Result<(), Fault> {
        self.apply(element, "focus", |state, locator| {
            for (key, el) in state.elements.iter_mut() {
                el.focused = key == locator;
            }
        })
    }

    async fn read_text(&self, element: &ElementHandle) -> Result<String, Fault> {
        self.apply(element, "read_text", |state, locator| {
            state
                .elements
                .get(locator)
                .map(|el| el.text.clone())
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> MemoryHost {
        MemoryHost::new()
            .with_element("#name", MemoryElement::new().with_value("old"))
            .with_element("#title", MemoryElement::new().with_text("Hello"))
    }

    #[tokio::test]
    async fn resolve_known_and_unknown() {
        let host = host();
        assert_eq!(host.resolve("#name").await, Some(ElementHandle::new("#name")));
        assert_eq!(host.resolve("#nope").await, None);
        assert_eq!(host.total_invocations(), 0);
    }

    #[tokio::test]
    async fn focus_moves_between_elements() {
        let host = host();
        host.focus(&ElementHandle::new("#name")).await.unwrap();
        host.focus(&ElementHandle::new("#title")).await.unwrap();
        assert!(!host.element("#name").unwrap().focused);
        assert!(host.element("#title").unwrap().focused);
    }

    #[tokio::test]
    async fn fail_next_runs_out() {
        let host = host();
        host.fail_next("#name", 2);
        let el = ElementHandle::new("#name");
        assert!(host.activate(&el).await.is_err());
        assert!(host.activate(&el).await.is_err());
        assert!(host.activate(&el).await.is_ok());
        assert_eq!(host.element("#name").unwrap().activations, 1);
        assert_eq!(host.invocation_count("#name"), 3);
    }

    #[tokio::test]
    async fn removed_element_is_detached() {
        let host = host();
        let el = host.resolve("#title").await.unwrap();
        host.remove("#title");
        let err = host.read_text(&el).await.unwrap_err();
        assert_eq!(
            err,
            Fault::Detached {
                locator: "#title".into()
            }
        );
    }
}
