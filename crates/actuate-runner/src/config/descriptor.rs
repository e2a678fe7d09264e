use crate::host::Fault;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Observer invoked once per faulted attempt.
pub type ErrorObserver = Arc<dyn Fn(&Fault) + Send + Sync>;

fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

/// One element action plus its execution policy.
///
/// `kind` is kept as authored; it is checked by
/// [`ActionFactory`](crate::ActionFactory) when the batch runs, so an unknown
/// kind rejects that descriptor instead of failing the whole file.
#[derive(Clone, Serialize, Deserialize)]
pub struct Descriptor {
    /// Locator of the target element. First match wins.
    pub locator: String,

    /// Operation tag: `activate`, `set_value`, `focus` or `read_text`.
    pub kind: String,

    /// Value for `set_value`; ignored by every other kind.
    #[serde(default, skip_serializing_if = "is_default")]
    pub value: String,

    /// Sleep applied once before the first attempt.
    #[serde(default, alias = "delayBeforeMs", skip_serializing_if = "is_default")]
    pub delay_before_ms: u64,

    /// Attempts made after the first one fails.
    #[serde(
        default,
        alias = "maxRetries",
        alias = "retries",
        skip_serializing_if = "is_default"
    )]
    pub max_retries: u32,

    /// Called once per faulted attempt. Not serialized.
    #[serde(skip)]
    pub on_attempt_error: Option<ErrorObserver>,
}

impl Descriptor {
    /// Create a descriptor with no delay and no retries.
    pub fn new(locator: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            kind: kind.into(),
            value: String::new(),
            delay_before_ms: 0,
            max_retries: 0,
            on_attempt_error: None,
        }
    }

    /// Set the value used by `set_value`.
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// Set the delay before the first attempt.
    pub fn delay_before_ms(mut self, ms: u64) -> Self {
        self.delay_before_ms = ms;
        self
    }

    /// Set the number of retries after the first attempt.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Observe every faulted attempt.
    pub fn on_attempt_error(mut self, observer: impl Fn(&Fault) + Send + Sync + 'static) -> Self {
        self.on_attempt_error = Some(Arc::new(observer));
        self
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("locator", &self.locator)
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("delay_before_ms", &self.delay_before_ms)
            .field("max_retries", &self.max_retries)
            .field("on_attempt_error", &self.on_attempt_error.is_some())
            .finish()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.locator)
    }
}
