//! Maps operation tags to typed operations.

use crate::config::Descriptor;
use crate::host::{ElementHandle, Fault, Host};
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// The closed set of element operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Activate,
    SetValue,
    Focus,
    ReadText,
}

/// Tracing target for text read by `read_text`.
pub const READ_TEXT_TARGET: &str = "actuate::read_text";

const KIND_NAMES: &[&str] = &["activate", "set_value", "focus", "read_text"];

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Activate => "activate",
            Self::SetValue => "set_value",
            Self::Focus => "focus",
            Self::ReadText => "read_text",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "activate" => Ok(Self::Activate),
            "set_value" => Ok(Self::SetValue),
            "focus" => Ok(Self::Focus),
            "read_text" => Ok(Self::ReadText),
            other => Err(Error::UnsupportedOperation(other.to_string())),
        }
    }
}

impl From<OperationKind> for String {
    fn from(kind: OperationKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A ready-to-invoke operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Activate,
    SetValue(String),
    Focus,
    ReadText,
}

impl Operation {
    /// Get the operation kind.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Activate => OperationKind::Activate,
            Self::SetValue(_) => OperationKind::SetValue,
            Self::Focus => OperationKind::Focus,
            Self::ReadText => OperationKind::ReadText,
        }
    }

    /// Apply the operation to a resolved element. Exactly one primitive call.
    pub async fn invoke<H: Host + ?Sized>(
        &self,
        host: &H,
        element: &ElementHandle,
    ) -> std::result::Result<(), Fault> {
        match self {
            Self::Activate => host.activate(element).await,
            Self::SetValue(value) => host.set_value(element, value).await,
            Self::Focus => host.focus(element).await,
            Self::ReadText => {
                let text = host.read_text(element).await?;
                info!(target: READ_TEXT_TARGET, "{}: {}", element, text);
                Ok(())
            }
        }
    }
}

/// Builds [`Operation`]s from authored tags.
pub struct ActionFactory;

impl ActionFactory {
    /// Resolve `kind` into an operation. `value` is only kept for `set_value`.
    ///
    /// Fails with [`Error::UnsupportedOperation`] for any tag outside the
    /// closed set; nothing is coerced to a no-op.
    pub fn build(kind: &str, value: &str) -> Result<Operation> {
        Ok(match kind.parse::<OperationKind>()? {
            OperationKind::Activate => Operation::Activate,
            OperationKind::SetValue => Operation::SetValue(value.to_string()),
            OperationKind::Focus => Operation::Focus,
            OperationKind::ReadText => Operation::ReadText,
        })
    }

    pub fn build_descriptor(descriptor: &Descriptor) -> Result<Operation> {
        Self::build(&descriptor.kind, &descriptor.value)
    }

    /// Tags accepted by [`build`](Self::build).
    pub fn supported_kinds() -> &'static [&'static str] {
        KIND_NAMES
    }
}
