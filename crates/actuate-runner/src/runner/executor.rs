//! Single-attempt execution: resolve, invoke once, report.
//!
//! This is where faults stop. Callers above only see an [`Attempt`], and the
//! batch boundary only sees `bool`.

use super::factory::Operation;
use crate::host::{Fault, Host};
use tracing::{debug, warn};

/// Outcome of one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// Located and completed.
    Success,
    /// The locator matched nothing. Not a fault.
    NotFound,
    /// Located, but the primitive faulted.
    Fault(Fault),
}

impl Attempt {
    /// Check if the attempt succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Attempt::Success)
    }
}

/// Resolve `locator` and invoke `operation` on it exactly once.
pub async fn execute<H: Host + ?Sized>(host: &H, locator: &str, operation: &Operation) -> Attempt {
    let Some(element) = host.resolve(locator).await else {
        debug!("{} '{}': not found", operation.kind(), locator);
        return Attempt::NotFound;
    };

    match operation.invoke(host, &element).await {
        Ok(()) => {
            debug!("{} '{}': ok", operation.kind(), locator);
            Attempt::Success
        }
        Err(fault) => {
            warn!("{} '{}' failed: {}", operation.kind(), locator, fault);
            Attempt::Fault(fault)
        }
    }
}

/// [`execute`] collapsed to success or failure.
pub async fn execute_action<H: Host + ?Sized>(
    host: &H,
    locator: &str,
    operation: &Operation,
) -> bool {
    execute(host, locator, operation).await.is_success()
}
