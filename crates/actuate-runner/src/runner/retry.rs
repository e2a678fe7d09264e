//! Pre-delay and bounded retry around single attempts.

use super::executor::Attempt;
use crate::config::{Descriptor, ErrorObserver};
use crate::host::Fault;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tracing::debug;

/// Timing and retry policy for one descriptor.
#[derive(Clone, Default)]
pub struct RetryPolicy {
    /// Slept once before the first attempt. There is no delay between attempts.
    pub delay_before: Duration,
    pub max_retries: u32,
    pub on_attempt_error: Option<ErrorObserver>,
}

impl RetryPolicy {
    pub fn from_descriptor(descriptor: &Descriptor) -> Self {
        Self {
            delay_before: Duration::from_millis(descriptor.delay_before_ms),
            max_retries: descriptor.max_retries,
            on_attempt_error: descriptor.on_attempt_error.clone(),
        }
    }

    /// Total attempts: the first plus `max_retries`.
    pub fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    fn report(&self, fault: &Fault) {
        if let Some(ref observer) = self.on_attempt_error {
            observer(fault);
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run `attempt` until it succeeds or the policy's attempts are used up.
///
/// Faulted attempts are reported to the observer in order; not-found
/// attempts are not. A panicking attempt counts as a fault.
pub async fn run_with_policy<F, Fut>(mut attempt: F, policy: &RetryPolicy) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Attempt>,
{
    if !policy.delay_before.is_zero() {
        debug!("waiting {:?} before first attempt", policy.delay_before);
        tokio::time::sleep(policy.delay_before).await;
    }

    let total = policy.attempts();
    for n in 1..=total {
        let outcome = AssertUnwindSafe(async { attempt().await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Attempt::Fault(Fault::Panicked(panic_message(&*payload))));

        match outcome {
            Attempt::Success => {
                if n > 1 {
                    debug!("succeeded on attempt {}/{}", n, total);
                }
                return true;
            }
            Attempt::NotFound => debug!("attempt {}/{}: not found", n, total),
            Attempt::Fault(fault) => {
                debug!("attempt {}/{}: {}", n, total, fault);
                policy.report(&fault);
            }
        }
    }
    false
}
