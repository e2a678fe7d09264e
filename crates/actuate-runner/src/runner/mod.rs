mod executor;
mod factory;
mod retry;

pub use executor::{execute, execute_action, Attempt};
pub use factory::{ActionFactory, Operation, OperationKind, READ_TEXT_TARGET};
pub use retry::{run_with_policy, RetryPolicy};

use crate::config::{BrowserConfig, Config, Descriptor};
use crate::host::Host;
use crate::Result;
use eoka::{Browser, Page};
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, error, info};

/// Result of running a config.
#[derive(Debug)]
pub struct RunResult {
    /// Whether every descriptor succeeded.
    pub success: bool,
    /// Per-descriptor outcome, in input order.
    pub results: Vec<bool>,
    /// Descriptors refused by the action factory.
    pub rejected: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Build, delay and retry one descriptor.
///
/// An unsupported kind is rejected before any attempt and reported as
/// `false`; it is never retried.
pub async fn run_descriptor<H: Host + ?Sized>(host: &H, descriptor: &Descriptor) -> bool {
    let operation = match ActionFactory::build_descriptor(descriptor) {
        Ok(op) => op,
        Err(e) => {
            error!("rejected {}: {}", descriptor, e);
            return false;
        }
    };
    let policy = RetryPolicy::from_descriptor(descriptor);
    run_with_policy(
        || execute(host, &descriptor.locator, &operation),
        &policy,
    )
    .await
}

/// Run every descriptor concurrently and return outcomes in input order.
///
/// Nothing is returned until all descriptors have finished. Descriptors
/// share the host without any coordination.
pub async fn run_all<H: Host + ?Sized>(host: &H, descriptors: &[Descriptor]) -> Vec<bool> {
    debug!("running batch of {}", descriptors.len());
    join_all(descriptors.iter().map(|d| run_descriptor(host, d))).await
}

/// Runs configs against a browser page.
pub struct Runner {
    browser: Browser,
    page: Page,
}

impl Runner {
    /// Launch a browser with the given config.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        let stealth = eoka::StealthConfig {
            headless: config.headless,
            proxy: config.proxy.clone(),
            user_agent: config.user_agent.clone(),
            viewport_width: config.viewport.as_ref().map(|v| v.width).unwrap_or(1280),
            viewport_height: config.viewport.as_ref().map(|v| v.height).unwrap_or(720),
            ..Default::default()
        };

        debug!(
            "Launching browser (headless: {}, proxy: {:?})",
            config.headless, config.proxy
        );
        let browser = Browser::launch_with_config(stealth).await?;
        let page = browser.new_page("about:blank").await?;

        Ok(Self { browser, page })
    }

    /// The page descriptors run against.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Open the config's start page, if any, then run its batch.
    pub async fn run(&self, config: &Config) -> Result<RunResult> {
        if let Some(ref target) = config.target {
            info!("Opening: {}", target.url);
            self.page.goto(&target.url).await?;
        }
        Ok(run_batch(&self.page, &config.actions).await)
    }

    /// Close the browser.
    pub async fn close(self) -> Result<()> {
        self.browser.close().await?;
        Ok(())
    }
}

/// [`run_all`] plus a summary.
pub async fn run_batch<H: Host + ?Sized>(host: &H, descriptors: &[Descriptor]) -> RunResult {
    let start = Instant::now();
    let rejected = descriptors
        .iter()
        .filter(|d| ActionFactory::build_descriptor(d).is_err())
        .count();
    let results = run_all(host, descriptors).await;
    let passed = results.iter().filter(|ok| **ok).count();
    info!("{}/{} actions succeeded", passed, results.len());

    RunResult {
        success: passed == results.len(),
        results,
        rejected,
        duration_ms: start.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Fault, MemoryElement, MemoryHost};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn page() -> MemoryHost {
        MemoryHost::new()
            .with_element("#a", MemoryElement::new())
            .with_element("#b", MemoryElement::new().with_value("old"))
            .with_element("#c", MemoryElement::new().with_text("hello"))
    }

    #[tokio::test]
    async fn end_to_end_mixed_batch() {
        let host = page();
        let batch = vec![
            Descriptor::new("#a", "activate"),
            Descriptor::new("#missing", "focus"),
            Descriptor::new("#b", "set_value").value("x"),
        ];
        assert_eq!(run_all(&host, &batch).await, vec![true, false, true]);
        assert_eq!(host.element("#b").unwrap().value, "x");
        assert_eq!(host.element("#a").unwrap().activations, 1);
    }

    #[tokio::test]
    async fn empty_batch() {
        let host = page();
        assert!(run_all(&host, &[]).await.is_empty());
        let summary = run_batch(&host, &[]).await;
        assert!(summary.success);
        assert_eq!(summary.rejected, 0);
    }

    #[tokio::test]
    async fn unsupported_kind_never_touches_host() {
        let host = page();
        let calls = Arc::new(Mutex::new(0));
        let sink = calls.clone();
        let batch = vec![
            Descriptor::new("#a", "hover")
                .max_retries(3)
                .on_attempt_error(move |_| *sink.lock().unwrap() += 1),
            Descriptor::new("#c", "read_text"),
        ];
        let summary = run_batch(&host, &batch).await;
        assert_eq!(summary.results, vec![false, true]);
        assert_eq!(summary.rejected, 1);
        assert!(!summary.success);
        assert_eq!(host.invocation_count("#a"), 0);
        assert_eq!(*calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_locator_retries_without_observer() {
        let host = page();
        let calls = Arc::new(Mutex::new(0));
        let sink = calls.clone();
        let d = Descriptor::new("#ghost", "activate")
            .max_retries(4)
            .on_attempt_error(move |_| *sink.lock().unwrap() += 1);
        assert!(!run_descriptor(&host, &d).await);
        assert_eq!(*calls.lock().unwrap(), 0);
        assert_eq!(host.total_invocations(), 0);
    }

    #[tokio::test]
    async fn always_faulting_primitive_uses_every_attempt() {
        let host = page();
        host.fail_always("#a");
        let faults: Arc<Mutex<Vec<Fault>>> = Arc::default();
        let sink = faults.clone();
        let d = Descriptor::new("#a", "activate")
            .max_retries(2)
            .on_attempt_error(move |f| sink.lock().unwrap().push(f.clone()));
        assert!(!run_descriptor(&host, &d).await);
        assert_eq!(host.invocation_count("#a"), 3);
        assert_eq!(faults.lock().unwrap().len(), 3);
        assert_eq!(host.element("#a").unwrap().activations, 0);
    }

    #[tokio::test]
    async fn flaky_primitive_succeeds_on_kth_attempt() {
        let host = page();
        host.fail_next("#b", 2);
        let d = Descriptor::new("#b", "set_value").value("new").max_retries(5);
        assert!(run_descriptor(&host, &d).await);
        assert_eq!(host.invocation_count("#b"), 3);
        assert_eq!(host.element("#b").unwrap().value, "new");
    }

    #[tokio::test]
    async fn read_text_succeeds_without_mutation() {
        let host = page();
        let before = host.element("#c").unwrap();
        assert_eq!(
            run_all(&host, &[Descriptor::new("#c", "read_text")]).await,
            vec![true]
        );
        assert_eq!(host.element("#c").unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn results_follow_input_order_not_completion_order() {
        let host = page();
        host.fail_always("#c");
        let batch = vec![
            Descriptor::new("#a", "activate").delay_before_ms(300),
            Descriptor::new("#c", "focus").max_retries(1).delay_before_ms(100),
            Descriptor::new("#b", "set_value").value("v"),
            Descriptor::new("#nope", "activate").delay_before_ms(50),
        ];
        let results = run_all(&host, &batch).await;
        assert_eq!(results, vec![true, false, true, false]);

        // #b had no delay, so it ran before #a
        let a = host.invocations("#a");
        let b = host.invocations("#b");
        assert!(b[0].at < a[0].at);
        assert_eq!(a.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_delays_overlap() {
        let host = page();
        let batch = vec![
            Descriptor::new("#a", "activate").delay_before_ms(200),
            Descriptor::new("#b", "focus").delay_before_ms(200),
        ];
        let start = tokio::time::Instant::now();
        assert_eq!(run_all(&host, &batch).await, vec![true, true]);
        // concurrent: both sleeps overlap instead of adding up
        assert!(start.elapsed() < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn retries_follow_delay_without_backoff() {
        let host = page();
        host.fail_next("#a", 2);
        let start = tokio::time::Instant::now();
        let d = Descriptor::new("#a", "activate")
            .delay_before_ms(150)
            .max_retries(2);
        assert!(run_descriptor(&host, &d).await);
        let calls = host.invocations("#a");
        assert_eq!(calls.len(), 3);
        assert!(calls[0].at - start >= Duration::from_millis(150));
        assert!(calls.iter().all(|c| c.at == calls[0].at));
    }
}
