//! # actuate-runner
//!
//! Declarative element actions. Describe each action as a small descriptor
//! (locator, kind, optional value, delay and retries), run a batch of them
//! concurrently, get one `bool` per descriptor back in input order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actuate_runner::{Config, Runner};
//!
//! # #[tokio::main]
//! # async fn main() -> actuate_runner::Result<()> {
//! let config = Config::load("batch.yaml")?;
//! let runner = Runner::new(&config.browser).await?;
//! let result = runner.run(&config).await?;
//! println!("Results: {:?}", result.results);
//! # Ok(())
//! # }
//! ```
//!
//! Without a browser, any [`Host`] works, e.g. the in-memory one:
//!
//! ```rust
//! use actuate_runner::{run_all, Descriptor, MemoryElement, MemoryHost};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let host = MemoryHost::new().with_element("#q", MemoryElement::new());
//! let batch = [Descriptor::new("#q", "set_value").value("rust")];
//! assert_eq!(run_all(&host, &batch).await, vec![true]);
//! # }
//! ```

mod config;
mod host;
mod runner;

pub use config::{
    BrowserConfig, Config, Descriptor, ErrorObserver, ParamDef, Params, TargetUrl, Viewport,
};
pub use host::{ElementHandle, Fault, Host, Invocation, MemoryElement, MemoryHost};
pub use runner::{
    execute, execute_action, run_all, run_batch, run_descriptor, run_with_policy, ActionFactory,
    Attempt, Operation, OperationKind, RetryPolicy, RunResult, Runner, READ_TEXT_TARGET,
};

/// Result type for actuate-runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from config loading, descriptor validation and browser setup.
///
/// Element faults during a run are not errors; see [`Fault`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("browser error: {0}")]
    Browser(#[from] eoka::Error),

    #[error("unsupported operation: '{0}'")]
    UnsupportedOperation(String),
}
