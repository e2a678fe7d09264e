//! # actuate
//!
//! Declarative element actions: record what a user does as descriptors,
//! replay them later with delays and bounded retries.
//!
//! - [`runner`]: descriptors, config loading, hosts and the batch runner.
//! - [`recorder`]: turns interaction events into descriptors.
//!
//! ```rust
//! use actuate::recorder::{ElementInfo, InteractionEvent, Recorder};
//! use actuate::runner::{run_all, MemoryElement, MemoryHost};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut recorder = Recorder::new();
//! recorder.start();
//! recorder.observe(&InteractionEvent::click(ElementInfo::with_id("rec")));
//! recorder.observe(&InteractionEvent::click(ElementInfo::with_id("buy")));
//! recorder.stop();
//!
//! let host = MemoryHost::new().with_element("#buy", MemoryElement::new());
//! assert_eq!(run_all(&host, recorder.recorded()).await, vec![true]);
//! # }
//! ```

pub use actuate_recorder as recorder;
pub use actuate_runner as runner;

pub use actuate_recorder::Recorder;
pub use actuate_runner::{run_all, Config, Descriptor, Error, Host, Result, Runner};
