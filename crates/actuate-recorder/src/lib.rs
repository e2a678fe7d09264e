//! # actuate-recorder
//!
//! Turns observed interaction events into [`Descriptor`]s that
//! `actuate-runner` can replay.
//!
//! The recorder does not listen to anything itself: whoever owns the page
//! forwards events to [`Recorder::observe`] (or as JSON to
//! [`Recorder::observe_json`]).
//!
//! ```rust
//! use actuate_recorder::{ElementInfo, InteractionEvent, Recorder};
//!
//! let mut recorder = Recorder::new();
//! recorder.start();
//! // the click that armed the recorder is not recorded
//! recorder.observe(&InteractionEvent::click(ElementInfo::with_id("record")));
//! recorder.observe(&InteractionEvent::change(ElementInfo::with_id("name"), "Ada"));
//! recorder.stop();
//!
//! assert_eq!(recorder.recorded().len(), 1);
//! assert_eq!(recorder.recorded()[0].locator, "#name");
//! ```

use actuate_runner::{Descriptor, OperationKind, Result};
use serde::Deserialize;
use tracing::debug;

/// Delay stamped on every recorded descriptor.
pub const RECORDED_DELAY_MS: u64 = 200;

/// Retries stamped on every recorded descriptor.
pub const RECORDED_RETRIES: u32 = 2;

/// The element an event happened on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ElementInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

impl ElementInfo {
    /// Element with the given id and no tag.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            tag: None,
        }
    }
}

/// An interaction as reported by the page.
///
/// JSON form: `{"type": "change", "target": {"id": "q"}, "value": "rust"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    Click { target: ElementInfo },
    Change { target: ElementInfo, value: String },
    Focus { target: ElementInfo },
}

impl InteractionEvent {
    /// Create a click event.
    pub fn click(target: ElementInfo) -> Self {
        Self::Click { target }
    }

    /// Create a change event carrying the new value.
    pub fn change(target: ElementInfo, value: impl Into<String>) -> Self {
        Self::Change {
            target,
            value: value.into(),
        }
    }

    /// Create a focus event.
    pub fn focus(target: ElementInfo) -> Self {
        Self::Focus { target }
    }

    /// Get the element the event happened on.
    pub fn target(&self) -> &ElementInfo {
        match self {
            Self::Click { target } | Self::Change { target, .. } | Self::Focus { target } => target,
        }
    }

    fn is_activation(&self) -> bool {
        matches!(self, Self::Click { .. })
    }
}

fn is_css_ident(id: &str) -> bool {
    let starts_name = |c: char| c.is_ascii_alphabetic() || c == '_';
    let mut chars = id.chars();
    match (chars.next(), chars.clone().next()) {
        // `-` must be followed by a name start or another `-`
        (Some('-'), Some(c)) if starts_name(c) || c == '-' => {}
        (Some(c), _) if starts_name(c) => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Locator for an element, derived from its id alone.
///
/// `#id` when the id is a plain CSS identifier, `[id="..."]` otherwise.
/// Elements without an id get no locator.
pub fn locator_for(element: &ElementInfo) -> Option<String> {
    let id = element.id.as_deref()?.trim();
    if id.is_empty() {
        None
    } else if is_css_ident(id) {
        Some(format!("#{}", id))
    } else {
        Some(format!(
            "[id=\"{}\"]",
            id.replace('\\', "\\\\").replace('"', "\\\"")
        ))
    }
}

/// Recorder lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    /// Not recording; events are ignored.
    #[default]
    Idle,
    /// Started, waiting for the arming click. That click is dropped; other
    /// events are already recorded.
    Armed,
    /// Every mappable event becomes a descriptor.
    Recording,
}

/// Collects descriptors from interaction events.
#[derive(Debug, Default)]
pub struct Recorder {
    state: RecorderState,
    recorded: Vec<Descriptor>,
}

impl Recorder {
    /// Create an idle recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Clear previous recordings and wait for the arming click.
    ///
    /// Calling `start` while already started changes nothing.
    pub fn start(&mut self) {
        if self.state != RecorderState::Idle {
            debug!("recorder already started");
            return;
        }
        self.recorded.clear();
        self.state = RecorderState::Armed;
        debug!("recorder armed");
    }

    /// Stop recording. Recorded descriptors are kept.
    pub fn stop(&mut self) {
        self.state = RecorderState::Idle;
        debug!("recorder stopped with {} descriptors", self.recorded.len());
    }

    /// Feed one event. Returns the descriptor it produced, if any.
    pub fn observe(&mut self, event: &InteractionEvent) -> Option<&Descriptor> {
        match self.state {
            RecorderState::Idle => None,
            RecorderState::Armed if event.is_activation() => {
                self.state = RecorderState::Recording;
                debug!("arming click consumed, recording");
                None
            }
            RecorderState::Armed | RecorderState::Recording => {
                let descriptor = Self::describe(event)?;
                debug!("recorded {}", descriptor);
                self.recorded.push(descriptor);
                self.recorded.last()
            }
        }
    }

    /// [`observe`](Self::observe) for events serialized by a page script.
    pub fn observe_json(&mut self, json: &str) -> Result<Option<&Descriptor>> {
        let event: InteractionEvent = serde_json::from_str(json)?;
        Ok(self.observe(&event))
    }

    fn describe(event: &InteractionEvent) -> Option<Descriptor> {
        let Some(locator) = locator_for(event.target()) else {
            debug!("skipping event on element without id: {:?}", event.target());
            return None;
        };
        let descriptor = match event {
            InteractionEvent::Click { .. } => Descriptor::new(locator, OperationKind::Activate),
            InteractionEvent::Change { value, .. } => {
                Descriptor::new(locator, OperationKind::SetValue).value(value.clone())
            }
            InteractionEvent::Focus { .. } => Descriptor::new(locator, OperationKind::Focus),
        };
        Some(
            descriptor
                .delay_before_ms(RECORDED_DELAY_MS)
                .max_retries(RECORDED_RETRIES),
        )
    }

    /// Descriptors recorded so far, in event order.
    pub fn recorded(&self) -> &[Descriptor] {
        &self.recorded
    }

    /// Consume the recorder, returning its descriptors.
    pub fn into_descriptors(self) -> Vec<Descriptor> {
        self.recorded
    }

    /// The recording as a YAML list the runner can load.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.recorded)?)
    }
}
