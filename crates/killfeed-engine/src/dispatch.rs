//! Synchronous publish/subscribe seam for property-replication events.
//!
//! The replication layer raises named events while it walks the replay.
//! Each [`dispatch`](PropertyDispatcher::dispatch) runs every listener
//! registered for that name to completion, in registration order, before
//! returning; listeners write into the shared [`ParseResult`].

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::trace;

use crate::pipeline::ParseResult;

/// One event raised by the replication layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyEvent {
    /// Fully-qualified event name, `Group:Event`.
    pub name: String,
    /// Decoded payload fields.
    pub data: Map<String, Value>,
    /// Match time of the replication frame, in seconds.
    pub time_seconds: Option<f64>,
}

impl PropertyEvent {
    /// Construct an event without a frame time.
    pub fn new(name: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            data,
            time_seconds: None,
        }
    }

    /// Attach the frame time.
    pub fn at(mut self, seconds: f64) -> Self {
        self.time_seconds = Some(seconds);
        self
    }

    /// The export group, i.e. the part of the name before `:`.
    pub fn group(&self) -> &str {
        self.name
            .split_once(':')
            .map_or(self.name.as_str(), |(group, _)| group)
    }
}

/// A subscribed callback.
pub type Listener = Box<dyn FnMut(&PropertyEvent, &mut ParseResult)>;

/// Routes events to the listeners registered under their name.
#[derive(Default)]
pub struct PropertyDispatcher {
    listeners: IndexMap<String, Vec<Listener>>,
    ignored_groups: Vec<String>,
}

impl PropertyDispatcher {
    /// Create a dispatcher with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop events whose [`group`](PropertyEvent::group) is listed.
    pub fn with_ignored_groups(mut self, groups: impl IntoIterator<Item = String>) -> Self {
        self.ignored_groups.extend(groups);
        self
    }

    /// Register `listener` for events named `name`.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, listener: F)
    where
        F: FnMut(&PropertyEvent, &mut ParseResult) + 'static,
    {
        self.listeners
            .entry(name.into())
            .or_default()
            .push(Box::new(listener));
    }

    /// Number of listeners registered for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }

    /// Deliver `event` to its listeners. Returns how many ran.
    pub fn dispatch(&mut self, event: &PropertyEvent, result: &mut ParseResult) -> usize {
        if self.ignored_groups.iter().any(|g| g == event.group()) {
            trace!(event = %event.name, "event group ignored");
            return 0;
        }
        let Some(listeners) = self.listeners.get_mut(&event.name) else {
            return 0;
        };
        for listener in listeners.iter_mut() {
            listener(event, result);
        }
        listeners.len()
    }
}

impl std::fmt::Debug for PropertyDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: Vec<(&str, usize)> = self
            .listeners
            .iter()
            .map(|(name, l)| (name.as_str(), l.len()))
            .collect();
        f.debug_struct("PropertyDispatcher")
            .field("listeners", &counts)
            .field("ignored_groups", &self.ignored_groups)
            .finish()
    }
}
