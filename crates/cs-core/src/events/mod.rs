//! Interaction events flowing from views to the coordinator
//!
//! Views never touch each other. Their handlers only publish interactions on
//! the queue and the frame loop drains it into the coordinator.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::dataset::CountryKey;

/// A user interaction, already resolved to a country key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Pointer entered a mark
    Hover(CountryKey),
    /// Pointer left a mark
    HoverEnd(CountryKey),
    /// Mark clicked
    Click(CountryKey),
    /// External indicator selector changed
    IndicatorChanged(String),
    /// Return the line chart to the all-country average
    ClearCountry,
}

/// Shared FIFO of pending interactions
#[derive(Clone, Default)]
pub struct InteractionQueue {
    pending: Arc<Mutex<VecDeque<Interaction>>>,
}

impl InteractionQueue {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish an interaction
    pub fn publish(&self, interaction: Interaction) {
        self.pending.lock().push_back(interaction);
    }

    /// Take every pending interaction in publication order
    pub fn drain(&self) -> Vec<Interaction> {
        self.pending.lock().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

/// Callback invoked with a resolved country key
pub type KeyHandler = Box<dyn FnMut(&CountryKey) + Send + Sync>;

/// Create a key handler from a closure
pub fn handler_from_fn<F>(f: F) -> KeyHandler
where
    F: FnMut(&CountryKey) + Send + Sync + 'static,
{
    Box::new(f)
}

/// The hover/click handlers a view invokes
pub struct MarkHandlers {
    pub on_hover: KeyHandler,
    pub on_hover_end: KeyHandler,
    pub on_click: KeyHandler,
}

impl MarkHandlers {
    pub fn new(on_hover: KeyHandler, on_hover_end: KeyHandler, on_click: KeyHandler) -> Self {
        Self {
            on_hover,
            on_hover_end,
            on_click,
        }
    }

    /// Handlers that publish onto `queue`
    pub fn publishing_to(queue: &InteractionQueue) -> Self {
        let hover = queue.clone();
        let hover_end = queue.clone();
        let click = queue.clone();
        Self::new(
            handler_from_fn(move |key| hover.publish(Interaction::Hover(key.clone()))),
            handler_from_fn(move |key| hover_end.publish(Interaction::HoverEnd(key.clone()))),
            handler_from_fn(move |key| click.publish(Interaction::Click(key.clone()))),
        )
    }

    /// Handlers that do nothing
    pub fn noop() -> Self {
        Self::new(
            handler_from_fn(|_| {}),
            handler_from_fn(|_| {}),
            handler_from_fn(|_| {}),
        )
    }
}

impl Default for MarkHandlers {
    fn default() -> Self {
        Self::noop()
    }
}
