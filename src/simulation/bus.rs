//! Event bus
//!
//! A single ordered stream of events. Producers publish, the simulation
//! pulls events out one at a time, and every observer sees each event in
//! publish order before the controller handles it.

use std::collections::VecDeque;
use std::fmt;

use super::types::Event;

/// Subscription handle for unsubscribing observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for observer callbacks
type Observer = Box<dyn FnMut(&Event) + Send>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Whether to keep delivered events
    pub enable_history: bool,
    /// Maximum number of events to retain in history
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            enable_history: false,
            max_history_size: 1000,
        }
    }
}

pub struct EventBus {
    pending: VecDeque<Event>,
    observers: Vec<(SubscriptionId, Observer)>,
    history: VecDeque<Event>,
    config: EventBusConfig,
    next_id: u64,
    delivered: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    pub fn with_config(config: EventBusConfig) -> Self {
        Self {
            pending: VecDeque::new(),
            observers: Vec::new(),
            history: VecDeque::new(),
            config,
            next_id: 0,
            delivered: 0,
        }
    }

    /// Queue an event behind everything already published
    pub fn publish(&mut self, event: Event) {
        self.pending.push_back(event);
    }

    /// Take the oldest event, letting every observer see it first
    pub fn next_event(&mut self) -> Option<Event> {
        let event = self.pending.pop_front()?;
        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
        if self.config.enable_history {
            self.history.push_back(event);
            while self.history.len() > self.config.max_history_size {
                self.history.pop_front();
            }
        }
        self.delivered += 1;
        Some(event)
    }

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Event) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns whether the subscription existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    /// Events published but not yet delivered
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn history(&self) -> impl Iterator<Item = &Event> {
        self.history.iter()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending)
            .field("observers", &self.observers.len())
            .field("delivered", &self.delivered)
            .finish()
    }
}
