//! DOM Events
//!
//! Event objects and the per-node listener registry. Dispatch lives with the
//! owner of the tree so listeners can run without the tree borrowed.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::NodeId;

/// Event listener callback
pub type EventListener = Rc<dyn Fn(&mut Event)>;

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: String,
    pub target: NodeId,
    pub current_target: Option<NodeId>,
    pub bubbles: bool,
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl Event {
    /// Create a bubbling, cancelable event
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            bubbles: true,
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Create an event that only fires on its target
    pub fn non_bubbling(event_type: &str, target: NodeId) -> Self {
        Self {
            bubbles: false,
            cancelable: false,
            ..Self::new(event_type, target)
        }
    }

    /// Prevent default action
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}

/// Listener registry keyed by node
#[derive(Default)]
pub struct EventListeners {
    by_node: HashMap<NodeId, Vec<(String, EventListener)>>,
}

impl EventListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event type on one node
    pub fn add(&mut self, node: NodeId, event_type: &str, listener: EventListener) {
        self.by_node
            .entry(node)
            .or_default()
            .push((event_type.to_string(), listener));
    }

    /// Snapshot of the listeners registered for `event_type` on `node`,
    /// in registration order
    pub fn get(&self, node: NodeId, event_type: &str) -> Vec<EventListener> {
        self.by_node
            .get(&node)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(ty, _)| ty == event_type)
                    .map(|(_, listener)| Rc::clone(listener))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners on a node across all event types
    pub fn count(&self, node: NodeId) -> usize {
        self.by_node.get(&node).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.by_node.iter().map(|(node, entries)| {
                (node, entries.iter().map(|(ty, _)| ty.as_str()).collect::<Vec<_>>())
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_prevent_default_requires_cancelable() {
        let mut event = Event::non_bubbling("load", NodeId(1));
        event.prevent_default();
        assert!(!event.is_default_prevented());

        let mut event = Event::new("click", NodeId(1));
        event.prevent_default();
        assert!(event.is_default_prevented());
    }

    #[test]
    fn test_registry_filters_by_type() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let listener: EventListener = Rc::new(move |_| counter.set(counter.get() + 1));

        let mut registry = EventListeners::new();
        registry.add(NodeId(3), "click", Rc::clone(&listener));
        registry.add(NodeId(3), "focus", listener);

        let mut event = Event::new("click", NodeId(3));
        for l in registry.get(NodeId(3), "click") {
            l(&mut event);
        }
        assert_eq!(hits.get(), 1);
        assert_eq!(registry.count(NodeId(3)), 2);
        assert!(registry.get(NodeId(4), "click").is_empty());
    }
}
