//! Named component callbacks.
//!
//! Each dashboard component registers a [`HandlerTable`] of named callbacks
//! when it is constructed. Emitting an event on a component runs the
//! callbacks registered for that event name, in registration order.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;
use tracing::trace;

use crate::error::{NotifyError, Result};

type Handler = Box<dyn FnMut(&Value) + Send>;

/// Callbacks for one component, keyed by event name.
#[derive(Default)]
pub struct HandlerTable {
    handlers: Vec<(String, Handler)>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a callback for `event`.
    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: FnMut(&Value) + Send + 'static,
    {
        self.handlers.push((event.into(), Box::new(handler)));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.handlers.iter().map(|(event, _)| event))
            .finish()
    }
}

/// Registry of component handler tables.
#[derive(Default)]
pub struct HandlerRegistry {
    components: HashMap<String, HandlerTable>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component's callbacks.
    ///
    /// A name can only be registered once; `unregister` it first to replace.
    pub fn register(&mut self, component: impl Into<String>, table: HandlerTable) -> Result<()> {
        let component = component.into();
        if component.is_empty() {
            return Err(NotifyError::EmptyComponentName);
        }
        if self.components.contains_key(&component) {
            return Err(NotifyError::DuplicateComponent(component));
        }
        trace!(%component, handlers = table.len(), "component registered");
        self.components.insert(component, table);
        Ok(())
    }

    /// Remove a component. Returns its table if it was registered.
    pub fn unregister(&mut self, component: &str) -> Option<HandlerTable> {
        self.components.remove(component)
    }

    pub fn contains(&self, component: &str) -> bool {
        self.components.contains_key(component)
    }

    /// Run every `event` callback of `component`. Returns how many ran.
    pub fn emit(&mut self, component: &str, event: &str, value: &Value) -> usize {
        let Some(table) = self.components.get_mut(component) else {
            return 0;
        };
        let mut ran = 0;
        for (name, handler) in &mut table.handlers {
            if name == event {
                handler(value);
                ran += 1;
            }
        }
        trace!(component, event, ran, "event emitted");
        ran
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.components.iter()).finish()
    }
}
