//! Attach-once guard for page behaviors.

use std::collections::HashMap;

use tracing::{debug, info};

/// What an attach function hands back to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment<H> {
    /// Attached; the registry keeps the handle for the page lifetime.
    Handle(H),
    /// Attached with nothing worth keeping.
    Sentinel,
    /// The structure the behavior needs is absent; stays unregistered so a
    /// later init can still attach it.
    Skipped,
}

#[derive(Debug)]
pub struct ModuleRegistry<H> {
    modules: HashMap<String, Option<H>>,
    order: Vec<String>,
}

impl<H> Default for ModuleRegistry<H> {
    fn default() -> Self {
        Self {
            modules: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<H> ModuleRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `attach` unless `name` is already registered. Returns whether the
    /// behavior is registered afterwards. Errors from `attach` propagate and
    /// leave `name` unregistered.
    pub fn ensure<E, F>(&mut self, name: &str, attach: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<Attachment<H>, E>,
    {
        if self.modules.contains_key(name) {
            debug!(behavior = name, "behavior already attached");
            return Ok(true);
        }

        let handle = match attach()? {
            Attachment::Handle(handle) => Some(handle),
            Attachment::Sentinel => None,
            Attachment::Skipped => {
                debug!(behavior = name, "behavior skipped: page structure absent");
                return Ok(false);
            }
        };

        self.modules.insert(name.to_string(), handle);
        self.order.push(name.to_string());
        info!(behavior = name, "behavior attached");
        Ok(true)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn handle(&self, name: &str) -> Option<&H> {
        self.modules.get(name).and_then(Option::as_ref)
    }

    /// Registered names in attach order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
