//! Hierarchical component namespaces.

use crate::component::Component;
use crate::error::{LookupError, RegistryError};
use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::Arc;

struct Entry {
    name: String,
    unit: Arc<dyn Component>,
    namespace: Arc<Layout>,
}

/// A named set of components, each with its own child namespace.
///
/// Names are case-insensitive. Components nested inside a component are
/// resolved first in that component's namespace, which lets the same name
/// mean different units in different places:
///
/// ```
/// use slotdown_render::{Layout, PropSchema, unit};
///
/// let link = |label: &'static str| {
///     unit(PropSchema::new(), move |_, _, w| Ok(w.write_all(label.as_bytes())?))
/// };
/// let mut layout = Layout::new("Docs");
/// layout.register("Link", link("plain")).unwrap();
/// layout
///     .register("Navbar", link("nav")).unwrap()
///     .register("Link", link("nav link")).unwrap();
///
/// assert!(layout.get("link").is_some());
/// assert!(layout.namespace("navbar").unwrap().get("LINK").is_some());
/// ```
#[derive(Default)]
pub struct Layout {
    name: String,
    components: HashMap<String, Entry>,
}

impl Layout {
    /// An empty layout.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: HashMap::new(),
        }
    }

    /// Layout name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers `unit` under `name`, replacing any earlier registration.
    ///
    /// Returns the unit's fresh child namespace so nested components can be
    /// registered by chaining.
    pub fn register(
        &mut self,
        name: &str,
        unit: Arc<dyn Component>,
    ) -> Result<&mut Layout, RegistryError> {
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }
        unit.schema().validate(name)?;

        let entry = Entry {
            name: name.to_string(),
            unit,
            namespace: Arc::new(Layout::new(name)),
        };
        let entry = match self.components.entry(name.to_lowercase()) {
            hash_map::Entry::Occupied(mut occupied) => {
                log::debug!("replacing component {name} in layout {}", self.name);
                occupied.insert(entry);
                occupied.into_mut()
            }
            hash_map::Entry::Vacant(vacant) => vacant.insert(entry),
        };
        Ok(Arc::make_mut(&mut entry.namespace))
    }

    /// Returns the unit registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Component>> {
        self.entry(name).map(|e| Arc::clone(&e.unit))
    }

    /// Returns the child namespace of the component registered under `name`.
    pub fn namespace(&self, name: &str) -> Result<Arc<Layout>, LookupError> {
        self.entry(name)
            .map(|e| Arc::clone(&e.namespace))
            .ok_or_else(|| LookupError::NamespaceNotFound {
                name: name.to_string(),
                layout: self.name.clone(),
            })
    }

    /// Mutable access to an existing child namespace.
    ///
    /// Copies the namespace first if it is shared with a clone.
    pub fn namespace_mut(&mut self, name: &str) -> Option<&mut Layout> {
        self.components
            .get_mut(&name.to_lowercase())
            .map(|e| Arc::make_mut(&mut e.namespace))
    }

    /// Returns the unit and child namespace registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<(Arc<dyn Component>, Arc<Layout>)> {
        self.entry(name)
            .map(|e| (Arc::clone(&e.unit), Arc::clone(&e.namespace)))
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Registered names as written, sorted case-insensitively.
    pub fn list(&self) -> Vec<String> {
        let mut keys: Vec<&String> = self.components.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|k| self.components[k].name.clone())
            .collect()
    }

    /// Number of registered components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.components.get(&name.to_lowercase())
    }
}

impl Clone for Layout {
    /// Deep copy: every nested namespace is copied, units are shared.
    fn clone(&self) -> Self {
        let components = self
            .components
            .iter()
            .map(|(key, entry)| {
                let entry = Entry {
                    name: entry.name.clone(),
                    unit: Arc::clone(&entry.unit),
                    namespace: Arc::new(Layout::clone(&entry.namespace)),
                };
                (key.clone(), entry)
            })
            .collect();
        Self {
            name: self.name.clone(),
            components,
        }
    }
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layout")
            .field("name", &self.name)
            .field("components", &self.list())
            .finish()
    }
}
