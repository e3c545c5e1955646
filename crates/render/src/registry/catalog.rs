//! Catalog of named layouts.

use super::layout::Layout;
use crate::error::LookupError;
use std::collections::{HashMap, hash_map};

/// Layouts keyed by case-insensitive name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    layouts: HashMap<String, Layout>,
}

impl Registry {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `layout`, replacing any layout with the same name.
    pub fn register_layout(&mut self, layout: Layout) -> &mut Layout {
        let key = layout.name().to_lowercase();
        log::debug!("registering layout {}", layout.name());
        match self.layouts.entry(key) {
            hash_map::Entry::Occupied(mut occupied) => {
                occupied.insert(layout);
                occupied.into_mut()
            }
            hash_map::Entry::Vacant(vacant) => vacant.insert(layout),
        }
    }

    /// Returns the layout registered under `name`.
    pub fn use_layout(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(&name.to_lowercase())
    }

    /// Returns the layout registered under `name` or a lookup error.
    pub fn layout(&self, name: &str) -> Result<&Layout, LookupError> {
        self.use_layout(name)
            .ok_or_else(|| LookupError::LayoutNotFound {
                name: name.to_string(),
            })
    }

    /// Mutable access to a registered layout.
    pub fn layout_mut(&mut self, name: &str) -> Option<&mut Layout> {
        self.layouts.get_mut(&name.to_lowercase())
    }

    /// Registered layout names, sorted.
    pub fn layouts(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .layouts
            .values()
            .map(|l| l.name().to_string())
            .collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{PropSchema, unit};

    #[test]
    fn test_layouts_are_found_by_any_case() {
        let mut registry = Registry::new();
        registry.register_layout(Layout::new("Docs"));
        registry.register_layout(Layout::new("blog"));
        assert!(registry.use_layout("DOCS").is_some());
        assert_eq!(registry.layouts(), vec!["blog", "Docs"]);
        assert_eq!(
            registry.layout("Landing").unwrap_err(),
            LookupError::LayoutNotFound {
                name: "Landing".into()
            }
        );
    }

    #[test]
    fn test_clone_does_not_share_registrations() {
        let mut registry = Registry::new();
        registry.register_layout(Layout::new("Docs"));

        let mut copy = registry.clone();
        copy.layout_mut("docs")
            .unwrap()
            .register("Card", unit(PropSchema::new(), |_, _, _| Ok(())))
            .unwrap();

        assert!(registry.use_layout("Docs").unwrap().is_empty());
        assert_eq!(copy.use_layout("Docs").unwrap().list(), vec!["Card"]);
    }
}
