//! Immutable context threaded through rendering.

use crate::error::{LookupError, RenderError};
use crate::renderable::Renderable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;

/// Per-page data made available to every unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageContext {
    /// URL path of the page being rendered.
    pub url: String,
    /// Page locale, if known.
    pub locale: Option<String>,
    /// Free-form page metadata.
    pub meta: BTreeMap<String, String>,
}

impl PageContext {
    /// Creates a page context for `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Context passed to every render call.
///
/// Values are never mutated in place; each `with_*` method returns a new
/// context sharing everything else with `self`.
#[derive(Clone, Default)]
pub struct RenderContext {
    children: Option<Arc<dyn Renderable>>,
    slot: Option<Arc<dyn Renderable>>,
    page: Option<Arc<PageContext>>,
}

impl RenderContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy carrying `children` as the composed children.
    pub fn with_children(&self, children: Arc<dyn Renderable>) -> Self {
        Self {
            children: Some(children),
            ..self.clone()
        }
    }

    /// Returns a copy carrying `slot` as the slot content.
    pub fn with_slot(&self, slot: Arc<dyn Renderable>) -> Self {
        Self {
            slot: Some(slot),
            ..self.clone()
        }
    }

    /// Returns a copy with no slot content.
    pub fn without_slot(&self) -> Self {
        Self {
            slot: None,
            ..self.clone()
        }
    }

    /// Returns a copy carrying `page`.
    pub fn with_page(&self, page: PageContext) -> Self {
        Self {
            page: Some(Arc::new(page)),
            ..self.clone()
        }
    }

    /// Composed children of the component being rendered.
    pub fn children(&self) -> Option<&Arc<dyn Renderable>> {
        self.children.as_ref()
    }

    /// Slot content, if any.
    pub fn slot(&self) -> Option<&Arc<dyn Renderable>> {
        self.slot.as_ref()
    }

    /// Page data, if any.
    pub fn page(&self) -> Option<&PageContext> {
        self.page.as_deref()
    }

    /// Renders the composed children, writing nothing when there are none.
    pub fn render_children(&self, w: &mut dyn io::Write) -> Result<(), RenderError> {
        match &self.children {
            Some(children) => children.render(self, w),
            None => Ok(()),
        }
    }

    /// Renders the slot content.
    ///
    /// The slot renders without itself in scope, so slot content that
    /// contains `\Slot` fails instead of recursing.
    pub fn render_slot(&self, w: &mut dyn io::Write) -> Result<(), RenderError> {
        let slot = self.slot.as_ref().ok_or(LookupError::SlotNotFound)?;
        slot.render(&self.without_slot(), w)
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("children", &self.children.is_some())
            .field("slot", &self.slot.is_some())
            .field("page", &self.page)
            .finish()
    }
}
