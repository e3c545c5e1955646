#![deny(missing_docs)]
//! Slotdown rendering: component registry, property binding, and the
//! tree-walking renderer that turns markdown with embedded markup into HTML.

/// Parallel batch rendering.
pub mod batch;
/// Property binding against unit schemas.
pub mod binder;
/// Compiler facade and options.
pub mod compiler;
/// Unit contract, schemas, and bound props.
pub mod component;
/// Render context and page data.
pub mod context;
/// Render error types.
pub mod error;
/// Layouts and the layout catalog.
pub mod registry;
/// Composable render values.
pub mod renderable;
/// Tree-walking renderer.
pub mod renderer;

pub use batch::{BatchInput, BatchOptions, BatchOutput, BatchResult, BatchStats, render_batch};
pub use binder::{NodeResolver, bind, build};
pub use compiler::{Compiler, CompilerOptions};
pub use component::{
    Component, FnComponent, PropField, PropKind, PropSchema, PropValue, Props, unit,
};
pub use context::{PageContext, RenderContext};
pub use error::{BindError, LookupError, RegistryError, RenderError};
pub use registry::{Layout, Registry};
pub use renderable::{Bound, Join, RawHtml, Renderable, render_to_string};
pub use renderer::{HtmlRenderer, NodeRenderer, Renderer, WalkStatus, walk};
