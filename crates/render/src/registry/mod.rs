//! Component registry: layouts, namespaces, and the layout catalog.

mod catalog;
mod layout;

pub use catalog::Registry;
pub use layout::Layout;
