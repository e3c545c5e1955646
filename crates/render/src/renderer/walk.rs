//! Pre-order mdast traversal with enter and exit callbacks.

use crate::error::RenderError;
use markdown::mdast::Node;

/// What the walker should do after a callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Visit the node's children.
    Continue,
    /// Skip the node's children; the exit callback still runs.
    SkipChildren,
    /// Stop the whole walk.
    Stop,
}

/// Walks `node` calling `visit(node, true)` before its children and
/// `visit(node, false)` after them.
///
/// Returns [`WalkStatus::Stop`] if any callback stopped the walk.
pub fn walk<F>(node: &Node, visit: &mut F) -> Result<WalkStatus, RenderError>
where
    F: FnMut(&Node, bool) -> Result<WalkStatus, RenderError>,
{
    match visit(node, true)? {
        WalkStatus::Stop => return Ok(WalkStatus::Stop),
        WalkStatus::SkipChildren => {}
        WalkStatus::Continue => {
            for child in node.children().into_iter().flatten() {
                if walk(child, visit)? == WalkStatus::Stop {
                    return Ok(WalkStatus::Stop);
                }
            }
        }
    }
    visit(node, false)
}
