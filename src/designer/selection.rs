//! Selection state of the preview and the ancestor walks that resolve it.

use crate::component::{ComponentLibrary, ComponentType};
use crate::model::{NodeId, ObjectTree};
use crate::widget::WidgetHandle;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SelectionState {
    /// Live window or sizer of the selected node.
    pub(crate) item: Option<WidgetHandle>,
    pub(crate) object: Option<NodeId>,
    /// Sizer enclosing the selection, if it sits in one.
    pub(crate) sizer: Option<WidgetHandle>,
    /// Surface the outlines are drawn on.
    pub(crate) panel: Option<WidgetHandle>,
}

impl SelectionState {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn component_type(tree: &ObjectTree, library: &ComponentLibrary, id: NodeId) -> Option<ComponentType> {
    tree.get(id)
        .and_then(|n| library.component_type(&n.class_name))
}

/// Ancestors of `node` that have a component, nearest first. The walk ends
/// at the first ancestor without one.
pub(crate) fn component_ancestors(
    tree: &ObjectTree,
    library: &ComponentLibrary,
    node: NodeId,
) -> Vec<NodeId> {
    tree.ancestors(node)
        .take_while(|&a| component_type(tree, library, a).is_some())
        .collect()
}

/// Nearest ancestor producing a window; `None` when the walk hits an
/// ancestor without a component first.
pub(crate) fn window_ancestor(
    tree: &ObjectTree,
    library: &ComponentLibrary,
    node: NodeId,
) -> Option<NodeId> {
    for a in tree.ancestors(node) {
        if component_type(tree, library, a)? == ComponentType::Window {
            return Some(a);
        }
    }
    None
}

/// Nearest ancestor producing a sizer, provided no window-producing
/// ancestor comes first.
pub(crate) fn sizer_ancestor(
    tree: &ObjectTree,
    library: &ComponentLibrary,
    node: NodeId,
) -> Option<NodeId> {
    for a in tree.ancestors(node) {
        match component_type(tree, library, a)? {
            ComponentType::Sizer => return Some(a),
            ComponentType::Window => return None,
            ComponentType::Abstract => continue,
        }
    }
    None
}
