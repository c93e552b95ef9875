//! Interaction hooks attached to generated windows.
//!
//! A hook routes a mouse-down inside its window to the selection of the
//! node it was generated from, and marks the window as a highlight surface.

use crate::model::NodeId;
use crate::widget::WidgetHandle;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct InteractionHook {
    pub(crate) node: NodeId,
}

#[derive(Default, Debug)]
pub(crate) struct HookTable {
    hooks: HashMap<WidgetHandle, InteractionHook>,
}

impl HookTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn attach(&mut self, window: WidgetHandle, node: NodeId) {
        if self.hooks.insert(window, InteractionHook { node }).is_some() {
            log::debug!("Replaced interaction hook on {window}");
        }
    }

    pub(crate) fn detach(&mut self, window: WidgetHandle) -> Option<InteractionHook> {
        self.hooks.remove(&window)
    }

    pub(crate) fn get(&self, window: WidgetHandle) -> Option<&InteractionHook> {
        self.hooks.get(&window)
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.hooks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectNode, ObjectTree};
    use crate::widget::{Scene, WidgetFamily};

    #[test]
    fn test_attach_detach() {
        let mut tree = ObjectTree::new();
        let node = tree.insert(None, ObjectNode::new("wxButton", "widget"));
        let mut scene = Scene::new();
        let w = scene.create_window(None, WidgetFamily::Button, "");

        let mut hooks = HookTable::new();
        hooks.attach(w, node);
        assert_eq!(hooks.get(w).map(|h| h.node), Some(node));
        assert_eq!(hooks.detach(w), Some(InteractionHook { node }));
        assert_eq!(hooks.detach(w), None);
        assert_eq!(hooks.len(), 0);
    }
}
