//! Two-way mapping between object nodes and the live objects generated for
//! them.

use crate::model::NodeId;
use crate::widget::WidgetHandle;
use std::collections::HashMap;

#[derive(Default, Debug)]
pub(crate) struct ObjectRegistry {
    widgets: HashMap<WidgetHandle, NodeId>,
    nodes: HashMap<NodeId, WidgetHandle>,
}

impl ObjectRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records `node <-> widget`. Rebinding either side drops its previous
    /// partner so both tables stay inverse.
    pub(crate) fn bind(&mut self, node: NodeId, widget: WidgetHandle) -> bool {
        if node.is_placeholder() || widget.is_placeholder() {
            log::warn!("Refusing to bind an empty object ({node} <-> {widget})");
            return false;
        }
        if let Some(old) = self.nodes.insert(node, widget) {
            self.widgets.remove(&old);
        }
        if let Some(old) = self.widgets.insert(widget, node)
            && old != node
        {
            self.nodes.remove(&old);
        }
        true
    }

    pub(crate) fn resolve_widget(&self, node: NodeId) -> Option<WidgetHandle> {
        let found = self.widget_of(node);
        if found.is_none() {
            log::warn!("No live object for node {node}");
        }
        found
    }

    pub(crate) fn resolve_node(&self, widget: WidgetHandle) -> Option<NodeId> {
        let found = self.node_of(widget);
        if found.is_none() {
            log::warn!("No node for live object {widget}");
        }
        found
    }

    /// Quiet lookup, for walks where misses are routine.
    pub(crate) fn widget_of(&self, node: NodeId) -> Option<WidgetHandle> {
        self.nodes.get(&node).copied()
    }

    pub(crate) fn node_of(&self, widget: WidgetHandle) -> Option<NodeId> {
        self.widgets.get(&widget).copied()
    }

    pub(crate) fn clear_all(&mut self) {
        self.widgets.clear();
        self.nodes.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (NodeId, WidgetHandle)> + '_ {
        self.nodes.iter().map(|(n, w)| (*n, *w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ObjectNode, ObjectTree};
    use crate::widget::{Scene, WidgetFamily};

    fn ids(n: usize) -> (Vec<NodeId>, Vec<WidgetHandle>) {
        let mut tree = ObjectTree::new();
        let mut scene = Scene::new();
        let nodes = (0..n)
            .map(|_| tree.insert(None, ObjectNode::new("wxPanel", "container")))
            .collect();
        let widgets = (0..n)
            .map(|_| scene.create_window(None, WidgetFamily::Panel, ""))
            .collect();
        (nodes, widgets)
    }

    fn assert_inverse(registry: &ObjectRegistry) {
        assert_eq!(registry.widgets.len(), registry.nodes.len());
        for (node, widget) in registry.iter() {
            assert_eq!(registry.node_of(widget), Some(node));
            assert_eq!(registry.widget_of(node), Some(widget));
        }
    }

    #[test]
    fn test_bind_and_resolve_round_trip() {
        let (nodes, widgets) = ids(3);
        let mut registry = ObjectRegistry::new();
        for (n, w) in nodes.iter().zip(&widgets) {
            assert!(registry.bind(*n, *w));
        }
        for w in &widgets {
            let node = registry.resolve_node(*w).unwrap();
            assert_eq!(registry.resolve_widget(node), Some(*w));
        }
        assert_eq!(registry.len(), 3);
        assert_inverse(&registry);
    }

    #[test]
    fn test_bind_rejects_placeholders() {
        let (nodes, widgets) = ids(1);
        let mut registry = ObjectRegistry::new();
        assert!(!registry.bind(NodeId::placeholder(), widgets[0]));
        assert!(!registry.bind(nodes[0], WidgetHandle::placeholder()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_rebind_keeps_tables_inverse() {
        let (nodes, widgets) = ids(2);
        let mut registry = ObjectRegistry::new();
        registry.bind(nodes[0], widgets[0]);
        registry.bind(nodes[0], widgets[1]);
        assert_eq!(registry.node_of(widgets[0]), None);
        registry.bind(nodes[1], widgets[1]);
        assert_eq!(registry.widget_of(nodes[0]), None);
        assert_eq!(registry.len(), 1);
        assert_inverse(&registry);
    }

    #[test]
    fn test_misses_and_clear() {
        let (nodes, widgets) = ids(2);
        let mut registry = ObjectRegistry::new();
        registry.bind(nodes[0], widgets[0]);
        assert_eq!(registry.resolve_widget(nodes[1]), None);
        assert_eq!(registry.resolve_node(widgets[1]), None);
        registry.clear_all();
        assert!(registry.is_empty());
        assert_eq!(registry.widget_of(nodes[0]), None);
        assert_inverse(&registry);
    }
}
