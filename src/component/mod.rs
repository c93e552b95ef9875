//! Per-class collaborators that turn object nodes into live widgets.

mod builtin;

use crate::designer::registry::ObjectRegistry;
use crate::error::Result;
use crate::model::{NodeId, ObjectNode, ObjectTree};
use crate::widget::{Scene, WidgetHandle};
use std::collections::HashMap;
use std::fmt;

/// Kind of live object a component produces. Decided once when the
/// component is registered and checked against what `create` returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ComponentType {
    Window,
    Sizer,
    Abstract,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::Window => "window",
            ComponentType::Sizer => "sizer",
            ComponentType::Abstract => "abstract",
        };
        f.write_str(name)
    }
}

/// What components see while the generator is running: the live scene plus
/// read access to the model and the node/widget mapping built so far.
pub(crate) struct BuildContext<'a> {
    pub(crate) scene: &'a mut Scene,
    pub(crate) tree: &'a ObjectTree,
    pub(crate) registry: &'a ObjectRegistry,
}

impl BuildContext<'_> {
    /// Live object of the `index`-th child of `node`.
    pub(crate) fn child_object(&self, node: NodeId, index: usize) -> Option<WidgetHandle> {
        self.tree
            .child(node, index)
            .and_then(|c| self.registry.widget_of(c))
    }

    /// Live object of the parent of `node`.
    pub(crate) fn parent_object(&self, node: NodeId) -> Option<WidgetHandle> {
        self.tree
            .parent(node)
            .and_then(|p| self.registry.widget_of(p))
    }
}

pub(crate) trait Component {
    fn component_type(&self) -> ComponentType;

    /// Builds the live object for `node`. Windows are parented to `host`.
    fn create(&self, node: &ObjectNode, host: WidgetHandle, scene: &mut Scene)
    -> Result<WidgetHandle>;

    /// Called once the node and its whole subtree have been generated.
    fn on_created(
        &self,
        _ctx: &mut BuildContext<'_>,
        _node: NodeId,
        _object: WidgetHandle,
        _host: WidgetHandle,
    ) {
    }

    fn on_selected(&self, _ctx: &mut BuildContext<'_>, _node: NodeId, _object: WidgetHandle) {}

    /// Releases per-window state before the window is destroyed.
    fn cleanup(&self, _scene: &mut Scene, _window: WidgetHandle) {}
}

/// Class name to component lookup.
#[derive(Default)]
pub(crate) struct ComponentLibrary {
    components: HashMap<String, Box<dyn Component>>,
}

impl ComponentLibrary {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_builtins() -> Self {
        let mut library = Self::new();
        builtin::register_all(&mut library);
        library
    }

    pub(crate) fn register(&mut self, class: impl Into<String>, component: Box<dyn Component>) {
        let class = class.into();
        if self.components.insert(class.clone(), component).is_some() {
            log::warn!("Component for {class} registered twice, keeping the last one");
        }
    }

    pub(crate) fn get(&self, class: &str) -> Option<&dyn Component> {
        self.components.get(class).map(|c| c.as_ref())
    }

    pub(crate) fn component_type(&self, class: &str) -> Option<ComponentType> {
        self.get(class).map(Component::component_type)
    }

    pub(crate) fn len(&self) -> usize {
        self.components.len()
    }
}
