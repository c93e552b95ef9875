//! Declarative object model: the tree of design objects being edited.

pub(crate) mod service;
pub(crate) mod typeconv;

use serde::{Deserialize, Serialize};
use std::fmt;
use typeconv::{Point, Size};

/// Object types that act as forms (direct children of the project root).
pub(crate) const FORM_TYPES: &[&str] = &["form", "menubar_form", "toolbar_form", "wizard"];

/// Generation-checked handle to a node in an [`ObjectTree`].
///
/// A handle kept past the removal of its node never resolves to whatever node
/// later reuses the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn placeholder() -> Self {
        Self {
            index: u32::MAX,
            generation: u32::MAX,
        }
    }

    pub(crate) const fn is_placeholder(&self) -> bool {
        self.index == u32::MAX && self.generation == u32::MAX
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum PropertyKind {
    Text,
    Int,
    Bool,
    Size,
    Point,
    Colour,
    Font,
    Bitmap,
    Enum,
    Flags,
}

impl PropertyKind {
    /// Kind of the well-known property names; everything else is text.
    pub(crate) fn for_name(name: &str) -> Self {
        match name {
            "size" | "minimum_size" | "maximum_size" | "pane_size" | "best_size" | "min_size"
            | "max_size" => PropertyKind::Size,
            "pos" | "pane_position" => PropertyKind::Point,
            "fg" | "bg" => PropertyKind::Colour,
            "font" => PropertyKind::Font,
            "bitmap" | "unchecked_bitmap" => PropertyKind::Bitmap,
            "style" | "window_style" | "extra_style" | "window_extra_style" | "flag" => {
                PropertyKind::Flags
            }
            "dock" | "docking" | "resize" | "orient" | "kind" => PropertyKind::Enum,
            "enabled" | "hidden" | "show" | "checked" | "aui_managed" | "center_pane"
            | "default_pane" | "caption_visible" | "close_button" | "maximize_button"
            | "minimize_button" | "pin_button" | "pane_border" | "gripper" | "TopDockable"
            | "BottomDockable" | "LeftDockable" | "RightDockable" | "dock_fixed" | "moveable"
            | "floatable" | "toolbar_pane" | "select" => PropertyKind::Bool,
            "border" | "proportion" | "aui_position" | "aui_row" | "aui_layer" | "rows"
            | "cols" | "vgap" | "hgap" | "width" | "height" | "fields" | "id" => {
                PropertyKind::Int
            }
            _ => PropertyKind::Text,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Property {
    pub(crate) name: String,
    pub(crate) kind: PropertyKind,
    pub(crate) value: String,
}

impl Property {
    pub(crate) fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            kind: PropertyKind::for_name(&name),
            name,
            value: value.into(),
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        self.value.is_empty()
    }

    pub(crate) fn as_int(&self) -> i64 {
        typeconv::string_to_int(&self.value)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ObjectNode {
    pub(crate) class_name: String,
    pub(crate) type_name: String,
    pub(crate) properties: Vec<Property>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl ObjectNode {
    pub(crate) fn new(class_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            type_name: type_name.into(),
            properties: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub(crate) fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub(crate) fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.iter_mut().find(|p| p.name == name)
    }

    /// Absent or empty.
    pub(crate) fn is_null(&self, name: &str) -> bool {
        self.property(name).is_none_or(Property::is_null)
    }

    pub(crate) fn prop_str(&self, name: &str) -> &str {
        self.property(name).map_or("", |p| p.value.as_str())
    }

    pub(crate) fn prop_int(&self, name: &str) -> i64 {
        self.property(name).map_or(0, Property::as_int)
    }

    pub(crate) fn prop_bool(&self, name: &str) -> bool {
        self.prop_int(name) != 0
    }

    pub(crate) fn prop_size(&self, name: &str) -> Size {
        typeconv::string_to_size(self.prop_str(name))
    }

    pub(crate) fn prop_point(&self, name: &str) -> Point {
        typeconv::string_to_point(self.prop_str(name))
    }

    /// Sets (or adds) a property. Returns whether the stored value changed.
    pub(crate) fn set_property(&mut self, name: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        match self.property_mut(name) {
            Some(p) if p.value == value => false,
            Some(p) => {
                p.value = value;
                true
            }
            None => {
                self.properties.push(Property::new(name, value));
                true
            }
        }
    }

    /// Updates an existing property only; absent properties are left absent.
    pub(crate) fn update_property(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.property_mut(name) {
            Some(p) => {
                let value = value.into();
                if p.value == value {
                    false
                } else {
                    p.value = value;
                    true
                }
            }
            None => false,
        }
    }

    pub(crate) fn is_sizer(&self) -> bool {
        self.type_name == "sizer" || self.type_name == "gbsizer"
    }
}

struct Slot {
    generation: u32,
    node: Option<ObjectNode>,
}

/// Arena of [`ObjectNode`]s.
#[derive(Default)]
pub(crate) struct ObjectTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: Option<NodeId>,
}

impl ObjectTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&ObjectNode> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut ObjectNode> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    pub(crate) fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Inserts `node` as the last child of `parent`, or as the root when
    /// `parent` is `None`.
    pub(crate) fn insert(&mut self, parent: Option<NodeId>, mut node: ObjectNode) -> NodeId {
        node.parent = parent;
        node.children.clear();
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                NodeId {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        };
        match parent.and_then(|p| self.get_mut(p)) {
            Some(p) => p.children.push(id),
            None => {
                if let Some(n) = self.get_mut(id) {
                    n.parent = None;
                }
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        id
    }

    /// Removes a node and its whole subtree.
    pub(crate) fn remove(&mut self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let parent = node.parent;
        let children = node.children.clone();
        for child in children {
            self.remove(child);
        }
        if let Some(p) = parent.and_then(|p| self.get_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        if self.root == Some(id) {
            self.root = None;
        }
        let slot = &mut self.slots[id.index as usize];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        true
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], ObjectNode::children)
    }

    pub(crate) fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.children(id).get(index).copied()
    }

    /// Parent chain of `id`, nearest first, excluding `id` itself.
    pub(crate) fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    pub(crate) fn find_near_ancestor(
        &self,
        id: NodeId,
        mut pred: impl FnMut(&ObjectNode) -> bool,
    ) -> Option<NodeId> {
        self.ancestors(id)
            .find(|&a| self.get(a).is_some_and(&mut pred))
    }

    /// The form containing `id` (or `id` itself when it is a form).
    pub(crate) fn form_of(&self, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|&n| {
                self.get(n)
                    .is_some_and(|node| FORM_TYPES.contains(&node.type_name.as_str()))
            })
    }

    pub(crate) fn forms(&self) -> Vec<NodeId> {
        self.root
            .map(|r| {
                self.children(r)
                    .iter()
                    .copied()
                    .filter(|&c| self.form_of(c) == Some(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Depth-first, parents before children.
    pub(crate) fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.children(n).iter().rev().copied());
        }
        out
    }
}
