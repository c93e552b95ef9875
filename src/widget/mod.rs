//! Retained live widget arena that backs the preview.
//!
//! Windows, sizers and abstract objects live in one slot arena addressed by
//! generation-checked [`WidgetHandle`]s, so handles that outlive a rebuild
//! simply stop resolving.

pub(crate) mod layout;

use crate::component::ComponentType;
use crate::model::typeconv::{FontSpec, Size};
use egui::{Color32, Pos2, Rect, Vec2, vec2};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct WidgetHandle {
    index: u32,
    generation: u32,
}

impl WidgetHandle {
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

impl fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WidgetFamily {
    Back,
    ContentPanel,
    Panel,
    Button,
    StaticText,
    TextCtrl,
    CheckBox,
    StaticLine,
    Notebook,
    ToolBar,
    StatusBar,
    MenuBar,
    WizardPage,
    Wizard,
    DockHost,
}

impl WidgetFamily {
    /// Natural size of a window of this family with no layout of its own.
    pub(crate) fn default_size(&self) -> Vec2 {
        match self {
            WidgetFamily::Back | WidgetFamily::ContentPanel => vec2(200.0, 100.0),
            WidgetFamily::Panel | WidgetFamily::DockHost => vec2(80.0, 60.0),
            WidgetFamily::Button => vec2(80.0, 26.0),
            WidgetFamily::StaticText => vec2(60.0, 18.0),
            WidgetFamily::TextCtrl => vec2(120.0, 24.0),
            WidgetFamily::CheckBox => vec2(100.0, 20.0),
            WidgetFamily::StaticLine => vec2(20.0, 2.0),
            WidgetFamily::Notebook => vec2(200.0, 120.0),
            WidgetFamily::ToolBar => vec2(120.0, 28.0),
            WidgetFamily::StatusBar => vec2(120.0, 22.0),
            WidgetFamily::MenuBar => vec2(120.0, 22.0),
            WidgetFamily::WizardPage => vec2(220.0, 140.0),
            WidgetFamily::Wizard => vec2(400.0, 260.0),
        }
    }

    pub(crate) const fn is_text_sized(&self) -> bool {
        matches!(
            self,
            WidgetFamily::Button | WidgetFamily::StaticText | WidgetFamily::CheckBox
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SizerLayout {
    Box(Orientation),
    StaticBox { orient: Orientation, label: String },
    Grid {
        rows: usize,
        cols: usize,
        vgap: f32,
        hgap: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum ItemTarget {
    Window(WidgetHandle),
    Sizer(WidgetHandle),
    Spacer(Vec2),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SizerItem {
    pub(crate) target: ItemTarget,
    pub(crate) proportion: u32,
    pub(crate) flag: i64,
    pub(crate) border: i32,
}

impl SizerItem {
    pub(crate) fn new(target: ItemTarget, proportion: u32, flag: i64, border: i32) -> Self {
        Self {
            target,
            proportion,
            flag,
            border,
        }
    }

    pub(crate) fn stretch(proportion: u32) -> Self {
        Self::new(ItemTarget::Spacer(Vec2::ZERO), proportion, 0, 0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NotebookPage {
    pub(crate) label: String,
    pub(crate) window: WidgetHandle,
}

#[derive(Clone, Debug)]
pub(crate) struct Window {
    pub(crate) family: WidgetFamily,
    pub(crate) label: String,
    pub(crate) parent: Option<WidgetHandle>,
    pub(crate) children: Vec<WidgetHandle>,
    /// Relative to the parent's client origin.
    pub(crate) rect: Rect,
    pub(crate) requested: Size,
    pub(crate) min_size: Size,
    pub(crate) max_size: Size,
    pub(crate) font: Option<FontSpec>,
    pub(crate) fg: Option<Color32>,
    pub(crate) bg: Option<Color32>,
    pub(crate) style: i64,
    pub(crate) extra_style: i64,
    pub(crate) enabled: bool,
    pub(crate) shown: bool,
    pub(crate) tooltip: String,
    pub(crate) sizer: Option<WidgetHandle>,
    pub(crate) checked: bool,
    /// Tool labels for toolbars, field texts for status bars.
    pub(crate) items: Vec<String>,
    pub(crate) pages: Vec<NotebookPage>,
    pub(crate) selection: usize,
}

impl Window {
    fn new(family: WidgetFamily, label: String, parent: Option<WidgetHandle>) -> Self {
        Self {
            family,
            label,
            parent,
            children: Vec::new(),
            rect: Rect::from_min_size(Pos2::ZERO, family.default_size()),
            requested: Size::DEFAULT,
            min_size: Size::DEFAULT,
            max_size: Size::DEFAULT,
            font: None,
            fg: None,
            bg: None,
            style: 0,
            extra_style: 0,
            enabled: true,
            shown: true,
            tooltip: String::new(),
            sizer: None,
            checked: false,
            items: Vec::new(),
            pages: Vec::new(),
            selection: 0,
        }
    }

    pub(crate) fn size(&self) -> Vec2 {
        self.rect.size()
    }

    /// Keeps the position; unspecified dimensions keep their current value.
    pub(crate) fn set_size(&mut self, size: Size) {
        let new = size.apply_to(self.rect.size());
        self.rect = Rect::from_min_size(self.rect.min, new);
    }

    pub(crate) fn set_size_vec(&mut self, size: Vec2) {
        self.rect = Rect::from_min_size(self.rect.min, size);
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Sizer {
    pub(crate) layout: SizerLayout,
    pub(crate) items: Vec<SizerItem>,
    pub(crate) min_size: Size,
    /// Relative to the client origin of `window`.
    pub(crate) rect: Rect,
    /// Window whose client area this sizer was last laid out in.
    pub(crate) window: Option<WidgetHandle>,
}

#[derive(Clone, Debug)]
pub(crate) struct AbstractObject {
    pub(crate) label: String,
}

#[derive(Clone, Debug)]
pub(crate) enum LiveNode {
    Window(Window),
    Sizer(Sizer),
    Abstract(AbstractObject),
}

impl LiveNode {
    pub(crate) fn kind(&self) -> ComponentType {
        match self {
            LiveNode::Window(_) => ComponentType::Window,
            LiveNode::Sizer(_) => ComponentType::Sizer,
            LiveNode::Abstract(_) => ComponentType::Abstract,
        }
    }
}

struct Slot {
    generation: u32,
    node: Option<LiveNode>,
}

#[derive(Default)]
pub(crate) struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Scene {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, node: LiveNode) -> WidgetHandle {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                WidgetHandle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                WidgetHandle {
                    index: (self.slots.len() - 1) as u32,
                    generation: 0,
                }
            }
        }
    }

    pub(crate) fn get(&self, h: WidgetHandle) -> Option<&LiveNode> {
        let slot = self.slots.get(h.index as usize)?;
        (slot.generation == h.generation)
            .then_some(slot.node.as_ref())
            .flatten()
    }

    fn get_mut(&mut self, h: WidgetHandle) -> Option<&mut LiveNode> {
        let slot = self.slots.get_mut(h.index as usize)?;
        if slot.generation != h.generation {
            return None;
        }
        slot.node.as_mut()
    }

    #[cfg(test)]
    pub(crate) fn is_alive(&self, h: WidgetHandle) -> bool {
        self.get(h).is_some()
    }

    pub(crate) fn kind_of(&self, h: WidgetHandle) -> Option<ComponentType> {
        self.get(h).map(LiveNode::kind)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    pub(crate) fn window(&self, h: WidgetHandle) -> Option<&Window> {
        match self.get(h)? {
            LiveNode::Window(w) => Some(w),
            _ => None,
        }
    }

    pub(crate) fn window_mut(&mut self, h: WidgetHandle) -> Option<&mut Window> {
        match self.get_mut(h)? {
            LiveNode::Window(w) => Some(w),
            _ => None,
        }
    }

    pub(crate) fn sizer(&self, h: WidgetHandle) -> Option<&Sizer> {
        match self.get(h)? {
            LiveNode::Sizer(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn sizer_mut(&mut self, h: WidgetHandle) -> Option<&mut Sizer> {
        match self.get_mut(h)? {
            LiveNode::Sizer(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn create_window(
        &mut self,
        parent: Option<WidgetHandle>,
        family: WidgetFamily,
        label: impl Into<String>,
    ) -> WidgetHandle {
        let parent = parent.filter(|&p| self.window(p).is_some());
        let h = self.alloc(LiveNode::Window(Window::new(family, label.into(), parent)));
        if let Some(p) = parent.and_then(|p| self.window_mut(p)) {
            p.children.push(h);
        }
        h
    }

    pub(crate) fn create_sizer(&mut self, layout: SizerLayout) -> WidgetHandle {
        self.alloc(LiveNode::Sizer(Sizer {
            layout,
            items: Vec::new(),
            min_size: Size::DEFAULT,
            rect: Rect::NOTHING,
            window: None,
        }))
    }

    pub(crate) fn create_abstract(&mut self, label: impl Into<String>) -> WidgetHandle {
        self.alloc(LiveNode::Abstract(AbstractObject {
            label: label.into(),
        }))
    }

    /// Destroys a window with its children and sizer, a sizer with its
    /// nested sizers, or an abstract object.
    pub(crate) fn destroy(&mut self, h: WidgetHandle) {
        let Some(node) = self.take(h) else {
            return;
        };
        match node {
            LiveNode::Window(w) => {
                if let Some(p) = w.parent.and_then(|p| self.window_mut(p)) {
                    p.children.retain(|c| *c != h);
                }
                for child in w.children {
                    self.destroy(child);
                }
                if let Some(s) = w.sizer {
                    self.destroy(s);
                }
            }
            LiveNode::Sizer(s) => {
                for item in s.items {
                    if let ItemTarget::Sizer(nested) = item.target {
                        self.destroy(nested);
                    }
                }
            }
            LiveNode::Abstract(_) => {}
        }
    }

    fn take(&mut self, h: WidgetHandle) -> Option<LiveNode> {
        let slot = self.slots.get_mut(h.index as usize)?;
        if slot.generation != h.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(h.index);
        Some(node)
    }

    pub(crate) fn destroy_children(&mut self, h: WidgetHandle) {
        for child in self.children(h) {
            self.destroy(child);
        }
    }

    pub(crate) fn children(&self, h: WidgetHandle) -> Vec<WidgetHandle> {
        self.window(h).map(|w| w.children.clone()).unwrap_or_default()
    }

    pub(crate) fn parent(&self, h: WidgetHandle) -> Option<WidgetHandle> {
        self.window(h)?.parent
    }

    /// Makes `sizer` the layout driver of `window`. The previous sizer is
    /// destroyed when `delete_old` is set, otherwise it is merely detached.
    pub(crate) fn set_sizer(
        &mut self,
        window: WidgetHandle,
        sizer: Option<WidgetHandle>,
        delete_old: bool,
    ) {
        let Some(w) = self.window_mut(window) else {
            return;
        };
        let old = std::mem::replace(&mut w.sizer, sizer);
        if let Some(old) = old.filter(|o| Some(*o) != sizer) {
            if delete_old {
                self.destroy(old);
            } else if let Some(s) = self.sizer_mut(old) {
                s.window = None;
            }
        }
        if let Some(s) = sizer.and_then(|s| self.sizer_mut(s)) {
            s.window = Some(window);
        }
    }

    pub(crate) fn add_to_sizer(&mut self, sizer: WidgetHandle, item: SizerItem) -> bool {
        match self.sizer_mut(sizer) {
            Some(s) => {
                s.items.push(item);
                true
            }
            None => false,
        }
    }

    pub(crate) fn reparent(&mut self, window: WidgetHandle, new_parent: WidgetHandle) {
        if window == new_parent || self.window(new_parent).is_none() {
            return;
        }
        let Some(old) = self.window(window).map(|w| w.parent) else {
            return;
        };
        if let Some(p) = old.and_then(|p| self.window_mut(p)) {
            p.children.retain(|c| *c != window);
        }
        if let Some(w) = self.window_mut(window) {
            w.parent = Some(new_parent);
        }
        if let Some(p) = self.window_mut(new_parent) {
            p.children.push(window);
        }
    }

    /// Screen-space origin of a window's client area.
    pub(crate) fn absolute_origin(&self, h: WidgetHandle) -> Pos2 {
        let mut origin = Pos2::ZERO;
        let mut cur = Some(h);
        while let Some(w) = cur.and_then(|c| self.window(c)) {
            origin += w.rect.min.to_vec2();
            cur = w.parent;
        }
        origin
    }

    pub(crate) fn absolute_rect(&self, h: WidgetHandle) -> Option<Rect> {
        match self.get(h)? {
            LiveNode::Window(w) => Some(Rect::from_min_size(self.absolute_origin(h), w.size())),
            LiveNode::Sizer(s) => {
                let origin = s.window.map_or(Pos2::ZERO, |w| self.absolute_origin(w));
                Some(s.rect.translate(origin.to_vec2()))
            }
            LiveNode::Abstract(_) => None,
        }
    }

    /// True when the window and all of its ancestors are shown.
    #[cfg(test)]
    pub(crate) fn is_visible(&self, h: WidgetHandle) -> bool {
        let mut cur = Some(h);
        while let Some(c) = cur {
            match self.window(c) {
                Some(w) if w.shown => cur = w.parent,
                _ => return false,
            }
        }
        true
    }

    /// Deepest shown window under `pos`, searching from `root`. Later
    /// siblings are on top.
    pub(crate) fn hit_test(&self, root: WidgetHandle, pos: Pos2) -> Option<WidgetHandle> {
        let w = self.window(root)?;
        if !w.shown {
            return None;
        }
        let rect = self.absolute_rect(root)?;
        if !rect.contains(pos) {
            return None;
        }
        w.children
            .iter()
            .rev()
            .find_map(|&c| self.hit_test(c, pos))
            .or(Some(root))
    }
}
