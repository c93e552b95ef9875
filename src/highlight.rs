//! Selection outlines drawn over the preview.

use crate::designer::selection::SelectionState;
use crate::model::typeconv::flags::{WX_BOTTOM, WX_LEFT, WX_RIGHT, WX_TOP};
use crate::model::{NodeId, ObjectTree};
use crate::widget::{LiveNode, Scene};
use egui::{Color32, CornerRadius, Rect, Stroke, StrokeKind, Vec2, vec2};

/// Drawing surface for highlight outlines.
pub(crate) trait HighlightCanvas {
    fn stroke_rect(&mut self, rect: Rect, color: Color32);
}

/// Paints outlines with an egui painter, shifted from scene to screen
/// coordinates by `offset`.
pub(crate) struct PainterCanvas<'a> {
    painter: &'a egui::Painter,
    offset: Vec2,
}

impl<'a> PainterCanvas<'a> {
    pub(crate) fn new(painter: &'a egui::Painter, offset: Vec2) -> Self {
        Self { painter, offset }
    }
}

impl HighlightCanvas for PainterCanvas<'_> {
    fn stroke_rect(&mut self, rect: Rect, color: Color32) {
        self.painter.rect_stroke(
            rect.translate(self.offset),
            CornerRadius::ZERO,
            Stroke::new(1.0, color),
            StrokeKind::Inside,
        );
    }
}

/// Colours of the two outlines.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HighlightColors {
    pub(crate) sizer: Color32,
    pub(crate) item: Color32,
}

/// Grows `rect` by the border the object's sizer item reserves on each
/// flagged edge. A zero border counts as one pixel, except for sizers.
pub(crate) fn outline_rect(tree: &ObjectTree, object: NodeId, rect: Rect) -> Rect {
    let is_sizer = tree.get(object).is_some_and(|o| o.is_sizer());
    let min = if is_sizer { 0.0 } else { 1.0 };
    let parent = tree.parent(object).and_then(|p| tree.get(p));

    let mut border = parent.map_or(0, |p| p.prop_int("border")) as f32;
    if border == 0.0 {
        border = min;
    }
    let flag = parent.map_or(0, |p| p.prop_int("flag"));
    let edge = |f: i64| if flag & f == 0 { min } else { border };

    Rect::from_min_max(
        rect.min - vec2(edge(WX_LEFT), edge(WX_TOP)),
        rect.max + vec2(edge(WX_RIGHT), edge(WX_BOTTOM)),
    )
}

/// Outlines the selected sizer and the selected item. Dock-managed forms
/// draw nothing.
pub(crate) fn highlight_selection(
    canvas: &mut dyn HighlightCanvas,
    scene: &Scene,
    tree: &ObjectTree,
    selection: &SelectionState,
    docking: bool,
    colors: HighlightColors,
) {
    if docking {
        return;
    }
    let Some(object) = selection.object.filter(|&o| tree.contains(o)) else {
        return;
    };

    if let Some(rect) = selection.sizer.and_then(|s| scene.absolute_rect(s)) {
        let sizer_parent = tree.find_near_ancestor(object, |n| n.is_sizer());
        if let Some(sp) = sizer_parent
            && tree.parent(sp).is_some()
        {
            canvas.stroke_rect(outline_rect(tree, sp, rect), colors.sizer);
        }
    }

    let Some(item) = selection.item else {
        return;
    };
    let shown = match scene.get(item) {
        Some(LiveNode::Window(w)) => w.shown,
        Some(LiveNode::Sizer(_)) => true,
        _ => return,
    };
    if shown && let Some(rect) = scene.absolute_rect(item) {
        canvas.stroke_rect(outline_rect(tree, object, rect), colors.item);
    }
}

/// Canvas that records every outline, for paint assertions.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingCanvas {
    pub(crate) calls: Vec<(Rect, Color32)>,
}

#[cfg(test)]
impl HighlightCanvas for RecordingCanvas {
    fn stroke_rect(&mut self, rect: Rect, color: Color32) {
        self.calls.push((rect, color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectNode;
    use crate::widget::{Orientation, SizerLayout, WidgetFamily};
    use egui::pos2;

    const COLORS: HighlightColors = HighlightColors {
        sizer: Color32::BLUE,
        item: Color32::RED,
    };

    fn tree() -> (ObjectTree, NodeId, NodeId) {
        let mut tree = ObjectTree::new();
        let sizer = tree.insert(None, ObjectNode::new("wxBoxSizer", "sizer"));
        let item = tree.insert(
            Some(sizer),
            ObjectNode::new("sizeritem", "sizeritem")
                .with("border", "5")
                .with("flag", "wxLEFT|wxTOP"),
        );
        let button = tree.insert(Some(item), ObjectNode::new("wxButton", "widget"));
        (tree, sizer, button)
    }

    #[test]
    fn test_outline_uses_parent_border_per_edge() {
        let (tree, sizer, button) = tree();
        let rect = Rect::from_min_size(pos2(10.0, 10.0), vec2(20.0, 20.0));
        assert_eq!(
            outline_rect(&tree, button, rect),
            Rect::from_min_max(pos2(5.0, 5.0), pos2(31.0, 31.0))
        );
        // a parentless sizer gets no margin at all
        assert_eq!(outline_rect(&tree, sizer, rect), rect);
    }

    #[test]
    fn test_highlight_draws_item_when_shown() {
        let (tree, _, button) = tree();
        let mut scene = Scene::new();
        let w = scene.create_window(None, WidgetFamily::Button, "");
        let selection = SelectionState {
            item: Some(w),
            object: Some(button),
            sizer: None,
            panel: None,
        };
        let mut canvas = RecordingCanvas::default();
        highlight_selection(&mut canvas, &scene, &tree, &selection, false, COLORS);
        assert_eq!(canvas.calls.len(), 1);
        assert_eq!(canvas.calls[0].1, Color32::RED);

        scene.window_mut(w).unwrap().shown = false;
        let mut canvas = RecordingCanvas::default();
        highlight_selection(&mut canvas, &scene, &tree, &selection, false, COLORS);
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn test_docking_suppresses_highlight() {
        let (tree, _, button) = tree();
        let mut scene = Scene::new();
        let w = scene.create_window(None, WidgetFamily::Button, "");
        let s = scene.create_sizer(SizerLayout::Box(Orientation::Vertical));
        let selection = SelectionState {
            item: Some(w),
            object: Some(button),
            sizer: Some(s),
            panel: Some(w),
        };
        let mut canvas = RecordingCanvas::default();
        highlight_selection(&mut canvas, &scene, &tree, &selection, true, COLORS);
        assert!(canvas.calls.is_empty());
    }
}
