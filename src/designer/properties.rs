//! Applies object properties to live windows, sizers and dock panes.

use crate::dock::{DockDirection, PaneInfo};
use crate::model::ObjectNode;
use crate::model::typeconv::{self, DEFAULT_COORD, Size};
use crate::widget::{Scene, WidgetHandle};

/// Object types that become dock panes when they sit directly on a
/// dock-managed form.
pub(crate) const DOCKABLE_TYPES: &[&str] = &[
    "widget",
    "container",
    "notebook",
    "auinotebook",
    "flatnotebook",
    "listbook",
    "choicebook",
    "treelistctrl",
    "splitter",
];

pub(crate) fn is_dockable_type(type_name: &str) -> bool {
    DOCKABLE_TYPES.contains(&type_name)
}

/// Applies size, min/max size, font, colours, extra style, enabled, hidden
/// and tooltip, in that order. Absent or empty properties are skipped.
pub(crate) fn apply_window_properties(scene: &mut Scene, window: WidgetHandle, node: &ObjectNode) {
    let Some(w) = scene.window_mut(window) else {
        log::warn!("Cannot apply properties of {}: {window} is not a window", node.class_name);
        return;
    };

    let size = node.prop_size("size");
    if size != Size::DEFAULT {
        w.requested = size;
        w.set_size(size);
    }
    let min = node.prop_size("minimum_size");
    if min != Size::DEFAULT {
        w.min_size = min;
    }
    let max = node.prop_size("maximum_size");
    if max != Size::DEFAULT {
        w.max_size = max;
    }
    if !node.is_null("font") {
        w.font = typeconv::string_to_font(node.prop_str("font"));
    }
    if !node.is_null("fg") {
        w.fg = typeconv::string_to_colour(node.prop_str("fg"));
    }
    if !node.is_null("bg") {
        w.bg = typeconv::string_to_colour(node.prop_str("bg"));
    }
    if !node.is_null("window_extra_style") {
        w.extra_style = node.prop_int("window_extra_style");
    }
    if !node.is_null("enabled") {
        w.enabled = node.prop_bool("enabled");
    }
    if !node.is_null("hidden") {
        w.shown = !node.prop_bool("hidden");
    }
    if !node.is_null("tooltip") {
        w.tooltip = node.prop_str("tooltip").to_string();
    }
}

pub(crate) fn apply_sizer_properties(scene: &mut Scene, sizer: WidgetHandle, node: &ObjectNode) {
    let min = node.prop_size("minimum_size");
    if min != Size::DEFAULT
        && let Some(s) = scene.sizer_mut(sizer)
    {
        s.min_size = min;
    }
}

/// Dock pane attributes described by `node`. Attributes whose property is
/// absent keep the manager's default, except `show`: no shown flag means
/// the pane starts hidden.
pub(crate) fn pane_spec(node: &ObjectNode) -> PaneInfo {
    let flag = |name: &str| node.property(name).map(|p| p.as_int() != 0);
    let mut info = PaneInfo::default();

    if !node.is_null("aui_name") {
        info.name = node.prop_str("aui_name").to_string();
    }
    if node.prop_bool("center_pane") {
        info.center_pane();
    }
    if node.prop_bool("default_pane") {
        info.default_pane();
    }
    if !node.is_null("caption") {
        info.caption = node.prop_str("caption").to_string();
    }
    let toggles: [(&str, &mut bool); 11] = [
        ("caption_visible", &mut info.caption_visible),
        ("close_button", &mut info.close_button),
        ("maximize_button", &mut info.maximize_button),
        ("minimize_button", &mut info.minimize_button),
        ("pin_button", &mut info.pin_button),
        ("pane_border", &mut info.pane_border),
        ("gripper", &mut info.gripper),
        ("BottomDockable", &mut info.bottom_dockable),
        ("TopDockable", &mut info.top_dockable),
        ("LeftDockable", &mut info.left_dockable),
        ("RightDockable", &mut info.right_dockable),
    ];
    for (name, slot) in toggles {
        if let Some(v) = flag(name) {
            *slot = v;
        }
    }

    if !node.is_null("dock") {
        if node.prop_str("dock") == "Dock" {
            let direction = match node.prop_str("docking") {
                "Bottom" => DockDirection::Bottom,
                "Top" => DockDirection::Top,
                "Center" => DockDirection::Center,
                "Right" => DockDirection::Right,
                _ => info.direction(),
            };
            info.dock(direction);
        } else {
            info.float();
            info.floating_pos = node.prop_point("pane_position");
        }
    }
    if !node.is_null("resize") {
        info.resizable = node.prop_str("resize") == "Resizable";
    }
    if let Some(v) = flag("dock_fixed") {
        info.dock_fixed = v;
    }
    if let Some(v) = flag("moveable") {
        info.movable = v;
    }
    if let Some(v) = flag("floatable") {
        info.floatable = v;
    }

    if !node.is_null("pane_size") {
        info.floating_size = node.prop_size("pane_size");
    }
    if !node.is_null("best_size") {
        info.best_size = node.prop_size("best_size");
    }
    if !node.is_null("min_size") {
        info.min_size = node.prop_size("min_size");
    }
    if !node.is_null("max_size") {
        info.max_size = node.prop_size("max_size");
    }

    if node.prop_bool("toolbar_pane") {
        info.toolbar_pane();
    }
    if !node.is_null("aui_position") {
        info.dock_pos = node.prop_int("aui_position") as i32;
    }
    if !node.is_null("aui_row") {
        info.dock_row = node.prop_int("aui_row") as i32;
    }
    if !node.is_null("aui_layer") {
        info.dock_layer = node.prop_int("aui_layer") as i32;
    }
    if !node.prop_bool("show") {
        info.shown = false;
    }
    info
}

/// Clamps each specified dimension of `size` into `[min, max]`. A bound is
/// only enforced where it is specified.
pub(crate) fn clamp_form_size(size: Size, min: Size, max: Size) -> Size {
    let clamp = |v: i32, lo: i32, hi: i32| {
        let mut v = v;
        if v != DEFAULT_COORD && lo != DEFAULT_COORD && v < lo {
            v = lo;
        }
        if v != DEFAULT_COORD && hi != DEFAULT_COORD && v > hi {
            v = hi;
        }
        v
    };
    Size::new(clamp(size.w, min.w, max.w), clamp(size.h, min.h, max.h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::typeconv::Point;
    use crate::widget::WidgetFamily;
    use egui::Color32;

    #[test]
    fn test_clamp_form_size() {
        let min = Size::new(100, 50);
        let max = Size::new(400, 300);
        assert_eq!(clamp_form_size(Size::new(50, 500), min, max), Size::new(100, 300));
        assert_eq!(clamp_form_size(Size::new(200, 100), min, max), Size::new(200, 100));
        // unspecified dimensions and bounds are left alone
        assert_eq!(clamp_form_size(Size::new(-1, 10), min, max), Size::new(-1, 50));
        assert_eq!(
            clamp_form_size(Size::new(5000, 1), Size::DEFAULT, Size::DEFAULT),
            Size::new(5000, 1)
        );
    }

    #[test]
    fn test_apply_window_properties() {
        let mut scene = Scene::new();
        let w = scene.create_window(None, WidgetFamily::Button, "");
        let node = ObjectNode::new("wxButton", "widget")
            .with("size", "90,-1")
            .with("minimum_size", "-1,-1")
            .with("bg", "10,20,30")
            .with("fg", "")
            .with("enabled", "0")
            .with("hidden", "1")
            .with("tooltip", "press me")
            .with("window_extra_style", "wxWS_EX_VALIDATE_RECURSIVELY");
        apply_window_properties(&mut scene, w, &node);

        let win = scene.window(w).unwrap();
        assert_eq!(win.requested, Size::new(90, -1));
        assert_eq!(win.size().x, 90.0);
        assert_eq!(win.min_size, Size::DEFAULT);
        assert_eq!(win.bg, Some(Color32::from_rgb(10, 20, 30)));
        assert_eq!(win.fg, None);
        assert!(!win.enabled);
        assert!(!win.shown);
        assert_eq!(win.tooltip, "press me");
        assert_eq!(
            win.extra_style,
            typeconv::flags::WX_WS_EX_VALIDATE_RECURSIVELY
        );
    }

    #[test]
    fn test_apply_sizer_minimum_size() {
        let mut scene = Scene::new();
        let s = scene.create_sizer(crate::widget::SizerLayout::Box(
            crate::widget::Orientation::Vertical,
        ));
        let node = ObjectNode::new("wxBoxSizer", "sizer").with("minimum_size", "50,40");
        apply_sizer_properties(&mut scene, s, &node);
        assert_eq!(scene.sizer(s).unwrap().min_size, Size::new(50, 40));
    }

    #[test]
    fn test_pane_spec_mapping() {
        let node = ObjectNode::new("wxTextCtrl", "widget")
            .with("caption", "Output")
            .with("caption_visible", "1")
            .with("close_button", "0")
            .with("dock", "Dock")
            .with("docking", "Bottom")
            .with("resize", "Fixed")
            .with("best_size", "-1,80")
            .with("aui_row", "2")
            .with("show", "1");
        let info = pane_spec(&node);
        assert_eq!(info.caption, "Output");
        assert!(!info.close_button);
        assert_eq!(info.direction(), DockDirection::Bottom);
        assert!(!info.resizable);
        assert_eq!(info.best_size, Size::new(-1, 80));
        assert_eq!(info.dock_row, 2);
        assert!(info.shown);
        // absent toggles keep their defaults
        assert!(info.floatable && info.movable);

        let floating = ObjectNode::new("wxPanel", "container")
            .with("dock", "Float")
            .with("pane_position", "30,40");
        let info = pane_spec(&floating);
        assert!(info.floating);
        assert_eq!(info.floating_pos, Point::new(30, 40));
        // no show flag: starts hidden
        assert!(!info.shown);
    }

    #[test]
    fn test_pane_spec_edge_dockable_flags() {
        let node = ObjectNode::new("wxPanel", "container")
            .with("RightDockable", "0")
            .with("TopDockable", "0");
        let info = pane_spec(&node);
        assert!(!info.right_dockable);
        assert!(!info.top_dockable);
        assert!(info.left_dockable && info.bottom_dockable);
    }

    #[test]
    fn test_dockable_types() {
        assert!(is_dockable_type("container"));
        assert!(is_dockable_type("splitter"));
        assert!(!is_dockable_type("toolbar"));
        assert!(!is_dockable_type("sizer"));
    }
}
