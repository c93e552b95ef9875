//! Reverse sync of live dock pane state into object properties.

use super::registry::ObjectRegistry;
use crate::dock::{DockDirection, PaneInfo, PaneManager};
use crate::model::typeconv::{self, Size};
use crate::model::{NodeId, ObjectNode, ObjectTree};
use crate::widget::{Scene, WidgetHandle};

/// Object types whose panes are scanned.
const SCANNED_TYPES: &[&str] = &["widget", "toolbar", "container"];

/// Name stored in the `docking` property for a dock direction code.
pub(crate) fn dock_side_name(code: i32) -> &'static str {
    match DockDirection::from_code(code) {
        Some(DockDirection::Top) => "Top",
        Some(DockDirection::Right) => "Right",
        Some(DockDirection::Bottom) => "Bottom",
        Some(DockDirection::Center) => "Center",
        Some(DockDirection::Left) | None => "Left",
    }
}

/// Writes the pane's live state into `node`. Returns whether anything
/// changed.
pub(crate) fn sync_pane(node: &mut ObjectNode, info: &PaneInfo) -> bool {
    let mut changed = false;

    if !node.prop_bool("center_pane") {
        let dock = if info.is_docked() {
            changed |= node.update_property("docking", dock_side_name(info.dock_direction));
            "Dock"
        } else {
            let pos = info.floating_pos;
            if pos.is_valid() {
                changed |= node.update_property("pane_position", typeconv::point_to_string(pos));
            }
            let size = info.floating_size;
            if floating_size_is_set(size)
                && node.update_property("pane_size", typeconv::size_to_string(size))
            {
                node.update_property("resize", "Resizable");
                changed = true;
            }
            "Float"
        };
        changed |= node.update_property("dock", dock);

        if node.prop_int("aui_row") != i64::from(info.dock_row) {
            changed |= node.update_property("aui_row", info.dock_row.to_string());
        }
        if node.prop_int("aui_layer") != i64::from(info.dock_layer) {
            changed |= node.update_property("aui_layer", info.dock_layer.to_string());
        }
    }

    if node.prop_bool("show") != info.shown {
        changed |= node.update_property("show", if info.shown { "1" } else { "0" });
    }
    changed
}

fn floating_size_is_set(size: Size) -> bool {
    size.w != typeconv::DEFAULT_COORD && size.h != typeconv::DEFAULT_COORD
}

/// Walks the children of `parent` in reverse, each subtree before its own
/// root, and syncs every scanned pane. Returns the changed nodes, once each,
/// in visiting order.
pub(crate) fn scan_panes(
    scene: &Scene,
    registry: &ObjectRegistry,
    dock: &PaneManager,
    tree: &mut ObjectTree,
    parent: WidgetHandle,
) -> Vec<NodeId> {
    let mut changed = Vec::new();
    scan_children(scene, registry, dock, tree, parent, &mut changed);
    changed
}

fn scan_children(
    scene: &Scene,
    registry: &ObjectRegistry,
    dock: &PaneManager,
    tree: &mut ObjectTree,
    parent: WidgetHandle,
    changed: &mut Vec<NodeId>,
) {
    for child in scene.children(parent).into_iter().rev() {
        scan_children(scene, registry, dock, tree, child, changed);

        let Some(id) = registry.node_of(child) else {
            continue;
        };
        let Some(node) = tree.get_mut(id) else {
            continue;
        };
        if !SCANNED_TYPES.contains(&node.type_name.as_str()) {
            continue;
        }
        let Some(info) = dock.pane_info(child) else {
            continue;
        };
        if sync_pane(node, info) && !changed.contains(&id) {
            log::trace!("Pane {id} moved, syncing {}", node.class_name);
            changed.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::typeconv::Point;
    use crate::widget::WidgetFamily;

    fn pane_node() -> ObjectNode {
        ObjectNode::new("wxPanel", "container")
            .with("center_pane", "0")
            .with("dock", "Dock")
            .with("docking", "Left")
            .with("pane_position", "")
            .with("pane_size", "")
            .with("resize", "Fixed")
            .with("aui_row", "")
            .with("aui_layer", "")
            .with("show", "1")
    }

    #[test]
    fn test_dock_side_names() {
        let names: Vec<_> = (1..=5).map(dock_side_name).collect();
        assert_eq!(names, ["Top", "Right", "Bottom", "Left", "Center"]);
        assert_eq!(dock_side_name(0), "Left");
        assert_eq!(dock_side_name(42), "Left");
        assert_eq!(dock_side_name(-1), "Left");
    }

    #[test]
    fn test_sync_unchanged_pane_reports_nothing() {
        let mut node = pane_node();
        assert!(!sync_pane(&mut node, &PaneInfo::default()));
        // integer-equal values are left as stored
        assert_eq!(node.prop_str("aui_row"), "");
    }

    #[test]
    fn test_sync_docked_pane() {
        let mut node = pane_node();
        let mut info = PaneInfo {
            dock_row: 1,
            ..PaneInfo::default()
        };
        info.dock(DockDirection::Bottom);
        assert!(sync_pane(&mut node, &info));
        assert_eq!(node.prop_str("docking"), "Bottom");
        assert_eq!(node.prop_str("dock"), "Dock");
        assert_eq!(node.prop_str("aui_row"), "1");
    }

    #[test]
    fn test_sync_floating_pane() {
        let mut node = pane_node();
        let mut info = PaneInfo {
            floating_pos: Point::new(40, 50),
            floating_size: Size::new(120, 90),
            ..PaneInfo::default()
        };
        info.float();
        assert!(sync_pane(&mut node, &info));
        assert_eq!(node.prop_str("dock"), "Float");
        assert_eq!(node.prop_str("pane_position"), "40,50");
        assert_eq!(node.prop_str("pane_size"), "120,90");
        assert_eq!(node.prop_str("resize"), "Resizable");
        // untouched while floating
        assert_eq!(node.prop_str("docking"), "Left");

        // a half-specified position is not written back
        let mut node = pane_node();
        let mut info = PaneInfo {
            floating_pos: Point::new(-1, 50),
            ..PaneInfo::default()
        };
        info.float();
        sync_pane(&mut node, &info);
        assert_eq!(node.prop_str("pane_position"), "");
        assert_eq!(node.prop_str("pane_size"), "");
    }

    #[test]
    fn test_center_pane_only_syncs_shown_flag() {
        let mut node = pane_node().with("center_pane", "1");
        let mut info = PaneInfo {
            shown: false,
            ..PaneInfo::default()
        };
        info.dock(DockDirection::Top);
        assert!(sync_pane(&mut node, &info));
        assert_eq!(node.prop_str("docking"), "Left");
        assert_eq!(node.prop_str("show"), "0");
    }

    #[test]
    fn test_scan_panes_collects_changed_nodes() {
        let mut tree = ObjectTree::new();
        let form = tree.insert(None, ObjectNode::new("Frame", "form"));
        let moved = tree.insert(Some(form), pane_node());
        let still = tree.insert(Some(form), pane_node());
        let sizer = tree.insert(Some(form), ObjectNode::new("wxBoxSizer", "sizer"));

        let mut scene = Scene::new();
        let content = scene.create_window(None, WidgetFamily::ContentPanel, "");
        let host = scene.create_window(Some(content), WidgetFamily::DockHost, "");
        let a = scene.create_window(Some(host), WidgetFamily::Panel, "");
        let b = scene.create_window(Some(host), WidgetFamily::Panel, "");
        let s = scene.create_window(Some(host), WidgetFamily::Panel, "");

        let mut registry = ObjectRegistry::new();
        registry.bind(moved, a);
        registry.bind(still, b);
        registry.bind(sizer, s);

        let mut dock = PaneManager::new(host);
        let mut info = PaneInfo::default();
        info.dock(DockDirection::Right);
        dock.add_pane(a, info);
        dock.add_pane(b, PaneInfo::default());
        let mut info = PaneInfo::default();
        info.dock(DockDirection::Top);
        dock.add_pane(s, info);

        let changed = scan_panes(&scene, &registry, &dock, &mut tree, content);
        assert_eq!(changed, vec![moved]);
        assert_eq!(tree.get(moved).unwrap().prop_str("docking"), "Right");
        assert_eq!(tree.get(still).unwrap().prop_str("docking"), "Left");
        // only widget, toolbar and container nodes are scanned
        assert!(tree.get(sizer).unwrap().property("docking").is_none());
    }
}
