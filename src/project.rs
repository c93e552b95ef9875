//! Project persistence and the built-in sample project.

use crate::error::{DesignerError, Result};
use crate::model::{NodeId, ObjectNode, ObjectTree, Property};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk shape of one object.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct SavedObject {
    class: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    properties: Vec<Property>,
    #[serde(default)]
    children: Vec<SavedObject>,
}

pub(crate) struct Project {
    pub(crate) tree: ObjectTree,
}

impl Default for Project {
    fn default() -> Self {
        Self::sample()
    }
}

impl Project {
    /// A project root with no forms.
    pub(crate) fn empty() -> Self {
        let mut tree = ObjectTree::new();
        tree.insert(
            None,
            ObjectNode::new("Project", "project").with("name", "MyProject"),
        );
        Self { tree }
    }

    pub(crate) fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub(crate) fn from_json(json: &str) -> Result<Self> {
        let saved: SavedObject = serde_json::from_str(json)?;
        let mut tree = ObjectTree::new();
        restore(&mut tree, None, saved);
        Ok(Self { tree })
    }

    pub(crate) fn to_json(&self) -> Result<String> {
        let root = self.tree.root().ok_or(DesignerError::EmptyProject)?;
        let saved = snapshot(&self.tree, root).ok_or(DesignerError::EmptyProject)?;
        Ok(serde_json::to_string_pretty(&saved)?)
    }

    pub(crate) fn sample() -> Self {
        let mut project = Self::empty();
        let tree = &mut project.tree;
        let root = tree.root().unwrap_or_else(NodeId::placeholder);
        sample_main_frame(tree, root);
        sample_dock_frame(tree, root);
        sample_wizard(tree, root);
        sample_dialog(tree, root);
        project
    }
}

fn restore(tree: &mut ObjectTree, parent: Option<NodeId>, saved: SavedObject) {
    let mut node = ObjectNode::new(saved.class, saved.type_name);
    node.properties = saved.properties;
    let id = tree.insert(parent, node);
    for child in saved.children {
        restore(tree, Some(id), child);
    }
}

fn snapshot(tree: &ObjectTree, id: NodeId) -> Option<SavedObject> {
    let node = tree.get(id)?;
    Some(SavedObject {
        class: node.class_name.clone(),
        type_name: node.type_name.clone(),
        properties: node.properties.clone(),
        children: node
            .children()
            .iter()
            .filter_map(|&c| snapshot(tree, c))
            .collect(),
    })
}

fn add(
    tree: &mut ObjectTree,
    parent: NodeId,
    class: &str,
    type_name: &str,
    props: &[(&str, &str)],
) -> NodeId {
    let node = props
        .iter()
        .fold(ObjectNode::new(class, type_name), |n, (k, v)| n.with(k, *v));
    tree.insert(Some(parent), node)
}

const WINDOW_PROPS: &[(&str, &str)] = &[
    ("size", "-1,-1"),
    ("minimum_size", "-1,-1"),
    ("maximum_size", "-1,-1"),
    ("font", ""),
    ("fg", ""),
    ("bg", ""),
    ("window_extra_style", ""),
    ("enabled", "1"),
    ("hidden", "0"),
    ("tooltip", ""),
];

const PANE_PROPS: &[(&str, &str)] = &[
    ("aui_name", ""),
    ("center_pane", "0"),
    ("default_pane", "0"),
    ("caption", ""),
    ("caption_visible", "1"),
    ("close_button", "1"),
    ("maximize_button", "0"),
    ("minimize_button", "0"),
    ("pin_button", "0"),
    ("pane_border", "1"),
    ("gripper", "0"),
    ("TopDockable", "1"),
    ("BottomDockable", "1"),
    ("LeftDockable", "1"),
    ("RightDockable", "1"),
    ("dock", "Dock"),
    ("docking", "Left"),
    ("pane_position", ""),
    ("resize", "Resizable"),
    ("dock_fixed", "0"),
    ("moveable", "1"),
    ("floatable", "1"),
    ("pane_size", ""),
    ("best_size", ""),
    ("min_size", ""),
    ("max_size", ""),
    ("toolbar_pane", "0"),
    ("aui_position", ""),
    ("aui_row", ""),
    ("aui_layer", ""),
    ("show", "1"),
];

fn widget(
    tree: &mut ObjectTree,
    parent: NodeId,
    class: &str,
    type_name: &str,
    props: &[(&str, &str)],
) -> NodeId {
    let id = add(tree, parent, class, type_name, WINDOW_PROPS);
    if let Some(node) = tree.get_mut(id) {
        for (k, v) in props {
            node.set_property(k, *v);
        }
    }
    id
}

fn pane(
    tree: &mut ObjectTree,
    parent: NodeId,
    class: &str,
    type_name: &str,
    props: &[(&str, &str)],
) -> NodeId {
    let id = widget(tree, parent, class, type_name, PANE_PROPS);
    if let Some(node) = tree.get_mut(id) {
        for (k, v) in props {
            node.set_property(k, *v);
        }
    }
    id
}

fn sizer_item(tree: &mut ObjectTree, sizer: NodeId, flag: &str, proportion: &str) -> NodeId {
    add(
        tree,
        sizer,
        "sizeritem",
        "sizeritem",
        &[("border", "5"), ("flag", flag), ("proportion", proportion)],
    )
}

fn form(tree: &mut ObjectTree, root: NodeId, class: &str, type_name: &str, props: &[(&str, &str)]) -> NodeId {
    let id = add(
        tree,
        root,
        class,
        type_name,
        &[
            ("name", class),
            ("size", "-1,-1"),
            ("minimum_size", "-1,-1"),
            ("maximum_size", "-1,-1"),
            ("title", ""),
            ("style", ""),
            ("extra_style", ""),
            ("bg", ""),
            ("enabled", "1"),
            ("hidden", "0"),
            ("aui_managed", "0"),
        ],
    );
    if let Some(node) = tree.get_mut(id) {
        for (k, v) in props {
            node.set_property(k, *v);
        }
    }
    id
}

fn sample_main_frame(tree: &mut ObjectTree, root: NodeId) {
    let frame = form(
        tree,
        root,
        "Frame",
        "form",
        &[
            ("name", "MainFrame"),
            ("size", "480,320"),
            ("minimum_size", "300,200"),
            ("title", "Main Frame"),
            ("style", "wxDEFAULT_FRAME_STYLE"),
        ],
    );

    let menubar = add(tree, frame, "wxMenuBar", "menubar", &[("name", "menubar")]);
    let file = add(tree, menubar, "wxMenu", "menu", &[("label", "&File")]);
    let item = |label: &'static str, shortcut: &'static str, kind: &'static str| {
        [
            ("label", label),
            ("shortcut", shortcut),
            ("help", ""),
            ("kind", kind),
            ("checked", "0"),
            ("enabled", "1"),
            ("bitmap", ""),
            ("unchecked_bitmap", ""),
        ]
    };
    add(tree, file, "wxMenuItem", "menuitem", &item("&Open", "Ctrl+O", "wxITEM_NORMAL"));
    add(tree, file, "separator", "menuitem", &[]);
    add(tree, file, "wxMenuItem", "menuitem", &item("E&xit", "Alt+F4", "wxITEM_NORMAL"));
    let view = add(tree, menubar, "wxMenu", "menu", &[("label", "&View")]);
    let grid = add(tree, view, "wxMenuItem", "menuitem", &item("Show &Grid", "", "wxITEM_CHECK"));
    if let Some(node) = tree.get_mut(grid) {
        node.set_property("checked", "1");
    }
    let zoom = add(tree, view, "submenu", "submenu", &[("label", "&Zoom")]);
    add(tree, zoom, "wxMenuItem", "menuitem", &item("Zoom &In", "Ctrl++", "wxITEM_NORMAL"));
    add(tree, zoom, "wxMenuItem", "menuitem", &item("Zoom &Out", "Ctrl+-", "wxITEM_NORMAL"));

    let toolbar = widget(tree, frame, "wxToolBar", "toolbar", &[("style", "wxTB_HORIZONTAL")]);
    add(tree, toolbar, "tool", "tool", &[("label", "New")]);
    add(tree, toolbar, "tool", "tool", &[("label", "Open")]);

    let main = add(tree, frame, "wxBoxSizer", "sizer", &[("orient", "wxVERTICAL"), ("minimum_size", "-1,-1")]);
    let it = sizer_item(tree, main, "wxALL", "0");
    widget(tree, it, "wxStaticText", "widget", &[("label", "Name:")]);
    let it = sizer_item(tree, main, "wxALL|wxEXPAND", "0");
    widget(tree, it, "wxTextCtrl", "widget", &[("value", "type here"), ("tooltip", "Your name")]);
    let it = sizer_item(tree, main, "wxALL", "0");
    widget(tree, it, "wxCheckBox", "widget", &[("label", "Remember me"), ("checked", "1")]);
    let it = sizer_item(tree, main, "wxEXPAND", "1");
    add(tree, it, "spacer", "spacer", &[("width", "0"), ("height", "0")]);
    let it = sizer_item(tree, main, "wxALIGN_RIGHT|wxALL", "0");
    let buttons = add(tree, it, "wxBoxSizer", "sizer", &[("orient", "wxHORIZONTAL"), ("minimum_size", "-1,-1")]);
    let it = sizer_item(tree, buttons, "wxALL", "0");
    widget(tree, it, "wxButton", "widget", &[("label", "OK")]);
    let it = sizer_item(tree, buttons, "wxALL", "0");
    widget(tree, it, "wxButton", "widget", &[("label", "Cancel")]);

    widget(tree, frame, "wxStatusBar", "statusbar", &[("fields", "2")]);
    add(tree, frame, "wxTimer", "timer", &[("name", "refresh_timer"), ("period", "1000")]);
}

fn sample_dock_frame(tree: &mut ObjectTree, root: NodeId) {
    let frame = form(
        tree,
        root,
        "Frame",
        "form",
        &[
            ("name", "DockFrame"),
            ("size", "560,360"),
            ("title", "Docking Frame"),
            ("style", "wxDEFAULT_FRAME_STYLE"),
            ("aui_managed", "1"),
        ],
    );
    let toolbar = pane(
        tree,
        frame,
        "wxToolBar",
        "toolbar",
        &[("caption_visible", "0"), ("docking", "Top"), ("toolbar_pane", "1"), ("gripper", "1")],
    );
    add(tree, toolbar, "tool", "tool", &[("label", "Run")]);
    add(tree, toolbar, "tool", "tool", &[("label", "Stop")]);
    pane(
        tree,
        frame,
        "wxPanel",
        "container",
        &[("caption", "Editor"), ("center_pane", "1"), ("docking", "Center"), ("bg", "255,255,255")],
    );
    pane(
        tree,
        frame,
        "wxTextCtrl",
        "widget",
        &[("caption", "Output"), ("docking", "Bottom"), ("best_size", "-1,80"), ("value", "build ok")],
    );
    pane(
        tree,
        frame,
        "wxPanel",
        "container",
        &[("caption", "Project"), ("docking", "Left"), ("best_size", "140,-1")],
    );
}

fn sample_wizard(tree: &mut ObjectTree, root: NodeId) {
    let wizard = form(
        tree,
        root,
        "Wizard",
        "wizard",
        &[
            ("name", "SetupWizard"),
            ("title", "Setup"),
            ("style", "wxDEFAULT_DIALOG_STYLE"),
            ("extra_style", "wxWIZARD_EX_HELPBUTTON"),
            ("bitmap", "Load From File; wizard.png"),
        ],
    );
    for (i, text) in ["Welcome to the setup wizard.", "Choose an install folder."]
        .into_iter()
        .enumerate()
    {
        let bitmap = if i == 1 { "Load From File; folder.png" } else { "" };
        let page = widget(tree, wizard, "WizardPageSimple", "wizardpagesimple", &[("bitmap", bitmap)]);
        let sizer = add(tree, page, "wxBoxSizer", "sizer", &[("orient", "wxVERTICAL"), ("minimum_size", "-1,-1")]);
        let it = sizer_item(tree, sizer, "wxALL", "0");
        widget(tree, it, "wxStaticText", "widget", &[("label", text)]);
    }
}

fn sample_dialog(tree: &mut ObjectTree, root: NodeId) {
    let dialog = form(
        tree,
        root,
        "Dialog",
        "form",
        &[
            ("name", "AboutDialog"),
            ("size", "320,-1"),
            ("title", "Preferences"),
            ("style", "wxDEFAULT_DIALOG_STYLE"),
        ],
    );
    let main = add(tree, dialog, "wxBoxSizer", "sizer", &[("orient", "wxVERTICAL"), ("minimum_size", "-1,-1")]);
    let it = sizer_item(tree, main, "wxALL|wxEXPAND", "1");
    let notebook = widget(tree, it, "wxNotebook", "notebook", &[]);
    for (label, text, select) in [("General", "General settings", "1"), ("Advanced", "Here be dragons", "0")] {
        let page = add(tree, notebook, "notebookpage", "notebookpage", &[("label", label), ("select", select)]);
        let panel = widget(tree, page, "wxPanel", "container", &[]);
        let sizer = add(tree, panel, "wxGridSizer", "sizer", &[("rows", "2"), ("cols", "1"), ("vgap", "0"), ("hgap", "0"), ("minimum_size", "-1,-1")]);
        let it = sizer_item(tree, sizer, "wxALL", "0");
        widget(tree, it, "wxStaticText", "widget", &[("label", text)]);
        let it = sizer_item(tree, sizer, "wxALL", "0");
        widget(tree, it, "wxCheckBox", "widget", &[("label", "Enabled")]);
    }
    let it = sizer_item(tree, main, "wxEXPAND|wxALL", "0");
    widget(tree, it, "wxStaticLine", "widget", &[]);
    let it = sizer_item(tree, main, "wxALIGN_RIGHT|wxALL", "0");
    widget(tree, it, "wxButton", "widget", &[("label", "Close")]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_has_expected_forms() {
        let project = Project::sample();
        let forms = project.tree.forms();
        let names: Vec<_> = forms
            .iter()
            .filter_map(|&f| project.tree.get(f))
            .map(|n| n.prop_str("name").to_string())
            .collect();
        assert_eq!(names, ["MainFrame", "DockFrame", "SetupWizard", "AboutDialog"]);
    }

    #[test]
    fn test_json_preserves_structure() {
        let project = Project::sample();
        let json = project.to_json().unwrap();
        let loaded = Project::from_json(&json).unwrap();
        let count = |p: &Project| p.tree.root().map_or(0, |r| p.tree.descendants(r).len());
        assert_eq!(count(&project), count(&loaded));
        assert_eq!(loaded.to_json().unwrap(), json);
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        assert!(matches!(
            Project::from_json("{\"class\": 3}"),
            Err(DesignerError::Json(_))
        ));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let project =
            Project::from_json(r#"{"class":"Project","type":"project"}"#).unwrap();
        let root = project.tree.root().unwrap();
        assert!(project.tree.children(root).is_empty());
    }
}
