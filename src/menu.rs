//! Menu models for the preview's frame chrome, built straight from the
//! menubar node's subtree.

use crate::model::typeconv::flags::{WX_ITEM_CHECK, WX_ITEM_RADIO};
use crate::model::{NodeId, ObjectTree};

/// First id handed out to generated menu entries.
pub(crate) const FIRST_MENU_ID: i32 = 6000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ItemKind {
    Normal,
    Check,
    Radio,
}

impl ItemKind {
    fn from_int(kind: i64) -> Self {
        match kind {
            WX_ITEM_CHECK => ItemKind::Check,
            WX_ITEM_RADIO => ItemKind::Radio,
            _ => ItemKind::Normal,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct MenuItem {
    pub(crate) id: i32,
    /// Label, with `\t` and the shortcut appended when one is set.
    pub(crate) label: String,
    pub(crate) help: String,
    pub(crate) kind: ItemKind,
    pub(crate) checked: bool,
    pub(crate) enabled: bool,
    pub(crate) bitmap: Option<String>,
}

impl MenuItem {
    pub(crate) fn text(&self) -> &str {
        self.label.split('\t').next().unwrap_or_default()
    }

    pub(crate) fn shortcut(&self) -> Option<&str> {
        self.label.split_once('\t').map(|(_, s)| s)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum MenuEntry {
    Item(MenuItem),
    Separator,
    Submenu { id: i32, label: String, menu: Menu },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Menu {
    pub(crate) entries: Vec<MenuEntry>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct MenuBarModel {
    pub(crate) menus: Vec<(String, Menu)>,
}

impl MenuBarModel {
    /// One menu per child of `menubar`; ids restart for every menu.
    pub(crate) fn from_node(tree: &ObjectTree, menubar: NodeId) -> Self {
        let menus = tree
            .children(menubar)
            .iter()
            .filter_map(|&m| {
                let label = tree.get(m)?.prop_str("label").to_string();
                let mut next_id = FIRST_MENU_ID;
                Some((label, menu_from_node(tree, m, &mut next_id)))
            })
            .collect();
        Self { menus }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }
}

/// Label as displayed, with `&` mnemonic markers removed.
pub(crate) fn display_label(label: &str) -> String {
    label.replace('&', "")
}

impl Menu {
    pub(crate) fn ui(&self, ui: &mut egui::Ui) {
        for entry in &self.entries {
            match entry {
                MenuEntry::Item(item) => item.ui(ui),
                MenuEntry::Separator => {
                    ui.separator();
                }
                MenuEntry::Submenu { label, menu, .. } => {
                    ui.menu_button(display_label(label), |ui| menu.ui(ui));
                }
            }
        }
    }
}

impl MenuItem {
    fn ui(&self, ui: &mut egui::Ui) {
        let text = display_label(self.text());
        let response = match self.kind {
            ItemKind::Normal => {
                let mut button = egui::Button::new(text);
                if let Some(shortcut) = self.shortcut() {
                    button = button.shortcut_text(shortcut);
                }
                ui.add_enabled(self.enabled, button)
            }
            ItemKind::Check => {
                let mut checked = self.checked;
                ui.add_enabled(self.enabled, egui::Checkbox::new(&mut checked, text))
            }
            ItemKind::Radio => ui.add_enabled(self.enabled, egui::RadioButton::new(self.checked, text)),
        };
        let hover = match (&self.bitmap, self.help.is_empty()) {
            (Some(bitmap), true) => bitmap.clone(),
            (Some(bitmap), false) => format!("{}\n{bitmap}", self.help),
            (None, false) => self.help.clone(),
            (None, true) => return,
        };
        let _ = response.on_hover_text(hover);
    }
}

fn menu_from_node(tree: &ObjectTree, menu: NodeId, next_id: &mut i32) -> Menu {
    let mut entries = Vec::new();
    for &child in tree.children(menu) {
        let Some(node) = tree.get(child) else {
            continue;
        };
        if node.type_name == "submenu" {
            let id = *next_id;
            *next_id += 1;
            entries.push(MenuEntry::Submenu {
                id,
                label: node.prop_str("label").to_string(),
                menu: menu_from_node(tree, child, next_id),
            });
        } else if node.class_name == "separator" {
            entries.push(MenuEntry::Separator);
        } else {
            let mut label = node.prop_str("label").to_string();
            let shortcut = node.prop_str("shortcut");
            if !shortcut.is_empty() {
                label.push('\t');
                label.push_str(shortcut);
            }
            let kind = ItemKind::from_int(node.prop_int("kind"));
            let bitmap = if node.is_null("bitmap") {
                None
            } else {
                crate::model::typeconv::string_to_bitmap(node.prop_str("bitmap"))
            };
            entries.push(MenuEntry::Item(MenuItem {
                id: *next_id,
                label,
                help: node.prop_str("help").to_string(),
                kind,
                checked: kind == ItemKind::Check && node.prop_bool("checked"),
                enabled: node.prop_bool("enabled"),
                bitmap,
            }));
            *next_id += 1;
        }
    }
    Menu { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectNode;

    fn item(label: &str, shortcut: &str, kind: &str, checked: &str) -> ObjectNode {
        ObjectNode::new("wxMenuItem", "menuitem")
            .with("label", label)
            .with("shortcut", shortcut)
            .with("kind", kind)
            .with("checked", checked)
            .with("enabled", "1")
    }

    #[test]
    fn test_menubar_from_node() {
        let mut tree = ObjectTree::new();
        let bar = tree.insert(None, ObjectNode::new("wxMenuBar", "menubar"));
        let file = tree.insert(Some(bar), ObjectNode::new("wxMenu", "menu").with("label", "&File"));
        tree.insert(Some(file), item("&Open", "Ctrl+O", "wxITEM_NORMAL", "1"));
        tree.insert(Some(file), ObjectNode::new("separator", "menuitem"));
        let sub = tree.insert(
            Some(file),
            ObjectNode::new("submenu", "submenu").with("label", "Recent"),
        );
        tree.insert(Some(sub), item("a.json", "", "wxITEM_CHECK", "1"));

        let model = MenuBarModel::from_node(&tree, bar);
        assert_eq!(model.menus.len(), 1);
        let (label, menu) = &model.menus[0];
        assert_eq!(label, "&File");
        assert_eq!(menu.entries.len(), 3);

        let MenuEntry::Item(open) = &menu.entries[0] else {
            panic!("expected an item");
        };
        assert_eq!(open.id, FIRST_MENU_ID);
        assert_eq!(open.label, "&Open\tCtrl+O");
        assert_eq!(open.text(), "&Open");
        assert_eq!(open.shortcut(), Some("Ctrl+O"));
        // only check items carry a checked state
        assert!(!open.checked);
        assert_eq!(menu.entries[1], MenuEntry::Separator);

        let MenuEntry::Submenu { id, menu: recent, .. } = &menu.entries[2] else {
            panic!("expected a submenu");
        };
        assert_eq!(*id, FIRST_MENU_ID + 1);
        let MenuEntry::Item(a) = &recent.entries[0] else {
            panic!("expected an item");
        };
        assert_eq!(a.id, FIRST_MENU_ID + 2);
        assert_eq!(a.kind, ItemKind::Check);
        assert!(a.checked);
        assert!(a.enabled);
    }

    #[test]
    fn test_display_label_strips_mnemonics() {
        assert_eq!(display_label("&File"), "File");
        assert_eq!(display_label("E&xit"), "Exit");
        assert_eq!(display_label("Plain"), "Plain");
    }
}
