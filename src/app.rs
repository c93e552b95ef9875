use crate::component::ComponentLibrary;
use crate::config::EditorConfig;
use crate::designer::VisualEditor;
use crate::model::service::{DesignerModel, SharedModel};
use crate::model::{NodeId, ObjectNode, ObjectTree};
use crate::project::Project;
use egui_extras::{Column, TableBuilder};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

/// Model notifications handled per frame.
const EVENTS_PER_FRAME: usize = 64;
const PROJECT_FILTER: (&str, &[&str]) = ("Form Project", &["json", "fdp"]);

/// Controls that can be dropped into the selected sizer.
const ADDABLE: &[(&str, &str, &str)] = &[
    ("Button", "wxButton", "label"),
    ("Static Text", "wxStaticText", "label"),
    ("Text Control", "wxTextCtrl", "value"),
    ("Check Box", "wxCheckBox", "label"),
    ("Static Line", "wxStaticLine", ""),
];

pub(crate) struct DesignerApp {
    model: SharedModel,
    library: Rc<ComponentLibrary>,
    editor: VisualEditor,
    config: EditorConfig,
    /// Error/status message to display
    status_message: Option<(String, Instant)>,
    /// Inspector buffers of the node they were opened for.
    edits: Option<(NodeId, HashMap<String, String>)>,
    /// Preview ignores edits and selection changes until thawed.
    frozen: bool,
}

impl DesignerApp {
    pub(crate) fn new(config: EditorConfig, path: Option<PathBuf>) -> Self {
        let model = DesignerModel::new(Project::sample()).shared();
        let library = Rc::new(ComponentLibrary::with_builtins());
        let editor = VisualEditor::new(Rc::clone(&model), Rc::clone(&library), config.clone());
        let mut app = Self {
            model,
            library,
            editor,
            config,
            status_message: None,
            edits: None,
            frozen: false,
        };
        if let Some(path) = path {
            app.load_project(path);
        }
        app
    }

    /// Set a status message that will auto-clear after a few seconds
    fn set_status(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    fn load_project(&mut self, path: PathBuf) {
        let result = self.model.borrow_mut().load_project(&path);
        match result {
            Ok(()) => {
                log::info!("Loaded {}", path.display());
                self.set_status(format!("Loaded {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.set_status(format!("Load failed: {e}"));
            }
        }
    }

    fn save_project(&mut self, path: PathBuf) {
        let result = self.model.borrow_mut().save_project(&path);
        match result {
            Ok(()) => self.set_status(format!("Saved to {}", path.display())),
            Err(e) => {
                log::error!("Failed to save {}: {e}", path.display());
                self.set_status(format!("Save failed: {e}"));
            }
        }
    }

    fn pick_save_path() -> Option<PathBuf> {
        rfd::FileDialog::new()
            .add_filter(PROJECT_FILTER.0, PROJECT_FILTER.1)
            .set_file_name("project.json")
            .save_file()
    }

    /// Wraps a new control in a sizer item of the sizer nearest to the
    /// selection.
    fn add_control(&mut self, class: &str, text_prop: &str, label: &str) {
        let mut model = self.model.borrow_mut();
        let Some(selected) = model.selected_object() else {
            return;
        };
        let tree = model.tree();
        let sizer = tree
            .get(selected)
            .filter(|n| n.is_sizer())
            .map(|_| selected)
            .or_else(|| tree.find_near_ancestor(selected, ObjectNode::is_sizer));
        let Some(sizer) = sizer else {
            drop(model);
            self.set_status("Select a sizer to add controls to".into());
            return;
        };

        let item = ObjectNode::new("sizeritem", "sizeritem")
            .with("border", "5")
            .with("flag", "wxALL")
            .with("proportion", "0");
        let Some(item) = model.create_object(sizer, item) else {
            return;
        };
        let mut control = ObjectNode::new(class, "widget")
            .with("size", "-1,-1")
            .with("enabled", "1")
            .with("hidden", "0");
        if !text_prop.is_empty() {
            control = control.with(text_prop, label);
        }
        model.create_object(item, control);
    }

    fn delete_selected(&mut self) {
        let mut model = self.model.borrow_mut();
        let Some(selected) = model.selected_object() else {
            return;
        };
        if model.tree().form_of(selected) == Some(selected) {
            drop(model);
            self.set_status("Forms cannot be deleted here".into());
            return;
        }
        let count = model.tree().descendants(selected).len();
        if model.remove_object(selected) {
            drop(model);
            self.set_status(format!("Removed {count} object(s)"));
        }
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
        self.editor.prevent_on_modified(frozen);
        self.editor.prevent_on_selected(frozen);
        if !frozen {
            self.model.borrow_mut().refresh();
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui
                    .button("New Project")
                    .on_hover_text("Start from an empty project")
                    .clicked()
                {
                    self.model.borrow_mut().set_project(Project::empty());
                    self.set_status("New project created".into());
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui
                    .button("Open Sample")
                    .on_hover_text("Load the bundled sample forms")
                    .clicked()
                {
                    self.model.borrow_mut().set_project(Project::sample());
                    ui.close_kind(egui::UiKind::Menu);
                }
                ui.separator();
                if ui.button("Open...").clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter(PROJECT_FILTER.0, PROJECT_FILTER.1)
                        .pick_file()
                    {
                        self.load_project(path);
                    }
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui.button("Save").clicked() {
                    let current = self.model.borrow().path().map(PathBuf::from);
                    if let Some(path) = current.or_else(Self::pick_save_path) {
                        self.save_project(path);
                    }
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui.button("Save As...").clicked() {
                    if let Some(path) = Self::pick_save_path() {
                        self.save_project(path);
                    }
                    ui.close_kind(egui::UiKind::Menu);
                }
            });
            ui.menu_button("Edit", |ui| {
                ui.menu_button("Add Control", |ui| {
                    for &(label, class, text_prop) in ADDABLE {
                        if ui.button(label).clicked() {
                            self.add_control(class, text_prop, label);
                            ui.close_kind(egui::UiKind::Menu);
                        }
                    }
                });
                if ui
                    .button("Delete")
                    .on_hover_text("Remove the selected object (Del)")
                    .clicked()
                {
                    self.delete_selected();
                    ui.close_kind(egui::UiKind::Menu);
                }
            });
            ui.menu_button("View", |ui| {
                if ui.button("Refresh Preview").clicked() {
                    self.model.borrow_mut().refresh();
                    ui.close_kind(egui::UiKind::Menu);
                }
                if ui.button("Generate Code").clicked() {
                    self.model.borrow_mut().generate_code();
                    ui.close_kind(egui::UiKind::Menu);
                }
                ui.separator();
                let mut frozen = self.frozen;
                if ui
                    .checkbox(&mut frozen, "Freeze Preview")
                    .on_hover_text("Stop rebuilding the preview on every edit")
                    .changed()
                {
                    self.set_frozen(frozen);
                }
            });
        });
    }

    fn status_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let model = self.model.borrow();
            let name = model
                .path()
                .map_or_else(|| "untitled".to_string(), |p| p.display().to_string());
            let marker = if model.is_modified() { " *" } else { "" };
            ui.label(format!("{name}{marker}"));
            ui.separator();
            ui.label(format!("{} components", self.library.len()));
            if self.editor.is_docking() {
                ui.separator();
                ui.label("Dock managed");
            }
            if self.frozen {
                ui.separator();
                ui.colored_label(ui.visuals().warn_fg_color, "Preview frozen");
            }
            if let Some((msg, time)) = &self.status_message
                && time.elapsed().as_secs() < 3
            {
                ui.separator();
                ui.label(msg);
            }
        });
    }

    fn objects_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Objects");
        ui.separator();
        let mut clicked = None;
        {
            let model = self.model.borrow();
            let tree = model.tree();
            let selected = model.selected_object();
            egui::ScrollArea::vertical().show(ui, |ui| {
                if let Some(root) = tree.root() {
                    object_node_ui(ui, tree, root, selected, &mut clicked);
                }
            });
        }
        if let Some(node) = clicked {
            self.model.borrow_mut().select_object(node, false, true);
        }
    }

    fn inspector_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Properties");
        ui.separator();
        let (selected, properties) = {
            let model = self.model.borrow();
            let Some(selected) = model.selected_object() else {
                ui.label("Nothing selected");
                return;
            };
            let node = model.tree().get(selected);
            let properties: Vec<(String, String)> = node
                .map(|n| {
                    n.properties
                        .iter()
                        .map(|p| (p.name.clone(), p.value.clone()))
                        .collect()
                })
                .unwrap_or_default();
            if let Some(n) = node {
                ui.label(format!("{} ({})", n.class_name, n.type_name));
            }
            (selected, properties)
        };

        if self.edits.as_ref().is_none_or(|(node, _)| *node != selected) {
            self.edits = Some((selected, HashMap::new()));
        }
        let mut commit = None;
        if let Some((_, buffers)) = self.edits.as_mut() {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(110.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Property");
                    });
                    header.col(|ui| {
                        ui.strong("Value");
                    });
                })
                .body(|mut body| {
                    for (name, value) in &properties {
                        body.row(22.0, |mut row| {
                            row.col(|ui| {
                                ui.label(name);
                            });
                            row.col(|ui| {
                                let buffer = buffers.entry(name.clone()).or_insert_with(|| value.clone());
                                let response = ui.add(
                                    egui::TextEdit::singleline(buffer)
                                        .id_salt(("property", name))
                                        .desired_width(f32::INFINITY),
                                );
                                if response.lost_focus() && buffer != value {
                                    commit = Some((name.clone(), buffer.clone()));
                                } else if !response.has_focus() && buffer != value {
                                    // the model changed underneath the buffer
                                    *buffer = value.clone();
                                }
                            });
                        });
                    }
                });
        }
        if let Some((name, value)) = commit {
            self.model.borrow_mut().modify_property(selected, &name, &value);
        }
    }
}

fn node_label(node: &ObjectNode) -> String {
    let name = ["name", "label", "caption"]
        .into_iter()
        .map(|p| node.prop_str(p))
        .find(|v| !v.is_empty());
    match name {
        Some(name) => format!("{name} : {}", node.class_name),
        None => node.class_name.clone(),
    }
}

fn object_node_ui(
    ui: &mut egui::Ui,
    tree: &ObjectTree,
    id: NodeId,
    selected: Option<NodeId>,
    clicked: &mut Option<NodeId>,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let label = node_label(node);
    let is_selected = selected == Some(id);
    if node.children().is_empty() {
        if ui.selectable_label(is_selected, label).clicked() {
            *clicked = Some(id);
        }
        return;
    }
    let state = egui::collapsing_header::CollapsingState::load_with_default_open(
        ui.ctx(),
        ui.make_persistent_id(("object", id)),
        true,
    );
    state
        .show_header(ui, |ui| {
            if ui.selectable_label(is_selected, label).clicked() {
                *clicked = Some(id);
            }
        })
        .body(|ui| {
            for &child in node.children() {
                object_node_ui(ui, tree, child, selected, clicked);
            }
        });
}

impl eframe::App for DesignerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let delete_pressed = ctx.memory(|m| m.focused().is_none())
            && ctx.input(|i| i.key_pressed(egui::Key::Delete));
        if delete_pressed {
            self.delete_selected();
        }

        self.editor.process_events(EVENTS_PER_FRAME);
        self.editor.on_scan_tick(Instant::now());

        egui::TopBottomPanel::top("menubar").show(ctx, |ui| self.top_bar(ui));
        egui::TopBottomPanel::bottom("statusbar").show(ctx, |ui| self.status_bar(ui));
        egui::SidePanel::left("objects")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| self.objects_ui(ui));
        egui::SidePanel::right("inspector")
            .default_width(280.0)
            .show(ctx, |ui| self.inspector_ui(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.editor.show(ui));

        ctx.request_repaint_after(self.config.scan_interval());
    }
}
