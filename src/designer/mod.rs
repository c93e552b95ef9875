//! Live preview of the selected form.
//!
//! The editor rebuilds the whole preview of the selected form whenever the
//! model reports a structural change, keeps the node/widget registry that
//! selection and highlighting resolve through, and mirrors interactive dock
//! changes back into the model.

pub(crate) mod hooks;
pub(crate) mod properties;
pub(crate) mod registry;
pub(crate) mod scanner;
pub(crate) mod selection;
pub(crate) mod shell;

use self::hooks::HookTable;
use self::properties::{
    apply_sizer_properties, apply_window_properties, clamp_form_size, is_dockable_type, pane_spec,
};
use self::registry::ObjectRegistry;
use self::selection::{SelectionState, component_ancestors, sizer_ancestor, window_ancestor};
use self::shell::{
    APP_WORKSPACE, BUTTON_FACE, DesignerWindow, PaneAction, PaneCommand, ShellResponse, ShellView,
    wants_title_bar,
};
use crate::component::{BuildContext, ComponentLibrary, ComponentType};
use crate::config::EditorConfig;
use crate::dock::PaneManager;
use crate::error::{DesignerError, Result};
use crate::highlight::{HighlightColors, PainterCanvas, highlight_selection};
use crate::model::service::{DesignerEvent, SharedModel};
use crate::model::typeconv::{self, Size};
use crate::model::{NodeId, ObjectNode, ObjectTree};
use crate::widget::{Scene, WidgetFamily, WidgetHandle};
use crate::wizard::{PageChange, Wizard};
use egui::{Sense, Vec2};
use std::rc::Rc;
use std::time::Instant;

pub(crate) struct VisualEditor {
    model: SharedModel,
    library: Rc<ComponentLibrary>,
    config: EditorConfig,
    scene: Scene,
    registry: ObjectRegistry,
    hooks: HookTable,
    back: DesignerWindow,
    /// Form the preview was last built for.
    form: Option<NodeId>,
    dock: Option<PaneManager>,
    dock_panel: Option<WidgetHandle>,
    wizard: Option<Wizard>,
    stop_selected: bool,
    stop_modified: bool,
    last_scan: Instant,
}

impl VisualEditor {
    pub(crate) fn new(model: SharedModel, library: Rc<ComponentLibrary>, config: EditorConfig) -> Self {
        let mut scene = Scene::new();
        let back = DesignerWindow::new(&mut scene, &config);
        back.set_shown(&mut scene, false);
        Self {
            model,
            library,
            config,
            scene,
            registry: ObjectRegistry::new(),
            hooks: HookTable::new(),
            back,
            form: None,
            dock: None,
            dock_panel: None,
            wizard: None,
            stop_selected: false,
            stop_modified: false,
            last_scan: Instant::now(),
        }
    }

    pub(crate) fn selection(&self) -> &SelectionState {
        &self.back.selection
    }

    pub(crate) fn is_docking(&self) -> bool {
        self.dock.is_some()
    }

    /// Handles up to `limit` queued model notifications. Returns how many
    /// were handled.
    pub(crate) fn process_events(&mut self, limit: usize) -> usize {
        let mut handled = 0;
        while handled < limit {
            let Some(event) = self.model.borrow_mut().poll_event() else {
                break;
            };
            self.handle_event(&event);
            handled += 1;
        }
        handled
    }

    pub(crate) fn handle_event(&mut self, event: &DesignerEvent) {
        log::trace!("Editor event {event:?}");
        match event {
            DesignerEvent::ProjectLoaded
            | DesignerEvent::ProjectRefresh
            | DesignerEvent::CodeGeneration
            | DesignerEvent::ObjectCreated(_)
            | DesignerEvent::ObjectRemoved(_) => self.create(),
            DesignerEvent::ProjectSaved => {}
            DesignerEvent::ObjectSelected(node) => self.on_object_selected(*node),
            DesignerEvent::PropertyModified { .. } => self.on_property_modified(),
        }
    }

    pub(crate) fn prevent_on_selected(&mut self, prevent: bool) {
        self.stop_selected = prevent;
    }

    pub(crate) fn prevent_on_modified(&mut self, prevent: bool) {
        self.stop_modified = prevent;
    }

    /// Destroys the previous preview and builds the selected form anew.
    pub(crate) fn create(&mut self) {
        self.teardown();

        let model = Rc::clone(&self.model);
        let form = model.borrow().selected_form();
        self.form = form;
        let Some(form) = form else {
            self.back.set_shown(&mut self.scene, false);
            return;
        };

        let clamped = model.borrow().tree().get(form).and_then(|node| {
            let size = node.prop_size("size");
            let clamped = clamp_form_size(
                size,
                node.prop_size("minimum_size"),
                node.prop_size("maximum_size"),
            );
            (clamped != size).then_some(clamped)
        });
        if let Some(size) = clamped {
            log::debug!("Clamping form size to {}", typeconv::size_to_string(size));
            model
                .borrow_mut()
                .modify_property(form, "size", &typeconv::size_to_string(size));
        }

        let model = model.borrow();
        let tree = model.tree();
        if let Some(node) = tree.get(form) {
            self.build_form(tree, form, node);
        }
    }

    fn teardown(&mut self) {
        self.back.selection.clear();

        let library = Rc::clone(&self.library);
        {
            let model = self.model.borrow();
            let tree = model.tree();
            for (node, widget) in self.registry.iter() {
                if self.hooks.detach(widget).is_none() {
                    // sizers go with their windows, abstract objects have no owner
                    if self.scene.kind_of(widget) == Some(ComponentType::Abstract) {
                        self.scene.destroy(widget);
                    }
                    continue;
                }
                let component = tree.get(node).and_then(|n| library.get(&n.class_name));
                if let Some(component) = component {
                    component.cleanup(&mut self.scene, widget);
                }
            }
        }

        // hooked windows are released; the hosts may now reclaim them
        if let Some(mut dock) = self.dock.take() {
            dock.uninit();
        }
        self.dock_panel = None;
        if let Some(wizard) = self.wizard.take() {
            wizard.destroy(&mut self.scene);
        }

        let content = self.back.content();
        self.scene.destroy_children(content);
        self.scene.set_sizer(content, None, true);
        self.back.clear_frame_widgets();
        self.registry.clear_all();
    }

    fn build_form(&mut self, tree: &ObjectTree, form: NodeId, node: &ObjectNode) {
        let content = self.back.content();
        let class = node.class_name.as_str();
        self.back.set_shown(&mut self.scene, true);
        self.back.set_limits(
            &mut self.scene,
            node.prop_size("minimum_size"),
            node.prop_size("maximum_size"),
        );

        let bg = (!node.is_null("bg"))
            .then(|| typeconv::string_to_colour(node.prop_str("bg")))
            .flatten()
            .unwrap_or(if class == "Frame" {
                APP_WORKSPACE
            } else {
                BUTTON_FACE
            });
        self.back.set_background(&mut self.scene, bg);

        if matches!(class, "Frame" | "Dialog" | "Wizard") {
            let style = node.prop_int("style");
            self.back.set_title(node.prop_str("title"));
            self.back.set_title_style(style);
            self.back.show_title_bar(wants_title_bar(style));
        } else {
            self.back.show_title_bar(false);
        }

        if node.type_name == "form" && node.prop_int("aui_managed") == 1 {
            let panel = self.scene.create_window(Some(content), WidgetFamily::DockHost, "");
            self.dock_panel = Some(panel);
            self.dock = Some(PaneManager::new(panel));
        }
        if class == "Wizard" {
            let mut wizard = Wizard::new(&mut self.scene, content);
            wizard.show_help_button(typeconv::flag_list_contains(
                node.prop_str("extra_style"),
                "wxWIZARD_EX_HELPBUTTON",
            ));
            if !node.is_null("bitmap") {
                wizard.set_bitmap(typeconv::string_to_bitmap(node.prop_str("bitmap")));
            }
            self.wizard = Some(wizard);
        }

        let mut menubar = None;
        let mut toolbar = None;
        let mut statusbar = None;
        for &child in tree.children(form) {
            let Some(child_node) = tree.get(child) else {
                continue;
            };
            if menubar.is_none() && node.type_name == "menubar_form" {
                // the form itself is the menu bar
                menubar = Some(form);
                continue;
            }
            if child_node.type_name == "menubar" {
                menubar = Some(child);
                continue;
            }
            if toolbar.is_none() && node.type_name == "toolbar_form" {
                if let Err(e) = self.generate(tree, form, content, Some(content)) {
                    log::error!("Failed to generate {class}: {e}");
                }
                toolbar = self.registry.widget_of(form);
                break;
            }

            let host = self
                .dock_panel
                .or(self.wizard.as_ref().map(Wizard::window))
                .unwrap_or(content);
            if let Err(e) = self.generate(tree, child, host, Some(host)) {
                log::error!("Failed to generate {}: {e}", child_node.class_name);
            }

            match child_node.class_name.as_str() {
                "wxToolBar" | "wxAuiToolBar" => toolbar = self.registry.widget_of(child),
                "wxStatusBar" => statusbar = self.registry.widget_of(child),
                _ => {}
            }
            if self.dock.is_some()
                && let Some(tb) = toolbar.take()
            {
                self.setup_aui(child_node, tb);
            }
        }

        let decorated = menubar.is_some()
            || toolbar.is_some()
            || statusbar.is_some()
            || self.dock_panel.is_some()
            || self.wizard.is_some();
        if decorated {
            let (toolbar, statusbar, body) = if let Some(panel) = self.dock_panel {
                (None, statusbar, Some(panel))
            } else if let Some(wizard) = &self.wizard {
                (None, None, Some(wizard.window()))
            } else {
                (toolbar, statusbar, None)
            };
            self.back
                .set_frame_widgets(&mut self.scene, tree, menubar, toolbar, statusbar, body);
        }

        if let Some(wizard) = &self.wizard {
            wizard.layout(&mut self.scene);
        }
        self.back.layout(&mut self.scene);
        let size = node.prop_size("size");
        if size.w == typeconv::DEFAULT_COORD || size.h == typeconv::DEFAULT_COORD {
            self.back.fit(&mut self.scene);
        }
        self.back.set_size(&mut self.scene, size);
        if let Some(wizard) = &self.wizard {
            wizard.layout(&mut self.scene);
        }
        if let Some(dock) = self.dock.as_mut() {
            dock.update(&mut self.scene);
        }

        if node.property("enabled").is_some() {
            self.back.set_enabled(&mut self.scene, node.prop_int("enabled") != 0);
        }
        if node.property("hidden").is_some() {
            self.back.set_shown(&mut self.scene, node.prop_int("hidden") == 0);
        }
        log::debug!(
            "Built preview of {} with {} objects",
            node.prop_str("name"),
            self.registry.len()
        );
    }

    /// Generates the live object of `node` and its subtree. Windows are
    /// parented to `host`; `parent_object` is the live object of the
    /// node's parent, if it has one.
    fn generate(
        &mut self,
        tree: &ObjectTree,
        node: NodeId,
        host: WidgetHandle,
        parent_object: Option<WidgetHandle>,
    ) -> Result<WidgetHandle> {
        let library = Rc::clone(&self.library);
        let Some(obj) = tree.get(node) else {
            return Err(DesignerError::Construction {
                class: node.to_string(),
                reason: "object is not in the project".to_string(),
            });
        };
        let component = library
            .get(&obj.class_name)
            .ok_or_else(|| DesignerError::ComponentNotFound {
                class: obj.class_name.clone(),
            })?;

        let declared = component.component_type();
        let object = component.create(obj, host, &mut self.scene)?;
        let produced = self.scene.kind_of(object).ok_or_else(|| DesignerError::Construction {
            class: obj.class_name.clone(),
            reason: format!("created object {object} does not exist"),
        })?;
        if produced != declared {
            self.scene.destroy(object);
            return Err(DesignerError::KindMismatch {
                class: obj.class_name.clone(),
                declared,
                produced,
            });
        }

        match declared {
            ComponentType::Window => {
                self.setup_window(tree, node, obj, object);
                self.hooks.attach(object, node);
            }
            ComponentType::Sizer => apply_sizer_properties(&mut self.scene, object, obj),
            ComponentType::Abstract => {}
        }
        self.registry.bind(node, object);

        let new_host = if declared == ComponentType::Window {
            object
        } else {
            host
        };
        for &child in tree.children(node) {
            self.generate(tree, child, new_host, Some(object))?;
        }

        let mut ctx = BuildContext {
            scene: &mut self.scene,
            tree,
            registry: &self.registry,
        };
        component.on_created(&mut ctx, node, object, new_host);

        if declared == ComponentType::Sizer {
            let into_window = parent_object
                .is_none_or(|p| self.scene.kind_of(p) == Some(ComponentType::Window));
            if into_window {
                self.scene.set_sizer(host, Some(object), true);
                if parent_object.is_some() {
                    self.scene.fit(host);
                }
                self.scene.layout(host);
            }
        }
        Ok(object)
    }

    fn setup_window(&mut self, tree: &ObjectTree, node: NodeId, obj: &ObjectNode, window: WidgetHandle) {
        apply_window_properties(&mut self.scene, window, obj);

        let parent_type = tree
            .parent(node)
            .and_then(|p| tree.get(p))
            .map(|p| p.type_name.as_str());
        if self.dock.is_some() && is_dockable_type(&obj.type_name) && parent_type == Some("form") {
            self.setup_aui(obj, window);
        } else if parent_type == Some("wizard")
            && let Some(wizard) = self.wizard.as_mut()
        {
            wizard.add_page(&mut self.scene, window);
            wizard.connect();
        }
    }

    fn setup_aui(&mut self, obj: &ObjectNode, window: WidgetHandle) {
        let Some(dock) = self.dock.as_mut() else {
            return;
        };
        if dock.add_pane(window, pane_spec(obj)) {
            log::trace!("Docked {} as pane {window}", obj.class_name);
        }
    }

    /// Shows `page` in the wizard and picks the bitmap it displays.
    fn setup_wizard_page(&mut self, tree: &ObjectTree, node: NodeId, page: WidgetHandle) {
        let Some(wizard) = self.wizard.as_mut() else {
            return;
        };
        let Some(index) = wizard.page_index(page) else {
            return;
        };
        wizard.dispatch(PageChange::Changed, page);

        let bitmap_of = |id: Option<NodeId>| {
            id.and_then(|id| tree.get(id))
                .filter(|n| !n.is_null("bitmap"))
                .map(|n| typeconv::string_to_bitmap(n.prop_str("bitmap")))
        };
        if let Some(bitmap) = bitmap_of(Some(node)).or_else(|| bitmap_of(self.form)) {
            wizard.set_bitmap(bitmap);
        }
        wizard.set_selection(&mut self.scene, index);
        wizard.layout(&mut self.scene);
    }

    pub(crate) fn on_object_selected(&mut self, node: NodeId) {
        let model = Rc::clone(&self.model);
        if model.borrow().selected_form() != self.form {
            self.create();
        }

        let model = model.borrow();
        let tree = model.tree();
        let (Some(obj), Some(object)) = (tree.get(node), self.registry.resolve_widget(node)) else {
            self.back.selection.clear();
            return;
        };

        let library = Rc::clone(&self.library);
        let component = library.get(&obj.class_name);
        if !self.stop_selected
            && let Some(component) = component
        {
            let mut ctx = BuildContext {
                scene: &mut self.scene,
                tree,
                registry: &self.registry,
            };
            component.on_selected(&mut ctx, node, object);
        }
        if obj.type_name == "wizardpagesimple" {
            self.setup_wizard_page(tree, node, object);
        }

        let item = match component.map(|c| c.component_type()) {
            Some(ComponentType::Window | ComponentType::Sizer) => Some(object),
            _ => None,
        };

        if !self.stop_selected {
            for ancestor in component_ancestors(tree, &library, node) {
                let (Some(anc), Some(anc_object)) = (tree.get(ancestor), self.registry.widget_of(ancestor)) else {
                    continue;
                };
                if anc.type_name == "wizardpagesimple" {
                    self.setup_wizard_page(tree, ancestor, anc_object);
                }
                if let Some(component) = library.get(&anc.class_name) {
                    let mut ctx = BuildContext {
                        scene: &mut self.scene,
                        tree,
                        registry: &self.registry,
                    };
                    component.on_selected(&mut ctx, ancestor, anc_object);
                }
            }
        }

        let panel = window_ancestor(tree, &library, node)
            .and_then(|a| self.registry.widget_of(a))
            .unwrap_or(self.back.content());
        let sizer = sizer_ancestor(tree, &library, node).and_then(|a| self.registry.widget_of(a));
        self.back.selection = SelectionState {
            item,
            object: Some(node),
            sizer,
            panel: Some(panel),
        };
    }

    /// Rebuilds after a property change and restores the selection.
    pub(crate) fn on_property_modified(&mut self) {
        if self.stop_modified {
            return;
        }
        let selected = self
            .back
            .selection
            .object
            .or_else(|| self.model.borrow().selected_object());
        self.create();
        if let Some(node) = selected {
            self.on_object_selected(node);
        }
    }

    /// The user resized the back window.
    pub(crate) fn on_resize(&mut self, size: Size) {
        let mut model = self.model.borrow_mut();
        if let Some(form) = model.selected_form() {
            model.modify_property(form, "size", &typeconv::size_to_string(size));
        }
    }

    /// A press on `hit` selects the node of the nearest hooked window;
    /// presses on the bare back window select the form.
    pub(crate) fn on_press(&mut self, hit: WidgetHandle) {
        let mut cur = Some(hit);
        while let Some(w) = cur {
            if let Some(hook) = self.hooks.get(w) {
                let node = hook.node;
                self.model.borrow_mut().select_object(node, false, true);
                return;
            }
            if w == self.back.content() || w == self.back.back() {
                break;
            }
            cur = self.scene.parent(w);
        }
        self.on_back_panel_click();
    }

    fn on_back_panel_click(&mut self) {
        if let Some(form) = self.form {
            self.model.borrow_mut().select_object(form, false, true);
        }
    }

    fn on_pane_command(&mut self, command: PaneCommand) {
        let Some(dock) = self.dock.as_mut() else {
            return;
        };
        match command.action {
            PaneAction::Float => dock.float_pane(command.window),
            PaneAction::Dock(direction) => dock.dock_pane(command.window, direction),
            PaneAction::Hide => dock.show_pane(command.window, false),
        }
        dock.update(&mut self.scene);
    }

    fn on_wizard_step(&mut self, forward: bool) {
        if let Some(wizard) = self.wizard.as_mut() {
            wizard.request_step(forward);
        }
        self.on_wizard_events();
    }

    /// A page change request selects the requested page's node.
    fn on_wizard_events(&mut self) {
        let events = match self.wizard.as_mut() {
            Some(wizard) => wizard.take_events(),
            None => return,
        };
        for event in events {
            if event.change.code() != PageChange::Changing.code() {
                continue;
            }
            if let Some(node) = self.registry.resolve_node(event.page) {
                self.model.borrow_mut().select_object(node, false, true);
            }
        }
    }

    /// Runs the dock scan once the configured interval has elapsed.
    pub(crate) fn on_scan_tick(&mut self, now: Instant) {
        if now.duration_since(self.last_scan) < self.config.scan_interval() {
            return;
        }
        self.last_scan = now;
        self.scan_dock_state();
    }

    /// Copies live pane state into the model and re-selects every changed
    /// node. Returns the number of changed nodes.
    pub(crate) fn scan_dock_state(&mut self) -> usize {
        let Some(dock) = self.dock.as_ref() else {
            return 0;
        };
        let changed = {
            let mut model = self.model.borrow_mut();
            scanner::scan_panes(
                &self.scene,
                &self.registry,
                dock,
                model.tree_mut(),
                self.back.content(),
            )
        };
        for &node in &changed {
            self.model.borrow_mut().select_object(node, true, true);
        }
        if !changed.is_empty() {
            log::debug!("Dock scan updated {} objects", changed.len());
        }
        changed.len()
    }

    /// Scrollable area the preview needs.
    pub(crate) fn virtual_size(&self) -> Vec2 {
        if !self.back.is_shown(&self.scene) {
            return Vec2::ZERO;
        }
        self.config.back_offset + self.back.size(&self.scene) + Vec2::splat(self.config.virtual_padding)
    }

    fn apply_response(&mut self, response: ShellResponse) {
        if let Some(command) = response.pane {
            self.on_pane_command(command);
        }
        if let Some(forward) = response.wizard_step {
            self.on_wizard_step(forward);
        }
        if let Some(size) = response.resized {
            self.on_resize(size);
        }
        if let Some(hit) = response.pressed {
            self.on_press(hit);
        }
    }

    pub(crate) fn show(&mut self, ui: &mut egui::Ui) {
        let virtual_size = self.virtual_size();
        let response = egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (rect, _) =
                    ui.allocate_exact_size(virtual_size.max(ui.available_size()), Sense::hover());
                ui.painter().rect_filled(rect, 0.0, self.config.canvas_bg);
                let origin = rect.min.to_vec2();

                let view = ShellView {
                    scene: &self.scene,
                    dock: self.dock.as_ref(),
                    wizard: self.wizard.as_ref(),
                };
                let response = self.back.show(ui, origin, &view);

                let clip = self
                    .back
                    .selection
                    .panel
                    .and_then(|p| self.scene.absolute_rect(p))
                    .map_or(rect, |r| r.translate(origin));
                let painter = ui.painter().with_clip_rect(clip);
                let mut canvas = PainterCanvas::new(&painter, origin);
                let model = self.model.borrow();
                highlight_selection(
                    &mut canvas,
                    &self.scene,
                    model.tree(),
                    &self.back.selection,
                    self.dock.is_some(),
                    HighlightColors {
                        sizer: self.config.sizer_highlight,
                        item: self.config.item_highlight,
                    },
                );
                response
            })
            .inner;
        self.apply_response(response);
    }
}
