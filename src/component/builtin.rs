//! Components for the classes the designer ships with.

use super::{BuildContext, Component, ComponentLibrary, ComponentType};
use crate::error::{DesignerError, Result};
use crate::model::typeconv::flags::{WX_HORIZONTAL, WX_VERTICAL};
use crate::model::{NodeId, ObjectNode};
use crate::widget::{
    ItemTarget, NotebookPage, Orientation, Scene, SizerItem, SizerLayout, WidgetFamily,
    WidgetHandle,
};
use egui::vec2;

pub(super) fn register_all(library: &mut ComponentLibrary) {
    use WidgetFamily::*;

    // forms
    for (class, family) in [
        ("Frame", ContentPanel),
        ("Dialog", ContentPanel),
        ("Panel", ContentPanel),
        ("Wizard", Wizard),
        ("MenuBar", MenuBar),
    ] {
        library.register(class, Box::new(WindowComponent::new(family, "title")));
    }
    library.register("ToolBar", Box::new(ToolBarComponent));

    // controls
    for (class, family, label) in [
        ("wxPanel", Panel, ""),
        ("wxButton", Button, "label"),
        ("wxStaticText", StaticText, "label"),
        ("wxTextCtrl", TextCtrl, "value"),
        ("wxCheckBox", CheckBox, "label"),
        ("wxStaticLine", StaticLine, ""),
        ("wxNotebook", Notebook, ""),
        ("WizardPageSimple", WizardPage, ""),
    ] {
        library.register(class, Box::new(WindowComponent::new(family, label)));
    }
    library.register("wxToolBar", Box::new(ToolBarComponent));
    library.register("wxStatusBar", Box::new(StatusBarComponent));
    library.register("notebookpage", Box::new(NotebookPageComponent));

    // sizers
    library.register("wxBoxSizer", Box::new(BoxSizerComponent { static_box: false }));
    library.register("wxStaticBoxSizer", Box::new(BoxSizerComponent { static_box: true }));
    library.register("wxGridSizer", Box::new(GridSizerComponent));
    library.register("sizeritem", Box::new(SizerItemComponent));

    // no visual of their own
    for class in [
        "wxMenuBar",
        "wxMenu",
        "submenu",
        "wxMenuItem",
        "separator",
        "tool",
        "spacer",
        "wxTimer",
    ] {
        library.register(class, Box::new(AbstractComponent));
    }
}

fn require_host(node: &ObjectNode, host: WidgetHandle, scene: &Scene) -> Result<()> {
    if scene.window(host).is_some() {
        return Ok(());
    }
    Err(DesignerError::Construction {
        class: node.class_name.clone(),
        reason: format!("host window {host} does not exist"),
    })
}

fn orientation(node: &ObjectNode) -> Result<Orientation> {
    match node.prop_int("orient") {
        WX_VERTICAL => Ok(Orientation::Vertical),
        WX_HORIZONTAL => Ok(Orientation::Horizontal),
        _ => Err(DesignerError::Construction {
            class: node.class_name.clone(),
            reason: format!("invalid orientation '{}'", node.prop_str("orient")),
        }),
    }
}

/// Shows page `page` of `notebook` and hides the rest.
fn select_page(scene: &mut Scene, notebook: WidgetHandle, page: WidgetHandle) {
    let Some(nb) = scene.window_mut(notebook) else {
        return;
    };
    let Some(index) = nb.pages.iter().position(|p| p.window == page) else {
        return;
    };
    nb.selection = index;
    let pages: Vec<WidgetHandle> = nb.pages.iter().map(|p| p.window).collect();
    for (i, p) in pages.into_iter().enumerate() {
        if let Some(w) = scene.window_mut(p) {
            w.shown = i == index;
        }
    }
}

struct WindowComponent {
    family: WidgetFamily,
    label: &'static str,
}

impl WindowComponent {
    fn new(family: WidgetFamily, label: &'static str) -> Self {
        Self { family, label }
    }
}

impl Component for WindowComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Window
    }

    fn create(
        &self,
        node: &ObjectNode,
        host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        require_host(node, host, scene)?;
        let label = if self.label.is_empty() {
            ""
        } else {
            node.prop_str(self.label)
        };
        let h = scene.create_window(Some(host), self.family, label);
        if let Some(w) = scene.window_mut(h) {
            w.style = node.prop_int("style");
            w.checked = node.prop_bool("checked");
        }
        Ok(h)
    }

    fn cleanup(&self, scene: &mut Scene, window: WidgetHandle) {
        if self.family == WidgetFamily::Notebook
            && let Some(w) = scene.window_mut(window)
        {
            w.pages.clear();
        }
    }
}

struct ToolBarComponent;

impl Component for ToolBarComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Window
    }

    fn create(
        &self,
        node: &ObjectNode,
        host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        require_host(node, host, scene)?;
        let h = scene.create_window(Some(host), WidgetFamily::ToolBar, node.prop_str("name"));
        if let Some(w) = scene.window_mut(h) {
            w.style = node.prop_int("style");
        }
        Ok(h)
    }

    /// Tools are plain child nodes; collect their labels once they exist.
    fn on_created(
        &self,
        ctx: &mut BuildContext<'_>,
        node: NodeId,
        object: WidgetHandle,
        _host: WidgetHandle,
    ) {
        let tools: Vec<String> = ctx
            .tree
            .children(node)
            .iter()
            .filter_map(|&c| ctx.tree.get(c))
            .filter(|n| n.type_name == "tool")
            .map(|n| n.prop_str("label").to_string())
            .collect();
        if let Some(w) = ctx.scene.window_mut(object) {
            w.items = tools;
        }
    }

    fn cleanup(&self, scene: &mut Scene, window: WidgetHandle) {
        if let Some(w) = scene.window_mut(window) {
            w.items.clear();
        }
    }
}

/// Upper bound on status bar fields.
const MAX_STATUS_FIELDS: i64 = 64;

struct StatusBarComponent;

impl Component for StatusBarComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Window
    }

    fn create(
        &self,
        node: &ObjectNode,
        host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        require_host(node, host, scene)?;
        let fields = node.prop_int("fields").max(1);
        if fields > MAX_STATUS_FIELDS {
            return Err(DesignerError::Construction {
                class: node.class_name.clone(),
                reason: format!("{fields} fields exceeds the limit of {MAX_STATUS_FIELDS}"),
            });
        }
        let fields = fields as usize;
        let h = scene.create_window(Some(host), WidgetFamily::StatusBar, "");
        if let Some(w) = scene.window_mut(h) {
            w.items = vec![String::new(); fields];
        }
        Ok(h)
    }
}

struct NotebookPageComponent;

impl Component for NotebookPageComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Abstract
    }

    fn create(
        &self,
        node: &ObjectNode,
        _host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        Ok(scene.create_abstract(node.prop_str("label")))
    }

    fn on_created(
        &self,
        ctx: &mut BuildContext<'_>,
        node: NodeId,
        _object: WidgetHandle,
        _host: WidgetHandle,
    ) {
        let Some(page) = ctx.child_object(node, 0) else {
            log::warn!("Notebook page {node} has no generated window");
            return;
        };
        let Some(notebook) = ctx
            .parent_object(node)
            .filter(|&n| ctx.scene.window(n).is_some())
        else {
            log::warn!("Notebook page {node} is not inside a notebook");
            return;
        };
        let Some(info) = ctx.tree.get(node) else {
            return;
        };
        let label = info.prop_str("label").to_string();
        let select = info.prop_bool("select");

        if ctx.scene.parent(page) != Some(notebook) {
            ctx.scene.reparent(page, notebook);
        }
        let first = match ctx.scene.window_mut(notebook) {
            Some(nb) => {
                nb.pages.push(NotebookPage {
                    label,
                    window: page,
                });
                nb.pages.len() == 1
            }
            None => return,
        };
        if select || first {
            select_page(ctx.scene, notebook, page);
        } else if let Some(w) = ctx.scene.window_mut(page) {
            w.shown = false;
        }
    }

    fn on_selected(&self, ctx: &mut BuildContext<'_>, node: NodeId, _object: WidgetHandle) {
        if let (Some(page), Some(notebook)) = (ctx.child_object(node, 0), ctx.parent_object(node))
        {
            select_page(ctx.scene, notebook, page);
        }
    }
}

struct BoxSizerComponent {
    static_box: bool,
}

impl Component for BoxSizerComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Sizer
    }

    fn create(
        &self,
        node: &ObjectNode,
        host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        let orient = orientation(node)?;
        let layout = if self.static_box {
            require_host(node, host, scene)?;
            SizerLayout::StaticBox {
                orient,
                label: node.prop_str("label").to_string(),
            }
        } else {
            SizerLayout::Box(orient)
        };
        Ok(scene.create_sizer(layout))
    }
}

struct GridSizerComponent;

impl Component for GridSizerComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Sizer
    }

    fn create(
        &self,
        node: &ObjectNode,
        _host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        let rows = node.prop_int("rows").max(0) as usize;
        let cols = node.prop_int("cols").max(0) as usize;
        if rows == 0 && cols == 0 {
            return Err(DesignerError::Construction {
                class: node.class_name.clone(),
                reason: "rows and cols cannot both be zero".into(),
            });
        }
        Ok(scene.create_sizer(SizerLayout::Grid {
            rows,
            cols,
            vgap: node.prop_int("vgap") as f32,
            hgap: node.prop_int("hgap") as f32,
        }))
    }
}

/// Carries proportion, flag and border for its single child; inserts the
/// child into the parent sizer once the child exists.
struct SizerItemComponent;

impl Component for SizerItemComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Abstract
    }

    fn create(
        &self,
        _node: &ObjectNode,
        _host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        Ok(scene.create_abstract("sizeritem"))
    }

    fn on_created(
        &self,
        ctx: &mut BuildContext<'_>,
        node: NodeId,
        _object: WidgetHandle,
        _host: WidgetHandle,
    ) {
        let Some(sizer) = ctx
            .parent_object(node)
            .filter(|&s| ctx.scene.sizer(s).is_some())
        else {
            log::warn!("Sizer item {node} is not inside a sizer");
            return;
        };
        let (Some(item), Some(child_id)) = (ctx.tree.get(node), ctx.tree.child(node, 0)) else {
            return;
        };
        let Some(child) = ctx.registry.widget_of(child_id) else {
            log::warn!("Sizer item {node} has no generated child");
            return;
        };
        let target = match ctx.scene.kind_of(child) {
            Some(ComponentType::Window) => ItemTarget::Window(child),
            Some(ComponentType::Sizer) => ItemTarget::Sizer(child),
            Some(ComponentType::Abstract) => {
                let spacer = ctx.tree.get(child_id);
                let w = spacer.map_or(0, |s| s.prop_int("width"));
                let h = spacer.map_or(0, |s| s.prop_int("height"));
                ItemTarget::Spacer(vec2(w.max(0) as f32, h.max(0) as f32))
            }
            None => return,
        };
        ctx.scene.add_to_sizer(
            sizer,
            SizerItem::new(
                target,
                item.prop_int("proportion").max(0) as u32,
                item.prop_int("flag"),
                item.prop_int("border") as i32,
            ),
        );
    }
}

struct AbstractComponent;

impl Component for AbstractComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Abstract
    }

    fn create(
        &self,
        node: &ObjectNode,
        _host: WidgetHandle,
        scene: &mut Scene,
    ) -> Result<WidgetHandle> {
        Ok(scene.create_abstract(node.class_name.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::designer::registry::ObjectRegistry;
    use crate::model::ObjectTree;
    use crate::model::typeconv::flags::WX_ALL;

    fn library() -> ComponentLibrary {
        ComponentLibrary::with_builtins()
    }

    #[test]
    fn test_window_component_requires_host() {
        let library = library();
        let mut scene = Scene::new();
        let button = ObjectNode::new("wxButton", "widget").with("label", "OK");
        let err = library
            .get("wxButton")
            .unwrap()
            .create(&button, WidgetHandle::placeholder(), &mut scene)
            .unwrap_err();
        assert!(matches!(err, DesignerError::Construction { .. }));

        let host = scene.create_window(None, WidgetFamily::ContentPanel, "");
        let h = library
            .get("wxButton")
            .unwrap()
            .create(&button, host, &mut scene)
            .unwrap();
        assert_eq!(scene.window(h).unwrap().label, "OK");
        assert_eq!(scene.parent(h), Some(host));
    }

    #[test]
    fn test_sizer_components_validate_properties() {
        let library = library();
        let mut scene = Scene::new();
        let host = scene.create_window(None, WidgetFamily::ContentPanel, "");
        let bad = ObjectNode::new("wxBoxSizer", "sizer").with("orient", "wxALL");
        assert!(library.get("wxBoxSizer").unwrap().create(&bad, host, &mut scene).is_err());
        let grid = ObjectNode::new("wxGridSizer", "sizer")
            .with("rows", "0")
            .with("cols", "0");
        assert!(library.get("wxGridSizer").unwrap().create(&grid, host, &mut scene).is_err());
        let good = ObjectNode::new("wxBoxSizer", "sizer").with("orient", "wxHORIZONTAL");
        let s = library.get("wxBoxSizer").unwrap().create(&good, host, &mut scene).unwrap();
        assert_eq!(
            scene.sizer(s).unwrap().layout,
            SizerLayout::Box(Orientation::Horizontal)
        );
    }

    #[test]
    fn test_status_bar_rejects_oversized_field_count() {
        let library = library();
        let mut scene = Scene::new();
        let host = scene.create_window(None, WidgetFamily::ContentPanel, "");
        let status = library.get("wxStatusBar").unwrap();

        let huge = ObjectNode::new("wxStatusBar", "statusbar").with("fields", "9223372036854775807");
        let err = status.create(&huge, host, &mut scene).unwrap_err();
        assert!(matches!(err, DesignerError::Construction { .. }));

        let two = ObjectNode::new("wxStatusBar", "statusbar").with("fields", "2");
        let h = status.create(&two, host, &mut scene).unwrap();
        assert_eq!(scene.window(h).unwrap().items.len(), 2);
    }

    #[test]
    fn test_sizer_item_inserts_child_into_parent_sizer() {
        let library = library();
        let mut tree = ObjectTree::new();
        let sizer_id = tree.insert(None, ObjectNode::new("wxBoxSizer", "sizer"));
        let item_id = tree.insert(
            Some(sizer_id),
            ObjectNode::new("sizeritem", "sizeritem")
                .with("proportion", "1")
                .with("flag", "wxALL")
                .with("border", "5"),
        );
        let spacer_id = tree.insert(
            Some(item_id),
            ObjectNode::new("spacer", "spacer")
                .with("width", "12")
                .with("height", "4"),
        );

        let mut scene = Scene::new();
        let mut registry = ObjectRegistry::new();
        let sizer = scene.create_sizer(SizerLayout::Box(Orientation::Vertical));
        let item = scene.create_abstract("sizeritem");
        let spacer = scene.create_abstract("spacer");
        registry.bind(sizer_id, sizer);
        registry.bind(item_id, item);
        registry.bind(spacer_id, spacer);

        let mut ctx = BuildContext {
            scene: &mut scene,
            tree: &tree,
            registry: &registry,
        };
        let host = WidgetHandle::placeholder();
        library
            .get("sizeritem")
            .unwrap()
            .on_created(&mut ctx, item_id, item, host);

        assert_eq!(
            scene.sizer(sizer).unwrap().items,
            vec![SizerItem::new(ItemTarget::Spacer(vec2(12.0, 4.0)), 1, WX_ALL, 5)]
        );
    }

    #[test]
    fn test_notebook_page_adds_and_selects() {
        let library = library();
        let mut tree = ObjectTree::new();
        let nb_id = tree.insert(None, ObjectNode::new("wxNotebook", "notebook"));
        let mut page_ids = Vec::new();
        for (label, select) in [("One", "0"), ("Two", "1")] {
            let page = tree.insert(
                Some(nb_id),
                ObjectNode::new("notebookpage", "notebookpage")
                    .with("label", label)
                    .with("select", select),
            );
            let panel = tree.insert(Some(page), ObjectNode::new("wxPanel", "container"));
            page_ids.push((page, panel));
        }

        let mut scene = Scene::new();
        let mut registry = ObjectRegistry::new();
        let notebook = scene.create_window(None, WidgetFamily::Notebook, "");
        registry.bind(nb_id, notebook);
        let mut panels = Vec::new();
        for &(page, panel) in &page_ids {
            registry.bind(page, scene.create_abstract("page"));
            let w = scene.create_window(Some(notebook), WidgetFamily::Panel, "");
            registry.bind(panel, w);
            panels.push(w);
        }

        let component = library.get("notebookpage").unwrap();
        let mut ctx = BuildContext {
            scene: &mut scene,
            tree: &tree,
            registry: &registry,
        };
        for &(page, _) in &page_ids {
            let object = ctx.registry.widget_of(page).unwrap();
            component.on_created(&mut ctx, page, object, notebook);
        }
        assert_eq!(ctx.scene.window(notebook).unwrap().pages.len(), 2);
        assert_eq!(ctx.scene.window(notebook).unwrap().selection, 1);
        assert!(!ctx.scene.window(panels[0]).unwrap().shown);

        let first = page_ids[0].0;
        let object = ctx.registry.widget_of(first).unwrap();
        component.on_selected(&mut ctx, first, object);
        assert_eq!(ctx.scene.window(notebook).unwrap().selection, 0);
        assert!(ctx.scene.window(panels[0]).unwrap().shown);
        assert!(!ctx.scene.window(panels[1]).unwrap().shown);
    }

    #[test]
    fn test_toolbar_collects_tool_labels() {
        let library = library();
        let mut tree = ObjectTree::new();
        let tb_id = tree.insert(None, ObjectNode::new("wxToolBar", "toolbar"));
        tree.insert(Some(tb_id), ObjectNode::new("tool", "tool").with("label", "New"));
        tree.insert(Some(tb_id), ObjectNode::new("tool", "tool").with("label", "Open"));

        let mut scene = Scene::new();
        let registry = ObjectRegistry::new();
        let host = scene.create_window(None, WidgetFamily::ContentPanel, "");
        let component = library.get("wxToolBar").unwrap();
        let tb = component
            .create(tree.get(tb_id).unwrap(), host, &mut scene)
            .unwrap();
        let mut ctx = BuildContext {
            scene: &mut scene,
            tree: &tree,
            registry: &registry,
        };
        component.on_created(&mut ctx, tb_id, tb, host);
        assert_eq!(scene.window(tb).unwrap().items, vec!["New", "Open"]);
        component.cleanup(&mut scene, tb);
        assert!(scene.window(tb).unwrap().items.is_empty());
    }
}
