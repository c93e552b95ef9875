//! Container shell: the back window that frames the generated form with a
//! title bar and the frame's menu, tool and status bars.

use super::selection::SelectionState;
use crate::config::EditorConfig;
use crate::dock::{DockDirection, PaneManager};
use crate::menu::{MenuBarModel, display_label};
use crate::model::typeconv::Size;
use crate::model::typeconv::flags::{
    WX_ALL, WX_BOTTOM, WX_CAPTION, WX_CLOSE_BOX, WX_EXPAND, WX_MAXIMIZE_BOX, WX_MINIMIZE_BOX,
    WX_SYSTEM_MENU, WX_TB_VERTICAL, WX_TOP,
};
use crate::model::{NodeId, ObjectTree};
use crate::widget::layout::{TAB_STRIP_HEIGHT, clamp_to};
use crate::widget::{
    ItemTarget, Orientation, Scene, SizerItem, SizerLayout, WidgetFamily, WidgetHandle, Window,
};
use crate::wizard::{BITMAP_WIDTH, Wizard};
use egui::{
    Align2, Color32, CornerRadius, CursorIcon, FontId, Rect, RichText, Sense, Stroke,
    StrokeKind, UiBuilder, UiKind, Vec2, pos2, vec2,
};

/// Background of dialogs and plain windows.
pub(crate) const BUTTON_FACE: Color32 = Color32::from_rgb(240, 240, 240);
/// Background of frames.
pub(crate) const APP_WORKSPACE: Color32 = Color32::from_rgb(171, 171, 171);

const GRIP_SIZE: f32 = 12.0;
const TITLE_FILL: Color32 = Color32::from_rgb(0, 84, 153);
const CAPTION_FILL: Color32 = Color32::from_rgb(213, 221, 232);
const BORDER: Color32 = Color32::from_gray(120);
const WIZARD_BUTTON: Vec2 = vec2(75.0, 24.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PaneAction {
    Float,
    Dock(DockDirection),
    Hide,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PaneCommand {
    pub(crate) window: WidgetHandle,
    pub(crate) action: PaneAction,
}

/// What the user did to the preview during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ShellResponse {
    /// Deepest shown window under a primary press.
    pub(crate) pressed: Option<WidgetHandle>,
    /// Back size once the resize grip is released.
    pub(crate) resized: Option<Size>,
    pub(crate) pane: Option<PaneCommand>,
    /// `Some(true)` for Next, `Some(false)` for Back.
    pub(crate) wizard_step: Option<bool>,
}

/// Everything the shell reads while painting.
pub(crate) struct ShellView<'a> {
    pub(crate) scene: &'a Scene,
    pub(crate) dock: Option<&'a PaneManager>,
    pub(crate) wizard: Option<&'a Wizard>,
}

pub(crate) struct DesignerWindow {
    back: WidgetHandle,
    content: WidgetHandle,
    title: String,
    title_style: i64,
    title_bar: bool,
    title_bar_height: f32,
    menubar: Option<(WidgetHandle, MenuBarModel)>,
    pub(crate) selection: SelectionState,
    drag: Option<Vec2>,
}

impl DesignerWindow {
    pub(crate) fn new(scene: &mut Scene, config: &EditorConfig) -> Self {
        let back = scene.create_window(None, WidgetFamily::Back, "");
        if let Some(w) = scene.window_mut(back) {
            let size = w.size();
            w.rect = Rect::from_min_size(config.back_offset.to_pos2(), size);
            w.bg = Some(BUTTON_FACE);
        }
        let content = scene.create_window(Some(back), WidgetFamily::ContentPanel, "");
        Self {
            back,
            content,
            title: String::new(),
            title_style: 0,
            title_bar: false,
            title_bar_height: config.title_bar_height,
            menubar: None,
            selection: SelectionState::default(),
            drag: None,
        }
    }

    pub(crate) fn back(&self) -> WidgetHandle {
        self.back
    }

    /// Panel the form's children are generated into.
    pub(crate) fn content(&self) -> WidgetHandle {
        self.content
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    #[cfg(test)]
    pub(crate) fn has_title_bar(&self) -> bool {
        self.title_bar
    }

    pub(crate) fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub(crate) fn set_title_style(&mut self, style: i64) {
        self.title_style = style;
    }

    pub(crate) fn show_title_bar(&mut self, show: bool) {
        self.title_bar = show;
    }

    fn title_height(&self) -> f32 {
        if self.title_bar {
            self.title_bar_height
        } else {
            0.0
        }
    }

    pub(crate) fn set_limits(&self, scene: &mut Scene, min: Size, max: Size) {
        if let Some(w) = scene.window_mut(self.back) {
            w.min_size = min;
            w.max_size = max;
        }
    }

    pub(crate) fn set_background(&self, scene: &mut Scene, colour: Color32) {
        if let Some(w) = scene.window_mut(self.content) {
            w.bg = Some(colour);
        }
    }

    pub(crate) fn set_enabled(&self, scene: &mut Scene, enabled: bool) {
        if let Some(w) = scene.window_mut(self.back) {
            w.enabled = enabled;
        }
    }

    pub(crate) fn set_shown(&self, scene: &mut Scene, shown: bool) {
        if let Some(w) = scene.window_mut(self.back) {
            w.shown = shown;
        }
    }

    pub(crate) fn is_shown(&self, scene: &Scene) -> bool {
        scene.window(self.back).is_some_and(|w| w.shown)
    }

    pub(crate) fn size(&self, scene: &Scene) -> Vec2 {
        scene.window(self.back).map_or(Vec2::ZERO, Window::size)
    }

    /// Unspecified dimensions keep their current value.
    pub(crate) fn set_size(&self, scene: &mut Scene, size: Size) {
        if let Some(w) = scene.window_mut(self.back) {
            w.set_size(size);
        }
        self.layout(scene);
    }

    /// Places the content panel below the title bar and lays it out.
    pub(crate) fn layout(&self, scene: &mut Scene) {
        let size = self.size(scene);
        let top = self.title_height();
        if let Some(c) = scene.window_mut(self.content) {
            c.rect = Rect::from_min_max(pos2(0.0, top), pos2(size.x, size.y.max(top)));
        }
        scene.layout(self.content);
    }

    /// Shrinks or grows the back window around the content's best size.
    pub(crate) fn fit(&self, scene: &mut Scene) {
        let best = scene.best_size(self.content) + vec2(0.0, self.title_height());
        if let Some(back) = scene.window_mut(self.back) {
            let size = clamp_to(best, back.min_size, back.max_size);
            back.set_size_vec(size);
        }
        self.layout(scene);
    }

    /// Forgets frame decorations of the previous form. Their windows are
    /// destroyed with the content panel's children.
    pub(crate) fn clear_frame_widgets(&mut self) {
        self.menubar = None;
        self.drag = None;
    }

    /// Arranges menu bar, tool bar, body and status bar vertically in the
    /// content panel. `body` is the dock host or wizard when there is one,
    /// otherwise the content panel's own sizer becomes the body.
    pub(crate) fn set_frame_widgets(
        &mut self,
        scene: &mut Scene,
        tree: &ObjectTree,
        menubar: Option<NodeId>,
        toolbar: Option<WidgetHandle>,
        statusbar: Option<WidgetHandle>,
        body: Option<WidgetHandle>,
    ) {
        let content = self.content;
        let frame = scene.create_sizer(SizerLayout::Box(Orientation::Vertical));

        if let Some(node) = menubar {
            let model = MenuBarModel::from_node(tree, node);
            let bar = scene.create_window(Some(content), WidgetFamily::MenuBar, "");
            if let Some(w) = scene.window_mut(bar) {
                w.items = model.menus.iter().map(|(label, _)| display_label(label)).collect();
            }
            let line = scene.create_window(Some(content), WidgetFamily::StaticLine, "");
            scene.add_to_sizer(
                frame,
                SizerItem::new(ItemTarget::Window(bar), 0, WX_EXPAND | WX_TOP | WX_BOTTOM, 0),
            );
            scene.add_to_sizer(frame, SizerItem::new(ItemTarget::Window(line), 0, WX_EXPAND | WX_ALL, 0));
            self.menubar = Some((bar, model));
        }

        let main = scene.window(content).and_then(|w| w.sizer);
        scene.set_sizer(content, None, false);

        if let Some(tb) = toolbar {
            let vertical = scene.window(tb).is_some_and(|w| w.style & WX_TB_VERTICAL != 0);
            if vertical {
                let row = scene.create_sizer(SizerLayout::Box(Orientation::Horizontal));
                let column = scene.create_sizer(SizerLayout::Box(Orientation::Vertical));
                scene.add_to_sizer(row, SizerItem::new(ItemTarget::Window(tb), 0, WX_EXPAND, 0));
                add_body(scene, column, main, body);
                scene.add_to_sizer(row, SizerItem::new(ItemTarget::Sizer(column), 1, WX_EXPAND, 0));
                scene.add_to_sizer(frame, SizerItem::new(ItemTarget::Sizer(row), 1, WX_EXPAND, 0));
            } else {
                scene.add_to_sizer(frame, SizerItem::new(ItemTarget::Window(tb), 0, WX_EXPAND, 0));
                add_body(scene, frame, main, body);
            }
        } else {
            add_body(scene, frame, main, body);
        }

        if let Some(sb) = statusbar {
            if body.is_some() {
                scene.reparent(sb, content);
            }
            scene.add_to_sizer(frame, SizerItem::new(ItemTarget::Window(sb), 0, WX_EXPAND, 0));
        }

        scene.set_sizer(content, Some(frame), false);
        scene.layout(content);
    }

    /// Paints the back window at `origin` plus its scene position and
    /// reports the interactions of this frame.
    pub(crate) fn show(&mut self, ui: &mut egui::Ui, origin: Vec2, view: &ShellView<'_>) -> ShellResponse {
        let mut response = ShellResponse::default();
        let scene = view.scene;
        if !self.is_shown(scene) {
            return response;
        }
        let Some(back_rect) = scene.absolute_rect(self.back).map(|r| r.translate(origin)) else {
            return response;
        };
        let mut blocked = Vec::new();

        let painter = ui.painter();
        painter.rect_filled(back_rect, 0.0, BUTTON_FACE);
        painter.rect_stroke(back_rect, 0.0, Stroke::new(1.0, BORDER), StrokeKind::Outside);
        if self.title_bar {
            let bar = Rect::from_min_size(back_rect.min, vec2(back_rect.width(), self.title_bar_height));
            self.paint_title_bar(ui, bar);
        }

        let enabled = scene.window(self.back).is_some_and(|w| w.enabled);
        ui.scope_builder(UiBuilder::new().max_rect(back_rect), |ui| {
            if !enabled {
                ui.disable();
            }
            self.paint_tree(ui, view, self.content, origin, &mut blocked, &mut response);
        });

        self.resize_grip(ui, back_rect, &mut blocked, &mut response);

        let press = ui.input(|i| {
            i.pointer
                .primary_pressed()
                .then(|| i.pointer.interact_pos())
                .flatten()
        });
        if let Some(pos) = press
            && back_rect.contains(pos)
            && !blocked.iter().any(|r: &Rect| r.contains(pos))
            && ui.ctx().layer_id_at(pos) == Some(ui.layer_id())
        {
            response.pressed = scene.hit_test(self.back, pos - origin);
        }
        response
    }

    fn paint_title_bar(&self, ui: &egui::Ui, bar: Rect) {
        let painter = ui.painter();
        painter.rect_filled(bar, 0.0, TITLE_FILL);
        let glyph = bar.height() - 8.0;
        let mut x = bar.max.x - 4.0;
        let mut button = |paint: &dyn Fn(&egui::Painter, Rect)| {
            let rect = Rect::from_min_size(pos2(x - glyph, bar.min.y + 4.0), vec2(glyph, glyph));
            paint(painter, rect.shrink(3.0));
            x -= glyph + 4.0;
        };
        let stroke = Stroke::new(1.5, Color32::WHITE);
        if self.title_style & WX_CLOSE_BOX != 0 {
            button(&|p: &egui::Painter, r: Rect| {
                p.line_segment([r.left_top(), r.right_bottom()], stroke);
                p.line_segment([r.right_top(), r.left_bottom()], stroke);
            });
        }
        if self.title_style & WX_MAXIMIZE_BOX != 0 {
            button(&|p: &egui::Painter, r: Rect| {
                p.rect_stroke(r, 0.0, stroke, StrokeKind::Inside);
            });
        }
        if self.title_style & WX_MINIMIZE_BOX != 0 {
            button(&|p: &egui::Painter, r: Rect| {
                p.line_segment([r.left_bottom(), r.right_bottom()], stroke);
            });
        }
        let mut left = bar.min.x + 6.0;
        if self.title_style & WX_SYSTEM_MENU != 0 {
            let icon = Rect::from_min_size(pos2(left, bar.min.y + 5.0), vec2(glyph - 2.0, glyph - 2.0));
            painter.rect_filled(icon, 2.0, Color32::from_rgb(230, 230, 230));
            left = icon.max.x + 6.0;
        }
        painter.text(
            pos2(left, bar.center().y),
            Align2::LEFT_CENTER,
            &self.title,
            FontId::proportional(13.0),
            Color32::WHITE,
        );
    }

    fn paint_tree(
        &self,
        ui: &mut egui::Ui,
        view: &ShellView<'_>,
        h: WidgetHandle,
        origin: Vec2,
        blocked: &mut Vec<Rect>,
        out: &mut ShellResponse,
    ) {
        let scene = view.scene;
        let Some(w) = scene.window(h).filter(|w| w.shown) else {
            return;
        };
        let Some(rect) = scene.absolute_rect(h).map(|r| r.translate(origin)) else {
            return;
        };
        self.paint_window(ui, view, h, w, rect, blocked, out);
        for &child in &w.children {
            self.paint_tree(ui, view, child, origin, blocked, out);
        }
        if let Some(dock) = view.dock.filter(|d| d.host() == h) {
            paint_pane_captions(ui, dock, rect, blocked, out);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_window(
        &self,
        ui: &mut egui::Ui,
        view: &ShellView<'_>,
        h: WidgetHandle,
        w: &Window,
        rect: Rect,
        blocked: &mut Vec<Rect>,
        out: &mut ShellResponse,
    ) {
        let painter = ui.painter();
        match w.family {
            WidgetFamily::Back => {}
            WidgetFamily::ContentPanel | WidgetFamily::Panel | WidgetFamily::WizardPage => {
                if let Some(bg) = w.bg {
                    painter.rect_filled(rect, 0.0, bg);
                }
            }
            WidgetFamily::DockHost => {
                painter.rect_filled(rect, 0.0, w.bg.unwrap_or(APP_WORKSPACE));
            }
            WidgetFamily::Button => {
                widget_scope(ui, w, rect, |ui| {
                    ui.add_sized(rect.size(), egui::Button::new(rich(w, &w.label)))
                });
            }
            WidgetFamily::StaticText => {
                widget_scope(ui, w, rect, |ui| ui.label(rich(w, &w.label)));
            }
            WidgetFamily::TextCtrl => {
                let mut text = w.label.clone();
                widget_scope(ui, w, rect, |ui| {
                    ui.add_sized(
                        rect.size(),
                        egui::TextEdit::singleline(&mut text).id_salt(h),
                    )
                });
            }
            WidgetFamily::CheckBox => {
                let mut checked = w.checked;
                widget_scope(ui, w, rect, |ui| ui.checkbox(&mut checked, rich(w, &w.label)));
            }
            WidgetFamily::StaticLine => {
                painter.hline(rect.x_range(), rect.center().y, Stroke::new(1.0, BORDER));
            }
            WidgetFamily::Notebook => paint_notebook(painter, w, rect),
            WidgetFamily::ToolBar => paint_toolbar(painter, w, rect),
            WidgetFamily::StatusBar => paint_status_bar(painter, w, rect),
            WidgetFamily::MenuBar => {
                painter.rect_filled(rect, 0.0, BUTTON_FACE);
                if let Some((_, model)) = self.menubar.as_ref().filter(|(bar, _)| *bar == h) {
                    ui.scope_builder(UiBuilder::new().max_rect(rect), |ui| {
                        ui.horizontal(|ui| {
                            for (label, menu) in &model.menus {
                                ui.menu_button(display_label(label), |ui| menu.ui(ui));
                            }
                        });
                    });
                    blocked.push(rect);
                }
            }
            WidgetFamily::Wizard => {
                painter.rect_filled(rect, 0.0, w.bg.unwrap_or(BUTTON_FACE));
                if let Some(wizard) = view.wizard.filter(|wz| wz.window() == h) {
                    paint_wizard(ui, view.scene, wizard, rect, blocked, out);
                }
            }
        }
    }

    /// The resize grip in the back window's corner. Dragging previews the
    /// new outline; releasing reports the size.
    fn resize_grip(
        &mut self,
        ui: &mut egui::Ui,
        back_rect: Rect,
        blocked: &mut Vec<Rect>,
        out: &mut ShellResponse,
    ) {
        let handle = Rect::from_min_size(back_rect.max - vec2(GRIP_SIZE, GRIP_SIZE), vec2(GRIP_SIZE, GRIP_SIZE));
        blocked.push(handle);
        let grip = ui.interact(handle, ui.make_persistent_id("designer_resize_grip"), Sense::drag());
        if grip.hovered() || grip.dragged() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeNwSe);
        }
        if grip.dragged() {
            let size = self.drag.unwrap_or(back_rect.size()) + grip.drag_delta();
            let floor = vec2(GRIP_SIZE * 2.0, self.title_height() + GRIP_SIZE);
            self.drag = Some(size.max(floor));
        }
        ui.painter().rect_filled(handle, 2.0, Color32::from_rgb(100, 160, 255));
        if let Some(size) = self.drag {
            ui.painter().rect_stroke(
                Rect::from_min_size(back_rect.min, size),
                0.0,
                Stroke::new(1.0, Color32::from_rgb(100, 160, 255)),
                StrokeKind::Outside,
            );
        }
        if grip.drag_stopped()
            && let Some(size) = self.drag.take()
        {
            out.resized = Some(Size::from_vec2(size));
        }
    }
}

/// Adds the frame's body: the dock host or wizard, else the previous main
/// sizer, else a stretch spacer.
fn add_body(scene: &mut Scene, sizer: WidgetHandle, main: Option<WidgetHandle>, body: Option<WidgetHandle>) {
    if let Some(b) = body {
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Window(b), 1, WX_EXPAND | WX_ALL, 0));
    } else if let Some(m) = main {
        if scene.sizer(m).is_some_and(|s| s.items.is_empty()) {
            scene.add_to_sizer(m, SizerItem::stretch(1));
        }
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Sizer(m), 1, WX_EXPAND | WX_ALL, 0));
    } else {
        scene.add_to_sizer(sizer, SizerItem::stretch(1));
    }
}

fn rich(w: &Window, text: &str) -> RichText {
    let mut rich = RichText::new(display_label(text));
    if let Some(fg) = w.fg {
        rich = rich.color(fg);
    }
    if let Some(font) = &w.font {
        if font.point_size > 0.0 {
            rich = rich.size(font.point_size * 4.0 / 3.0);
        }
        if font.bold {
            rich = rich.strong();
        }
        if font.italic {
            rich = rich.italics();
        }
        if font.underlined {
            rich = rich.underline();
        }
    }
    rich
}

/// Runs `add` in a child ui confined to `rect`, honouring the window's
/// enabled flag and tooltip.
fn widget_scope(
    ui: &mut egui::Ui,
    w: &Window,
    rect: Rect,
    add: impl FnOnce(&mut egui::Ui) -> egui::Response,
) {
    ui.scope_builder(UiBuilder::new().max_rect(rect), |ui| {
        if !w.enabled {
            ui.disable();
        }
        let response = add(ui);
        if !w.tooltip.is_empty() {
            let _ = response.on_hover_text(&w.tooltip);
        }
    });
}

fn paint_notebook(painter: &egui::Painter, w: &Window, rect: Rect) {
    let mut x = rect.min.x;
    for (i, page) in w.pages.iter().enumerate() {
        let width = page.label.chars().count() as f32 * 7.0 + 16.0;
        let tab = Rect::from_min_size(pos2(x, rect.min.y), vec2(width, TAB_STRIP_HEIGHT));
        let fill = if i == w.selection {
            Color32::WHITE
        } else {
            Color32::from_gray(220)
        };
        let round = CornerRadius {
            nw: 3,
            ne: 3,
            sw: 0,
            se: 0,
        };
        painter.rect_filled(tab, round, fill);
        painter.rect_stroke(tab, round, Stroke::new(1.0, BORDER), StrokeKind::Inside);
        painter.text(
            tab.center(),
            Align2::CENTER_CENTER,
            &page.label,
            FontId::proportional(12.0),
            Color32::BLACK,
        );
        x += width;
    }
    let body = Rect::from_min_max(pos2(rect.min.x, rect.min.y + TAB_STRIP_HEIGHT), rect.max);
    painter.rect_stroke(body, 0.0, Stroke::new(1.0, BORDER), StrokeKind::Inside);
}

fn paint_toolbar(painter: &egui::Painter, w: &Window, rect: Rect) {
    painter.rect_filled(rect, 0.0, BUTTON_FACE);
    let vertical = w.style & WX_TB_VERTICAL != 0;
    let mut at = rect.min + vec2(4.0, 4.0);
    for tool in &w.items {
        let size = if vertical {
            vec2(rect.width() - 8.0, 44.0)
        } else {
            vec2(44.0, rect.height() - 8.0)
        };
        let cell = Rect::from_min_size(at, size);
        painter.rect_stroke(cell, 2.0, Stroke::new(1.0, Color32::from_gray(190)), StrokeKind::Inside);
        painter.text(
            cell.center(),
            Align2::CENTER_CENTER,
            tool,
            FontId::proportional(11.0),
            Color32::BLACK,
        );
        if vertical {
            at.y += 48.0;
        } else {
            at.x += 48.0;
        }
    }
}

fn paint_status_bar(painter: &egui::Painter, w: &Window, rect: Rect) {
    painter.rect_filled(rect, 0.0, BUTTON_FACE);
    painter.hline(rect.x_range(), rect.min.y, Stroke::new(1.0, BORDER));
    let fields = w.items.len().max(1);
    let width = rect.width() / fields as f32;
    for (i, text) in w.items.iter().enumerate() {
        let left = rect.min.x + width * i as f32;
        if i > 0 {
            painter.vline(left, rect.y_range().shrink(3.0), Stroke::new(1.0, BORDER));
        }
        painter.text(
            pos2(left + 4.0, rect.center().y),
            Align2::LEFT_CENTER,
            text,
            FontId::proportional(11.0),
            Color32::BLACK,
        );
    }
}

fn paint_wizard(
    ui: &mut egui::Ui,
    scene: &Scene,
    wizard: &Wizard,
    rect: Rect,
    blocked: &mut Vec<Rect>,
    out: &mut ShellResponse,
) {
    let page = wizard.page_rect(scene).translate(rect.min.to_vec2());
    if let Some(bitmap) = wizard.bitmap() {
        let side = Rect::from_min_max(rect.min, pos2(rect.min.x + BITMAP_WIDTH, page.max.y));
        ui.painter().rect_filled(side, 0.0, Color32::from_rgb(47, 79, 143));
        ui.painter().text(
            side.center_bottom() - vec2(0.0, 6.0),
            Align2::CENTER_BOTTOM,
            bitmap,
            FontId::proportional(10.0),
            Color32::WHITE,
        );
    }

    let row = Rect::from_min_max(pos2(rect.min.x, page.max.y), rect.max);
    blocked.push(row);
    ui.painter().hline(row.x_range(), row.min.y, Stroke::new(1.0, BORDER));

    let y = row.center().y - WIZARD_BUTTON.y / 2.0;
    let at = |x: f32| Rect::from_min_size(pos2(x, y), WIZARD_BUTTON);
    let right = row.max.x - 8.0;
    let cancel = at(right - WIZARD_BUTTON.x);
    let next = at(cancel.min.x - 8.0 - WIZARD_BUTTON.x);
    let back = at(next.min.x - WIZARD_BUTTON.x);
    let next_label = if wizard.can_go_forward() { "Next >" } else { "Finish" };

    let button = |ui: &mut egui::Ui, rect: Rect, enabled: bool, label: &str| {
        ui.scope_builder(UiBuilder::new().max_rect(rect), |ui| {
            ui.add_enabled(enabled, egui::Button::new(label).min_size(rect.size()))
                .clicked()
        })
        .inner
    };
    if button(ui, back, wizard.can_go_back(), "< Back") {
        out.wizard_step = Some(false);
    }
    if button(ui, next, wizard.can_go_forward(), next_label) {
        out.wizard_step = Some(true);
    }
    button(ui, cancel, true, "Cancel");
    if wizard.has_help_button() {
        button(ui, at(row.min.x + 8.0), true, "Help");
    }
}

fn paint_pane_captions(
    ui: &mut egui::Ui,
    dock: &PaneManager,
    host_rect: Rect,
    blocked: &mut Vec<Rect>,
    out: &mut ShellResponse,
) {
    let offset = host_rect.min.to_vec2();
    for pane in dock.panes().iter().filter(|p| p.info.shown) {
        if pane.info.floating {
            ui.painter().rect_stroke(
                pane.frame.translate(offset),
                0.0,
                Stroke::new(2.0, BORDER),
                StrokeKind::Outside,
            );
        }
        let Some(caption) = pane.caption_rect().map(|r| r.translate(offset)) else {
            continue;
        };
        blocked.push(caption);
        ui.painter().rect_filled(caption, 0.0, CAPTION_FILL);
        ui.painter().text(
            caption.left_center() + vec2(4.0, 0.0),
            Align2::LEFT_CENTER,
            &pane.info.caption,
            FontId::proportional(11.0),
            Color32::BLACK,
        );
        if pane.info.close_button {
            let x = caption.right_center() - vec2(8.0, 0.0);
            let stroke = Stroke::new(1.0, Color32::BLACK);
            let d = vec2(3.0, 3.0);
            ui.painter().line_segment([x - d, x + d], stroke);
            ui.painter().line_segment([x + vec2(-3.0, 3.0), x + vec2(3.0, -3.0)], stroke);
        }

        let mut action = None;
        let id = ui.make_persistent_id(("pane_caption", pane.window));
        ui.interact(caption, id, Sense::click()).context_menu(|ui| {
            if pane.info.floatable && !pane.info.floating && ui.button("Float").clicked() {
                action = Some(PaneAction::Float);
                ui.close_kind(UiKind::Menu);
            }
            ui.menu_button("Dock", |ui| {
                let sides = [
                    ("Top", DockDirection::Top, pane.info.top_dockable),
                    ("Bottom", DockDirection::Bottom, pane.info.bottom_dockable),
                    ("Left", DockDirection::Left, pane.info.left_dockable),
                    ("Right", DockDirection::Right, pane.info.right_dockable),
                ];
                for (label, direction, allowed) in sides {
                    if ui.add_enabled(allowed, egui::Button::new(label)).clicked() {
                        action = Some(PaneAction::Dock(direction));
                        ui.close_kind(UiKind::Menu);
                    }
                }
            });
            if pane.info.close_button && ui.button("Hide").clicked() {
                action = Some(PaneAction::Hide);
                ui.close_kind(UiKind::Menu);
            }
        });
        if let Some(action) = action {
            out.pane = Some(PaneCommand {
                window: pane.window,
                action,
            });
        }
    }
}

/// Title bar is shown for classes with a caption style.
pub(crate) fn wants_title_bar(style: i64) -> bool {
    style & WX_CAPTION != 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ObjectNode;
    use egui::Pos2;

    fn shell() -> (Scene, DesignerWindow) {
        let mut scene = Scene::new();
        let shell = DesignerWindow::new(&mut scene, &EditorConfig::default());
        (scene, shell)
    }

    #[test]
    fn test_back_sits_at_offset() {
        let (scene, shell) = shell();
        let back = scene.window(shell.back()).unwrap();
        assert_eq!(back.rect.min, pos2(10.0, 10.0));
        assert_eq!(scene.parent(shell.content()), Some(shell.back()));
        assert!(!shell.has_title_bar());
    }

    #[test]
    fn test_layout_leaves_room_for_title_bar() {
        let (mut scene, mut shell) = shell();
        shell.show_title_bar(true);
        shell.set_size(&mut scene, Size::new(300, 200));
        let content = scene.window(shell.content()).unwrap();
        assert_eq!(content.rect, Rect::from_min_max(pos2(0.0, 22.0), pos2(300.0, 200.0)));

        shell.show_title_bar(false);
        shell.layout(&mut scene);
        assert_eq!(scene.window(shell.content()).unwrap().rect.min, Pos2::ZERO);
    }

    #[test]
    fn test_fit_respects_limits() {
        let (mut scene, shell) = shell();
        let panel = scene.window(shell.content()).map(|w| w.family);
        assert_eq!(panel, Some(WidgetFamily::ContentPanel));
        shell.set_limits(&mut scene, Size::new(500, -1), Size::DEFAULT);
        shell.fit(&mut scene);
        let size = shell.size(&scene);
        assert_eq!(size.x, 500.0);
        assert_eq!(size.y, WidgetFamily::ContentPanel.default_size().y);
    }

    #[test]
    fn test_frame_widgets_stack_vertically() {
        let (mut scene, mut shell) = shell();
        let mut tree = ObjectTree::new();
        let menubar = tree.insert(None, ObjectNode::new("wxMenuBar", "menubar"));
        tree.insert(Some(menubar), ObjectNode::new("wxMenu", "menu").with("label", "&File"));

        let content = shell.content();
        let main = scene.create_sizer(SizerLayout::Box(Orientation::Vertical));
        scene.set_sizer(content, Some(main), false);
        let toolbar = scene.create_window(Some(content), WidgetFamily::ToolBar, "");
        let status = scene.create_window(Some(content), WidgetFamily::StatusBar, "");

        shell.set_frame_widgets(&mut scene, &tree, Some(menubar), Some(toolbar), Some(status), None);

        let frame = scene.window(content).unwrap().sizer.unwrap();
        assert_ne!(frame, main);
        let targets: Vec<ItemTarget> = scene.sizer(frame).unwrap().items.iter().map(|i| i.target).collect();
        assert_eq!(targets.len(), 5);
        assert_eq!(targets[2], ItemTarget::Window(toolbar));
        assert_eq!(targets[3], ItemTarget::Sizer(main));
        assert_eq!(targets[4], ItemTarget::Window(status));
        // an empty main sizer gets a stretch spacer
        assert_eq!(scene.sizer(main).unwrap().items.len(), 1);

        let bar = match targets[0] {
            ItemTarget::Window(bar) => bar,
            other => panic!("menu bar expected, got {other:?}"),
        };
        assert_eq!(scene.window(bar).unwrap().items, vec!["File"]);
        assert!(scene.is_alive(main));
    }

    #[test]
    fn test_vertical_toolbar_gets_side_column() {
        let (mut scene, mut shell) = shell();
        let tree = ObjectTree::new();
        let content = shell.content();
        let toolbar = scene.create_window(Some(content), WidgetFamily::ToolBar, "");
        scene.window_mut(toolbar).unwrap().style = WX_TB_VERTICAL;
        let host = scene.create_window(Some(content), WidgetFamily::DockHost, "");

        shell.set_frame_widgets(&mut scene, &tree, None, Some(toolbar), None, Some(host));

        let frame = scene.window(content).unwrap().sizer.unwrap();
        let items = &scene.sizer(frame).unwrap().items;
        assert_eq!(items.len(), 1);
        let ItemTarget::Sizer(row) = items[0].target else {
            panic!("nested row expected");
        };
        let row = scene.sizer(row).unwrap();
        assert_eq!(row.layout, SizerLayout::Box(Orientation::Horizontal));
        assert_eq!(row.items[0].target, ItemTarget::Window(toolbar));
    }

    #[test]
    fn test_status_bar_moves_to_content_with_body() {
        let (mut scene, mut shell) = shell();
        let tree = ObjectTree::new();
        let content = shell.content();
        let host = scene.create_window(Some(content), WidgetFamily::DockHost, "");
        let status = scene.create_window(Some(host), WidgetFamily::StatusBar, "");
        shell.set_frame_widgets(&mut scene, &tree, None, None, Some(status), Some(host));
        assert_eq!(scene.parent(status), Some(content));
    }

    #[test]
    fn test_title_bar_style() {
        assert!(wants_title_bar(WX_CAPTION | WX_CLOSE_BOX));
        assert!(!wants_title_bar(WX_CLOSE_BOX));
    }
}
