//! Docking pane manager used by dock-managed forms.
//!
//! Panes are generated windows parented to a host panel. `update` carves the
//! host's client area into docked strips (outer layers first) and places
//! floating panes on top.

use crate::model::typeconv::{Point, Size};
use crate::widget::{Scene, WidgetHandle};
use egui::{Pos2, Rect, Vec2, pos2, vec2};
use std::cmp::Reverse;

pub(crate) const CAPTION_HEIGHT: f32 = 18.0;
const FLOAT_OFFSET: Vec2 = vec2(24.0, 24.0);
const TOOLBAR_LAYER: i32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DockDirection {
    Top = 1,
    Right = 2,
    Bottom = 3,
    Left = 4,
    Center = 5,
}

impl DockDirection {
    pub(crate) fn code(self) -> i32 {
        self as i32
    }

    pub(crate) fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(DockDirection::Top),
            2 => Some(DockDirection::Right),
            3 => Some(DockDirection::Bottom),
            4 => Some(DockDirection::Left),
            5 => Some(DockDirection::Center),
            _ => None,
        }
    }
}

/// Pane attributes, with the docking manager's defaults.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaneInfo {
    pub(crate) name: String,
    pub(crate) caption: String,
    pub(crate) center_pane: bool,
    pub(crate) caption_visible: bool,
    pub(crate) close_button: bool,
    pub(crate) maximize_button: bool,
    pub(crate) minimize_button: bool,
    pub(crate) pin_button: bool,
    pub(crate) pane_border: bool,
    pub(crate) gripper: bool,
    pub(crate) top_dockable: bool,
    pub(crate) bottom_dockable: bool,
    pub(crate) left_dockable: bool,
    pub(crate) right_dockable: bool,
    pub(crate) floating: bool,
    pub(crate) dock_direction: i32,
    pub(crate) floating_pos: Point,
    pub(crate) floating_size: Size,
    pub(crate) resizable: bool,
    pub(crate) dock_fixed: bool,
    pub(crate) movable: bool,
    pub(crate) floatable: bool,
    pub(crate) best_size: Size,
    pub(crate) min_size: Size,
    pub(crate) max_size: Size,
    pub(crate) toolbar_pane: bool,
    pub(crate) dock_pos: i32,
    pub(crate) dock_row: i32,
    pub(crate) dock_layer: i32,
    pub(crate) shown: bool,
}

impl Default for PaneInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            caption: String::new(),
            center_pane: false,
            caption_visible: true,
            close_button: true,
            maximize_button: false,
            minimize_button: false,
            pin_button: false,
            pane_border: true,
            gripper: false,
            top_dockable: true,
            bottom_dockable: true,
            left_dockable: true,
            right_dockable: true,
            floating: false,
            dock_direction: DockDirection::Left.code(),
            floating_pos: Point::DEFAULT,
            floating_size: Size::DEFAULT,
            resizable: true,
            dock_fixed: false,
            movable: true,
            floatable: true,
            best_size: Size::DEFAULT,
            min_size: Size::DEFAULT,
            max_size: Size::DEFAULT,
            toolbar_pane: false,
            dock_pos: 0,
            dock_row: 0,
            dock_layer: 0,
            shown: true,
        }
    }
}

impl PaneInfo {
    /// Stripped-down pane that fills whatever the docked panes leave over.
    pub(crate) fn center_pane(&mut self) -> &mut Self {
        *self = Self {
            name: std::mem::take(&mut self.name),
            caption: std::mem::take(&mut self.caption),
            center_pane: true,
            caption_visible: false,
            close_button: false,
            top_dockable: false,
            bottom_dockable: false,
            left_dockable: false,
            right_dockable: false,
            floatable: false,
            movable: false,
            ..Self::default()
        };
        self.dock(DockDirection::Center)
    }

    pub(crate) fn default_pane(&mut self) -> &mut Self {
        self.top_dockable = true;
        self.bottom_dockable = true;
        self.left_dockable = true;
        self.right_dockable = true;
        self.floatable = true;
        self.movable = true;
        self.resizable = true;
        self.caption_visible = true;
        self.pane_border = true;
        self.close_button = true;
        self
    }

    pub(crate) fn toolbar_pane(&mut self) -> &mut Self {
        self.default_pane();
        self.toolbar_pane = true;
        self.gripper = true;
        self.resizable = false;
        self.caption_visible = false;
        self.close_button = false;
        if self.dock_layer == 0 {
            self.dock_layer = TOOLBAR_LAYER;
        }
        self
    }

    pub(crate) fn dock(&mut self, direction: DockDirection) -> &mut Self {
        self.floating = false;
        self.dock_direction = direction.code();
        self
    }

    pub(crate) fn float(&mut self) -> &mut Self {
        self.floating = true;
        self
    }

    pub(crate) fn is_docked(&self) -> bool {
        !self.floating
    }

    pub(crate) fn direction(&self) -> DockDirection {
        DockDirection::from_code(self.dock_direction).unwrap_or(DockDirection::Left)
    }

    pub(crate) fn is_center(&self) -> bool {
        self.direction() == DockDirection::Center
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Pane {
    pub(crate) window: WidgetHandle,
    pub(crate) info: PaneInfo,
    /// Pane frame including its caption, relative to the host.
    pub(crate) frame: Rect,
}

impl Pane {
    fn has_caption(&self) -> bool {
        self.info.caption_visible && !self.info.toolbar_pane && !self.info.center_pane
    }

    pub(crate) fn caption_rect(&self) -> Option<Rect> {
        self.has_caption().then(|| {
            Rect::from_min_size(self.frame.min, vec2(self.frame.width(), CAPTION_HEIGHT))
        })
    }

    fn content_rect(&self) -> Rect {
        let top = if self.has_caption() { CAPTION_HEIGHT } else { 0.0 };
        Rect::from_min_max(self.frame.min + vec2(0.0, top), self.frame.max)
    }
}

pub(crate) struct PaneManager {
    host: WidgetHandle,
    panes: Vec<Pane>,
}

impl PaneManager {
    pub(crate) fn new(host: WidgetHandle) -> Self {
        Self {
            host,
            panes: Vec::new(),
        }
    }

    pub(crate) fn host(&self) -> WidgetHandle {
        self.host
    }

    pub(crate) fn add_pane(&mut self, window: WidgetHandle, info: PaneInfo) -> bool {
        if self.pane(window).is_some() {
            log::warn!("Window {window} is already a dock pane");
            return false;
        }
        self.panes.push(Pane {
            window,
            info,
            frame: Rect::NOTHING,
        });
        true
    }

    pub(crate) fn pane(&self, window: WidgetHandle) -> Option<&Pane> {
        self.panes.iter().find(|p| p.window == window)
    }

    pub(crate) fn pane_info(&self, window: WidgetHandle) -> Option<&PaneInfo> {
        self.pane(window).map(|p| &p.info)
    }

    pub(crate) fn pane_info_mut(&mut self, window: WidgetHandle) -> Option<&mut PaneInfo> {
        self.panes
            .iter_mut()
            .find(|p| p.window == window)
            .map(|p| &mut p.info)
    }

    pub(crate) fn panes(&self) -> &[Pane] {
        &self.panes
    }

    /// Floats a docked pane at its current place and size.
    pub(crate) fn float_pane(&mut self, window: WidgetHandle) {
        let Some(pane) = self.panes.iter_mut().find(|p| p.window == window) else {
            return;
        };
        if !pane.info.floatable || pane.info.center_pane {
            return;
        }
        if !pane.info.floating_pos.is_valid() {
            let at = pane.frame.min + FLOAT_OFFSET;
            pane.info.floating_pos = Point::new(at.x as i32, at.y as i32);
        }
        if pane.info.floating_size.is_default() && pane.frame.is_positive() {
            pane.info.floating_size = Size::from_vec2(pane.frame.size());
        }
        pane.info.float();
    }

    pub(crate) fn dock_pane(&mut self, window: WidgetHandle, direction: DockDirection) {
        if let Some(info) = self.pane_info_mut(window)
            && !info.center_pane
        {
            info.dock(direction);
        }
    }

    pub(crate) fn show_pane(&mut self, window: WidgetHandle, shown: bool) {
        if let Some(info) = self.pane_info_mut(window) {
            info.shown = shown;
        }
    }

    /// Recomputes pane geometry inside the host and applies it to the
    /// pane windows.
    pub(crate) fn update(&mut self, scene: &mut Scene) {
        let Some(host) = scene.window(self.host) else {
            return;
        };
        let mut free = Rect::from_min_size(Pos2::ZERO, host.size());

        let mut docked: Vec<usize> = (0..self.panes.len())
            .filter(|&i| {
                let info = &self.panes[i].info;
                info.shown && info.is_docked() && !info.is_center()
            })
            .collect();
        docked.sort_by_key(|&i| {
            let info = &self.panes[i].info;
            (Reverse(info.dock_layer), Reverse(info.dock_row), info.dock_pos)
        });

        // panes sharing direction, layer and row share one strip
        let mut start = 0;
        while start < docked.len() {
            let key = |i: usize| {
                let info = &self.panes[i].info;
                (info.direction(), info.dock_layer, info.dock_row)
            };
            let dock_key = key(docked[start]);
            let end = docked[start..]
                .iter()
                .position(|&i| key(i) != dock_key)
                .map_or(docked.len(), |n| start + n);
            let group: Vec<usize> = docked[start..end].to_vec();
            free = self.place_strip(scene, dock_key.0, &group, free);
            start = end;
        }

        for pane in &mut self.panes {
            let info = &pane.info;
            if !info.shown {
                continue;
            }
            if info.is_docked() && info.is_center() {
                pane.frame = free;
            } else if info.floating {
                let size = pane_extent(scene, pane.window, info, info.floating_size);
                let at = if info.floating_pos.is_valid() {
                    pos2(info.floating_pos.x as f32, info.floating_pos.y as f32)
                } else {
                    free.min + FLOAT_OFFSET
                };
                pane.frame = Rect::from_min_size(at, size);
            }
        }

        for pane in &self.panes {
            let content = pane.content_rect();
            if let Some(w) = scene.window_mut(pane.window) {
                w.shown = pane.info.shown;
                if pane.info.shown {
                    w.rect = content;
                }
            }
            if pane.info.shown {
                scene.layout(pane.window);
            }
        }
    }

    fn place_strip(
        &mut self,
        scene: &Scene,
        direction: DockDirection,
        group: &[usize],
        free: Rect,
    ) -> Rect {
        let horizontal = matches!(direction, DockDirection::Top | DockDirection::Bottom);
        let thickness = group
            .iter()
            .map(|&i| {
                let pane = &self.panes[i];
                let extent = pane_extent(scene, pane.window, &pane.info, pane.info.best_size);
                let caption = if pane.has_caption() { CAPTION_HEIGHT } else { 0.0 };
                if horizontal {
                    extent.y + caption
                } else {
                    extent.x
                }
            })
            .fold(0.0_f32, f32::max);
        let thickness = if horizontal {
            thickness.min(free.height())
        } else {
            thickness.min(free.width())
        };

        let (strip, rest) = match direction {
            DockDirection::Top => (
                Rect::from_min_size(free.min, vec2(free.width(), thickness)),
                Rect::from_min_max(free.min + vec2(0.0, thickness), free.max),
            ),
            DockDirection::Bottom => (
                Rect::from_min_max(pos2(free.min.x, free.max.y - thickness), free.max),
                Rect::from_min_max(free.min, pos2(free.max.x, free.max.y - thickness)),
            ),
            DockDirection::Left => (
                Rect::from_min_size(free.min, vec2(thickness, free.height())),
                Rect::from_min_max(free.min + vec2(thickness, 0.0), free.max),
            ),
            DockDirection::Right | DockDirection::Center => (
                Rect::from_min_max(pos2(free.max.x - thickness, free.min.y), free.max),
                Rect::from_min_max(free.min, pos2(free.max.x - thickness, free.max.y)),
            ),
        };

        let n = group.len().max(1) as f32;
        for (k, &i) in group.iter().enumerate() {
            let k = k as f32;
            self.panes[i].frame = if horizontal {
                let w = strip.width() / n;
                Rect::from_min_size(strip.min + vec2(w * k, 0.0), vec2(w, strip.height()))
            } else {
                let h = strip.height() / n;
                Rect::from_min_size(strip.min + vec2(0.0, h * k), vec2(strip.width(), h))
            };
        }
        rest
    }

    /// Releases all panes. The pane windows themselves are left alone.
    pub(crate) fn uninit(&mut self) {
        self.panes.clear();
    }
}

/// Extent of a pane's content: the preferred size where given, the window's
/// best size otherwise, clamped to the pane's min/max.
fn pane_extent(scene: &Scene, window: WidgetHandle, info: &PaneInfo, preferred: Size) -> Vec2 {
    let mut size = preferred.apply_to(scene.best_size(window));
    if info.min_size.w >= 0 {
        size.x = size.x.max(info.min_size.w as f32);
    }
    if info.min_size.h >= 0 {
        size.y = size.y.max(info.min_size.h as f32);
    }
    if info.max_size.w >= 0 {
        size.x = size.x.min(info.max_size.w as f32);
    }
    if info.max_size.h >= 0 {
        size.y = size.y.min(info.max_size.h as f32);
    }
    size
}
