//! Sizer-driven layout for the live widget arena.

use super::{ItemTarget, Orientation, Scene, SizerItem, SizerLayout, WidgetFamily, WidgetHandle};
use crate::model::typeconv::flags::{
    WX_ALIGN_BOTTOM, WX_ALIGN_CENTER_HORIZONTAL, WX_ALIGN_CENTER_VERTICAL, WX_ALIGN_RIGHT,
    WX_BOTTOM, WX_EXPAND, WX_LEFT, WX_RIGHT, WX_TB_VERTICAL, WX_TOP,
};
use crate::model::typeconv::Size;
use egui::{Pos2, Rect, Vec2, pos2, vec2};

/// Height of a notebook's tab strip.
pub(crate) const TAB_STRIP_HEIGHT: f32 = 24.0;
/// Extra room a static box sizer needs around its items.
const STATIC_BOX_PADDING: Vec2 = vec2(10.0, 22.0);
const STATIC_BOX_INSET: Vec2 = vec2(5.0, 17.0);

/// Margins (left, top, right, bottom) an item's flag/border reserves.
pub(crate) fn item_margins(flag: i64, border: i32) -> [f32; 4] {
    let b = border.max(0) as f32;
    let side = |f: i64| if flag & f != 0 { b } else { 0.0 };
    [side(WX_LEFT), side(WX_TOP), side(WX_RIGHT), side(WX_BOTTOM)]
}

/// Clamps `size` into the specified bounds; `-1` bounds are ignored.
pub(crate) fn clamp_to(size: Vec2, min: Size, max: Size) -> Vec2 {
    let mut s = size;
    if min.w >= 0 {
        s.x = s.x.max(min.w as f32);
    }
    if min.h >= 0 {
        s.y = s.y.max(min.h as f32);
    }
    if max.w >= 0 {
        s.x = s.x.min(max.w as f32);
    }
    if max.h >= 0 {
        s.y = s.y.min(max.h as f32);
    }
    s
}

impl Scene {
    pub(crate) fn best_size(&self, h: WidgetHandle) -> Vec2 {
        let Some(w) = self.window(h) else {
            return Vec2::ZERO;
        };
        let base = if let Some(s) = w.sizer {
            let mut min = self.sizer_min_size(s);
            if w.family == WidgetFamily::Notebook {
                min.y += TAB_STRIP_HEIGHT;
            }
            min
        } else if w.family == WidgetFamily::Notebook && !w.pages.is_empty() {
            let pages = w
                .pages
                .iter()
                .map(|p| self.best_size(p.window))
                .fold(Vec2::ZERO, |a, b| a.max(b));
            pages + vec2(0.0, TAB_STRIP_HEIGHT)
        } else if w.family.is_text_sized() {
            let text = vec2(w.label.chars().count() as f32 * 7.0 + 16.0, 0.0);
            w.family.default_size().max(text)
        } else if w.family == WidgetFamily::ToolBar {
            let tools = w.items.len() as f32 * 48.0 + 8.0;
            let [long, short] = [w.family.default_size().x, w.family.default_size().y];
            if w.style & WX_TB_VERTICAL != 0 {
                vec2(short, tools.max(long))
            } else {
                vec2(tools.max(long), short)
            }
        } else {
            w.family.default_size()
        };
        clamp_to(w.requested.apply_to(base), w.min_size, w.max_size)
    }

    fn item_min_size(&self, item: &SizerItem) -> Option<Vec2> {
        let inner = match item.target {
            ItemTarget::Window(w) => {
                if !self.window(w).is_some_and(|w| w.shown) {
                    return None;
                }
                self.best_size(w)
            }
            ItemTarget::Sizer(s) => self.sizer_min_size(s),
            ItemTarget::Spacer(size) => size,
        };
        let [l, t, r, b] = item_margins(item.flag, item.border);
        Some(inner + vec2(l + r, t + b))
    }

    pub(crate) fn sizer_min_size(&self, h: WidgetHandle) -> Vec2 {
        let Some(sizer) = self.sizer(h) else {
            return Vec2::ZERO;
        };
        let mins: Vec<Vec2> = sizer
            .items
            .iter()
            .filter_map(|i| self.item_min_size(i))
            .collect();
        let content = match &sizer.layout {
            SizerLayout::Box(orient) => box_min(*orient, &mins),
            SizerLayout::StaticBox { orient, .. } => box_min(*orient, &mins) + STATIC_BOX_PADDING,
            SizerLayout::Grid {
                rows,
                cols,
                vgap,
                hgap,
            } => {
                let (rows, cols) = grid_shape(*rows, *cols, mins.len());
                let cell = mins.iter().fold(Vec2::ZERO, |a, b| a.max(*b));
                vec2(
                    cell.x * cols as f32 + hgap * cols.saturating_sub(1) as f32,
                    cell.y * rows as f32 + vgap * rows.saturating_sub(1) as f32,
                )
            }
        };
        clamp_to(content, sizer.min_size, Size::DEFAULT)
    }

    /// Resizes a window to its best size.
    pub(crate) fn fit(&mut self, h: WidgetHandle) {
        let best = self.best_size(h);
        if let Some(w) = self.window_mut(h) {
            w.set_size_vec(best);
        }
    }

    /// Lays out the window's sizer (if any) into its client area, then
    /// recurses into every child window.
    pub(crate) fn layout(&mut self, h: WidgetHandle) {
        let Some(w) = self.window(h) else {
            return;
        };
        let size = w.size();
        let sizer = w.sizer;
        let family = w.family;
        if family == WidgetFamily::Notebook {
            self.layout_notebook(h, size);
        }
        if let Some(s) = sizer {
            let top = if family == WidgetFamily::Notebook {
                TAB_STRIP_HEIGHT
            } else {
                0.0
            };
            self.layout_sizer(s, Rect::from_min_max(pos2(0.0, top), size.to_pos2()), h);
        }
        for child in self.children(h) {
            self.layout(child);
        }
    }

    fn layout_notebook(&mut self, h: WidgetHandle, size: Vec2) {
        let Some(w) = self.window(h) else {
            return;
        };
        let selection = w.selection;
        let pages: Vec<WidgetHandle> = w.pages.iter().map(|p| p.window).collect();
        let page_rect = Rect::from_min_max(pos2(0.0, TAB_STRIP_HEIGHT), size.to_pos2());
        for (i, page) in pages.into_iter().enumerate() {
            if let Some(p) = self.window_mut(page) {
                p.rect = page_rect;
                p.shown = i == selection;
            }
        }
    }

    fn layout_sizer(&mut self, h: WidgetHandle, rect: Rect, window: WidgetHandle) {
        let Some(sizer) = self.sizer_mut(h) else {
            return;
        };
        sizer.rect = rect;
        sizer.window = Some(window);
        let layout = sizer.layout.clone();
        let items = sizer.items.clone();

        let placed: Vec<(SizerItem, Vec2)> = items
            .into_iter()
            .filter_map(|item| self.item_min_size(&item).map(|m| (item, m)))
            .collect();

        let cells = match &layout {
            SizerLayout::Box(orient) => box_cells(*orient, rect, &placed),
            SizerLayout::StaticBox { orient, .. } => {
                let inner = Rect::from_min_max(
                    rect.min + STATIC_BOX_INSET,
                    rect.max - (STATIC_BOX_PADDING - STATIC_BOX_INSET),
                );
                box_cells(*orient, inner, &placed)
            }
            SizerLayout::Grid {
                rows,
                cols,
                vgap,
                hgap,
            } => grid_cells(*rows, *cols, *vgap, *hgap, rect, placed.len()),
        };

        for ((item, min), cell) in placed.iter().zip(cells) {
            let target = item_rect(item, *min, cell);
            match item.target {
                ItemTarget::Window(w) => {
                    if let Some(win) = self.window_mut(w) {
                        win.rect = target;
                    }
                }
                ItemTarget::Sizer(s) => self.layout_sizer(s, target, window),
                ItemTarget::Spacer(_) => {}
            }
        }
    }
}

fn box_min(orient: Orientation, mins: &[Vec2]) -> Vec2 {
    mins.iter().fold(Vec2::ZERO, |acc, m| match orient {
        Orientation::Vertical => vec2(acc.x.max(m.x), acc.y + m.y),
        Orientation::Horizontal => vec2(acc.x + m.x, acc.y.max(m.y)),
    })
}

fn grid_shape(rows: usize, cols: usize, n: usize) -> (usize, usize) {
    match (rows, cols) {
        (0, 0) => (n.max(1), 1),
        (0, c) => (n.div_ceil(c).max(1), c),
        (r, 0) => (r, n.div_ceil(r).max(1)),
        (r, c) => (r, c),
    }
}

fn box_cells(orient: Orientation, rect: Rect, placed: &[(SizerItem, Vec2)]) -> Vec<Rect> {
    let main = |v: Vec2| match orient {
        Orientation::Vertical => v.y,
        Orientation::Horizontal => v.x,
    };
    let fixed: f32 = placed.iter().map(|(_, m)| main(*m)).sum();
    let total_prop: u32 = placed.iter().map(|(i, _)| i.proportion).sum();
    let free = (main(rect.size()) - fixed).max(0.0);

    let mut cursor = match orient {
        Orientation::Vertical => rect.min.y,
        Orientation::Horizontal => rect.min.x,
    };
    placed
        .iter()
        .map(|(item, min)| {
            let mut len = main(*min);
            if total_prop > 0 {
                len += free * item.proportion as f32 / total_prop as f32;
            }
            let cell = match orient {
                Orientation::Vertical => {
                    Rect::from_min_size(pos2(rect.min.x, cursor), vec2(rect.width(), len))
                }
                Orientation::Horizontal => {
                    Rect::from_min_size(pos2(cursor, rect.min.y), vec2(len, rect.height()))
                }
            };
            cursor += len;
            cell
        })
        .collect()
}

fn grid_cells(rows: usize, cols: usize, vgap: f32, hgap: f32, rect: Rect, n: usize) -> Vec<Rect> {
    let (rows, cols) = grid_shape(rows, cols, n);
    let cell = vec2(
        ((rect.width() - hgap * cols.saturating_sub(1) as f32) / cols as f32).max(0.0),
        ((rect.height() - vgap * rows.saturating_sub(1) as f32) / rows as f32).max(0.0),
    );
    (0..n)
        .map(|i| {
            let (r, c) = (i / cols, i % cols);
            let min = pos2(
                rect.min.x + c as f32 * (cell.x + hgap),
                rect.min.y + r as f32 * (cell.y + vgap),
            );
            Rect::from_min_size(min, cell)
        })
        .collect()
}

/// Position of an item inside its cell, honouring borders, expand and
/// alignment flags.
fn item_rect(item: &SizerItem, min: Vec2, cell: Rect) -> Rect {
    let [l, t, r, b] = item_margins(item.flag, item.border);
    let inner = Rect::from_min_max(
        pos2(cell.min.x + l, cell.min.y + t),
        Pos2::new((cell.max.x - r).max(cell.min.x + l), (cell.max.y - b).max(cell.min.y + t)),
    );
    if item.flag & WX_EXPAND != 0 {
        return inner;
    }
    let want = (min - vec2(l + r, t + b)).min(inner.size()).max(Vec2::ZERO);
    let slack = inner.size() - want;
    let dx = if item.flag & WX_ALIGN_RIGHT != 0 {
        slack.x
    } else if item.flag & WX_ALIGN_CENTER_HORIZONTAL != 0 {
        slack.x / 2.0
    } else {
        0.0
    };
    let dy = if item.flag & WX_ALIGN_BOTTOM != 0 {
        slack.y
    } else if item.flag & WX_ALIGN_CENTER_VERTICAL != 0 {
        slack.y / 2.0
    } else {
        0.0
    };
    // a box sizer already sized the main axis to the item
    Rect::from_min_size(inner.min + vec2(dx, dy), want.max(Vec2::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::typeconv::flags::{WX_ALL, WX_EXPAND};

    fn vertical_panel(scene: &mut Scene) -> (WidgetHandle, WidgetHandle) {
        let panel = scene.create_window(None, WidgetFamily::Panel, "panel");
        let sizer = scene.create_sizer(SizerLayout::Box(Orientation::Vertical));
        scene.set_sizer(panel, Some(sizer), true);
        (panel, sizer)
    }

    #[test]
    fn test_box_min_size_sums_main_axis() {
        let mut scene = Scene::new();
        let (panel, sizer) = vertical_panel(&mut scene);
        let a = scene.create_window(Some(panel), WidgetFamily::Button, "");
        let b = scene.create_window(Some(panel), WidgetFamily::Button, "");
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Window(a), 0, WX_ALL, 5));
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Window(b), 0, 0, 0));

        let button = WidgetFamily::Button.default_size();
        assert_eq!(
            scene.sizer_min_size(sizer),
            vec2(button.x + 10.0, button.y * 2.0 + 10.0)
        );
    }

    #[test]
    fn test_hidden_windows_take_no_space() {
        let mut scene = Scene::new();
        let (panel, sizer) = vertical_panel(&mut scene);
        let a = scene.create_window(Some(panel), WidgetFamily::Button, "");
        scene.window_mut(a).unwrap().shown = false;
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Window(a), 0, 0, 0));
        assert_eq!(scene.sizer_min_size(sizer), Vec2::ZERO);
    }

    #[test]
    fn test_proportion_and_expand_distribute_space() {
        let mut scene = Scene::new();
        let (panel, sizer) = vertical_panel(&mut scene);
        let a = scene.create_window(Some(panel), WidgetFamily::Panel, "");
        let b = scene.create_window(Some(panel), WidgetFamily::Button, "");
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Window(a), 1, WX_EXPAND, 0));
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Window(b), 0, 0, 0));
        scene.window_mut(panel).unwrap().set_size_vec(vec2(300.0, 200.0));
        scene.layout(panel);

        let ra = scene.window(a).unwrap().rect;
        let rb = scene.window(b).unwrap().rect;
        let button = WidgetFamily::Button.default_size();
        assert_eq!(ra.width(), 300.0);
        assert_eq!(ra.height(), 200.0 - button.y);
        assert_eq!(rb.min.y, ra.max.y);
        assert_eq!(rb.size(), button);
    }

    #[test]
    fn test_grid_cells_fill_rows_first() {
        let cells = grid_cells(0, 2, 0.0, 0.0, Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0)), 3);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[1].min, pos2(50.0, 0.0));
        assert_eq!(cells[2].min, pos2(0.0, 50.0));
    }

    #[test]
    fn test_best_size_respects_requested_and_bounds() {
        let mut scene = Scene::new();
        let w = scene.create_window(None, WidgetFamily::Panel, "");
        {
            let win = scene.window_mut(w).unwrap();
            win.requested = Size::new(500, -1);
            win.max_size = Size::new(400, -1);
            win.min_size = Size::new(-1, 90);
        }
        assert_eq!(scene.best_size(w), vec2(400.0, 90.0));
        scene.fit(w);
        assert_eq!(scene.window(w).unwrap().size(), vec2(400.0, 90.0));
    }

    #[test]
    fn test_nested_sizer_positions_relative_to_window() {
        let mut scene = Scene::new();
        let (panel, sizer) = vertical_panel(&mut scene);
        let nested = scene.create_sizer(SizerLayout::Box(Orientation::Horizontal));
        let b = scene.create_window(Some(panel), WidgetFamily::Button, "");
        scene.add_to_sizer(nested, SizerItem::new(ItemTarget::Window(b), 0, 0, 0));
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Spacer(vec2(0.0, 30.0)), 0, 0, 0));
        scene.add_to_sizer(sizer, SizerItem::new(ItemTarget::Sizer(nested), 0, 0, 0));
        scene.window_mut(panel).unwrap().rect = Rect::from_min_size(pos2(10.0, 10.0), vec2(200.0, 200.0));
        scene.layout(panel);

        assert_eq!(scene.window(b).unwrap().rect.min, pos2(0.0, 30.0));
        assert_eq!(scene.sizer(nested).unwrap().window, Some(panel));
        assert_eq!(scene.absolute_rect(nested).unwrap().min, pos2(10.0, 40.0));
    }
}
