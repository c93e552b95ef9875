//! Wizard host used to preview wizard forms one page at a time.

use crate::widget::{Scene, WidgetFamily, WidgetHandle};
use egui::{Rect, Vec2, pos2, vec2};

pub(crate) const BITMAP_WIDTH: f32 = 116.0;
pub(crate) const BUTTON_ROW_HEIGHT: f32 = 40.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PageChange {
    /// The user asked for another page; nothing has moved yet.
    Changing,
    Changed,
}

impl PageChange {
    pub(crate) fn code(self) -> i32 {
        match self {
            PageChange::Changing => 0,
            PageChange::Changed => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct WizardEvent {
    pub(crate) change: PageChange,
    pub(crate) page: WidgetHandle,
}

pub(crate) struct Wizard {
    window: WidgetHandle,
    pages: Vec<WidgetHandle>,
    selection: Option<usize>,
    bitmap: Option<String>,
    help_button: bool,
    connected: bool,
    events: Vec<WizardEvent>,
}

impl Wizard {
    pub(crate) fn new(scene: &mut Scene, parent: WidgetHandle) -> Self {
        Self {
            window: scene.create_window(Some(parent), WidgetFamily::Wizard, ""),
            pages: Vec::new(),
            selection: None,
            bitmap: None,
            help_button: false,
            connected: false,
            events: Vec::new(),
        }
    }

    pub(crate) fn window(&self) -> WidgetHandle {
        self.window
    }

    pub(crate) fn pages(&self) -> &[WidgetHandle] {
        &self.pages
    }

    pub(crate) fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub(crate) fn bitmap(&self) -> Option<&str> {
        self.bitmap.as_deref()
    }

    pub(crate) fn has_help_button(&self) -> bool {
        self.help_button
    }

    /// Appends a page; the first page added becomes the current one.
    pub(crate) fn add_page(&mut self, scene: &mut Scene, page: WidgetHandle) {
        if self.pages.contains(&page) {
            return;
        }
        if scene.parent(page) != Some(self.window) {
            scene.reparent(page, self.window);
        }
        self.pages.push(page);
        if self.selection.is_none() {
            self.set_selection(scene, 0);
        } else if let Some(w) = scene.window_mut(page) {
            w.shown = false;
        }
    }

    /// Starts routing page-change notifications to the editor.
    pub(crate) fn connect(&mut self) {
        self.connected = true;
    }

    pub(crate) fn disconnect(&mut self) {
        self.connected = false;
        self.events.clear();
    }

    pub(crate) fn page_index(&self, page: WidgetHandle) -> Option<usize> {
        self.pages.iter().position(|&p| p == page)
    }

    pub(crate) fn set_selection(&mut self, scene: &mut Scene, index: usize) -> bool {
        if index >= self.pages.len() {
            return false;
        }
        self.selection = Some(index);
        for (i, &page) in self.pages.iter().enumerate() {
            if let Some(w) = scene.window_mut(page) {
                w.shown = i == index;
            }
        }
        true
    }

    pub(crate) fn set_bitmap(&mut self, bitmap: Option<String>) {
        self.bitmap = bitmap;
    }

    pub(crate) fn show_help_button(&mut self, show: bool) {
        self.help_button = show;
    }

    pub(crate) fn dispatch(&mut self, change: PageChange, page: WidgetHandle) {
        if self.connected {
            self.events.push(WizardEvent { change, page });
        }
    }

    /// Back/Next: announces the page the user wants without switching.
    pub(crate) fn request_step(&mut self, forward: bool) -> bool {
        let Some(current) = self.selection else {
            return false;
        };
        let target = if forward {
            current + 1
        } else {
            match current.checked_sub(1) {
                Some(t) => t,
                None => return false,
            }
        };
        match self.pages.get(target) {
            Some(&page) => {
                self.dispatch(PageChange::Changing, page);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_events(&mut self) -> Vec<WizardEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn can_go_back(&self) -> bool {
        self.selection.is_some_and(|s| s > 0)
    }

    pub(crate) fn can_go_forward(&self) -> bool {
        self.selection.is_some_and(|s| s + 1 < self.pages.len())
    }

    /// Page area relative to the wizard window.
    pub(crate) fn page_rect(&self, scene: &Scene) -> Rect {
        let size = scene.window(self.window).map_or(Vec2::ZERO, |w| w.size());
        let left = if self.bitmap.is_some() { BITMAP_WIDTH } else { 0.0 };
        Rect::from_min_max(
            pos2(left, 0.0),
            pos2(size.x, (size.y - BUTTON_ROW_HEIGHT).max(0.0)),
        )
    }

    /// Grows the wizard's minimum size to fit its largest page, then
    /// lays out every page in the page area.
    pub(crate) fn layout(&self, scene: &mut Scene) {
        let largest = self
            .pages
            .iter()
            .map(|&p| scene.best_size(p))
            .fold(Vec2::ZERO, |a, b| a.max(b));
        let chrome = vec2(
            if self.bitmap.is_some() { BITMAP_WIDTH } else { 0.0 },
            BUTTON_ROW_HEIGHT,
        );
        let min = largest + chrome;
        if let Some(w) = scene.window_mut(self.window) {
            w.min_size.w = w.min_size.w.max(min.x as i32);
            w.min_size.h = w.min_size.h.max(min.y as i32);
        }
        let area = self.page_rect(scene);
        for &page in &self.pages {
            if let Some(w) = scene.window_mut(page) {
                w.rect = area;
            }
            scene.layout(page);
        }
    }

    pub(crate) fn destroy(mut self, scene: &mut Scene) {
        self.disconnect();
        scene.destroy(self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard_with_pages(n: usize) -> (Scene, Wizard, Vec<WidgetHandle>) {
        let mut scene = Scene::new();
        let content = scene.create_window(None, WidgetFamily::ContentPanel, "");
        let mut wizard = Wizard::new(&mut scene, content);
        let pages: Vec<_> = (0..n)
            .map(|_| scene.create_window(Some(wizard.window()), WidgetFamily::WizardPage, ""))
            .collect();
        for &p in &pages {
            wizard.add_page(&mut scene, p);
        }
        wizard.connect();
        (scene, wizard, pages)
    }

    #[test]
    fn test_first_page_is_shown() {
        let (scene, wizard, pages) = wizard_with_pages(2);
        assert_eq!(wizard.selection(), Some(0));
        assert!(scene.window(pages[0]).unwrap().shown);
        assert!(!scene.window(pages[1]).unwrap().shown);
    }

    #[test]
    fn test_step_requests_do_not_switch_pages() {
        let (mut scene, mut wizard, pages) = wizard_with_pages(2);
        assert!(!wizard.request_step(false));
        assert!(wizard.request_step(true));
        assert_eq!(wizard.selection(), Some(0));
        assert_eq!(
            wizard.take_events(),
            vec![WizardEvent {
                change: PageChange::Changing,
                page: pages[1]
            }]
        );
        assert!(wizard.set_selection(&mut scene, 1));
        assert!(!wizard.can_go_forward());
        assert!(wizard.can_go_back());
        assert!(!wizard.request_step(true));
        assert!(!wizard.set_selection(&mut scene, 5));
    }

    #[test]
    fn test_events_need_connection() {
        let (mut scene, mut wizard, pages) = wizard_with_pages(1);
        wizard.disconnect();
        wizard.dispatch(PageChange::Changed, pages[0]);
        assert!(wizard.take_events().is_empty());
        assert_eq!(PageChange::Changed.code(), 1);
        assert_eq!(PageChange::Changing.code(), 0);
        let window = wizard.window();
        wizard.destroy(&mut scene);
        assert!(!scene.is_alive(window));
        assert!(!scene.is_alive(pages[0]));
    }

    #[test]
    fn test_layout_reserves_bitmap_and_buttons() {
        let (mut scene, mut wizard, pages) = wizard_with_pages(1);
        wizard.set_bitmap(Some("wizard.png".into()));
        scene
            .window_mut(wizard.window())
            .unwrap()
            .set_size_vec(vec2(500.0, 300.0));
        wizard.layout(&mut scene);
        let rect = scene.window(pages[0]).unwrap().rect;
        assert_eq!(rect.min, pos2(BITMAP_WIDTH, 0.0));
        assert_eq!(rect.max, pos2(500.0, 300.0 - BUTTON_ROW_HEIGHT));
    }
}
