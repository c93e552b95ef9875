//! A form designer for wxWidgets-style projects with a live `egui` preview.

mod app;
mod component;
mod config;
mod designer;
mod dock;
mod error;
mod highlight;
mod menu;
mod model;
mod project;
mod widget;
mod wizard;

use crate::app::DesignerApp;
use crate::config::EditorConfig;

use eframe::egui;
use std::path::PathBuf;

fn initial_inner_size() -> egui::Vec2 {
    // Preview area of the sample frame plus its window chrome
    let mut w = 640.0;
    let mut h = 480.0;

    // Object tree (220) and inspector (280)
    w += 220.0 + 280.0;

    // Menubar and status bar
    h += 60.0;

    egui::vec2(w, h)
}

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = EditorConfig::from_env();
    let path = std::env::args_os().nth(1).map(PathBuf::from);

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = egui::ViewportBuilder::default()
        .with_inner_size(initial_inner_size())
        .with_min_inner_size(egui::vec2(800.0, 480.0))
        .with_resizable(true);

    eframe::run_native(
        "Form Designer",
        native_options,
        Box::new(move |_cc| Ok(Box::new(DesignerApp::new(config, path)))),
    )
}
