#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = muki_editor::EditorConfig::from_env();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([360.0, 480.0])
            .with_drag_and_drop(true)
            .with_title("Muki editor"),
        ..Default::default()
    };
    eframe::run_native(
        "muki_editor",
        native_options,
        Box::new(|cc| Ok(Box::new(muki_editor::MukiApp::new(cc, config)))),
    )
}

// Web builds are started by the host page
#[cfg(target_arch = "wasm32")]
fn main() {}
