mod canvas_panel;
mod preview_panel;
mod text_controls;
mod toolbar;

pub use canvas_panel::canvas_panel;
pub use preview_panel::preview_panel;
pub use text_controls::text_controls;
pub use toolbar::toolbar;
