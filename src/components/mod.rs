pub mod style_button;

pub use style_button::StyleButton;
