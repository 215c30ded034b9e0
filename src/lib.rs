#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod export;
pub mod fonts;
pub mod id_generator;
pub mod image_input;
pub mod panels;
pub mod raster;
pub mod scene;
pub mod selection;
pub mod shape;
pub mod snapping;
pub mod texture_manager;
pub mod transform;
pub mod util;
pub mod viewport;
pub mod widgets;

pub use app::MukiApp;
pub use config::{EditorConfig, RasterPolicy, Resolution};
pub use editor::Editor;
pub use error::TransitionError;
pub use id_generator::ShapeId;
pub use scene::Scene;
pub use shape::{Element, Shape, ShapeKind, ShapePatch};
pub use transform::{Corner, PointerTarget, TransformController};
