use egui::{Color32, Pos2, Vec2};
use image::{Rgba, RgbaImage};
use muki_editor::config::EditorConfig;
use muki_editor::export::{ExportError, export_png_to};
use muki_editor::fonts::{FontError, FontRegistry, FontVariant, StyleToggle};
use muki_editor::id_generator::generate_id;
use muki_editor::raster::{SceneRasterizer, TextureSlot};
use muki_editor::shape::{Element, ImageSource, ShapeKind, ShapePatch, TextAlign, TextStylePatch};
use muki_editor::snapping::Orientation;
use muki_editor::viewport::StageView;
use muki_editor::{Editor, ShapeId};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn editor() -> Editor {
    Editor::with_parts(
        EditorConfig::default(),
        FontRegistry::without_system_fonts(),
        StdRng::seed_from_u64(5),
    )
}

fn add_square(editor: &mut Editor, pos: Pos2, size: u32) -> ShapeId {
    let source = ImageSource::new("sq.png", RgbaImage::from_pixel(size, size, Rgba([200, 0, 0, 255])));
    let id = editor.add_image(source, 0.0);
    editor.update_shape(id, ShapePatch::moved_to(pos), 0.0);
    id
}

fn selected_style(editor: &Editor) -> muki_editor::shape::TextStyle {
    let id = editor.selected_text_id().unwrap();
    editor.scene().find(id).unwrap().as_text().unwrap().style().clone()
}

#[test]
fn test_drag_snaps_to_neighbour() {
    let mut editor = editor();
    add_square(&mut editor, Pos2::new(100.0, 100.0), 200);
    let moving = add_square(&mut editor, Pos2::new(1000.0, 800.0), 50);

    editor.pointer_down(Pos2::new(1025.0, 825.0), 1.0);
    editor.pointer_move(Pos2::new(323.0, 124.0), 1.0);

    let guides = editor.controller().guides().to_vec();
    assert_eq!(guides.len(), 2);
    assert_eq!((guides[0].orientation, guides[0].position), (Orientation::Vertical, 300.0));
    assert_eq!((guides[1].orientation, guides[1].position), (Orientation::Horizontal, 100.0));

    editor.pointer_up(1.0);
    let position = editor.scene().find(moving).unwrap().geometry().position;
    assert_eq!(position, Pos2::new(300.0, 100.0));
    assert!(editor.controller().guides().is_empty());
}

#[test]
fn test_drag_far_from_stops_is_unsnapped() {
    let mut editor = editor();
    add_square(&mut editor, Pos2::new(100.0, 100.0), 200);
    let moving = add_square(&mut editor, Pos2::new(1000.0, 800.0), 50);

    editor.pointer_down(Pos2::new(1025.0, 825.0), 1.0);
    editor.pointer_move(Pos2::new(525.0, 525.0), 1.0);
    assert!(editor.controller().guides().is_empty());
    editor.pointer_up(1.0);

    let position = editor.scene().find(moving).unwrap().geometry().position;
    assert_eq!(position, Pos2::new(500.0, 500.0));
}

#[test]
fn test_selecting_brings_to_front_of_its_kind() {
    let mut editor = editor();
    let a = add_square(&mut editor, Pos2::new(0.0, 0.0), 10);
    let b = add_square(&mut editor, Pos2::new(100.0, 0.0), 10);
    let c = add_square(&mut editor, Pos2::new(200.0, 0.0), 10);
    let text = editor.add_text("hello", 0.0).unwrap();

    assert!(editor.select(a));
    let images: Vec<_> = editor
        .scene()
        .shapes_of(ShapeKind::Image)
        .iter()
        .map(|shape| shape.id())
        .collect();
    assert_eq!(images, vec![b, c, a]);
    // Texts still draw above every image
    assert_eq!(editor.scene().draw_order().last().map(|s| s.id()), Some(text));
}

#[test]
fn test_stale_ids_are_ignored() {
    let mut editor = editor();
    let stale = generate_id();

    assert!(!editor.select(stale));
    assert!(!editor.remove(stale, 0.0));
    assert!(!editor.update_shape(stale, ShapePatch::moved_to(Pos2::ZERO), 0.0));
    assert!(editor.selection().id().is_none());
    assert!(editor.remove_selected(0.0).is_none());
}

#[test]
fn test_added_text_is_selected_with_defaults() {
    let mut editor = editor();
    let id = editor.add_text("Moi", 0.0).unwrap();

    assert_eq!(editor.selection().id(), Some(id));
    let shape = editor.scene().find(id).unwrap();
    assert_eq!(shape.rect().size(), Vec2::new(800.0, 400.0));
    let style = selected_style(&editor);
    assert_eq!(style.font_family, "Nunito");
    assert_eq!(style.font_size, 280.0);
}

#[test]
fn test_unavailable_variant_leaves_text_unchanged() {
    let mut editor = editor();
    editor.add_text("Moi", 0.0).unwrap();
    editor.set_font("Pacifico", FontVariant::Normal, 0.0).unwrap();
    let before = selected_style(&editor);

    let err = editor.toggle_style(StyleToggle::Bold, 0.0).unwrap_err();
    assert_eq!(
        err,
        FontError::VariantUnavailable {
            family: "Pacifico".into(),
            variant: FontVariant::Bold
        }
    );
    assert_eq!(selected_style(&editor), before);

    assert!(editor.set_font("Comic Sans", FontVariant::Normal, 0.0).is_err());
    assert_eq!(selected_style(&editor), before);
}

#[test]
fn test_style_toggles_compose() {
    let mut editor = editor();
    editor.add_text("Moi", 0.0).unwrap();

    editor.toggle_style(StyleToggle::Italic, 0.0).unwrap();
    editor.toggle_style(StyleToggle::Bold, 0.0).unwrap();
    assert_eq!(selected_style(&editor).font_style, FontVariant::ItalicBold);

    editor.toggle_style(StyleToggle::Italic, 0.0).unwrap();
    assert_eq!(selected_style(&editor).font_style, FontVariant::Bold);
}

#[test]
fn test_text_edits_schedule_one_raster() {
    let mut editor = editor();
    editor.add_text("Moi", 0.0).unwrap();
    let mut rasterizer = SceneRasterizer::new();
    let slot = TextureSlot::new();

    // Drain the raster from the add
    let image = editor.rasterize_if_due(1.0, &mut rasterizer).unwrap().unwrap();
    slot.publish(image);

    editor.set_text_style(
        TextStylePatch {
            align: Some(TextAlign::Center),
            ..Default::default()
        },
        2.0,
    );
    editor.set_text_style(
        TextStylePatch {
            fill: Some(Color32::RED),
            ..Default::default()
        },
        2.05,
    );
    assert!(editor.rasterize_if_due(2.1, &mut rasterizer).is_none());

    let image = editor.rasterize_if_due(2.3, &mut rasterizer).unwrap().unwrap();
    assert_eq!(image.dimensions(), (2835, 1181));
    assert_eq!(slot.publish(image), 2);
    assert!(editor.rasterize_if_due(3.0, &mut rasterizer).is_none());
}

#[test]
fn test_delete_clears_selection() {
    let mut editor = editor();
    let id = add_square(&mut editor, Pos2::new(0.0, 0.0), 10);

    assert_eq!(editor.remove_selected(0.0), Some(id));
    assert!(editor.selection().id().is_none());
    assert!(editor.controller().attached_id().is_none());
    assert!(editor.scene().is_empty());
}

#[test]
fn test_export_restores_view_and_handles() {
    let mut editor = editor();
    add_square(&mut editor, Pos2::new(10.0, 10.0), 20);
    let mut view = StageView::new(Pos2::new(16.0, 60.0), 0.4);
    let path = std::env::temp_dir().join(format!("muki-export-{}.png", generate_id()));

    export_png_to(&mut editor, &mut view, &mut SceneRasterizer::new(), &path).unwrap();

    assert_eq!(view, StageView::new(Pos2::new(16.0, 60.0), 0.4));
    assert!(editor.controller().handles_visible());
    let written = image::open(&path).unwrap().to_rgba8();
    assert_eq!(written.dimensions(), (2835, 1181));
    assert_eq!(written.get_pixel(15, 15), &Rgba([200, 0, 0, 255]));
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_export_refuses_empty_scene() {
    let mut editor = editor();
    let mut view = StageView::unit();
    let path = std::env::temp_dir().join("muki-never-written.png");

    let result = export_png_to(&mut editor, &mut view, &mut SceneRasterizer::new(), &path);
    assert!(matches!(result, Err(ExportError::EmptyScene)));
    assert!(!editor.can_export());
}
