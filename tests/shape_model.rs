use egui::{Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};
use muki_editor::config::{MIN_SHAPE_SIZE, RESOLUTION};
use muki_editor::id_generator::generate_id;
use muki_editor::scene::Scene;
use muki_editor::shape::{
    self, Element, Geometry, ImageSource, Shape, ShapeInit, ShapeKind, ShapePatch, TextShape,
    TextStyle, TextStylePatch,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn source(width: u32, height: u32) -> ImageSource {
    ImageSource::new("test.png", RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])))
}

fn text_at(x: f32, y: f32) -> Shape {
    Shape::Text(TextShape::new(
        generate_id(),
        Geometry::new(Pos2::new(x, y), Vec2::new(100.0, 50.0)),
        TextStyle::with_text("t"),
    ))
}

fn text_ids(scene: &Scene) -> Vec<muki_editor::ShapeId> {
    scene
        .shapes_of(ShapeKind::Text)
        .iter()
        .map(|shape| shape.id())
        .collect()
}

#[test]
fn test_large_image_is_fitted_and_centered() {
    let shape = shape::factory::create_image(source(5670, 2362), RESOLUTION);
    let rect = shape.rect();

    assert!((rect.width() - 2835.0).abs() < 0.01);
    assert!((rect.height() - 1181.0).abs() < 0.01);
    assert!(rect.min.x.abs() < 0.01 && rect.min.y.abs() < 0.01);
}

#[test]
fn test_small_image_keeps_native_size() {
    let shape = shape::factory::create_image(source(200, 100), RESOLUTION);
    assert_eq!(shape.rect().size(), Vec2::new(200.0, 100.0));
    assert_eq!(shape.geometry().position, Pos2::new(1317.5, 540.5));
    assert_eq!(shape.kind(), ShapeKind::Image);
}

#[test]
fn test_factory_gives_unique_ids() {
    let mut rng = StdRng::seed_from_u64(3);
    let a = shape::factory::create(ShapeInit::Text("a".into()), RESOLUTION, &mut rng);
    let b = shape::factory::create(ShapeInit::Text("a".into()), RESOLUTION, &mut rng);
    let c = shape::factory::create(ShapeInit::Image(source(1, 1)), RESOLUTION, &mut rng);
    assert_ne!(a.id(), b.id());
    assert_ne!(b.id(), c.id());
}

#[test]
fn test_images_draw_below_texts() {
    let mut scene = Scene::default();
    let text = scene.add(text_at(0.0, 0.0));
    let image = scene.add(shape::factory::create_image(source(10, 10), RESOLUTION));

    let order: Vec<_> = scene.draw_order().map(|shape| shape.id()).collect();
    assert_eq!(order, vec![image, text]);
}

#[test]
fn test_bring_to_front_keeps_other_order() {
    let mut scene = Scene::default();
    let a = scene.add(text_at(0.0, 0.0));
    let b = scene.add(text_at(10.0, 0.0));
    let c = scene.add(text_at(20.0, 0.0));
    let d = scene.add(text_at(30.0, 0.0));

    assert!(scene.bring_to_front(b));
    assert_eq!(text_ids(&scene), vec![a, c, d, b]);

    assert!(scene.bring_to_front(b));
    assert_eq!(text_ids(&scene), vec![a, c, d, b]);
}

#[test]
fn test_unknown_ids_are_noops() {
    let mut scene = Scene::default();
    let kept = scene.add(text_at(0.0, 0.0));
    let stale = generate_id();

    assert!(!scene.update(stale, ShapePatch::moved_to(Pos2::new(5.0, 5.0))));
    assert!(!scene.remove(stale));
    assert!(!scene.bring_to_front(stale));
    assert!(scene.find(stale).is_none());
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.find(kept).unwrap().geometry().position, Pos2::ZERO);
}

#[test]
fn test_top_most_shape_is_hit() {
    let mut scene = Scene::default();
    let below = scene.add(text_at(0.0, 0.0));
    let above = scene.add(text_at(50.0, 0.0));

    assert_eq!(scene.shape_at(Pos2::new(75.0, 25.0)).map(|s| s.id()), Some(above));
    assert_eq!(scene.shape_at(Pos2::new(25.0, 25.0)).map(|s| s.id()), Some(below));
    assert!(scene.shape_at(Pos2::new(500.0, 500.0)).is_none());
}

#[test]
fn test_resize_patch_folds_scale_and_floors_size() {
    let mut scene = Scene::default();
    let id = scene.add(text_at(0.0, 0.0));

    let tiny = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::new(1.0, 0.0));
    assert!(scene.update(id, ShapePatch::resized_to(tiny)));

    let geometry = *scene.find(id).unwrap().geometry();
    assert_eq!(geometry.size, Vec2::splat(MIN_SHAPE_SIZE));
    assert_eq!(geometry.scale, Vec2::splat(1.0));
    assert_eq!(geometry.position, Pos2::new(10.0, 10.0));
}

#[test]
fn test_degenerate_scale_gives_empty_bounds() {
    let mut scene = Scene::default();
    let id = scene.add(text_at(40.0, 40.0));
    scene.update(
        id,
        ShapePatch {
            scale: Some(Vec2::new(-1.0, 0.0)),
            ..Default::default()
        },
    );

    let rect = scene.find(id).unwrap().rect();
    assert_eq!(rect.size(), Vec2::ZERO);
    assert!(!scene.find(id).unwrap().hit_test(Pos2::new(45.0, 45.0)));
}

#[test]
fn test_style_patch_on_image_is_ignored() {
    let mut scene = Scene::default();
    let id = scene.add(shape::factory::create_image(source(10, 10), RESOLUTION));
    let before = scene.find(id).cloned();

    scene.update(
        id,
        ShapePatch::style(TextStylePatch {
            text: Some("nope".into()),
            ..Default::default()
        }),
    );
    assert_eq!(scene.find(id).cloned(), before);
}
