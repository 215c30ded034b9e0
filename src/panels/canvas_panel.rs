use egui::text::{LayoutJob, TextFormat};
use egui::{Align, Color32, CursorIcon, FontId, Painter, Rect, Sense, Stroke};

use crate::MukiApp;
use crate::config::{CANVAS_MARGIN, GUIDE_LINE_COLOR};
use crate::shape::{Element, ImageShape, Shape, TEXT_PADDING, TextAlign, TextShape};
use crate::texture_manager::{TextureKey, color_image};
use crate::transform::PointerTarget;
use crate::viewport::{StageView, Viewport};
use crate::widgets::ResizeHandle;

pub fn canvas_panel(app: &mut MukiApp, ctx: &egui::Context, now: f64) {
    egui::CentralPanel::default()
        .frame(egui::Frame::central_panel(&ctx.style()).fill(Color32::from_gray(39)))
        .show(ctx, |ui| {
            let width = (ui.available_width() - CANVAS_MARGIN).max(1.0);
            let debounce = app.editor.config().viewport_debounce_secs();
            let resolution = app.editor.scene().resolution();
            let viewport = app
                .viewport
                .get_or_insert_with(|| Viewport::new(width, resolution, debounce));
            if viewport.observe(width, now) {
                log::debug!("Canvas resized to {} (scale {:.3})", viewport.width(), viewport.scale());
            }
            if let Some(wait) = viewport.pending_for(now) {
                ctx.request_repaint_after(std::time::Duration::from_secs_f64(wait));
            }
            app.editor
                .controller_mut()
                .set_viewport_width(ctx.screen_rect().width());

            let size = viewport.size();
            ui.add_space(CANVAS_MARGIN / 2.0);
            let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
            let view = viewport.view_at(response.rect.min);
            app.view = view;

            handle_pointer(app, ctx, &response, view, now);

            let painter = painter.with_clip_rect(response.rect);
            painter.rect_filled(response.rect, 0.0, Color32::WHITE);
            paint_shapes(app, ctx, &painter, view);
            paint_transform(app, &painter, view);
        });
}

fn handle_pointer(
    app: &mut MukiApp,
    ctx: &egui::Context,
    response: &egui::Response,
    view: StageView,
    now: f64,
) {
    let press_origin = ctx.input(|i| i.pointer.press_origin());

    if response.drag_started() {
        if let Some(origin) = press_origin {
            app.editor.pointer_down(view.to_stage(origin), view.scale);
        }
    } else if response.clicked() {
        if let Some(pos) = response.interact_pointer_pos() {
            app.editor.pointer_down(view.to_stage(pos), view.scale);
            app.editor.pointer_up(now);
        }
    }

    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            app.editor.pointer_move(view.to_stage(pos), now);
        }
    }
    if response.drag_stopped() {
        app.editor.pointer_up(now);
    }

    if app.editor.controller().is_gesture_active() {
        ctx.set_cursor_icon(CursorIcon::Grabbing);
    } else if let Some(hover) = response.hover_pos() {
        match app.editor.hit_test(view.to_stage(hover), view.scale) {
            PointerTarget::Handle(corner) => ctx.set_cursor_icon(corner.cursor_icon()),
            PointerTarget::Shape(_) => ctx.set_cursor_icon(CursorIcon::Grab),
            PointerTarget::Stage => {}
        }
    }
}

fn paint_shapes(app: &mut MukiApp, ctx: &egui::Context, painter: &Painter, view: StageView) {
    let scene = &app.editor.scene;
    let controller = &app.editor.controller;
    for shape in scene.draw_order() {
        let Some(bounds) = controller.live_bounds(shape.id(), scene) else {
            continue;
        };
        let screen = view.rect_to_screen(bounds);
        match shape {
            Shape::Image(image) => paint_image(&mut app.textures, ctx, painter, image, screen),
            Shape::Text(text) => paint_text(painter, text, bounds, screen, view.scale),
        }
    }
}

fn paint_image(
    textures: &mut crate::texture_manager::TextureManager,
    ctx: &egui::Context,
    painter: &Painter,
    image: &ImageShape,
    screen: Rect,
) {
    let pixels = image.source().pixels();
    match textures.get_or_create_texture(TextureKey::Shape(image.id()), 0, || color_image(pixels), ctx) {
        Ok(texture) => {
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter.image(texture, screen, uv, Color32::WHITE);
        }
        Err(err) => log::error!("No texture for {}: {}", image.id(), err),
    }
}

/// On-screen approximation of the rasterized text, drawn with egui's fonts
fn paint_text(painter: &Painter, text: &TextShape, bounds: Rect, screen: Rect, view_scale: f32) {
    let style = text.style();
    let geometry = text.geometry();
    // Box scale during a live resize, the stored one otherwise
    let box_scale = if geometry.size.x > 0.0 && geometry.size.y > 0.0 {
        bounds.size() / geometry.size
    } else {
        geometry.scale
    };
    let padding = egui::vec2(TEXT_PADDING * box_scale.x, TEXT_PADDING * box_scale.y) * view_scale;
    let inner = Rect::from_min_max(screen.min + padding, screen.max - padding);
    let font_px = style.font_size * box_scale.y * view_scale;
    if font_px < 0.5 || inner.width() <= 0.0 {
        return;
    }

    let mut job = LayoutJob::single_section(
        style.text.clone(),
        TextFormat {
            font_id: FontId::proportional(font_px),
            color: style.fill,
            line_height: Some(font_px * style.line_height),
            italics: style.font_style.is_italic(),
            ..Default::default()
        },
    );
    job.wrap.max_width = inner.width();
    job.halign = match style.align {
        TextAlign::Left => Align::LEFT,
        TextAlign::Center => Align::Center,
        TextAlign::Right => Align::RIGHT,
    };
    let anchor_x = match style.align {
        TextAlign::Left => inner.min.x,
        TextAlign::Center => inner.center().x,
        TextAlign::Right => inner.max.x,
    };

    let galley = painter.layout_job(job);
    painter.galley(egui::pos2(anchor_x, inner.min.y), galley, style.fill);
}

fn paint_transform(app: &MukiApp, painter: &Painter, view: StageView) {
    let scene = &app.editor.scene;
    let controller = &app.editor.controller;

    for line in controller.guide_lines(view.scale) {
        let points = line.points.map(|p| view.to_screen(p));
        painter.extend(egui::Shape::dashed_line(
            &points,
            Stroke::new(line.stroke_width * view.scale, GUIDE_LINE_COLOR),
            line.dash[0] * view.scale,
            line.dash[1] * view.scale,
        ));
    }

    if !controller.handles_visible() {
        return;
    }
    let Some(bounds) = controller
        .attached_id()
        .and_then(|id| controller.live_bounds(id, scene))
    else {
        return;
    };
    ResizeHandle::paint_border(painter, view.rect_to_screen(bounds));
    for (_, rect) in controller.handle_rects(scene, view.scale) {
        ResizeHandle::new(view.rect_to_screen(rect)).paint(painter);
    }
}
