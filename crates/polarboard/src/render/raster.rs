use super::{CellPaint, Hub, RenderError, Scene};
use cairo::{Context, Format, ImageSurface};
use palette::Srgba;
use polargeom::CellShape;
use std::f64::consts::TAU;
use std::path::Path;

fn set_source(cr: &Context, color: &Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

/// Traces the wedge outline. Cairo's positive arc direction runs from +x
/// toward +y, matching cell angles.
fn trace_wedge(cr: &Context, shape: &CellShape) {
    let (cx, cy) = (shape.center.x, shape.center.y);
    cr.new_path();

    if shape.is_full_turn() {
        cr.arc(cx, cy, shape.outer_radius, 0.0, TAU);
        if shape.inner_radius > 0.0 {
            cr.new_sub_path();
            cr.arc_negative(cx, cy, shape.inner_radius, TAU, 0.0);
        }
        cr.close_path();
        return;
    }

    cr.arc(cx, cy, shape.outer_radius, shape.start_angle, shape.end_angle);
    if shape.inner_radius > 0.0 {
        cr.arc_negative(cx, cy, shape.inner_radius, shape.end_angle, shape.start_angle);
    } else {
        cr.line_to(cx, cy);
    }
    cr.close_path();
}

fn draw_cell(cr: &Context, cell: &CellPaint, scene: &Scene) -> Result<(), cairo::Error> {
    trace_wedge(cr, &cell.shape);
    set_source(cr, &cell.color);
    cr.fill_preserve()?;
    set_source(cr, &scene.stroke);
    cr.set_line_width(scene.stroke_width);
    cr.stroke()
}

fn draw_hub(cr: &Context, hub: &Hub) -> Result<(), cairo::Error> {
    set_source(cr, &hub.color);
    cr.new_path();
    cr.arc(hub.center.x, hub.center.y, hub.radius, 0.0, TAU);
    cr.fill()
}

pub fn draw(cr: &Context, scene: &Scene) -> Result<(), cairo::Error> {
    if let Some(bg) = &scene.background {
        set_source(cr, bg);
        cr.paint()?;
    }
    for cell in &scene.cells {
        draw_cell(cr, cell, scene)?;
    }
    if let Some(hub) = &scene.hub {
        draw_hub(cr, hub)?;
    }
    Ok(())
}

pub fn render_png(scene: &Scene, path: &Path) -> Result<(), RenderError> {
    let surface = ImageSurface::create(
        Format::ARgb32,
        scene.width as i32,
        scene.height as i32,
    )?;
    let cr = Context::new(&surface)?;
    draw(&cr, scene)?;
    // the context holds a reference to the surface until dropped
    drop(cr);

    let mut file = fs_err::File::create(path)?;
    surface.write_to_png(&mut file)?;
    Ok(())
}
