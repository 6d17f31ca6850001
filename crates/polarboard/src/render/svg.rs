use super::theme::to_hex;
use super::{CellPaint, Hub, Scene};
use palette::Srgba;
use polargeom::{CellShape, Point};
use std::f64::consts::PI;

/// Standalone SVG document for `scene`. Cells carry `data-ring` and
/// `data-sector` so a host page can map clicks without hit-testing.
pub fn render(scene: &Scene) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height,
    );
    out.push('\n');

    if let Some(bg) = &scene.background {
        out.push_str(&format!(
            "  <rect width=\"100%\" height=\"100%\"{}/>\n",
            fill(bg)
        ));
    }

    out.push_str(&format!(
        "  <g stroke=\"{}\" stroke-opacity=\"{:.3}\" stroke-width=\"{:.3}\">\n",
        to_hex(&scene.stroke),
        scene.stroke.alpha,
        scene.stroke_width
    ));
    for cell in &scene.cells {
        out.push_str(&cell_element(cell));
    }
    out.push_str("  </g>\n");

    if let Some(hub) = &scene.hub {
        out.push_str(&hub_element(hub));
    }

    out.push_str("</svg>\n");
    out
}

fn fill(color: &Srgba<f64>) -> String {
    if color.alpha < 1.0 {
        format!(
            " fill=\"{}\" fill-opacity=\"{:.3}\"",
            to_hex(color),
            color.alpha
        )
    } else {
        format!(" fill=\"{}\"", to_hex(color))
    }
}

fn cell_element(cell: &CellPaint) -> String {
    let rule = if cell.shape.is_full_turn() {
        " fill-rule=\"evenodd\""
    } else {
        ""
    };
    format!(
        "    <path class=\"cell {}\" data-ring=\"{}\" data-sector=\"{}\" d=\"{}\"{}{}/>\n",
        cell.state,
        cell.coord.ring,
        cell.coord.sector,
        wedge_path(&cell.shape),
        fill(&cell.color),
        rule
    )
}

fn hub_element(hub: &Hub) -> String {
    format!(
        "  <circle class=\"hub\" cx=\"{:.3}\" cy=\"{:.3}\" r=\"{:.3}\"{}/>\n",
        hub.center.x,
        hub.center.y,
        hub.radius,
        fill(&hub.color)
    )
}

fn xy(p: Point) -> String {
    format!("{:.3},{:.3}", p.x, p.y)
}

/// Full circle as two half arcs, since a single arc with equal end points
/// draws nothing.
fn circle_path(center: Point, r: f64) -> String {
    let east = Point::new(center.x + r, center.y);
    let west = Point::new(center.x - r, center.y);
    format!(
        "M{e} A{r:.3},{r:.3} 0 1 1 {w} A{r:.3},{r:.3} 0 1 1 {e} Z",
        e = xy(east),
        w = xy(west),
    )
}

/// Outline of an annular wedge: outer arc with increasing angle, radial edge
/// in, inner arc back. SVG's positive sweep runs from +x toward +y, the same
/// way cell angles grow.
pub fn wedge_path(shape: &CellShape) -> String {
    let (r_in, r_out) = (shape.inner_radius, shape.outer_radius);

    if shape.is_full_turn() {
        let mut d = circle_path(shape.center, r_out);
        if r_in > 0.0 {
            d.push(' ');
            d.push_str(&circle_path(shape.center, r_in));
        }
        return d;
    }

    let large_arc = u8::from(shape.angular_width() > PI);
    let outer_start = shape.point_at(r_out, shape.start_angle);
    let outer_end = shape.point_at(r_out, shape.end_angle);

    if r_in > 0.0 {
        let inner_end = shape.point_at(r_in, shape.end_angle);
        let inner_start = shape.point_at(r_in, shape.start_angle);
        format!(
            "M{} A{r_out:.3},{r_out:.3} 0 {large_arc} 1 {} L{} A{r_in:.3},{r_in:.3} 0 {large_arc} 0 {} Z",
            xy(outer_start),
            xy(outer_end),
            xy(inner_end),
            xy(inner_start),
        )
    } else {
        format!(
            "M{} A{r_out:.3},{r_out:.3} 0 {large_arc} 1 {} L{} Z",
            xy(outer_start),
            xy(outer_end),
            xy(shape.center),
        )
    }
}
