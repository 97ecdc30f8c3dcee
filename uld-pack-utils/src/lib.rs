//! Visualisation helpers (§4.8/§6): per-ULD SVG top-down (XY) projections
//! of a solved layout, one document per ULD, with a z-depth-encoded fill
//! shade (packages closer to the floor are drawn darker).

use log::info;
use svg::node::element::path::Data;
use svg::node::element::{Path, Text};
use svg::Document;

use uld_pack::entities::{Placement, Uld};
use uld_pack::Unit;

/// 10% viewBox padding around the ULD footprint, matching the teacher's
/// `s_layout_to_svg` convention.
const VIEWBOX_PADDING: f64 = 0.1;

/// Renders the top-down (XY) projection of every placement inside `uld`.
/// Packages are drawn darkest-at-the-floor: fill shade is a linear
/// interpolation between a dark and a light grey keyed on `p1.z / uld.lz`.
pub fn render_uld_svg(uld: &Uld, placements: &[Placement]) -> Document {
    let width = uld.lx as f64;
    let height = uld.ly as f64;

    let viewbox_x = -width * VIEWBOX_PADDING;
    let viewbox_y = -height * VIEWBOX_PADDING;
    let viewbox_w = width * (1.0 + 2.0 * VIEWBOX_PADDING);
    let viewbox_h = height * (1.0 + 2.0 * VIEWBOX_PADDING);

    let mut document = Document::new()
        .set("viewBox", (viewbox_x, viewbox_y, viewbox_w, viewbox_h))
        .set("xmlns", "http://www.w3.org/2000/svg");

    let stroke_width = f64::min(width, height) * 0.002;

    document = document.add(container_path(width, height, stroke_width));

    let mut members: Vec<&Placement> = placements.iter().filter(|p| p.uld_id == uld.id).collect();
    members.sort_by_key(|p| p.p1().z);

    for placement in &members {
        document = document.add(placement_path(placement, uld.lz, stroke_width));
    }

    let label = Text::new(format!("uld {}: {} package(s)", uld.id, members.len()))
        .set("x", 0)
        .set("y", -height * 0.02)
        .set("font-family", "monospace")
        .set("font-size", width * 0.03);
    document = document.add(label);

    document
}

fn container_path(width: f64, height: f64, stroke_width: f64) -> Path {
    let data = Data::new()
        .move_to((0.0, 0.0))
        .line_to((width, 0.0))
        .line_to((width, height))
        .line_to((0.0, height))
        .close();
    Path::new()
        .set("d", data)
        .set("fill", "none")
        .set("stroke", "black")
        .set("stroke-width", stroke_width * 2.0)
}

fn placement_path(placement: &Placement, uld_lz: Unit, stroke_width: f64) -> Path {
    let p1 = placement.p1();
    let p2 = placement.p2();
    let data = Data::new()
        .move_to((p1.x as f64, p1.y as f64))
        .line_to((p2.x as f64, p1.y as f64))
        .line_to((p2.x as f64, p2.y as f64))
        .line_to((p1.x as f64, p2.y as f64))
        .close();
    Path::new()
        .set("d", data)
        .set("fill", depth_shade(p1.z, uld_lz))
        .set("stroke", "gray")
        .set("stroke-width", stroke_width)
}

/// Grayscale hex colour interpolated between `#404040` (floor) and `#e0e0e0`
/// (ceiling) by `z / uld_lz`.
fn depth_shade(z: Unit, uld_lz: Unit) -> String {
    let t = if uld_lz > 0 { (z as f64 / uld_lz as f64).clamp(0.0, 1.0) } else { 0.0 };
    let lo = 0x40u32;
    let hi = 0xe0u32;
    let level = (lo as f64 + t * (hi as f64 - lo as f64)).round() as u32;
    format!("#{level:02x}{level:02x}{level:02x}")
}

/// Writes one SVG per ULD to `dir`, named `uld_<id>.svg`. Logs each file
/// written, mirroring the teacher's `io::write_svg`.
pub fn write_uld_svgs(dir: &std::path::Path, ulds: &[Uld], placements: &[Placement]) -> anyhow::Result<()> {
    for uld in ulds {
        let document = render_uld_svg(uld, placements);
        let path = dir.join(format!("uld_{}.svg", uld.id));
        svg::save(&path, &document)?;
        info!("uld svg written to file://{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uld_pack::geometry::Point3;

    #[test]
    fn depth_shade_interpolates_between_floor_and_ceiling() {
        assert_eq!(depth_shade(0, 10), "#404040");
        assert_eq!(depth_shade(10, 10), "#e0e0e0");
    }

    #[test]
    fn render_includes_one_path_per_member_placement() {
        let _ = env_logger::Builder::from_default_env().filter_level(log::LevelFilter::Debug).try_init();

        let uld = Uld::new(0, 10, 10, 10, 100).unwrap();
        let placements = vec![
            Placement::new(0, 0, Point3::ORIGIN, (5, 5, 5)).unwrap(),
            Placement::new(0, 1, Point3::new(5, 0, 0), (5, 5, 5)).unwrap(),
        ];
        let document = render_uld_svg(&uld, &placements);
        let rendered = document.to_string();
        assert_eq!(rendered.matches("<path").count(), 3); // container + 2 placements
    }
}
