use crate::angle::normalize_angle;
use crate::{BoardConfig, CellCoordinate, CellShape, GeometryError, Point};
use std::f64::consts::TAU;

/// Inner and outer radius of `ring`.
pub fn ring_radii(config: &BoardConfig, ring: usize) -> Result<(f64, f64), GeometryError> {
    config.sector_count(ring)?;
    Ok(band_edges(config, ring))
}

fn band_edges(config: &BoardConfig, ring: usize) -> (f64, f64) {
    let width = config.ring_width();
    let inner = config.inner_radius() + ring as f64 * width;
    // the last band ends exactly on the rim, free of accumulated rounding
    let outer = if ring + 1 == config.ring_count() {
        config.outer_radius()
    } else {
        config.inner_radius() + (ring + 1) as f64 * width
    };
    (inner, outer)
}

/// Angular width of one sector in `ring`.
pub fn sector_width(config: &BoardConfig, ring: usize) -> Result<f64, GeometryError> {
    Ok(TAU / config.sector_count(ring)? as f64)
}

pub(crate) fn check_cell(
    config: &BoardConfig,
    coord: CellCoordinate,
) -> Result<usize, GeometryError> {
    let sector_count = config.sector_count(coord.ring)?;
    if coord.sector >= sector_count {
        return Err(GeometryError::SectorOutOfRange {
            ring: coord.ring,
            sector: coord.sector,
            sector_count,
        });
    }
    Ok(sector_count)
}

/// The annular wedge covered by `coord`.
pub fn cell_shape(
    config: &BoardConfig,
    coord: CellCoordinate,
) -> Result<CellShape, GeometryError> {
    let sector_count = check_cell(config, coord)?;
    let (inner_radius, outer_radius) = ring_radii(config, coord.ring)?;
    let width = TAU / sector_count as f64;
    let start_angle = config.start_angle() + coord.sector as f64 * width;
    let end_angle = if coord.sector + 1 == sector_count {
        config.start_angle() + TAU
    } else {
        config.start_angle() + (coord.sector + 1) as f64 * width
    };

    Ok(CellShape {
        center: config.center(),
        inner_radius,
        outer_radius,
        start_angle,
        end_angle,
    })
}

/// Every shape of `ring`, in sector order.
pub fn ring_shapes(config: &BoardConfig, ring: usize) -> Result<Vec<CellShape>, GeometryError> {
    (0..config.sector_count(ring)?)
        .map(|sector| cell_shape(config, CellCoordinate::new(ring, sector)))
        .collect()
}

/// The cell under `point`, or `None` for the hub, beyond the rim, or a
/// non-finite point.
///
/// Ring bands and sector spans are closed-open, so a point lying exactly on
/// a shared edge belongs to the cell whose span starts there. The rim itself
/// belongs to the outermost ring and the 0/2π seam to sector 0.
pub fn hit_test(config: &BoardConfig, point: Point) -> Option<CellCoordinate> {
    if !point.is_finite() {
        return None;
    }

    let center = config.center();
    let r = center.distance_to(point);
    if r < config.inner_radius() || r > config.outer_radius() {
        log::trace!("hit_test {point}: radius {r} is off the board");
        return None;
    }

    let last_ring = config.ring_count() - 1;
    let band = ((r - config.inner_radius()) / config.ring_width()).floor() as usize;
    let mut ring = band.min(last_ring);
    // the division can round across an edge; settle on the band that
    // ring_radii actually reports
    while ring > 0 && r < band_edges(config, ring).0 {
        ring -= 1;
    }
    while ring < last_ring && r >= band_edges(config, ring).1 {
        ring += 1;
    }

    let sector_count = config.sectors_per_ring()[ring];
    let angle = normalize_angle(center.angle_to(point) - config.start_angle());
    let sector = (angle / (TAU / sector_count as f64)).floor() as usize % sector_count;

    let coord = CellCoordinate::new(ring, sector);
    log::trace!("hit_test {point}: radius {r}, angle {angle} -> {coord}");
    Some(coord)
}

/// All cells of the board, ring by ring, in sector order.
pub fn cells(config: &BoardConfig) -> impl Iterator<Item = CellCoordinate> + '_ {
    config
        .sectors_per_ring()
        .iter()
        .enumerate()
        .flat_map(|(ring, &count)| (0..count).map(move |sector| CellCoordinate::new(ring, sector)))
}

pub fn cell_count(config: &BoardConfig) -> usize {
    config.sectors_per_ring().iter().sum()
}
