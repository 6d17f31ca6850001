use crate::Point;
use crate::angle::normalize_angle;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::str::FromStr;
use thiserror::Error;

/// Logical address of one board cell. Rings count outward from the hub,
/// sectors count in the direction of increasing angle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
)]
#[display("{ring}:{sector}")]
pub struct CellCoordinate {
    pub ring: usize,
    pub sector: usize,
}

impl CellCoordinate {
    pub fn new(ring: usize, sector: usize) -> Self {
        Self { ring, sector }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected a cell as RING:SECTOR, got {0:?}")]
pub struct ParseCellError(pub String);

impl FromStr for CellCoordinate {
    type Err = ParseCellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseCellError(s.to_string());
        let (ring, sector) = s.trim().split_once(':').ok_or_else(err)?;
        Ok(Self {
            ring: ring.trim().parse().map_err(|_| err())?,
            sector: sector.trim().parse().map_err(|_| err())?,
        })
    }
}

/// Annular wedge covered by one cell. Angles are radians measured from +x
/// toward +y around `center`; `end_angle - start_angle` is the wedge width
/// and `start_angle` may lie outside `[0, TAU)` on a rotated board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellShape {
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl CellShape {
    pub fn angular_width(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    /// Mid radius at mid angle. Always strictly inside the wedge, which makes
    /// it the point to label a cell at or to feed back into hit-testing.
    pub fn midpoint(&self) -> Point {
        self.point_at(self.mid_radius(), self.mid_angle())
    }

    pub fn point_at(&self, radius: f64, angle: f64) -> Point {
        self.center.offset_polar(radius, angle)
    }

    /// True when the wedge covers the whole turn (a ring with one sector).
    pub fn is_full_turn(&self) -> bool {
        self.angular_width() >= TAU - 1e-12
    }

    /// Closed-open containment: inner edge and leading angular edge are
    /// inside, outer edge and trailing angular edge are not.
    pub fn contains(&self, point: Point) -> bool {
        let r = self.center.distance_to(point);
        if !(self.inner_radius..self.outer_radius).contains(&r) {
            return false;
        }
        self.is_full_turn()
            || normalize_angle(self.center.angle_to(point) - self.start_angle)
                < self.angular_width()
    }

    pub fn area(&self) -> f64 {
        0.5 * self.angular_width() * (self.outer_radius.powi(2) - self.inner_radius.powi(2))
    }
}
