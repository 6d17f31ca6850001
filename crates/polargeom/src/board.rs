use crate::Point;
use crate::angle::normalize_angle;
use crate::error::{ConfigViolation, GeometryError};
use serde::{Deserialize, Serialize};

/// Layout of a polar board: `ring_count` concentric bands between
/// `inner_radius` and `outer_radius`, each split into its own number of
/// equal sectors. The disc inside `inner_radius` is the hub.
///
/// Construction validates every invariant, so a `BoardConfig` in hand is
/// always safe to query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardConfig", into = "RawBoardConfig")]
pub struct BoardConfig {
    sectors_per_ring: Vec<usize>,
    center: Point,
    inner_radius: f64,
    outer_radius: f64,
    start_angle: f64,
}

/// Unvalidated serde form of [`BoardConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBoardConfig {
    pub ring_count: usize,
    pub sectors_per_ring: Vec<usize>,
    #[serde(default)]
    pub center: Point,
    pub inner_radius: f64,
    pub outer_radius: f64,
    #[serde(default)]
    pub start_angle: f64,
}

impl BoardConfig {
    pub fn new(
        ring_count: usize,
        sectors_per_ring: Vec<usize>,
        center: Point,
        inner_radius: f64,
        outer_radius: f64,
    ) -> Result<Self, GeometryError> {
        Self::try_from(RawBoardConfig {
            ring_count,
            sectors_per_ring,
            center,
            inner_radius,
            outer_radius,
            start_angle: 0.0,
        })
        .map_err(GeometryError::from)
    }

    /// Same board rotated so sector 0 of every ring starts at `start_angle`
    /// radians. The angle is stored reduced into `[0, TAU)`.
    pub fn with_start_angle(mut self, start_angle: f64) -> Result<Self, GeometryError> {
        if !start_angle.is_finite() {
            return Err(ConfigViolation::BadStartAngle(start_angle).into());
        }
        self.start_angle = normalize_angle(start_angle);
        Ok(self)
    }

    /// Same board drawn around a different center.
    pub fn with_center(mut self, center: Point) -> Result<Self, GeometryError> {
        if !center.is_finite() {
            return Err(ConfigViolation::BadCenter(center).into());
        }
        self.center = center;
        Ok(self)
    }

    pub fn ring_count(&self) -> usize {
        self.sectors_per_ring.len()
    }

    pub fn sectors_per_ring(&self) -> &[usize] {
        &self.sectors_per_ring
    }

    /// Sector count of `ring`, or `RingOutOfRange`.
    pub fn sector_count(&self, ring: usize) -> Result<usize, GeometryError> {
        self.sectors_per_ring
            .get(ring)
            .copied()
            .ok_or(GeometryError::RingOutOfRange {
                ring,
                ring_count: self.ring_count(),
            })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    /// Radial thickness of every ring.
    pub fn ring_width(&self) -> f64 {
        (self.outer_radius - self.inner_radius) / self.ring_count() as f64
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }
}

impl TryFrom<RawBoardConfig> for BoardConfig {
    type Error = ConfigViolation;

    fn try_from(raw: RawBoardConfig) -> Result<Self, Self::Error> {
        if raw.ring_count == 0 {
            return Err(ConfigViolation::NoRings);
        }
        if raw.sectors_per_ring.len() != raw.ring_count {
            return Err(ConfigViolation::SectorListMismatch {
                ring_count: raw.ring_count,
                sector_lists: raw.sectors_per_ring.len(),
            });
        }
        if let Some(ring) = raw.sectors_per_ring.iter().position(|&n| n == 0) {
            return Err(ConfigViolation::EmptyRing { ring });
        }
        if !raw.inner_radius.is_finite() || raw.inner_radius < 0.0 {
            return Err(ConfigViolation::BadInnerRadius(raw.inner_radius));
        }
        if !raw.outer_radius.is_finite() {
            return Err(ConfigViolation::BadOuterRadius(raw.outer_radius));
        }
        if raw.inner_radius >= raw.outer_radius {
            return Err(ConfigViolation::RadiiNotIncreasing {
                inner: raw.inner_radius,
                outer: raw.outer_radius,
            });
        }
        // every ring edge must land strictly past the one before it in f64
        let width = (raw.outer_radius - raw.inner_radius) / raw.ring_count as f64;
        let mut previous = raw.inner_radius;
        for ring in 0..raw.ring_count {
            let edge = if ring + 1 == raw.ring_count {
                raw.outer_radius
            } else {
                raw.inner_radius + (ring + 1) as f64 * width
            };
            if edge <= previous {
                return Err(ConfigViolation::RingTooThin { ring });
            }
            previous = edge;
        }
        if !raw.center.is_finite() {
            return Err(ConfigViolation::BadCenter(raw.center));
        }
        if !raw.start_angle.is_finite() {
            return Err(ConfigViolation::BadStartAngle(raw.start_angle));
        }

        Ok(Self {
            sectors_per_ring: raw.sectors_per_ring,
            center: raw.center,
            inner_radius: raw.inner_radius,
            outer_radius: raw.outer_radius,
            start_angle: normalize_angle(raw.start_angle),
        })
    }
}

impl From<BoardConfig> for RawBoardConfig {
    fn from(config: BoardConfig) -> Self {
        Self {
            ring_count: config.ring_count(),
            sectors_per_ring: config.sectors_per_ring,
            center: config.center,
            inner_radius: config.inner_radius,
            outer_radius: config.outer_radius,
            start_angle: config.start_angle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawBoardConfig {
        RawBoardConfig {
            ring_count: 2,
            sectors_per_ring: vec![4, 8],
            center: Point::default(),
            inner_radius: 10.0,
            outer_radius: 50.0,
            start_angle: 0.0,
        }
    }

    #[test]
    fn test_valid_config_accessors() {
        let config = BoardConfig::try_from(raw()).unwrap();
        assert_eq!(config.ring_count(), 2);
        assert_eq!(config.sectors_per_ring(), &[4, 8]);
        assert_eq!(config.sector_count(1), Ok(8));
        assert_eq!(config.ring_width(), 20.0);
        assert_eq!(config.center(), Point::new(0.0, 0.0));
    }

    fn rejects(mutate: impl FnOnce(&mut RawBoardConfig)) -> ConfigViolation {
        let mut r = raw();
        mutate(&mut r);
        BoardConfig::try_from(r).unwrap_err()
    }

    #[test]
    fn test_each_violation_is_rejected() {
        assert_eq!(
            rejects(|r| {
                r.ring_count = 0;
                r.sectors_per_ring.clear();
            }),
            ConfigViolation::NoRings
        );
        assert_eq!(
            rejects(|r| r.ring_count = 3),
            ConfigViolation::SectorListMismatch {
                ring_count: 3,
                sector_lists: 2
            }
        );
        assert_eq!(
            rejects(|r| r.sectors_per_ring[1] = 0),
            ConfigViolation::EmptyRing { ring: 1 }
        );
        assert_eq!(
            rejects(|r| r.inner_radius = -1.0),
            ConfigViolation::BadInnerRadius(-1.0)
        );
        assert_eq!(
            rejects(|r| r.outer_radius = f64::INFINITY),
            ConfigViolation::BadOuterRadius(f64::INFINITY)
        );
        assert_eq!(
            rejects(|r| r.inner_radius = 50.0),
            ConfigViolation::RadiiNotIncreasing {
                inner: 50.0,
                outer: 50.0
            }
        );
        assert_eq!(
            rejects(|r| {
                r.ring_count = 8;
                r.sectors_per_ring = vec![4; 8];
                r.inner_radius = 1e16;
                r.outer_radius = 1e16 + 4.0;
            }),
            ConfigViolation::RingTooThin { ring: 0 }
        );
        assert_eq!(
            rejects(|r| r.center = Point::new(f64::INFINITY, 0.0)),
            ConfigViolation::BadCenter(Point::new(f64::INFINITY, 0.0))
        );
    }

    #[test]
    fn test_new_reports_invalid_config_error() {
        let err = BoardConfig::new(1, vec![4], Point::default(), 5.0, 5.0).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidConfig(_)));
        assert!(!err.is_out_of_range());
    }

    #[test]
    fn test_nan_start_angle_rejected() {
        let config = BoardConfig::try_from(raw()).unwrap();
        assert!(config.with_start_angle(f64::NAN).is_err());
    }

    #[test]
    fn test_start_angle_is_reduced() {
        let config = BoardConfig::try_from(raw()).unwrap();
        let turned = config.clone().with_start_angle(1e12).unwrap();
        assert!((0.0..std::f64::consts::TAU).contains(&turned.start_angle()));
        let back = config.with_start_angle(-std::f64::consts::FRAC_PI_2).unwrap();
        assert!((back.start_angle() - 1.5 * std::f64::consts::PI).abs() < 1e-12);

        let mut r = raw();
        r.start_angle = -1e12;
        let from_raw = BoardConfig::try_from(r).unwrap();
        assert!((0.0..std::f64::consts::TAU).contains(&from_raw.start_angle()));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: BoardConfig = serde_json::from_str(
            r#"{"ring_count": 1, "sectors_per_ring": [6], "inner_radius": 0, "outer_radius": 1}"#,
        )
        .unwrap();
        assert_eq!(ok.sector_count(0), Ok(6));
        assert_eq!(ok.start_angle(), 0.0);

        let bad = serde_json::from_str::<BoardConfig>(
            r#"{"ring_count": 2, "sectors_per_ring": [6], "inner_radius": 0, "outer_radius": 1}"#,
        );
        assert!(bad.unwrap_err().to_string().contains("2 rings"));
    }

    #[test]
    fn test_sector_count_out_of_range() {
        let config = BoardConfig::try_from(raw()).unwrap();
        assert_eq!(
            config.sector_count(2),
            Err(GeometryError::RingOutOfRange {
                ring: 2,
                ring_count: 2
            })
        );
    }
}
