use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Display, From)]
#[display("({x}, {y})")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `radius` away from `self` in direction `angle`.
    pub fn offset_polar(self, radius: f64, angle: f64) -> Self {
        Self::new(self.x + radius * angle.cos(), self.y + radius * angle.sin())
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle of `other` as seen from `self`, in `(-PI, PI]`.
    pub fn angle_to(self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_offset_polar_round_trips_through_angle_to() {
        let origin = Point::new(115.0, 115.0);
        let p = origin.offset_polar(100.0, FRAC_PI_2);

        assert!((p.x - 115.0).abs() < 1e-9);
        assert!((p.y - 215.0).abs() < 1e-9);
        assert!((origin.distance_to(p) - 100.0).abs() < 1e-9);
        assert!((origin.angle_to(p) - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_point_deserializes_from_object_and_tuple_conversion() {
        let p: Point = serde_json::from_str(r#"{"x": 1.5, "y": -2}"#).unwrap();
        assert_eq!(p, Point::from((1.5, -2.0)));
        assert_eq!(p.to_string(), "(1.5, -2)");
    }
}
