use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("ring {ring} is out of range (board has {ring_count} rings)")]
    RingOutOfRange { ring: usize, ring_count: usize },
    #[error("sector {sector} is out of range for ring {ring} ({sector_count} sectors)")]
    SectorOutOfRange {
        ring: usize,
        sector: usize,
        sector_count: usize,
    },
    #[error("invalid board config: {0}")]
    InvalidConfig(#[from] ConfigViolation),
}

impl GeometryError {
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::RingOutOfRange { .. } | Self::SectorOutOfRange { .. }
        )
    }
}

/// A broken invariant found while constructing a [`crate::BoardConfig`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigViolation {
    #[error("ring count must be positive")]
    NoRings,
    #[error("{sector_lists} sector counts given for {ring_count} rings")]
    SectorListMismatch {
        ring_count: usize,
        sector_lists: usize,
    },
    #[error("ring {ring} has no sectors")]
    EmptyRing { ring: usize },
    #[error("inner radius {0} must be finite and non-negative")]
    BadInnerRadius(f64),
    #[error("outer radius {0} must be finite")]
    BadOuterRadius(f64),
    #[error("inner radius {inner} must be smaller than outer radius {outer}")]
    RadiiNotIncreasing { inner: f64, outer: f64 },
    #[error("ring {ring} has no radial width at this radius and ring count")]
    RingTooThin { ring: usize },
    #[error("center {0} must be finite")]
    BadCenter(crate::Point),
    #[error("start angle {0} must be finite")]
    BadStartAngle(f64),
}
