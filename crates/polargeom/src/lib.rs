//! Polar board geometry: concentric rings of angular sectors around a hub.
//!
//! Everything here is a pure function of a validated [`BoardConfig`], so the
//! whole crate is safe to share across threads without locking.

pub mod adjacency;
pub mod angle;
pub mod board;
pub mod cell;
pub mod error;
pub mod geometry;
pub mod point;

pub use adjacency::{Direction, neighbors, ray, step};
pub use board::{BoardConfig, RawBoardConfig};
pub use cell::{CellCoordinate, CellShape, ParseCellError};
pub use error::{ConfigViolation, GeometryError};
pub use geometry::{cell_count, cell_shape, cells, hit_test, ring_radii, ring_shapes, sector_width};
pub use point::Point;
