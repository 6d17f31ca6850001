use crate::angle::{scale_index, wrap_index};
use crate::geometry::check_cell;
use crate::{BoardConfig, CellCoordinate, GeometryError};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::collections::BTreeSet;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

/// One step across the board. Clockwise increases the sector index, which on
/// a y-down screen turns clockwise.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[strum(to_string = "clockwise", serialize = "cw")]
    Clockwise,
    #[strum(to_string = "counterclockwise", serialize = "ccw", serialize = "anticlockwise")]
    CounterClockwise,
    #[strum(to_string = "outward", serialize = "out")]
    Outward,
    #[strum(to_string = "inward", serialize = "in")]
    Inward,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
            Self::Outward => Self::Inward,
            Self::Inward => Self::Outward,
        }
    }

    pub fn is_radial(self) -> bool {
        matches!(self, Self::Outward | Self::Inward)
    }
}

/// The cell one step from `coord` in `direction`.
///
/// Angular steps wrap around the ring. Radial steps land on the sector of the
/// next ring found by scaling the index with the ratio of sector counts,
/// rounded down, and return `None` past the innermost or outermost ring.
pub fn step(
    config: &BoardConfig,
    coord: CellCoordinate,
    direction: Direction,
) -> Result<Option<CellCoordinate>, GeometryError> {
    let count = check_cell(config, coord)?;
    let CellCoordinate { ring, sector } = coord;

    let next = match direction {
        Direction::Clockwise => Some(CellCoordinate::new(ring, wrap_index(sector, 1, count))),
        Direction::CounterClockwise => {
            Some(CellCoordinate::new(ring, wrap_index(sector, -1, count)))
        }
        Direction::Outward => (ring + 1 < config.ring_count()).then(|| {
            let target = config.sectors_per_ring()[ring + 1];
            CellCoordinate::new(ring + 1, scale_index(sector, count, target))
        }),
        Direction::Inward => ring.checked_sub(1).map(|inner| {
            let target = config.sectors_per_ring()[inner];
            CellCoordinate::new(inner, scale_index(sector, count, target))
        }),
    };
    Ok(next)
}

/// Cells adjacent to `coord`: both angular neighbors on its ring and the
/// mapped cell on each adjacent ring. A cell is never its own neighbor.
pub fn neighbors(
    config: &BoardConfig,
    coord: CellCoordinate,
) -> Result<BTreeSet<CellCoordinate>, GeometryError> {
    let mut found = BTreeSet::new();
    for direction in Direction::iter() {
        if let Some(next) = step(config, coord, direction)?
            && next != coord
        {
            found.insert(next);
        }
    }
    Ok(found)
}

/// Cells reached by stepping repeatedly from `coord` in `direction`,
/// excluding `coord` itself. Radial rays stop at the hub or the rim; angular
/// rays stop before coming back around to `coord`.
pub fn ray(
    config: &BoardConfig,
    coord: CellCoordinate,
    direction: Direction,
) -> Result<Vec<CellCoordinate>, GeometryError> {
    let mut cells = Vec::new();
    let mut current = coord;
    while let Some(next) = step(config, current, direction)? {
        if next == coord {
            break;
        }
        cells.push(next);
        current = next;
    }
    Ok(cells)
}
