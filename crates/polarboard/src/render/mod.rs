pub mod svg;
pub mod theme;

#[cfg(feature = "png")]
pub mod raster;

use crate::config::CanvasConfig;
use palette::Srgba;
use polargeom::{BoardConfig, CellCoordinate, CellShape, GeometryError, Point};
use std::collections::BTreeSet;
use std::path::Path;
use strum::Display as StrumDisplay;
use thiserror::Error;
use theme::ThemeColors;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0} output is not available in this build")]
    FormatUnavailable(OutputFormat),
    #[cfg(feature = "png")]
    #[error(transparent)]
    Cairo(#[from] cairo::Error),
    #[cfg(feature = "png")]
    #[error(transparent)]
    Png(#[from] cairo::IoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay, clap::ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    /// Guesses from the file extension, defaulting to SVG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Self::Png,
            _ => Self::Svg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum CellState {
    Selected,
    Neighbor,
    Light,
    Dark,
}

impl CellState {
    /// Determines the visual state of a cell based on priority:
    /// 1. Selected (the highlighted cell)
    /// 2. Neighbor (adjacent to the highlighted cell)
    /// 3. Light/Dark checkering by ring + sector parity
    fn resolve(
        coord: CellCoordinate,
        highlight: Option<CellCoordinate>,
        near: &BTreeSet<CellCoordinate>,
    ) -> Self {
        if highlight == Some(coord) {
            Self::Selected
        } else if near.contains(&coord) {
            Self::Neighbor
        } else if (coord.ring + coord.sector) % 2 == 0 {
            Self::Light
        } else {
            Self::Dark
        }
    }

    fn color(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self {
            Self::Selected => colors.selected,
            Self::Neighbor => colors.neighbor,
            Self::Light => colors.light,
            Self::Dark => colors.dark,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CellPaint {
    pub coord: CellCoordinate,
    pub shape: CellShape,
    pub state: CellState,
    pub color: Srgba<f64>,
}

#[derive(Debug, Clone)]
pub struct Hub {
    pub center: Point,
    pub radius: f64,
    pub color: Srgba<f64>,
}

/// Everything needed to draw one frame of the board, in board coordinates.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Option<Srgba<f64>>,
    pub stroke: Srgba<f64>,
    pub stroke_width: f64,
    pub cells: Vec<CellPaint>,
    pub hub: Option<Hub>,
}

impl Scene {
    pub fn build(
        board: &BoardConfig,
        colors: &ThemeColors,
        canvas: &CanvasConfig,
        highlight: Option<CellCoordinate>,
    ) -> Result<Self, RenderError> {
        let near = match highlight {
            Some(coord) => polargeom::neighbors(board, coord)?,
            None => BTreeSet::new(),
        };

        let cells = polargeom::cells(board)
            .map(|coord| {
                let shape = polargeom::cell_shape(board, coord)?;
                let state = CellState::resolve(coord, highlight, &near);
                Ok(CellPaint {
                    coord,
                    shape,
                    state,
                    color: state.color(colors),
                })
            })
            .collect::<Result<Vec<_>, GeometryError>>()?;

        let hub = (board.inner_radius() > 0.0).then(|| Hub {
            center: board.center(),
            radius: board.inner_radius(),
            color: colors.hub,
        });

        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            background: colors.background,
            stroke: colors.stroke,
            stroke_width: canvas.stroke_width,
            cells,
            hub,
        })
    }
}

pub fn write_scene(scene: &Scene, path: &Path, format: OutputFormat) -> Result<(), RenderError> {
    match format {
        OutputFormat::Svg => {
            fs_err::write(path, svg::render(scene))?;
        }
        #[cfg(feature = "png")]
        OutputFormat::Png => raster::render_png(scene, path)?,
        #[cfg(not(feature = "png"))]
        OutputFormat::Png => return Err(RenderError::FormatUnavailable(format)),
    }
    log::info!("wrote {} ({format})", path.display());
    Ok(())
}
