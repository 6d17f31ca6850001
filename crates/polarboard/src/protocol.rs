//! Line protocol spoken over the board socket and reused by the CLI.
//!
//! One request per line, one response per line:
//!
//! ```text
//! hit 20 0          -> cell 0 0
//! cell 0 0          -> shape 10 30 0 1.5707963267948966
//! neighbors 0 0     -> cells 0:1 0:3 1:0
//! step 0 3 cw       -> cell 0 0
//! ray 0 1 out       -> cells 1:2
//! reload            -> ok
//! ```

use polargeom::{BoardConfig, CellCoordinate, CellShape, Direction, Point};
use std::fmt;
use std::str::FromStr;
use strum::EnumString;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
enum Verb {
    Hit,
    Cell,
    Neighbors,
    Step,
    Ray,
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty request")]
    Empty,
    #[error("unknown request {0:?}")]
    UnknownVerb(String),
    #[error("{verb} expects {expected}")]
    Usage {
        verb: &'static str,
        expected: &'static str,
    },
    #[error("{0:?} is not a number")]
    BadNumber(String),
    #[error("{0:?} is not a direction")]
    BadDirection(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Hit(Point),
    Cell(CellCoordinate),
    Neighbors(CellCoordinate),
    Step(CellCoordinate, Direction),
    Ray(CellCoordinate, Direction),
    Reload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Cell(Option<CellCoordinate>),
    Shape(CellShape),
    Cells(Vec<CellCoordinate>),
    Ok,
    Error(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(Some(c)) => write!(f, "cell {} {}", c.ring, c.sector),
            Self::Cell(None) => write!(f, "none"),
            Self::Shape(s) => write!(
                f,
                "shape {} {} {} {}",
                s.inner_radius, s.outer_radius, s.start_angle, s.end_angle
            ),
            Self::Cells(cells) => {
                write!(f, "cells")?;
                for c in cells {
                    write!(f, " {c}")?;
                }
                Ok(())
            }
            Self::Ok => write!(f, "ok"),
            Self::Error(msg) => write!(f, "error {msg}"),
        }
    }
}

fn number<T: FromStr>(word: &str) -> Result<T, ProtocolError> {
    word.parse()
        .map_err(|_| ProtocolError::BadNumber(word.to_string()))
}

const CELL_USAGE: &str = "RING SECTOR";
const STEP_USAGE: &str = "RING SECTOR DIRECTION";

/// Accepts either `RING SECTOR` or a single `RING:SECTOR` word.
fn coordinate(verb: &'static str, args: &[&str]) -> Result<CellCoordinate, ProtocolError> {
    match args {
        [ring, sector] => Ok(CellCoordinate::new(number(ring)?, number(sector)?)),
        [joined] => joined.parse().map_err(|_| ProtocolError::BadNumber(joined.to_string())),
        _ => Err(ProtocolError::Usage {
            verb,
            expected: CELL_USAGE,
        }),
    }
}

fn coordinate_and_direction(
    verb: &'static str,
    args: &[&str],
) -> Result<(CellCoordinate, Direction), ProtocolError> {
    let (dir, coord_args) = args.split_last().ok_or(ProtocolError::Usage {
        verb,
        expected: STEP_USAGE,
    })?;
    let direction = dir
        .parse()
        .map_err(|_| ProtocolError::BadDirection(dir.to_string()))?;
    let coord = coordinate(verb, coord_args).map_err(|e| match e {
        ProtocolError::Usage { .. } => ProtocolError::Usage {
            verb,
            expected: STEP_USAGE,
        },
        other => other,
    })?;
    Ok((coord, direction))
}

impl FromStr for Request {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (&verb_word, args) = words.split_first().ok_or(ProtocolError::Empty)?;
        let verb = Verb::from_str(verb_word)
            .map_err(|_| ProtocolError::UnknownVerb(verb_word.to_string()))?;

        match verb {
            Verb::Hit => match args {
                [x, y] => Ok(Self::Hit(Point::new(number(x)?, number(y)?))),
                _ => Err(ProtocolError::Usage {
                    verb: "hit",
                    expected: "X Y",
                }),
            },
            Verb::Cell => coordinate("cell", args).map(Self::Cell),
            Verb::Neighbors => coordinate("neighbors", args).map(Self::Neighbors),
            Verb::Step => {
                coordinate_and_direction("step", args).map(|(c, d)| Self::Step(c, d))
            }
            Verb::Ray => coordinate_and_direction("ray", args).map(|(c, d)| Self::Ray(c, d)),
            Verb::Reload if args.is_empty() => Ok(Self::Reload),
            Verb::Reload => Err(ProtocolError::Usage {
                verb: "reload",
                expected: "no arguments",
            }),
        }
    }
}

/// Answers a geometry request against `board`. `Reload` only acknowledges;
/// the caller owns the side effect.
pub fn respond(board: &BoardConfig, request: &Request) -> Response {
    let result = match *request {
        Request::Hit(point) => Ok(Response::Cell(polargeom::hit_test(board, point))),
        Request::Cell(coord) => polargeom::cell_shape(board, coord).map(Response::Shape),
        Request::Neighbors(coord) => {
            polargeom::neighbors(board, coord).map(|set| Response::Cells(set.into_iter().collect()))
        }
        Request::Step(coord, dir) => polargeom::step(board, coord, dir).map(Response::Cell),
        Request::Ray(coord, dir) => polargeom::ray(board, coord, dir).map(Response::Cells),
        Request::Reload => Ok(Response::Ok),
    };
    result.unwrap_or_else(|e| Response::Error(e.to_string()))
}

/// Parses and answers one protocol line.
pub fn answer_line(board: &BoardConfig, line: &str) -> (Option<Request>, Response) {
    match line.parse::<Request>() {
        Ok(request) => {
            let response = respond(board, &request);
            (Some(request), response)
        }
        Err(e) => (None, Response::Error(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> BoardConfig {
        BoardConfig::new(2, vec![4, 8], Point::default(), 10.0, 50.0).unwrap()
    }

    fn ask(line: &str) -> String {
        answer_line(&scenario(), line).1.to_string()
    }

    #[test]
    fn test_parse_requests() {
        assert_eq!(
            "hit 20 -0.5".parse(),
            Ok(Request::Hit(Point::new(20.0, -0.5)))
        );
        assert_eq!(
            "  CELL 1 3 ".parse(),
            Ok(Request::Cell(CellCoordinate::new(1, 3)))
        );
        assert_eq!(
            "neighbors 1:3".parse(),
            Ok(Request::Neighbors(CellCoordinate::new(1, 3)))
        );
        assert_eq!(
            "step 0 3 cw".parse(),
            Ok(Request::Step(CellCoordinate::new(0, 3), Direction::Clockwise))
        );
        assert_eq!(
            "ray 0:1 Outward".parse(),
            Ok(Request::Ray(CellCoordinate::new(0, 1), Direction::Outward))
        );
        assert_eq!("reload".parse(), Ok(Request::Reload));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Request>(), Err(ProtocolError::Empty));
        assert_eq!(
            "jump 1 2".parse::<Request>(),
            Err(ProtocolError::UnknownVerb("jump".into()))
        );
        assert_eq!(
            "hit 1".parse::<Request>(),
            Err(ProtocolError::Usage {
                verb: "hit",
                expected: "X Y"
            })
        );
        assert_eq!(
            "cell one 2".parse::<Request>(),
            Err(ProtocolError::BadNumber("one".into()))
        );
        assert_eq!(
            "step 0 1 up".parse::<Request>(),
            Err(ProtocolError::BadDirection("up".into()))
        );
        assert_eq!(
            "step 0 1 2 cw".parse::<Request>(),
            Err(ProtocolError::Usage {
                verb: "step",
                expected: STEP_USAGE
            })
        );
        assert!("reload now".parse::<Request>().is_err());
    }

    #[test]
    fn test_responses() {
        assert_eq!(ask("hit 0 0"), "none");
        assert_eq!(ask("hit 20 0"), "cell 0 0");
        assert_eq!(ask("hit 60 0"), "none");
        assert_eq!(ask("cell 0 0").split(' ').take(3).collect::<Vec<_>>(), ["shape", "10", "30"]);
        assert_eq!(ask("neighbors 0 0"), "cells 0:1 0:3 1:0");
        assert_eq!(ask("step 0 3 cw"), "cell 0 0");
        assert_eq!(ask("step 0 3 in"), "none");
        assert_eq!(ask("ray 0 1 out"), "cells 1:2");
        assert_eq!(ask("reload"), "ok");
    }

    #[test]
    fn test_geometry_errors_become_error_responses() {
        assert!(ask("cell 0 4").starts_with("error sector 4 is out of range"));
        assert!(ask("neighbors 2 0").starts_with("error ring 2"));
        assert!(ask("bogus").starts_with("error unknown request"));
    }
}
