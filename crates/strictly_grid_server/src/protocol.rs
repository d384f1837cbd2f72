//! Line protocol: inbound commands and outbound responses.
//!
//! Commands are whitespace-separated tokens terminated by a newline:
//!
//! ```text
//! SIZE <n>
//! MOVE <mark> <row> <col>
//! ```
//!
//! Responses are `SIZE <n>`, `MOVE <mark> <row> <col>`, `WIN <mark>`, `DRAW`,
//! `INVALID_MOVE` and `ERROR <reason>`.

use std::fmt;
use strictly_grid::{BoardSize, Mark, Move, MoveReport, Outcome};
use tracing::instrument;

/// Longest accepted line in bytes, excluding the line terminator.
pub const MAX_LINE_LENGTH: usize = 1024;

/// A parsed inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a new game on a `n`×`n` board.
    Size(BoardSize),
    /// Place a mark. `claimed` is the mark the client believes is to move.
    Move {
        /// Mark named by the client.
        claimed: Mark,
        /// Requested row; may be negative on the wire.
        row: i64,
        /// Requested column; may be negative on the wire.
        col: i64,
    },
}

impl Command {
    /// Parses one protocol line.
    ///
    /// Returns `Ok(None)` for a blank line.
    #[instrument]
    pub fn parse(line: &str) -> Result<Option<Self>, ProtocolError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&keyword, args)) = tokens.split_first() else {
            return Ok(None);
        };

        match keyword {
            "SIZE" => {
                let [n] = expect_args::<1>("SIZE", args)?;
                let size = n
                    .parse::<BoardSize>()
                    .map_err(|_| ProtocolError::InvalidSize(n.to_string()))?;
                Ok(Some(Command::Size(size)))
            }
            "MOVE" => {
                let [mark, row, col] = expect_args::<3>("MOVE", args)?;
                let claimed = mark
                    .parse::<Mark>()
                    .map_err(|_| ProtocolError::InvalidMark(mark.to_string()))?;
                Ok(Some(Command::Move {
                    claimed,
                    row: parse_coordinate(row)?,
                    col: parse_coordinate(col)?,
                }))
            }
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

fn expect_args<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ProtocolError> {
    <[&str; N]>::try_from(args).map_err(|_| ProtocolError::WrongArity {
        command,
        expected: N,
        found: args.len(),
    })
}

fn parse_coordinate(token: &str) -> Result<i64, ProtocolError> {
    token
        .parse::<i64>()
        .map_err(|_| ProtocolError::InvalidNumber(token.to_string()))
}

/// A line that could not be parsed as a command.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ProtocolError {
    /// Keyword is not `SIZE` or `MOVE`.
    #[display("Unknown command '{}'", _0)]
    UnknownCommand(#[error(not(source))] String),

    /// Wrong number of arguments.
    #[display("{} expects {} argument(s), got {}", command, expected, found)]
    WrongArity {
        /// The command keyword.
        command: &'static str,
        /// Arguments required.
        expected: usize,
        /// Arguments given.
        found: usize,
    },

    /// Coordinate is not an integer.
    #[display("Invalid number '{}'", _0)]
    InvalidNumber(#[error(not(source))] String),

    /// Mark is not X or O.
    #[display("Invalid mark '{}'", _0)]
    InvalidMark(#[error(not(source))] String),

    /// Board size is zero or not an integer.
    #[display("Invalid board size '{}'", _0)]
    InvalidSize(#[error(not(source))] String),

    /// Line is longer than [`MAX_LINE_LENGTH`] bytes.
    #[display("Line exceeds {} bytes", limit)]
    LineTooLong {
        /// The byte limit.
        limit: usize,
    },

    /// Line bytes are not UTF-8.
    #[display("Line is not valid UTF-8")]
    InvalidUtf8,
}

/// An outbound protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Board (re)initialized.
    Size(BoardSize),
    /// A mark was placed.
    Move(Move),
    /// The last move won the game.
    Win(Mark),
    /// The last move filled the board without a winner.
    Draw,
    /// The move broke a rule; nothing changed.
    InvalidMove,
    /// The line could not be handled.
    Error(String),
}

impl Response {
    /// Lines reporting an accepted move: the placement, then the result if the game ended.
    pub fn for_report(report: &MoveReport) -> Vec<Response> {
        let mut lines = vec![Response::Move(report.placed)];
        match report.outcome {
            Some(Outcome::Winner(mark)) => lines.push(Response::Win(mark)),
            Some(Outcome::Draw) => lines.push(Response::Draw),
            None => {}
        }
        lines
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Response::Error(err.to_string())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Size(size) => write!(f, "SIZE {}", size),
            Response::Move(m) => write!(f, "MOVE {} {} {}", m.mark, m.row, m.col),
            Response::Win(mark) => write!(f, "WIN {}", mark),
            Response::Draw => f.write_str("DRAW"),
            Response::InvalidMove => f.write_str("INVALID_MOVE"),
            Response::Error(reason) => write!(f, "ERROR {}", reason.replace(['\r', '\n'], " ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> BoardSize {
        BoardSize::new(n).unwrap()
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(Command::parse("SIZE 4"), Ok(Some(Command::Size(size(4)))));
        assert_eq!(Command::parse("  SIZE   5 \r"), Ok(Some(Command::Size(size(5)))));
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(
            Command::parse("MOVE O 2 1"),
            Ok(Some(Command::Move {
                claimed: Mark::O,
                row: 2,
                col: 1
            }))
        );
    }

    #[test]
    fn test_negative_coordinates_parse() {
        assert_eq!(
            Command::parse("MOVE X -1 0"),
            Ok(Some(Command::Move {
                claimed: Mark::X,
                row: -1,
                col: 0
            }))
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   \t"), Ok(None));
    }

    #[test]
    fn test_malformed_lines() {
        assert!(matches!(Command::parse("JUMP"), Err(ProtocolError::UnknownCommand(_))));
        assert!(matches!(Command::parse("size 3"), Err(ProtocolError::UnknownCommand(_))));
        assert!(matches!(
            Command::parse("SIZE"),
            Err(ProtocolError::WrongArity { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            Command::parse("MOVE X 1"),
            Err(ProtocolError::WrongArity { expected: 3, found: 2, .. })
        ));
        assert!(matches!(Command::parse("SIZE 0"), Err(ProtocolError::InvalidSize(_))));
        assert!(matches!(Command::parse("SIZE big"), Err(ProtocolError::InvalidSize(_))));
        assert!(matches!(Command::parse("MOVE Q 1 1"), Err(ProtocolError::InvalidMark(_))));
        assert!(matches!(Command::parse("MOVE X a 1"), Err(ProtocolError::InvalidNumber(_))));
    }

    #[test]
    fn test_response_lines() {
        assert_eq!(Response::Size(size(3)).to_string(), "SIZE 3");
        assert_eq!(Response::Move(Move::new(Mark::O, 0, 2)).to_string(), "MOVE O 0 2");
        assert_eq!(Response::Win(Mark::X).to_string(), "WIN X");
        assert_eq!(Response::Draw.to_string(), "DRAW");
        assert_eq!(Response::InvalidMove.to_string(), "INVALID_MOVE");
        assert_eq!(
            Response::from(ProtocolError::InvalidMark("Q".into())).to_string(),
            "ERROR Invalid mark 'Q'"
        );
        assert_eq!(
            Response::from(ProtocolError::LineTooLong { limit: 8 }).to_string(),
            "ERROR Line exceeds 8 bytes"
        );
    }

    #[test]
    fn test_protocol_errors_have_no_source() {
        use std::error::Error;

        assert!(ProtocolError::UnknownCommand("JUMP".into()).source().is_none());
        assert!(ProtocolError::InvalidUtf8.source().is_none());
    }

    #[test]
    fn test_report_lines() {
        let placed = Move::new(Mark::X, 1, 1);
        assert_eq!(
            Response::for_report(&MoveReport::new(placed, None)),
            vec![Response::Move(placed)]
        );
        assert_eq!(
            Response::for_report(&MoveReport::new(placed, Some(Outcome::Draw))),
            vec![Response::Move(placed), Response::Draw]
        );
    }
}
