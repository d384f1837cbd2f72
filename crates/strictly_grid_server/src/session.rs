//! Protocol session: one peer's command stream driving one game engine.

use crate::config::{EngineMode, MarkAuthority, ServerConfig};
use crate::protocol::{Command, MAX_LINE_LENGTH, ProtocolError, Response};
use crate::registry::{SessionId, SessionManager};
use strictly_grid::{BoardSize, GameEngine, Mark};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

/// Server-side context for one connected peer.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    game_key: SessionId,
    registry: SessionManager,
    engine_mode: EngineMode,
    mark_authority: MarkAuthority,
    max_board_size: BoardSize,
}

impl Session {
    /// Creates the session for connection `id`, resolving its game through `registry`.
    #[instrument(skip_all)]
    pub fn new(id: impl Into<String>, registry: SessionManager, config: &ServerConfig) -> Self {
        let id = id.into();
        let engine_mode = *config.engine_mode();
        let game_key = engine_mode.session_key(&id);
        debug!(session = %id, game_key = %game_key, "Session created");
        Self {
            id,
            game_key,
            registry,
            engine_mode,
            mark_authority: *config.mark_authority(),
            max_board_size: *config.max_board_size(),
        }
    }

    /// Connection id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Registry key of the game this session drives.
    pub fn game_key(&self) -> &str {
        &self.game_key
    }

    /// Handles one inbound line, returning the lines to send back.
    ///
    /// Blank lines yield nothing. Malformed lines yield a single `ERROR`.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn handle_line(&self, line: &str) -> Vec<Response> {
        match Command::parse(line) {
            Ok(Some(command)) => self.handle_command(command),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Malformed command");
                vec![Response::from(e)]
            }
        }
    }

    /// Executes a parsed command against this session's engine.
    pub fn handle_command(&self, command: Command) -> Vec<Response> {
        match command {
            Command::Size(size) => self.configure(size),
            Command::Move { claimed, row, col } => self.play(claimed, row, col),
        }
    }

    fn configure(&self, size: BoardSize) -> Vec<Response> {
        if size > self.max_board_size {
            warn!(%size, max = %self.max_board_size, "Board size too large");
            return vec![Response::Error(format!(
                "Board size {} exceeds maximum {}",
                size, self.max_board_size
            ))];
        }
        self.registry
            .with_engine(&self.game_key, |engine| engine.configure(size));
        vec![Response::Size(size)]
    }

    fn play(&self, claimed: Mark, row: i64, col: i64) -> Vec<Response> {
        self.registry.with_engine(&self.game_key, |engine: &mut GameEngine| {
            let to_move = engine.current_mark();
            if claimed != to_move {
                match self.mark_authority {
                    MarkAuthority::Server => {
                        debug!(%claimed, %to_move, "Ignoring client mark");
                    }
                    MarkAuthority::Strict => {
                        info!(%claimed, %to_move, "Move rejected: not this mark's turn");
                        return vec![Response::InvalidMove];
                    }
                }
            }

            match engine.apply_move(row, col) {
                Ok(report) => {
                    if let Some(outcome) = report.outcome {
                        info!(%outcome, "Game over, next move starts a new game");
                    }
                    Response::for_report(&report)
                }
                Err(e) => {
                    info!(row, col, error = %e, "Move rejected");
                    vec![Response::InvalidMove]
                }
            }
        })
    }

    /// Reads lines from `reader` until EOF, writing each response line to `writer`.
    ///
    /// Returns the number of lines read. Lines that are too long or not UTF-8
    /// are answered with `ERROR` and the loop continues. The session's own
    /// game is released when the loop ends, whether by EOF or by an I/O error.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn run<R, W>(self, reader: R, mut writer: W) -> std::io::Result<u64>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Session started");
        let result = self.serve_lines(reader, &mut writer).await;
        self.close();
        match &result {
            Ok(lines) => info!(lines, "Session ended"),
            Err(e) => warn!(error = %e, "Session ended with transport error"),
        }
        result
    }

    async fn serve_lines<R, W>(&self, mut reader: R, writer: &mut W) -> std::io::Result<u64>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::with_capacity(MAX_LINE_LENGTH);
        let mut count = 0;
        while let Some(frame) = read_frame(&mut reader, &mut buf).await? {
            count += 1;
            let responses = match frame {
                Ok(line) => self.handle_line(line),
                Err(e) => {
                    warn!(error = %e, "Unreadable line");
                    vec![Response::from(e)]
                }
            };
            if responses.is_empty() {
                continue;
            }
            for response in responses {
                writer.write_all(format!("{}\n", response).as_bytes()).await?;
            }
            writer.flush().await?;
        }
        Ok(count)
    }

    fn close(&self) {
        if self.engine_mode == EngineMode::PerConnection {
            self.registry.remove(&self.game_key);
        }
    }
}

/// Reads the next line into `buf`, with its `\n` or `\r\n` terminator stripped.
///
/// Returns `None` at EOF. A line longer than [`MAX_LINE_LENGTH`] is consumed
/// through its terminator and reported as [`ProtocolError::LineTooLong`], so
/// at most `MAX_LINE_LENGTH + 1` bytes are buffered per line.
async fn read_frame<'a, R>(
    reader: &mut R,
    buf: &'a mut Vec<u8>,
) -> std::io::Result<Option<Result<&'a str, ProtocolError>>>
where
    R: AsyncBufRead + Unpin,
{
    let limit = MAX_LINE_LENGTH as u64 + 1;
    buf.clear();
    if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }

    if buf.last() != Some(&b'\n') && buf.len() > MAX_LINE_LENGTH {
        loop {
            buf.clear();
            let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
            if n == 0 || buf.last() == Some(&b'\n') {
                break;
            }
        }
        return Ok(Some(Err(ProtocolError::LineTooLong {
            limit: MAX_LINE_LENGTH,
        })));
    }

    let mut line: &[u8] = buf;
    if let Some(rest) = line.strip_suffix(b"\n") {
        line = rest.strip_suffix(b"\r").unwrap_or(rest);
    }
    Ok(Some(
        std::str::from_utf8(line).map_err(|_| ProtocolError::InvalidUtf8),
    ))
}
