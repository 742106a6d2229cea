use thiserror::Error;

use crate::Square;

/// Errors surfaced by the codec and the move-notation resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// The strict placement validator rejected the string. The permissive
    /// decode path never raises this.
    #[error("malformed board descriptor: {0}")]
    MalformedDescriptor(String),

    /// A move implies a piece on a square that holds none.
    #[error("no piece available for move `{token}` at {square}")]
    UnresolvedOrigin { token: String, square: Square },

    /// Castling execution was asked for a side other than `k` or `q`.
    #[error("cannot castle to unknown side `{0}`")]
    UnknownCastleSide(char),

    /// The token matched none of the known move grammars.
    #[error("unrecognized move token `{0}`")]
    InvalidMoveToken(String),
}
