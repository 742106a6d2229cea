// Position state, capability model, descriptor codec and notation resolver
pub mod board;
pub mod error;
pub mod fen;
pub mod notation;
pub mod piece;
pub mod square;

// Re-export main types for convenience
pub use board::{Board, CastlingRights};
pub use error::NotationError;
pub use notation::{resolve, ResolvedMove, SideEffect};
pub use piece::{Color, Piece, PieceType};
pub use square::Square;
