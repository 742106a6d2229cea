//! Move-notation resolver.
//!
//! Parses one short-form move token, classifies it against five grammars in
//! a fixed precedence order (castling tokens, piece moves, square pairs,
//! pawn pushes, pawn captures) and applies the first match through the
//! board's mutation primitives. Every grammar anchors only at the start of
//! the token, so trailing annotations such as `+`, `#` or `=Q` are ignored.
//!
//! Resolution is notation-driven, not rules-driven: there is no check
//! detection, no path-blocking for sliding pieces and no en-passant
//! handling. A token either resolves against the current position or the
//! whole call fails without mutating the board.

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Board, Color, NotationError, PieceType, Square};

static PIECE_MOVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([BNRQK])([a-h])?x?([a-h][1-8])").unwrap());
static SQUARE_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-h][1-8])-?([a-h][1-8])").unwrap());
static PAWN_PUSH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[a-h][1-8]-)?([a-h][1-8])").unwrap());
static PAWN_CAPTURE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-h])x([a-h][1-8])").unwrap());
static PAWN_CAPTURE_LONG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-h])[1-8]x([a-h][1-8])").unwrap());

/// Side effect of a resolved move beyond the origin/destination relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    None,
    KingCastle,
    QueenCastle,
}

/// A successfully resolved and applied move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMove {
    pub origin: Square,
    pub destination: Square,
    pub side_effect: SideEffect,
}

impl ResolvedMove {
    /// Long-form rendering. Castling renders as the king's relocation and
    /// carries no extra marker.
    pub fn long_algebraic(&self) -> String {
        format!("{}{}", self.origin, self.destination)
    }
}

/// Resolves `token` against `board` and applies it.
///
/// On success the side to move has flipped and the clocks have advanced; on
/// error the board is untouched.
pub fn resolve(board: &mut Board, token: &str) -> Result<ResolvedMove, NotationError> {
    let token = token.trim();
    let resolved = classify(board, token)?;
    board.finish_move();
    debug!("resolved `{token}` as {}", resolved.long_algebraic());
    Ok(resolved)
}

fn classify(board: &mut Board, token: &str) -> Result<ResolvedMove, NotationError> {
    if matches!(token, "O-O" | "o-o" | "0-0") {
        return castle(board, 'k', token);
    }
    if matches!(token, "O-O-O" | "o-o-o" | "0-0-0") {
        return castle(board, 'q', token);
    }
    if let Some(caps) = PIECE_MOVE.captures(token) {
        return piece_move(board, &caps, token);
    }
    if let Some(caps) = SQUARE_PAIR.captures(token) {
        return square_pair(board, &caps, token);
    }
    if let Some(caps) = PAWN_PUSH.captures(token) {
        let destination = capture_square(&caps, 1, token)?;
        return pawn_push(board, destination, token);
    }
    if let Some(caps) = PAWN_CAPTURE.captures(token) {
        return pawn_capture(board, &caps, token);
    }
    if let Some(caps) = PAWN_CAPTURE_LONG.captures(token) {
        // same group layout as the short form, so no rewriting is needed
        return pawn_capture(board, &caps, token);
    }
    Err(NotationError::InvalidMoveToken(token.to_string()))
}

fn unresolved(token: &str, square: Square) -> NotationError {
    NotationError::UnresolvedOrigin {
        token: token.to_string(),
        square,
    }
}

fn capture_square(
    caps: &regex::Captures<'_>,
    group: usize,
    token: &str,
) -> Result<Square, NotationError> {
    caps.get(group)
        .and_then(|m| Square::from_algebraic(m.as_str()))
        .ok_or_else(|| NotationError::InvalidMoveToken(token.to_string()))
}

fn backward_step(color: Color) -> i8 {
    match color {
        Color::White => -1,
        Color::Black => 1,
    }
}

/// Executes a castle for the side to move. `side` is `k` or `q`; anything
/// else is a caller bug and is reported as such.
fn castle(board: &mut Board, side: char, token: &str) -> Result<ResolvedMove, NotationError> {
    let color = board.side_to_move();
    let rank = match color {
        Color::White => 1,
        Color::Black => 8,
    };

    let (rook_from_file, rook_to_file, king_to_file, side_effect) = match side {
        'k' => (8, 6, 7, SideEffect::KingCastle),
        'q' => (1, 4, 3, SideEffect::QueenCastle),
        other => return Err(NotationError::UnknownCastleSide(other)),
    };

    let king_from = Square { file: 5, rank };
    let king_to = Square { file: king_to_file, rank };
    let rook_from = Square { file: rook_from_file, rank };
    let rook_to = Square { file: rook_to_file, rank };

    // resolve both movers before touching the board
    if board.piece_at(king_from).map(|piece| piece.kind) != Some(PieceType::King) {
        return Err(unresolved(token, king_from));
    }
    if board.piece_at(rook_from).map(|piece| piece.kind) != Some(PieceType::Rook) {
        return Err(unresolved(token, rook_from));
    }

    board.castling_mut().clear_for(color);
    board.relocate(king_from, king_to);
    board.relocate(rook_from, rook_to);

    Ok(ResolvedMove {
        origin: king_from,
        destination: king_to,
        side_effect,
    })
}

/// `[KQBNR](<origin-file>)?x?<square>`: disambiguation search over the
/// stored pieces, then relocation with an optional capture.
fn piece_move(
    board: &mut Board,
    caps: &regex::Captures<'_>,
    token: &str,
) -> Result<ResolvedMove, NotationError> {
    let letter = caps[1]
        .chars()
        .next()
        .ok_or_else(|| NotationError::InvalidMoveToken(token.to_string()))?;
    let kind = PieceType::from_letter(letter)
        .ok_or_else(|| NotationError::InvalidMoveToken(token.to_string()))?;
    let hint = caps.get(2).and_then(|m| m.as_str().chars().next());
    let destination = capture_square(caps, 3, token)?;

    let origin = find_candidate(board, kind, board.side_to_move(), destination, hint)
        .ok_or_else(|| unresolved(token, destination))?;

    // the capture marker is not required to match an occupied destination;
    // removing from an empty square is a tolerated no-op
    board.remove(destination);
    board.relocate(origin, destination);

    Ok(ResolvedMove {
        origin,
        destination,
        side_effect: SideEffect::None,
    })
}

/// First stored piece of the right color and kind that can reach
/// `destination` and matches the origin-file hint. Store order is decode
/// order, so the earliest-decoded candidate wins ambiguous notations.
fn find_candidate(
    board: &Board,
    kind: PieceType,
    color: Color,
    destination: Square,
    hint: Option<char>,
) -> Option<Square> {
    for piece in board.pieces() {
        if piece.color != color || piece.kind != kind {
            continue;
        }
        if !piece.can_reach(destination) {
            continue;
        }
        if let Some(hint) = hint {
            if piece.square.file_char() != hint {
                trace!(
                    "skipping {} on {}: origin-file hint `{hint}`",
                    piece.symbol(),
                    piece.square
                );
                continue;
            }
        }
        return Some(piece.square);
    }
    None
}

/// `<square>-?<square>`: direct relocation with no piece-type check, except
/// that king moves along the canonical castling squares re-dispatch to
/// castling even without castling notation.
fn square_pair(
    board: &mut Board,
    caps: &regex::Captures<'_>,
    token: &str,
) -> Result<ResolvedMove, NotationError> {
    let origin = capture_square(caps, 1, token)?;
    let destination = capture_square(caps, 2, token)?;

    let kind = board
        .piece_at(origin)
        .map(|piece| piece.kind)
        .ok_or_else(|| unresolved(token, origin))?;

    if kind == PieceType::King {
        if let Some(side) = castle_side_for(origin, destination) {
            return castle(board, side, token);
        }
    }

    board.remove(destination);
    board.relocate(origin, destination);

    Ok(ResolvedMove {
        origin,
        destination,
        side_effect: SideEffect::None,
    })
}

fn castle_side_for(origin: Square, destination: Square) -> Option<char> {
    match (origin.file, origin.rank, destination.file, destination.rank) {
        (5, 1, 7, 1) | (5, 8, 7, 8) => Some('k'),
        (5, 1, 3, 1) | (5, 8, 3, 8) => Some('q'),
        _ => None,
    }
}

/// Destination-only pawn push. The origin is one square behind the
/// destination for the side to move, falling back to two squares behind
/// when that square is empty (the initial double push). Whether the origin
/// piece is actually a pawn of the moving side is not checked.
fn pawn_push(
    board: &mut Board,
    destination: Square,
    token: &str,
) -> Result<ResolvedMove, NotationError> {
    let back = backward_step(board.side_to_move());

    let one_back = destination
        .offset_rank(back)
        .filter(|square| board.piece_at(*square).is_some());
    let origin = match one_back {
        Some(square) => square,
        None => destination
            .offset_rank(2 * back)
            .filter(|square| board.piece_at(*square).is_some())
            .ok_or_else(|| unresolved(token, destination))?,
    };

    board.relocate(origin, destination);

    Ok(ResolvedMove {
        origin,
        destination,
        side_effect: SideEffect::None,
    })
}

/// `<file>x<square>`: the origin is the given file one rank behind the
/// destination. Unlike piece moves, the capture is strict: the destination
/// must hold a victim.
fn pawn_capture(
    board: &mut Board,
    caps: &regex::Captures<'_>,
    token: &str,
) -> Result<ResolvedMove, NotationError> {
    let file = caps[1]
        .chars()
        .next()
        .ok_or_else(|| NotationError::InvalidMoveToken(token.to_string()))?;
    let destination = capture_square(caps, 2, token)?;

    let back = backward_step(board.side_to_move());
    let origin = Square::new((file as u8) - b'a' + 1, destination.rank)
        .and_then(|square| square.offset_rank(back))
        .ok_or_else(|| unresolved(token, destination))?;

    if board.piece_at(origin).is_none() {
        return Err(unresolved(token, origin));
    }
    if board.piece_at(destination).is_none() {
        return Err(unresolved(token, destination));
    }

    board.remove(destination);
    board.relocate(origin, destination);

    Ok(ResolvedMove {
        origin,
        destination,
        side_effect: SideEffect::None,
    })
}
