//! Board-description codec.
//!
//! Converts six-field descriptors (`<placement> <side> <castling>
//! <en_passant> <halfmove> <fullmove>`) into a [`Board`] and back. The
//! decode path is deliberately permissive; strict structural checking of a
//! placement string is a separate entry point, [`validate_placement`].

use log::debug;

use crate::{Board, CastlingRights, Color, NotationError, Piece, Square};

/// Standard starting position descriptor.
pub const START_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const PLACEMENT_SYMBOLS: &str = "KQBNRPkqbnrp";

/// Decodes a board descriptor. Never fails: a missing or unknown side field
/// defaults to White, castling to no rights, en passant to none, and the
/// two clocks to 0 when absent or non-numeric.
pub fn decode(descriptor: &str) -> Board {
    let fields: Vec<&str> = descriptor.split_whitespace().collect();

    let mut board = Board::empty();

    let side = match fields.get(1) {
        Some(&"b") => Color::Black,
        _ => Color::White,
    };
    board.set_side_to_move(side);
    board.set_castling(CastlingRights::from_field(fields.get(2).copied().unwrap_or("-")));
    board.set_en_passant(fields.get(3).and_then(|field| Square::from_algebraic(field)));

    let halfmove_clock = numeric_field(fields.get(4), "halfmove clock");
    let fullmove_number = numeric_field(fields.get(5), "fullmove number");
    board.set_clocks(halfmove_clock, fullmove_number);

    decode_placement(&mut board, fields.first().copied().unwrap_or(""));
    board
}

fn numeric_field(field: Option<&&str>, name: &str) -> u32 {
    match field.and_then(|field| field.parse().ok()) {
        Some(value) => value,
        None => {
            debug!("descriptor {name} missing or non-numeric, using 0");
            0
        }
    }
}

/// Walks the placement string rank 8 down to rank 1, file a to file h. A
/// digit consumes that many empty files; any other character places a piece
/// and advances one file. Pieces are stored in walk order.
fn decode_placement(board: &mut Board, placement: &str) {
    let mut rank = 9i16;
    for line in placement.split('/') {
        rank -= 1;
        let mut file = 0i16;
        for ch in line.chars() {
            file += 1;
            if let Some(run) = ch.to_digit(10) {
                file += run as i16 - 1;
                continue;
            }
            let square = match square_at(file, rank) {
                Some(square) => square,
                // walked off the board; the strict validator rejects this
                None => continue,
            };
            match Piece::from_symbol(ch, square) {
                Some(piece) => board.place(piece),
                None => debug!("ignoring unknown placement symbol {ch:?} at {square}"),
            }
        }
    }
}

fn square_at(file: i16, rank: i16) -> Option<Square> {
    let file = u8::try_from(file).ok()?;
    let rank = u8::try_from(rank).ok()?;
    Square::new(file, rank)
}

/// Encodes the piece placement only. `flip` walks ranks bottom-up and files
/// right-to-left, giving the board as seen from the black side.
pub fn encode(board: &Board, flip: bool) -> String {
    let mut placement = String::new();

    for rank_step in 0..8u8 {
        let rank = if flip { 1 + rank_step } else { 8 - rank_step };
        let mut empty_run = 0;

        for file_step in 0..8u8 {
            let file = if flip { 8 - file_step } else { 1 + file_step };
            let square = Square { file, rank };

            match board.piece_at(square) {
                Some(piece) => {
                    if empty_run > 0 {
                        placement.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    placement.push(piece.symbol());
                }
                None => empty_run += 1,
            }
        }

        if empty_run > 0 {
            placement.push_str(&empty_run.to_string());
        }
        if rank_step != 7 {
            placement.push('/');
        }
    }

    placement
}

/// Full six-field descriptor for the current state.
pub fn encode_full(board: &Board) -> String {
    format!(
        "{} {} {} {} {} {}",
        encode(board, false),
        board.side_to_move().fen_char(),
        board.castling(),
        board
            .en_passant()
            .map_or_else(|| "-".to_string(), |square| square.to_string()),
        board.halfmove_clock(),
        board.fullmove_number(),
    )
}

/// Strict structural check of a placement string: exactly 8 `/`-separated
/// rank groups, each covering exactly 8 files once digit runs are expanded,
/// with no characters outside the piece alphabet.
pub fn validate_placement(placement: &str) -> Result<(), NotationError> {
    let groups: Vec<&str> = placement.split('/').collect();
    if groups.len() != 8 {
        return Err(NotationError::MalformedDescriptor(format!(
            "expected 8 rank groups, found {}",
            groups.len()
        )));
    }

    for (index, group) in groups.iter().enumerate() {
        let mut width: u32 = 0;
        for ch in group.chars() {
            if let Some(run) = ch.to_digit(10) {
                width += run;
            } else if PLACEMENT_SYMBOLS.contains(ch) {
                width += 1;
            } else {
                return Err(NotationError::MalformedDescriptor(format!(
                    "unexpected character {ch:?} in rank group {}",
                    index + 1
                )));
            }
        }
        if width != 8 {
            return Err(NotationError::MalformedDescriptor(format!(
                "rank group {} covers {width} files, expected 8",
                index + 1
            )));
        }
    }

    Ok(())
}
