use crate::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceType {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

impl PieceType {
    /// Piece letter without color information, accepted in either case.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_lowercase() {
            'k' => Some(PieceType::King),
            'q' => Some(PieceType::Queen),
            'r' => Some(PieceType::Rook),
            'b' => Some(PieceType::Bishop),
            'n' => Some(PieceType::Knight),
            'p' => Some(PieceType::Pawn),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            PieceType::King => 'k',
            PieceType::Queen => 'q',
            PieceType::Rook => 'r',
            PieceType::Bishop => 'b',
            PieceType::Knight => 'n',
            PieceType::Pawn => 'p',
        }
    }
}

/// A piece on the board. Kind and color are fixed at construction; only the
/// square changes, when a move relocates the piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceType,
    pub color: Color,
    pub square: Square,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color, square: Square) -> Self {
        Self { kind, color, square }
    }

    /// Builds a piece from its descriptor symbol; casing selects the color.
    pub fn from_symbol(symbol: char, square: Square) -> Option<Self> {
        let kind = PieceType::from_letter(symbol)?;
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Self { kind, color, square })
    }

    pub fn symbol(&self) -> char {
        match self.color {
            Color::White => self.kind.letter().to_ascii_uppercase(),
            Color::Black => self.kind.letter(),
        }
    }

    /// Geometric reachability, ignoring occupancy of intervening squares and
    /// turn order. Pawn movement is resolved entirely by the notation layer,
    /// so pawns always answer `false` here.
    pub fn can_reach(&self, target: Square) -> bool {
        match self.kind {
            PieceType::King => self.king_reach(target),
            PieceType::Queen => self.diagonal_reach(target) || self.straight_reach(target),
            PieceType::Knight => self.knight_reach(target),
            PieceType::Bishop => self.diagonal_reach(target),
            PieceType::Rook => self.straight_reach(target),
            PieceType::Pawn => false,
        }
    }

    fn deltas(&self, target: Square) -> (i8, i8) {
        (
            (target.rank as i8 - self.square.rank as i8).abs(),
            (target.file as i8 - self.square.file as i8).abs(),
        )
    }

    fn king_reach(&self, target: Square) -> bool {
        let (rank_diff, file_diff) = self.deltas(target);
        rank_diff <= 1 && file_diff <= 1
    }

    fn knight_reach(&self, target: Square) -> bool {
        let (rank_diff, file_diff) = self.deltas(target);
        (rank_diff == 2 && file_diff == 1) || (rank_diff == 1 && file_diff == 2)
    }

    fn diagonal_reach(&self, target: Square) -> bool {
        let (rank_diff, file_diff) = self.deltas(target);
        rank_diff == file_diff && rank_diff != 0
    }

    fn straight_reach(&self, target: Square) -> bool {
        let (rank_diff, file_diff) = self.deltas(target);
        (rank_diff == 0) != (file_diff == 0)
    }
}
