//! Game-record handling.
//!
//! A serialized record is a sequence of header tag pairs (`[Name "Value"]`)
//! followed by movetext: move-number prefixes, short-form move tokens,
//! `{...}` comments and an optional result token. This module splits a
//! record into tags and an ordered list of move tokens, serializes records
//! back out, and replays the tokens through a fresh board to produce
//! long-algebraic output.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use chess_notation::{resolve, Board, NotationError};

static TAG_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(\w*)\s*(.+)").unwrap());
static MOVE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:\d+\.+\s*)?").unwrap());

/// Canonical tag order for serialization. The first seven are mandatory and
/// are padded with a `?` placeholder when absent.
const TAG_ORDER: [&str; 15] = [
    "Event",
    "Site",
    "Date",
    "Round",
    "White",
    "Black",
    "Result",
    "Annotator",
    "PlyCount",
    "TimeControl",
    "Time",
    "Termination",
    "Mode",
    "FEN",
    "ECO",
];

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "0.5-0.5"];

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed tag pair `{0}`")]
    MalformedTag(String),

    #[error("could not process move `{token}`")]
    Replay {
        token: String,
        #[source]
        source: NotationError,
    },
}

/// One recorded game: header tags (insertion order preserved, names stored
/// lowercase) and the raw move tokens.
#[derive(Debug, Clone, Default)]
pub struct GameRecord {
    tags: Vec<(String, String)>,
    moves: Vec<String>,
}

/// Outcome of replaying a record from the starting position.
#[derive(Debug, Clone)]
pub struct Replay {
    pub long_moves: Vec<String>,
    pub final_board: Board,
}

impl GameRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Setting an existing tag replaces its value.
    pub fn set_tag(&mut self, name: &str, value: &str) {
        let name = name.to_lowercase();
        if let Some(entry) = self.tags.iter_mut().find(|(tag, _)| *tag == name) {
            entry.1 = value.to_string();
        } else {
            self.tags.push((name, value.to_string()));
        }
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.tags
            .iter()
            .find(|(tag, _)| *tag == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn push_move(&mut self, token: &str) {
        self.moves.push(token.to_string());
    }

    /// Number of played plies; a trailing result token does not count.
    pub fn ply_count(&self) -> usize {
        let count = self.moves.len();
        match self.moves.last() {
            Some(last) if RESULT_TOKENS.contains(&last.as_str()) => count - 1,
            _ => count,
        }
    }

    /// Parses every game in `text`. A tag section opens a new game once the
    /// previous one has collected movetext.
    pub fn parse_all(text: &str) -> Result<Vec<GameRecord>, RecordError> {
        let mut lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let mut games: Vec<GameRecord> = Vec::new();

        while let Some(token) = next_token(&mut lines) {
            if token.starts_with('[') {
                let (name, value) = parse_tag(&token)?;
                let start_new = match games.last() {
                    Some(game) => !game.moves.is_empty(),
                    None => true,
                };
                if start_new {
                    games.push(GameRecord::new());
                }
                if let Some(game) = games.last_mut() {
                    game.set_tag(&name, &value);
                }
            } else {
                if games.is_empty() {
                    games.push(GameRecord::new());
                }
                if let Some(game) = games.last_mut() {
                    game.moves = parse_moves(&token);
                }
            }
        }

        Ok(games)
    }

    /// Replays the move tokens through a fresh board, rendering each ply as
    /// a long-algebraic token. A trailing result token is skipped.
    pub fn replay(&self) -> Result<Replay, RecordError> {
        let mut board = Board::new();
        let mut long_moves = Vec::new();

        for token in &self.moves[..self.ply_count()] {
            let resolved = resolve(&mut board, token).map_err(|source| RecordError::Replay {
                token: token.clone(),
                source,
            })?;
            long_moves.push(resolved.long_algebraic());
        }

        Ok(Replay {
            long_moves,
            final_board: board,
        })
    }

    pub fn long_algebraic_moves(&self) -> Result<Vec<String>, RecordError> {
        self.replay().map(|replay| replay.long_moves)
    }

    /// Serializes the record: canonical tags first (mandatory ones padded
    /// with `?`), remaining tags after, then the numbered movetext.
    pub fn to_pgn(&self) -> String {
        let mut out = String::new();

        for (index, tag) in TAG_ORDER.iter().enumerate() {
            if let Some(value) = self.tag(tag) {
                out.push_str(&format!("[{tag} \"{value}\"]\n"));
            } else if index <= 6 {
                out.push_str(&format!("[{tag} \"?\"]\n"));
            }
        }
        for (name, value) in &self.tags {
            if TAG_ORDER.iter().any(|tag| tag.to_lowercase() == *name) {
                continue;
            }
            out.push_str(&format!("[{} \"{value}\"]\n", capitalize(name)));
        }

        out.push('\n');

        let mut white_to_move = true;
        let mut move_number = 0;
        for token in &self.moves {
            if white_to_move {
                move_number += 1;
                out.push_str(&format!(" {move_number}."));
            }
            white_to_move = !white_to_move;
            out.push(' ');
            out.push_str(token);
        }

        out
    }
}

/// Pops the next token from `lines`: a single tag line, or movetext lines
/// joined until the next tag line.
fn next_token(lines: &mut Vec<&str>) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    let mut token = lines.remove(0).to_string();
    if token.starts_with('[') {
        return Some(token);
    }
    while let Some(line) = lines.first() {
        if line.starts_with('[') {
            break;
        }
        token.push(' ');
        token.push_str(line);
        lines.remove(0);
    }
    Some(token.trim().to_string())
}

fn parse_tag(token: &str) -> Result<(String, String), RecordError> {
    let caps = TAG_PAIR
        .captures(token)
        .ok_or_else(|| RecordError::MalformedTag(token.to_string()))?;
    let name = caps[1].to_lowercase();
    let value = caps[2]
        .trim_matches(|ch| matches!(ch, '"' | '[' | ']' | ' '))
        .to_string();
    Ok((name, value))
}

/// Splits movetext into move tokens. Move-number prefixes are stripped and
/// `{...}` comments are dropped; a result token survives as the last entry.
fn parse_moves(token: &str) -> Vec<String> {
    let mut moves = Vec::new();
    let mut rest = token;

    while !rest.is_empty() {
        rest = strip_move_number(rest);
        if rest.is_empty() {
            break;
        }
        if let Some(stripped) = rest.strip_prefix('{') {
            match stripped.find('}') {
                Some(end) => {
                    debug!("dropping comment {:?}", &rest[..end + 2]);
                    rest = &stripped[end + 1..];
                }
                None => break, // unterminated comment swallows the tail
            }
            continue;
        }
        let end = rest
            .find(|ch: char| ch.is_whitespace() || ch == '{')
            .unwrap_or(rest.len());
        let (token, remainder) = rest.split_at(end);
        if !token.is_empty() {
            moves.push(token.to_string());
        }
        rest = remainder;
    }

    moves
}

fn strip_move_number(rest: &str) -> &str {
    match MOVE_NUMBER.find(rest) {
        Some(m) => &rest[m.end()..],
        None => rest,
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"[Event "Casual Game"]
[Site "?"]
[White "Adolf Anderssen"]
[Black "Kieseritzky"]
[Result "1-0"]

1. e4 e5 2. Bc4 {the bishop comes out} Nc6 3. Qh5 Nf6
4. Qxf7# 1-0
"#;

    #[test]
    fn test_parse_tags_and_moves() {
        let games = GameRecord::parse_all(RECORD).unwrap();
        assert_eq!(games.len(), 1);

        let game = &games[0];
        assert_eq!(game.tag("Event"), Some("Casual Game"));
        assert_eq!(game.tag("white"), Some("Adolf Anderssen"));
        assert_eq!(game.tag("Opening"), None);
        assert_eq!(
            game.moves(),
            ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#", "1-0"]
        );
    }

    #[test]
    fn test_ply_count_skips_result_token() {
        let games = GameRecord::parse_all(RECORD).unwrap();
        assert_eq!(games[0].ply_count(), 7);

        let mut no_result = GameRecord::new();
        no_result.push_move("e4");
        no_result.push_move("e5");
        assert_eq!(no_result.ply_count(), 2);
    }

    #[test]
    fn test_parse_moves_drops_comments_and_numbers() {
        let moves = parse_moves("1. e4 {king's pawn} e5 2. Nf3 {again} 2... Nc6");
        assert_eq!(moves, ["e4", "e5", "Nf3", "Nc6"]);
    }

    #[test]
    fn test_parse_tag_strips_quoting() {
        let (name, value) = parse_tag(r#"[Event "Casual Game"]"#).unwrap();
        assert_eq!(name, "event");
        assert_eq!(value, "Casual Game");

        assert!(parse_tag("[").is_err());
    }

    #[test]
    fn test_parse_all_splits_consecutive_games() {
        let text = r#"[Event "one"]

1. e4 e5

[Event "two"]

1. d4 d5
"#;
        let games = GameRecord::parse_all(text).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].moves(), ["e4", "e5"]);
        assert_eq!(games[1].tag("Event"), Some("two"));
        assert_eq!(games[1].moves(), ["d4", "d5"]);
    }

    #[test]
    fn test_replay_produces_long_algebraic_tokens() {
        let games = GameRecord::parse_all(RECORD).unwrap();
        let replay = games[0].replay().unwrap();

        assert_eq!(
            replay.long_moves,
            ["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"]
        );
        assert_eq!(replay.final_board.pieces().len(), 31);
    }

    #[test]
    fn test_replay_reports_the_failing_token() {
        let mut game = GameRecord::new();
        game.push_move("e4");
        game.push_move("Nd5");

        let err = game.replay().unwrap_err();
        match err {
            RecordError::Replay { token, .. } => assert_eq!(token, "Nd5"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_to_pgn_pads_mandatory_tags() {
        let mut game = GameRecord::new();
        game.set_tag("Event", "Club Championship");
        game.set_tag("ECO", "C50");
        game.set_tag("annotations", "none");
        game.push_move("e4");
        game.push_move("e5");
        game.push_move("Nf3");

        let pgn = game.to_pgn();
        assert!(pgn.starts_with("[Event \"Club Championship\"]\n[Site \"?\"]\n"));
        assert!(pgn.contains("[Result \"?\"]\n"));
        assert!(pgn.contains("[ECO \"C50\"]\n"));
        assert!(pgn.contains("[Annotations \"none\"]\n"));
        assert!(pgn.ends_with(" 1. e4 e5 2. Nf3"));
    }
}
