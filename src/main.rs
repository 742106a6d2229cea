use std::{env, fs, process};

use log::error;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use chess_notation::fen;
use chess_record::GameRecord;

fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .ok();

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("usage: chess-replay <record-file>");
            process::exit(2);
        }
    };

    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            error!("cannot read {path}: {err}");
            process::exit(1);
        }
    };

    let games = match GameRecord::parse_all(&text) {
        Ok(games) => games,
        Err(err) => {
            error!("cannot parse {path}: {err}");
            process::exit(1);
        }
    };

    for (index, game) in games.iter().enumerate() {
        match game.replay() {
            Ok(replay) => {
                println!("game {}: {}", index + 1, replay.long_moves.join(" "));
                println!("final position: {}", fen::encode_full(&replay.final_board));
            }
            Err(err) => error!("game {}: {err}", index + 1),
        }
    }
}
