//! Steadfast - terminal front end.
//!
//! Every command restores the game from the snapshot file, so a game can
//! be played across separate invocations.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::io::BufRead;
use steadfast::{
    CommandResult, FileStore, GameConfig, GameController, GameState, InvalidMove, Outcome, Scoped,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let controller = open_controller(&config)?;

    match cli.command {
        Command::Show => println!("{}", describe(&controller.state())),
        Command::Move { index } => {
            report(controller.submit_move(index));
            println!("{}", describe(&controller.state()));
        }
        Command::NewGame => {
            report(controller.start_new_game());
            println!("{}", describe(&controller.state()));
        }
        Command::Play => play(&controller)?,
    }

    Ok(())
}

/// Builds the effective configuration: file first, then flag overrides.
#[instrument(skip(cli))]
fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(state) = &cli.state {
        config = config.with_snapshot_path(state.clone());
    }
    if let Some(scope) = &cli.scope {
        config = config.with_scope(scope.clone());
    }
    Ok(config)
}

#[instrument(skip(config), fields(path = %config.snapshot_path().display(), scope = %config.scope()))]
fn open_controller(config: &GameConfig) -> Result<GameController<Scoped<FileStore>>> {
    let store = FileStore::open(config.snapshot_path())?;
    let controller = GameController::restore(Scoped::new(config.scope().clone(), store));
    info!("Game ready");
    Ok(controller)
}

/// Interactive loop over stdin.
fn play(controller: &GameController<Scoped<FileStore>>) -> Result<()> {
    let subscription = controller.subscribe(|state| println!("{}\n", describe(state)));
    println!("{}\n", describe(&controller.state()));

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        match line.trim() {
            "" => continue,
            "q" | "quit" => break,
            "n" | "new" => {
                if !controller.start_new_game().is_applied() {
                    println!("Finish this game first.");
                }
            }
            input => match input.parse::<i64>() {
                Ok(index) => {
                    if !report(controller.submit_move(index)) {
                        println!("The game is over. Enter `n` for a new game.");
                    }
                }
                Err(_) => println!("Enter a cell number 0-8, `n` or `q`."),
            },
        }
    }

    controller.unsubscribe(subscription);
    Ok(())
}

/// Logs an unsaved transition. Returns whether the command applied.
fn report(result: CommandResult) -> bool {
    if let CommandResult::AppliedUnsaved(e) = &result {
        warn!(error = %e, "Game state not saved");
        eprintln!("warning: game state could not be saved: {}", e.message);
    }
    result.is_applied()
}

/// Renders a state for the terminal.
fn describe(state: &GameState) -> String {
    match state {
        GameState::Playing {
            board,
            current_player,
            last_validation,
        } => {
            let mut text = board.display();
            if let Some(reason) = last_validation {
                let hint = match reason {
                    InvalidMove::CellOutOfBound => "That cell is off the board.",
                    InvalidMove::CellAlreadyOccupied => "That cell is already taken.",
                };
                text.push_str(&format!("\n{}", hint));
            }
            text.push_str(&format!("\n{} to move", current_player));
            text
        }
        GameState::GameOver { outcome } => match outcome {
            Outcome::Draw => "Game over: draw.".to_string(),
            Outcome::Won(winner) => format!("Game over: {} wins.", winner),
        },
    }
}
