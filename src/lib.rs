pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod elo;
pub mod errors;
pub mod services;
pub mod standings;

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use colored::Colorize;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::domain::models::{RankMovement, RatingTrack};
use crate::services::server::ServerService;
use crate::services::standings::{StandingsCache, StandingsService};

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_setup() -> Result<()> {
    let db_path = config::database_path();
    let pool = database::create_pool(&db_path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::reset_database(&conn)?;
    println!("Database initialized at {db_path}");
    Ok(())
}

pub fn handle_standings(track: &str) -> Result<()> {
    let track = parse_track(track)?;
    let pool = database::create_pool(&config::database_path())?;
    let service = StandingsService::new(pool, Arc::new(StandingsCache::default()));

    let rows = service.standings(track)?;
    if rows.is_empty() {
        println!("No active players yet.");
        return Ok(());
    }

    println!(
        "{:>4}  {:<20} {:>7} {:>8} {:>9}  {}",
        "Rank", "Player", "Points", "Matches", "Win rate", "Move"
    );
    for row in rows {
        let movement = match row.movement {
            RankMovement::Up => "up".green(),
            RankMovement::Down => "down".red(),
            RankMovement::Same => "-".normal(),
        };
        println!(
            "{:>4}  {:<20} {:>7} {:>8} {:>8.1}%  {}",
            row.rank,
            row.player.username.bold(),
            row.points,
            row.player.matches_played,
            row.win_rate * 100.0,
            movement
        );
    }
    Ok(())
}

pub fn handle_snapshot(track: &str) -> Result<()> {
    let track = parse_track(track)?;
    let pool = database::create_pool(&config::database_path())?;
    let service = StandingsService::new(pool, Arc::new(StandingsCache::default()));

    let players = service.capture_snapshot(track)?;
    println!("Captured {} snapshot for {players} players", track.as_str());
    Ok(())
}

pub fn handle_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
    Ok(())
}

fn parse_track(raw: &str) -> Result<RatingTrack> {
    RatingTrack::parse(raw)
        .ok_or_else(|| anyhow::anyhow!("Unknown rating track '{raw}', expected elo or atp"))
}
