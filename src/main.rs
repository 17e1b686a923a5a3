use anyhow::{Context, Result};
use clap::Parser;
use grandprix::car::Car;
use grandprix::config::RaceSettings;
use grandprix::driver::Driver;
use grandprix::helpers::Prompter;
use grandprix::race::RaceEngine;
use grandprix::random::StdRandom;
use grandprix::team::Team;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Seed for a reproducible race
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON file with race settings
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Chance of a breakdown per lap, in percent
    #[arg(long)]
    breakdown_percent: Option<u32>,

    /// Chance of a collision per lap, in percent
    #[arg(long)]
    collision_percent: Option<u32>,

    /// Print the final classification as JSON after the leaderboards
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut settings =
        RaceSettings::load(args.settings.as_deref()).context("failed to load race settings")?;
    if let Some(percent) = args.breakdown_percent {
        settings.breakdown_percent = percent;
    }
    if let Some(percent) = args.collision_percent {
        settings.collision_percent = percent;
    }
    settings.validate()?;

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let laps = prompter.ask_number(
        &format!("Enter number of laps (up to {}): ", settings.max_laps),
        settings.max_laps,
    )?;
    let max_teams = u32::try_from(settings.max_teams).unwrap_or(u32::MAX);
    let team_count = prompter.ask_number(
        &format!("Enter number of teams (up to {}): ", max_teams),
        max_teams,
    )?;

    let mut teams = Vec::new();
    for i in 1..=team_count {
        let name = prompter.ask(&format!("Enter name for team {}: ", i))?;
        teams.push(create_team(&mut prompter, &name, laps)?);
    }

    let random = match args.seed {
        Some(seed) => {
            info!("using seed {}", seed);
            StdRandom::from_seed(seed)
        }
        None => StdRandom::from_os(),
    };

    let mut race = RaceEngine::new(laps, teams, settings, random)?;
    let mut out = prompter.into_output();
    race.run(&mut out).context("race aborted")?;

    if args.json {
        writeln!(out, "{}", race.classification().to_json()?)?;
    }
    Ok(())
}

/// Asks for both driver names, cars are numbered 1 and 2 and built by the team itself
fn create_team<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    name: &str,
    laps: u32,
) -> Result<Team> {
    let mut drivers = Vec::new();
    for k in 1..=2 {
        let driver = prompter.ask(&format!("Enter name for driver {} of team {}: ", k, name))?;
        drivers.push(Driver::new(&driver));
    }
    let cars = vec![Car::new(1, Some(name), laps), Car::new(2, Some(name), laps)];
    Ok(Team::new(name, drivers, cars, None)?)
}
