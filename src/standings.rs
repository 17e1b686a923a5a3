use crate::car::CarNumber;
use crate::driver::DriverId;
use crate::team::{Seat, Team};
use itertools::Itertools;
use serde::Serialize;
use std::io::{self, Write};

pub const LEADERBOARD_HEADER: &str = "--- LEADERBOARD ---";
pub const TEAM_LEADERBOARD_HEADER: &str = "--- TEAM LEADERBOARD ---";

/// Renders minutes the way the race report prints them,
/// shortest round-trip form with at least one decimal (`5.0`, `5.5`).
pub fn format_minutes(value: f64) -> String {
    if value == f64::INFINITY {
        String::from("Infinity")
    } else {
        format!("{:?}", value)
    }
}

/// Running race record of a single driver.
/// `team` and `seat` index into the race's team list and that team's seats.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverResult {
    pub driver: DriverId,
    pub team: usize,
    pub seat: usize,
    pub total_time: f64,
    /// `f64::INFINITY` until the first completed lap
    pub fastest_lap: f64,
}

impl DriverResult {
    pub fn new(driver: DriverId, team: usize, seat: usize) -> Self {
        Self {
            driver,
            team,
            seat,
            total_time: 0.0,
            fastest_lap: f64::INFINITY,
        }
    }

    pub fn add_lap(&mut self, time: f64) {
        self.total_time += time;
        if time < self.fastest_lap {
            self.fastest_lap = time;
        }
    }

    pub fn add_penalty(&mut self, time: f64) {
        self.total_time += time;
    }

    pub fn has_fastest_lap(&self) -> bool {
        self.fastest_lap.is_finite()
    }
}

/// Positions of `results` ordered by total time, fastest first.
/// The sort is stable, equal times keep their insertion order.
pub fn finishing_order(results: &[DriverResult]) -> Vec<usize> {
    (0..results.len())
        .sorted_by(|&a, &b| results[a].total_time.total_cmp(&results[b].total_time))
        .collect()
}

/// One line of the driver leaderboard
#[derive(Debug, Clone, Copy)]
pub struct DriverStanding<'a> {
    pub team: &'a Team,
    pub seat: &'a Seat,
    pub result: &'a DriverResult,
}

impl DriverStanding<'_> {
    /// `index` is the 0-based position, printed 1-based
    pub fn format(&self, index: usize) -> String {
        format!(
            "{}. Driver {} in car #{} from team {} with total time {} minutes (fastest lap: {} minutes)",
            index + 1,
            self.seat.driver.name,
            self.seat.car.number,
            self.team.name,
            format_minutes(self.result.total_time),
            format_minutes(self.result.fastest_lap)
        )
    }
}

/// Summed race time of one team
#[derive(Debug, Clone, Copy)]
pub struct TeamResult<'a> {
    pub team: &'a Team,
    pub total_time: f64,
}

impl<'a> TeamResult<'a> {
    pub fn new(team: &'a Team, total_time: f64) -> Self {
        Self { team, total_time }
    }

    pub fn format(&self, index: usize) -> String {
        let sponsor = match self.team.sponsor() {
            Some(sponsor) => format!("Sponsored by {}", sponsor.name),
            None => String::from("No main sponsor"),
        };
        format!(
            "{}. Team {} with total time {} minutes. {}",
            index + 1,
            self.team.name,
            format_minutes(self.total_time),
            sponsor
        )
    }
}

/// Driver leaderboard, fastest total time first
pub fn driver_standings<'a>(
    teams: &'a [Team],
    results: &'a [DriverResult],
) -> Vec<DriverStanding<'a>> {
    finishing_order(results)
        .into_iter()
        .map(|i| {
            let result = &results[i];
            let team = &teams[result.team];
            DriverStanding {
                team,
                seat: &team.seats()[result.seat],
                result,
            }
        })
        .collect()
}

/// Team leaderboard, lowest summed time first.
/// A team without any recorded result totals 0.0.
pub fn team_standings<'a>(teams: &'a [Team], results: &[DriverResult]) -> Vec<TeamResult<'a>> {
    teams
        .iter()
        .enumerate()
        .map(|(i, team)| {
            let total: f64 = results
                .iter()
                .filter(|r| r.team == i)
                .map(|r| r.total_time)
                .sum();
            TeamResult::new(team, total)
        })
        .sorted_by(|a, b| a.total_time.total_cmp(&b.total_time))
        .collect()
}

/// Prints both leaderboards with their headers
pub fn write_leaderboards<W: Write + ?Sized>(
    out: &mut W,
    drivers: &[DriverStanding],
    teams: &[TeamResult],
) -> io::Result<()> {
    writeln!(out, "{}", LEADERBOARD_HEADER)?;
    for (i, standing) in drivers.iter().enumerate() {
        writeln!(out, "{}", standing.format(i))?;
    }
    writeln!(out, "{}", TEAM_LEADERBOARD_HEADER)?;
    for (i, team) in teams.iter().enumerate() {
        writeln!(out, "{}", team.format(i))?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriverEntry {
    pub position: usize,
    pub driver_id: DriverId,
    pub driver: String,
    pub car_number: CarNumber,
    pub team: String,
    pub total_time: f64,
    /// None if the driver never completed a lap
    pub fastest_lap: Option<f64>,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamEntry {
    pub position: usize,
    pub team: String,
    pub total_time: f64,
    pub sponsor: Option<String>,
}

/// Owned snapshot of the final standings, for JSON export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub drivers: Vec<DriverEntry>,
    pub teams: Vec<TeamEntry>,
}

impl Classification {
    pub fn new(drivers: &[DriverStanding], teams: &[TeamResult]) -> Self {
        Self {
            drivers: drivers
                .iter()
                .enumerate()
                .map(|(i, s)| DriverEntry {
                    position: i + 1,
                    driver_id: s.seat.driver.id(),
                    driver: s.seat.driver.name.clone(),
                    car_number: s.seat.car.number,
                    team: s.team.name.clone(),
                    total_time: s.result.total_time,
                    fastest_lap: s.result.has_fastest_lap().then_some(s.result.fastest_lap),
                    points: s.seat.driver.points(),
                })
                .collect(),
            teams: teams
                .iter()
                .enumerate()
                .map(|(i, t)| TeamEntry {
                    position: i + 1,
                    team: t.team.name.clone(),
                    total_time: t.total_time,
                    sponsor: t.team.sponsor().map(|s| s.name.clone()),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
