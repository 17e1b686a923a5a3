use crate::car::{LapNumber, LapOutcome};
use crate::config::RaceSettings;
use crate::driver::DriverId;
use crate::error::{ConfigError, RaceError};
use crate::event::{OutcomeOdds, RaceEvent};
use crate::random::RandomSource;
use crate::standings::{
    self, Classification, DriverResult, DriverStanding, TeamResult, finishing_order,
    write_leaderboards,
};
use crate::team::Team;
use crate::utils::ordered_map::OrderedMap;
use log::{debug, info};
use std::collections::HashSet;
use std::io::Write;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RacePhase {
    NotStarted,
    Running,
    /// All laps driven, points not yet awarded
    Finished,
    /// Points awarded and leaderboards produced
    Classified,
}

/// Turn-based race over a fixed grid of teams.
/// Drives every team's drivers lap by lap, one at a time, and keeps a running
/// result per driver in the order drivers were first processed.
pub struct RaceEngine<R: RandomSource> {
    laps: LapNumber,
    current_lap: LapNumber,
    teams: Vec<Team>,
    results: OrderedMap<DriverId, DriverResult>,
    settings: RaceSettings,
    odds: OutcomeOdds,
    lap_time: Range<f64>,
    random: R,
    phase: RacePhase,
}

impl<R: RandomSource> RaceEngine<R> {
    /// Validates the setup: lap and team counts within the configured maximums,
    /// every driver entered once, every car able to store exactly `laps` lap times.
    pub fn new(
        laps: LapNumber,
        teams: Vec<Team>,
        settings: RaceSettings,
        random: R,
    ) -> Result<Self, ConfigError> {
        settings.validate()?;
        if laps == 0 || laps > settings.max_laps {
            return Err(ConfigError::InvalidLapCount {
                laps,
                max: settings.max_laps,
            });
        }
        if teams.is_empty() {
            return Err(ConfigError::NoTeams);
        }
        if teams.len() > settings.max_teams {
            return Err(ConfigError::TooManyTeams {
                teams: teams.len(),
                max: settings.max_teams,
            });
        }
        let mut entered = HashSet::new();
        if let Some(driver) = teams
            .iter()
            .flat_map(|team| team.drivers())
            .find(|driver| !entered.insert(driver.id()))
        {
            return Err(ConfigError::DuplicateDriver {
                name: driver.name.clone(),
            });
        }
        if let Some(car) = teams
            .iter()
            .flat_map(|team| team.cars())
            .find(|car| car.capacity() != laps as usize)
        {
            return Err(ConfigError::LapStorage {
                car: car.number,
                capacity: car.capacity(),
                laps,
            });
        }

        Ok(Self {
            laps,
            current_lap: 0,
            teams,
            results: OrderedMap::new(),
            odds: settings.odds(),
            lap_time: settings.lap_time_range(),
            settings,
            random,
            phase: RacePhase::NotStarted,
        })
    }

    pub fn laps(&self) -> LapNumber {
        self.laps
    }

    pub fn current_lap(&self) -> LapNumber {
        self.current_lap
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn settings(&self) -> &RaceSettings {
        &self.settings
    }

    /// Results in the order drivers were first processed
    pub fn results(&self) -> &[DriverResult] {
        self.results.as_slice()
    }

    pub fn result_of(&self, driver: DriverId) -> Option<&DriverResult> {
        self.results.get(&driver)
    }

    /// Starts the race and classifies it
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<(), RaceError> {
        self.start(out)?;
        self.end(out)
    }

    /// Drives all laps.
    /// Teams go in construction order, drivers in team order.
    pub fn start<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<(), RaceError> {
        if self.phase != RacePhase::NotStarted {
            return Err(RaceError::AlreadyStarted);
        }
        self.phase = RacePhase::Running;
        info!(
            "race started: {} laps, {} teams",
            self.laps,
            self.teams.len()
        );

        for lap in 1..=self.laps {
            self.current_lap = lap;
            writeln!(out, "{}", RaceEvent::LapStarted { lap })?;
            for team in 0..self.teams.len() {
                for seat in 0..self.teams[team].seats().len() {
                    let event = self.drive(lap, team, seat);
                    match event {
                        RaceEvent::LapCompleted { .. } => debug!("{}", event),
                        _ => info!("{}", event),
                    }
                    writeln!(out, "{}", event)?;
                }
            }
        }

        self.phase = RacePhase::Finished;
        info!("race finished after {} laps", self.current_lap);
        Ok(())
    }

    /// One driver's turn on `lap`.
    /// A pending pit stop is served instead of driving; a breakdown or collision
    /// slows down every driver that already has a result.
    fn drive(&mut self, lap: LapNumber, team: usize, seat: usize) -> RaceEvent {
        let entry = &mut self.teams[team].seats_mut()[seat];
        let driver_id = entry.driver.id();
        let driver = entry.driver.name.clone();
        let result = self
            .results
            .get_or_insert_with(driver_id, || DriverResult::new(driver_id, team, seat));

        if entry.car.take_pit_stop() {
            result.add_penalty(self.settings.pitstop_time);
            return RaceEvent::PitStop { driver, lap };
        }

        let lap_event = self.odds.generate(&mut self.random);
        let car = entry.car.number;
        match entry
            .car
            .simulate_lap(lap_event, &mut self.random, &self.lap_time)
        {
            LapOutcome::Completed(time) => {
                result.add_lap(time);
                RaceEvent::LapCompleted {
                    driver,
                    car_lap: entry.car.current_lap(),
                    time,
                }
            }
            LapOutcome::Breakdown => {
                self.slow_down_field();
                RaceEvent::YellowFlag { driver, car, lap }
            }
            LapOutcome::Collision => {
                self.slow_down_field();
                RaceEvent::SafetyCar { driver, car, lap }
            }
        }
    }

    /// Caution period, every recorded result loses `slowdown_time`
    fn slow_down_field(&mut self) {
        let slowdown = self.settings.slowdown_time;
        for result in self.results.iter_mut() {
            result.add_penalty(slowdown);
        }
    }

    /// Awards points and writes both leaderboards.
    /// Allowed once, after all laps have been driven.
    pub fn end<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<(), RaceError> {
        match self.phase {
            RacePhase::NotStarted | RacePhase::Running => return Err(RaceError::NotFinished),
            RacePhase::Classified => return Err(RaceError::AlreadyClassified),
            RacePhase::Finished => {}
        }
        self.award_points();
        self.phase = RacePhase::Classified;

        write_leaderboards(out, &self.driver_standings(), &self.team_standings())?;
        Ok(())
    }

    fn award_points(&mut self) {
        let awards: Vec<_> = finishing_order(self.results.as_slice())
            .into_iter()
            .enumerate()
            .map(|(position, i)| {
                let result = &self.results.as_slice()[i];
                (result.team, result.seat, self.settings.points_for(position))
            })
            .collect();

        for (team, seat, points) in awards {
            let driver = &mut self.teams[team].seats_mut()[seat].driver;
            driver.add_points(points);
            debug!("{} scores {} points", driver.name, points);
        }
    }

    pub fn driver_standings(&self) -> Vec<DriverStanding<'_>> {
        standings::driver_standings(&self.teams, self.results.as_slice())
    }

    pub fn team_standings(&self) -> Vec<TeamResult<'_>> {
        standings::team_standings(&self.teams, self.results.as_slice())
    }

    pub fn classification(&self) -> Classification {
        Classification::new(&self.driver_standings(), &self.team_standings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::car::Car;
    use crate::driver::Driver;
    use std::collections::VecDeque;

    /// Replays scripted draws, a normal lap of 1.5 once the script runs out
    struct Script {
        ints: VecDeque<u32>,
        doubles: VecDeque<f64>,
    }

    impl Script {
        fn new(ints: &[u32], doubles: &[f64]) -> Self {
            Self {
                ints: ints.iter().copied().collect(),
                doubles: doubles.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for Script {
        fn next_int(&mut self, _bound: u32) -> u32 {
            self.ints.pop_front().unwrap_or(99)
        }

        fn next_double(&mut self, _low: f64, _high: f64) -> f64 {
            self.doubles.pop_front().unwrap_or(1.5)
        }
    }

    fn team(name: &str, drivers: [&str; 2], numbers: [u32; 2], laps: u32) -> Team {
        Team::new(
            name,
            drivers.iter().map(|d| Driver::new(d)).collect(),
            numbers
                .iter()
                .map(|&n| Car::new(n, Some(name), laps))
                .collect(),
            None,
        )
        .unwrap()
    }

    fn single_team(laps: u32, random: Script) -> RaceEngine<Script> {
        let teams = vec![team("Red Bull", ["Verstappen", "Perez"], [1, 11], laps)];
        RaceEngine::new(laps, teams, RaceSettings::default(), random).unwrap()
    }

    #[test]
    fn keeps_setup_it_was_built_with() {
        let settings = RaceSettings {
            pitstop_time: 10.0,
            ..RaceSettings::default()
        };
        let teams = vec![
            team("Red Bull", ["Verstappen", "Perez"], [1, 11], 4),
            team("Ferrari", ["Leclerc", "Sainz"], [16, 55], 4),
        ];
        let race = RaceEngine::new(4, teams, settings, Script::new(&[], &[])).unwrap();

        assert_eq!(race.laps(), 4);
        assert_eq!(race.current_lap(), 0);
        assert_eq!(race.settings().pitstop_time, 10.0);
        assert_eq!(race.phase(), RacePhase::NotStarted);
        assert!(race.results().is_empty());
    }

    #[test]
    fn normal_laps_accumulate() {
        let mut race = single_team(2, Script::new(&[], &[1.2, 1.8, 1.1, 1.9]));
        race.start(&mut Vec::new()).unwrap();

        let results = race.results();
        assert_eq!(results.len(), 2);
        assert!((results[0].total_time - 2.3).abs() < 1e-9);
        assert_eq!(results[0].fastest_lap, 1.1);
        assert!((results[1].total_time - 3.7).abs() < 1e-9);
        assert_eq!(results[1].fastest_lap, 1.8);
        assert_eq!(race.current_lap(), 2);
        assert_eq!(race.phase(), RacePhase::Finished);
    }

    #[test]
    fn breakdown_slows_field_then_pit_stop() {
        // lap 1: Verstappen normal, Perez breaks down; lap 2: Verstappen normal, Perez pits
        let mut race = single_team(2, Script::new(&[99, 0, 99], &[1.0, 1.0]));
        let mut out = Vec::new();
        race.start(&mut out).unwrap();

        let results = race.results();
        // 1.0 + slowdown 1.0 + 1.0
        assert!((results[0].total_time - 3.0).abs() < 1e-9);
        // slowdown 1.0 + pit stop 5.0
        assert!((results[1].total_time - 6.0).abs() < 1e-9);
        assert!(!results[1].has_fastest_lap());

        let perez_car = &race.teams()[0].seats()[1].car;
        assert_eq!(perez_car.current_lap(), 0);
        assert!(!perez_car.is_pit_stop_needed());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Yellow flag! Car #11 of driver Perez broke down on lap 1"));
        assert!(text.contains("Driver Perez is in the pit lane and skips lap 2"));
    }

    #[test]
    fn slowdown_only_hits_recorded_results() {
        // Verstappen collides before Perez has a result
        let mut race = single_team(1, Script::new(&[5, 99], &[1.25]));
        let mut out = Vec::new();
        race.start(&mut out).unwrap();

        let results = race.results();
        assert_eq!(results[0].total_time, 1.0);
        assert_eq!(results[1].total_time, 1.25);
        assert!(String::from_utf8(out).unwrap().contains(
            "Safety car deployed! Car #1 of driver Verstappen collided on lap 1"
        ));
    }

    #[test]
    fn car_lap_trails_race_lap_after_pit_stop() {
        let mut race = single_team(3, Script::new(&[0], &[]));
        race.start(&mut Vec::new()).unwrap();

        let verstappen = &race.teams()[0].seats()[0].car;
        assert_eq!(verstappen.current_lap(), 1);
        assert_eq!(verstappen.lap_times(), &[Some(1.5), None, None]);

        let perez = &race.teams()[0].seats()[1].car;
        assert_eq!(perez.current_lap(), 3);
    }

    #[test]
    fn points_follow_total_time() {
        let mut race = single_team(1, Script::new(&[], &[1.9, 1.1]));
        race.run(&mut Vec::new()).unwrap();

        let seats = race.teams()[0].seats();
        assert_eq!(seats[0].driver.points(), 18);
        assert_eq!(seats[1].driver.points(), 25);
        assert_eq!(race.phase(), RacePhase::Classified);
    }

    #[test]
    fn lifecycle_is_enforced() {
        let mut race = single_team(1, Script::new(&[], &[]));
        let mut out = Vec::new();
        assert!(matches!(race.end(&mut out), Err(RaceError::NotFinished)));

        race.start(&mut out).unwrap();
        assert!(matches!(race.start(&mut out), Err(RaceError::AlreadyStarted)));

        race.end(&mut out).unwrap();
        assert!(matches!(race.end(&mut out), Err(RaceError::AlreadyClassified)));
        assert_eq!(race.teams()[0].seats()[0].driver.points(), 25);
    }

    #[test]
    fn rejects_bad_setup() {
        let settings = RaceSettings::default();
        let teams = || vec![team("Red Bull", ["Verstappen", "Perez"], [1, 11], 3)];

        assert!(matches!(
            RaceEngine::new(0, teams(), settings.clone(), Script::new(&[], &[])),
            Err(ConfigError::InvalidLapCount { laps: 0, max: 5 })
        ));
        assert!(matches!(
            RaceEngine::new(6, teams(), settings.clone(), Script::new(&[], &[])),
            Err(ConfigError::InvalidLapCount { laps: 6, .. })
        ));
        assert!(matches!(
            RaceEngine::new(3, Vec::new(), settings.clone(), Script::new(&[], &[])),
            Err(ConfigError::NoTeams)
        ));
        assert!(matches!(
            RaceEngine::new(2, teams(), settings.clone(), Script::new(&[], &[])),
            Err(ConfigError::LapStorage {
                car: 1,
                capacity: 3,
                laps: 2
            })
        ));

        let verstappen = Driver::new("Verstappen");
        let twice = Team::new(
            "Red Bull",
            vec![verstappen.clone(), verstappen],
            vec![Car::new(1, None, 3), Car::new(11, None, 3)],
            None,
        )
        .unwrap();
        let grid = vec![twice, team("Ferrari", ["Leclerc", "Sainz"], [16, 55], 3)];
        assert!(matches!(
            RaceEngine::new(3, grid, settings.clone(), Script::new(&[], &[])),
            Err(ConfigError::DuplicateDriver { name }) if name == "Verstappen"
        ));

        let many = (0..11)
            .map(|i| team(&format!("T{}", i), ["A", "B"], [1, 2], 3))
            .collect();
        assert!(matches!(
            RaceEngine::new(3, many, settings, Script::new(&[], &[])),
            Err(ConfigError::TooManyTeams { teams: 11, max: 10 })
        ));
    }
}
