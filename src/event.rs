use crate::car::{CarNumber, LapNumber};
use crate::random::RandomSource;
use crate::standings::format_minutes;
use std::fmt::{Display, Formatter};

/// What happens to a driver on a lap, before the lap is simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapEvent {
    Normal,
    Breakdown,
    Collision,
}

/// Probabilities (in percent) of the non-normal lap events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeOdds {
    pub breakdown_percent: u32,
    pub collision_percent: u32,
}

impl Default for OutcomeOdds {
    fn default() -> Self {
        Self {
            breakdown_percent: 5,
            collision_percent: 2,
        }
    }
}

impl OutcomeOdds {
    pub fn new(breakdown_percent: u32, collision_percent: u32) -> Self {
        Self {
            breakdown_percent,
            collision_percent,
        }
    }

    /// Draws one value from `[0, 100)`: the first `breakdown_percent` values are a breakdown,
    /// the next `collision_percent` values a collision, the rest a normal lap.
    pub fn generate(&self, random: &mut impl RandomSource) -> LapEvent {
        let draw = random.next_int(100);
        if draw < self.breakdown_percent {
            LapEvent::Breakdown
        } else if draw < self.breakdown_percent.saturating_add(self.collision_percent) {
            LapEvent::Collision
        } else {
            LapEvent::Normal
        }
    }
}

/// A race-control line the engine reports while the race runs
#[derive(Debug, Clone, PartialEq)]
pub enum RaceEvent {
    LapStarted {
        lap: LapNumber,
    },
    LapCompleted {
        driver: String,
        car_lap: LapNumber,
        time: f64,
    },
    PitStop {
        driver: String,
        lap: LapNumber,
    },
    YellowFlag {
        driver: String,
        car: CarNumber,
        lap: LapNumber,
    },
    SafetyCar {
        driver: String,
        car: CarNumber,
        lap: LapNumber,
    },
}

impl Display for RaceEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RaceEvent::LapStarted { lap } => write!(f, "Starting lap {}", lap),
            RaceEvent::LapCompleted {
                driver,
                car_lap,
                time,
            } => write!(
                f,
                "Driver {} completed lap {} in {} minutes",
                driver,
                car_lap,
                format_minutes(*time)
            ),
            RaceEvent::PitStop { driver, lap } => {
                write!(f, "Driver {} is in the pit lane and skips lap {}", driver, lap)
            }
            RaceEvent::YellowFlag { driver, car, lap } => write!(
                f,
                "Yellow flag! Car #{} of driver {} broke down on lap {}",
                car, driver, lap
            ),
            RaceEvent::SafetyCar { driver, car, lap } => write!(
                f,
                "Safety car deployed! Car #{} of driver {} collided on lap {}",
                car, driver, lap
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Draw(u32);

    impl RandomSource for Draw {
        fn next_int(&mut self, bound: u32) -> u32 {
            assert_eq!(bound, 100);
            self.0
        }

        fn next_double(&mut self, low: f64, _high: f64) -> f64 {
            low
        }
    }

    fn event_for(draw: u32) -> LapEvent {
        OutcomeOdds::default().generate(&mut Draw(draw))
    }

    #[test]
    fn first_five_percent_is_breakdown() {
        assert_eq!(event_for(0), LapEvent::Breakdown);
        assert_eq!(event_for(4), LapEvent::Breakdown);
    }

    #[test]
    fn next_two_percent_is_collision() {
        assert_eq!(event_for(5), LapEvent::Collision);
        assert_eq!(event_for(6), LapEvent::Collision);
    }

    #[test]
    fn rest_is_normal() {
        assert_eq!(event_for(7), LapEvent::Normal);
        assert_eq!(event_for(99), LapEvent::Normal);
    }

    #[test]
    fn custom_odds() {
        let odds = OutcomeOdds::new(0, 100);
        assert_eq!(odds.generate(&mut Draw(0)), LapEvent::Collision);
        assert_eq!(odds.generate(&mut Draw(99)), LapEvent::Collision);

        let odds = OutcomeOdds::new(0, 0);
        assert_eq!(odds.generate(&mut Draw(0)), LapEvent::Normal);
    }

    #[test]
    fn unvalidated_odds_do_not_overflow() {
        let odds = OutcomeOdds::new(u32::MAX, 1);
        assert_eq!(odds.generate(&mut Draw(99)), LapEvent::Breakdown);

        let odds = OutcomeOdds::new(50, u32::MAX);
        assert_eq!(odds.generate(&mut Draw(49)), LapEvent::Breakdown);
        assert_eq!(odds.generate(&mut Draw(50)), LapEvent::Collision);
        assert_eq!(odds.generate(&mut Draw(99)), LapEvent::Collision);
    }

    #[test]
    fn event_lines() {
        assert_eq!(RaceEvent::LapStarted { lap: 3 }.to_string(), "Starting lap 3");
        assert_eq!(
            RaceEvent::LapCompleted {
                driver: "Perez".into(),
                car_lap: 2,
                time: 1.5
            }
            .to_string(),
            "Driver Perez completed lap 2 in 1.5 minutes"
        );
        assert_eq!(
            RaceEvent::SafetyCar {
                driver: "Perez".into(),
                car: 11,
                lap: 4
            }
            .to_string(),
            "Safety car deployed! Car #11 of driver Perez collided on lap 4"
        );
    }
}
