use crate::event::LapEvent;
use crate::random::RandomSource;
use std::fmt::{Display, Formatter};
use std::ops::Range;

pub type CarNumber = u32;
pub type LapNumber = u32;

/// What a simulated lap produced.
/// Breakdowns and collisions are ordinary outcomes, the engine branches on them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LapOutcome {
    /// Lap finished in the given time (minutes)
    Completed(f64),
    /// Car broke down, yellow flag
    Breakdown,
    /// Car collided, safety car
    Collision,
}

/// A race car.
/// Lap times are stored per car lap, `lap_times[lap - 1]`, sized to the race length.
#[derive(Debug, Clone)]
pub struct Car {
    pub number: CarNumber,
    pub manufacturer: Option<String>,
    current_lap: LapNumber,
    pit_stop_needed: bool,
    lap_times: Vec<Option<f64>>,
}

impl Car {
    pub fn new(number: CarNumber, manufacturer: Option<&str>, laps: LapNumber) -> Self {
        Self {
            number,
            manufacturer: manufacturer.map(String::from),
            current_lap: 0,
            pit_stop_needed: false,
            lap_times: vec![None; laps as usize],
        }
    }

    pub fn current_lap(&self) -> LapNumber {
        self.current_lap
    }

    pub fn is_pit_stop_needed(&self) -> bool {
        self.pit_stop_needed
    }

    /// Number of laps this car can record
    pub fn capacity(&self) -> usize {
        self.lap_times.len()
    }

    pub fn lap_times(&self) -> &[Option<f64>] {
        &self.lap_times
    }

    /// Records the time of lap `lap_number` (1-based).
    ///
    /// # Panics
    ///
    /// Panics if `lap_number` is 0 or larger than the race length,
    /// the race was driven for more laps than the car was built for.
    pub fn record_lap_time(&mut self, lap_number: LapNumber, time: f64) {
        assert!(
            lap_number >= 1 && lap_number as usize <= self.lap_times.len(),
            "lap {} out of range for car #{} built for {} laps",
            lap_number,
            self.number,
            self.lap_times.len()
        );
        self.lap_times[lap_number as usize - 1] = Some(time);
    }

    /// Marks the car for a pit stop on its next lap
    pub fn flag_pit_stop(&mut self) {
        self.pit_stop_needed = true;
    }

    /// Consumes a pending pit stop.
    /// Returns false if none was pending.
    pub fn take_pit_stop(&mut self) -> bool {
        std::mem::replace(&mut self.pit_stop_needed, false)
    }

    /// Simulates a single lap for this car.
    /// A normal lap advances the lap counter and records a random time drawn from `lap_time`,
    /// a breakdown or collision only flags the car for a pit stop.
    pub fn simulate_lap(
        &mut self,
        event: LapEvent,
        random: &mut impl RandomSource,
        lap_time: &Range<f64>,
    ) -> LapOutcome {
        match event {
            LapEvent::Normal => {
                self.current_lap += 1;
                let time = random.next_double(lap_time.start, lap_time.end);
                self.record_lap_time(self.current_lap, time);
                LapOutcome::Completed(time)
            }
            LapEvent::Breakdown => {
                self.flag_pit_stop();
                LapOutcome::Breakdown
            }
            LapEvent::Collision => {
                self.flag_pit_stop();
                LapOutcome::Collision
            }
        }
    }
}

impl Display for Car {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.manufacturer {
            Some(manufacturer) => write!(f, "Car #{} ({})", self.number, manufacturer),
            None => write!(f, "Car #{}", self.number),
        }
    }
}
