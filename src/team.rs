use crate::car::Car;
use crate::driver::Driver;
use crate::error::ConfigError;
use std::fmt::{Display, Formatter};

/// Every team enters exactly this many drivers and cars
pub const TEAM_SIZE: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Sponsor {
    pub name: String,
    pub amount: f64,
}

impl Sponsor {
    pub fn new(name: &str, amount: f64) -> Self {
        Self {
            name: String::from(name),
            amount,
        }
    }
}

/// A driver together with the car they race
#[derive(Debug, Clone)]
pub struct Seat {
    pub driver: Driver,
    pub car: Car,
}

#[derive(Debug, Clone)]
pub struct Team {
    pub name: String,
    seats: Vec<Seat>,
    sponsor: Option<Sponsor>,
}

impl Team {
    /// Pairs drivers and cars by position, driver `i` races car `i`.
    /// Fails unless both lists hold exactly `TEAM_SIZE` entries.
    pub fn new(
        name: &str,
        drivers: Vec<Driver>,
        cars: Vec<Car>,
        sponsor: Option<Sponsor>,
    ) -> Result<Self, ConfigError> {
        if drivers.len() != TEAM_SIZE || cars.len() != TEAM_SIZE {
            return Err(ConfigError::TeamComposition {
                team: String::from(name),
                drivers: drivers.len(),
                cars: cars.len(),
            });
        }
        let seats = drivers
            .into_iter()
            .zip(cars)
            .map(|(driver, car)| Seat { driver, car })
            .collect();
        Ok(Self {
            name: String::from(name),
            seats,
            sponsor,
        })
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub(crate) fn seats_mut(&mut self) -> &mut [Seat] {
        &mut self.seats
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> {
        self.seats.iter().map(|s| &s.driver)
    }

    pub fn cars(&self) -> impl Iterator<Item = &Car> {
        self.seats.iter().map(|s| &s.car)
    }

    pub fn sponsor(&self) -> Option<&Sponsor> {
        self.sponsor.as_ref()
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team(name='{}', seats=[", self.name)?;
        for (i, seat) in self.seats.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} -> {}", seat.driver.name, seat.car)?;
        }
        write!(f, "])")
    }
}
