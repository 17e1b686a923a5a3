use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Opaque identity of a driver.
/// Two drivers may share a name, never an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DriverId(Uuid);

impl DriverId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DriverId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DriverId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A race driver and the championship points collected so far
#[derive(Debug, Clone)]
pub struct Driver {
    id: DriverId,
    pub name: String,
    points: u32,
}

impl Driver {
    pub fn new(name: &str) -> Self {
        Self {
            id: DriverId::new(),
            name: String::from(name),
            points: 0,
        }
    }

    pub fn id(&self) -> DriverId {
        self.id
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Points only ever accumulate
    pub fn add_points(&mut self, points: u32) {
        self.points += points;
    }
}

impl Display for Driver {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Driver(name='{}', points={})", self.name, self.points)
    }
}

impl Eq for Driver {}

impl PartialEq<Self> for Driver {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Driver {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
