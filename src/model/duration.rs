use std::fmt::{Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// An amount of work time, kept as a floating-point hour count.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Duration {
    hours: f64,
}

impl Duration {
    pub const fn zero() -> Self {
        Self { hours: 0.0 }
    }

    pub const fn hours(hours: f64) -> Self {
        Self { hours }
    }

    pub fn as_hours(&self) -> f64 {
        self.hours
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0.0
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Self) -> Self::Output {
        Duration::hours(self.hours + rhs.hours)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.hours += rhs.hours;
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Duration::zero(), Add::add)
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h", self.hours)
    }
}
