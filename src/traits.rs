//! Core domain traits for the delivery planner.
//!
//! The evaluator and optimizer only see these seams, so tests and embedding
//! applications can swap in their own tariff or distance source.

use std::fmt;

use serde::Serialize;

use crate::catalog::CenterId;
use crate::error::PlannerError;

/// A single stop on a delivery route.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Stop {
    /// A stocking center where goods are picked up.
    Center(CenterId),
    /// The delivery destination where everything carried is dropped off.
    Depot,
}

impl Stop {
    pub fn center(id: impl Into<CenterId>) -> Self {
        Stop::Center(id.into())
    }

    pub fn as_center(&self) -> Option<&CenterId> {
        match self {
            Stop::Center(id) => Some(id),
            Stop::Depot => None,
        }
    }

    pub fn is_depot(&self) -> bool {
        matches!(self, Stop::Depot)
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stop::Center(id) => write!(f, "{id}"),
            Stop::Depot => f.write_str("depot"),
        }
    }
}

/// Converts carried weight into a cost per unit of distance.
pub trait Tariff {
    fn rate(&self, weight: f64) -> f64;

    /// Rate billed for a leg driven with `carried` on board. Driving empty
    /// is free unless the tariff says otherwise.
    ///
    /// Free means weightless: a required center whose pickup weighs nothing
    /// is driven to and from at no cost, the same as a depot run-out.
    fn leg_rate(&self, carried: f64) -> f64 {
        if carried > 0.0 { self.rate(carried) } else { 0.0 }
    }
}

/// Provides the distance between two stops.
///
/// Implementations must be symmetric and return zero for `from == to`.
pub trait DistanceLookup {
    fn distance(&self, from: &Stop, to: &Stop) -> Result<f64, PlannerError>;
}

impl<T: Tariff + ?Sized> Tariff for &T {
    fn rate(&self, weight: f64) -> f64 {
        (**self).rate(weight)
    }

    fn leg_rate(&self, carried: f64) -> f64 {
        (**self).leg_rate(carried)
    }
}

impl<D: DistanceLookup + ?Sized> DistanceLookup for &D {
    fn distance(&self, from: &Stop, to: &Stop) -> Result<f64, PlannerError> {
        (**self).distance(from, to)
    }
}
