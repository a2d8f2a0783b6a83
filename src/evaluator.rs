//! Route cost simulation.
//!
//! Walks a route leg by leg, tracking the weight on board: a center's load is
//! picked up when leaving it for the first time, and everything is dropped
//! on arrival at the depot. Each leg costs its distance times the tariff's
//! leg rate for the weight carried along it.

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::CenterId;
use crate::error::PlannerError;
use crate::order::Decomposition;
use crate::route::Route;
use crate::traits::{DistanceLookup, Stop, Tariff};

/// Cost figures for one leg of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegCost {
    pub carried: f64,
    pub rate: f64,
    pub distance: f64,
    pub cost: f64,
}

/// A traversed leg with its cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    pub from: Stop,
    pub to: Stop,
    #[serde(flatten)]
    pub cost: LegCost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteTrace {
    pub legs: Vec<Leg>,
    pub total_cost: f64,
}

/// Total cost of driving `route` with the pickups in `weights`.
///
/// The result is exact; rounding is left to whoever reports it.
pub fn evaluate<D, T>(
    route: &Route,
    weights: &Decomposition,
    distances: &D,
    tariff: &T,
) -> Result<f64, PlannerError>
where
    D: DistanceLookup + ?Sized,
    T: Tariff + ?Sized,
{
    simulate(route, weights, distances, tariff, |_, _, _| {})
}

/// Like [`evaluate`], but also returns the per-leg breakdown.
pub fn trace<D, T>(
    route: &Route,
    weights: &Decomposition,
    distances: &D,
    tariff: &T,
) -> Result<RouteTrace, PlannerError>
where
    D: DistanceLookup + ?Sized,
    T: Tariff + ?Sized,
{
    let mut legs = Vec::with_capacity(route.len().saturating_sub(1));
    let total_cost = simulate(route, weights, distances, tariff, |from, to, cost| {
        legs.push(Leg {
            from: from.clone(),
            to: to.clone(),
            cost,
        });
    })?;
    Ok(RouteTrace { legs, total_cost })
}

fn simulate<D, T, F>(
    route: &Route,
    weights: &Decomposition,
    distances: &D,
    tariff: &T,
    mut on_leg: F,
) -> Result<f64, PlannerError>
where
    D: DistanceLookup + ?Sized,
    T: Tariff + ?Sized,
    F: FnMut(&Stop, &Stop, LegCost),
{
    let mut carried = 0.0;
    let mut total = 0.0;
    let mut picked: HashSet<&CenterId> = HashSet::new();

    for pair in route.stops().windows(2) {
        let (current, next) = (&pair[0], &pair[1]);

        if let Some(center) = current.as_center() {
            // A center's load only comes aboard once per route.
            if picked.insert(center) {
                carried += weights.weight(center);
            }
        }

        let rate = tariff.leg_rate(carried);
        let distance = distances.distance(current, next)?;
        let cost = distance * rate;
        total += cost;
        on_leg(
            current,
            next,
            LegCost {
                carried,
                rate,
                distance,
                cost,
            },
        );

        if next.is_depot() {
            carried = 0.0;
        }
    }

    Ok(total)
}
