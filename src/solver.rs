//! Exhaustive minimum-cost route search.
//!
//! Cost depends on when weight is picked up and dropped off, not only on the
//! distance driven, so every enumerated route is evaluated; there is no
//! shortest-path shortcut.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::catalog::{Catalog, CenterId};
use crate::error::{ConfigError, PlannerError};
use crate::evaluator::evaluate;
use crate::order::{Decomposition, Order, decompose};
use crate::route::{Route, RouteEnumerator, TripMode};
use crate::traits::Tariff;

/// Which centers a delivery route may start from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartPolicy {
    /// Any center the order needs.
    #[default]
    RequiredCenters,
    /// Any center in the catalog, required or not.
    AllCenters,
    /// Always this center.
    Fixed(CenterId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolveOptions {
    /// How visiting orders are split into depot trips.
    pub trip_mode: TripMode,
    pub start: StartPolicy,
    /// Orders needing more centers than this are rejected instead of
    /// enumerated.
    pub max_required_centers: usize,
    /// Search start centers on the rayon pool.
    pub parallel: bool,
}

impl SolveOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_required_centers == 0 {
            return Err(ConfigError::Invalid(
                "max_required_centers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            trip_mode: TripMode::MultiTrip,
            start: StartPolicy::RequiredCenters,
            max_required_centers: 8,
            parallel: true,
        }
    }
}

/// Outcome of an optimization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostResult {
    /// Exact minimum cost, unrounded.
    pub minimum_cost: f64,
    /// Cheapest route, `None` when the order needs no pickups.
    pub route: Option<Route>,
    pub start: Option<CenterId>,
    pub evaluated_routes: usize,
}

impl CostResult {
    fn empty() -> Self {
        Self {
            minimum_cost: 0.0,
            route: None,
            start: None,
            evaluated_routes: 0,
        }
    }

    pub fn reported(&self) -> Result<MinimumCost, PlannerError> {
        MinimumCost::from_cost(self.minimum_cost)
    }
}

/// The figure handed back to callers, e.g. `{"minimum_cost": 95}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumCost {
    pub minimum_cost: u64,
}

impl MinimumCost {
    /// Round to the nearest whole unit, ties to even.
    ///
    /// Negative, NaN and infinite costs, or costs too large for `u64`, are
    /// rejected rather than saturated.
    pub fn from_cost(cost: f64) -> Result<Self, PlannerError> {
        let rounded = cost.round_ties_even();
        if !rounded.is_finite() || rounded < 0.0 || rounded >= u64::MAX as f64 {
            return Err(PlannerError::InvalidCost(cost));
        }
        Ok(Self {
            minimum_cost: rounded as u64,
        })
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    cost: f64,
    route: Route,
    start: CenterId,
}

#[derive(Debug)]
struct StartBest {
    best: Option<Candidate>,
    evaluated: usize,
}

/// Find the cheapest way to deliver `order` to the depot.
///
/// Non-positive quantities are skipped; callers wanting them rejected should
/// validate the order first. Ties go to the route discovered first: starts in
/// policy order, then routes in enumeration order.
#[instrument(skip_all, fields(mode = ?options.trip_mode))]
pub fn solve<T>(
    order: &Order,
    catalog: &Catalog,
    tariff: &T,
    options: &SolveOptions,
) -> Result<CostResult, PlannerError>
where
    T: Tariff + Sync + ?Sized,
{
    let decomposition = decompose(order, catalog)?;
    if decomposition.is_empty() {
        debug!("order requires no pickups");
        return Ok(CostResult::empty());
    }

    let required = decomposition.required_centers();
    if required.len() > options.max_required_centers {
        warn!(
            required = required.len(),
            limit = options.max_required_centers,
            "rejecting order, too many centers to enumerate"
        );
        return Err(PlannerError::TooManyCenters {
            required: required.len(),
            limit: options.max_required_centers,
        });
    }

    let starts = candidate_starts(&decomposition, catalog, &options.start)?;
    debug!(
        required = required.len(),
        starts = starts.len(),
        total_weight = decomposition.total_weight(),
        "searching routes"
    );

    let search = |start: &CenterId| {
        best_for_start(start, &required, &decomposition, catalog, tariff, options.trip_mode)
    };
    let per_start: Vec<StartBest> = if options.parallel {
        starts.par_iter().map(search).collect::<Result<Vec<_>, PlannerError>>()?
    } else {
        starts.iter().map(search).collect::<Result<Vec<_>, PlannerError>>()?
    };

    let mut evaluated_routes = 0;
    let mut best: Option<Candidate> = None;
    for start_best in per_start {
        evaluated_routes += start_best.evaluated;
        if let Some(candidate) = start_best.best {
            if best.as_ref().is_none_or(|current| candidate.cost < current.cost) {
                best = Some(candidate);
            }
        }
    }

    let best = best.ok_or_else(|| {
        PlannerError::InvalidOrder("no candidate route could be built".to_string())
    })?;
    info!(
        cost = best.cost,
        route = %best.route,
        start = %best.start,
        evaluated_routes,
        "found minimum-cost route"
    );

    Ok(CostResult {
        minimum_cost: best.cost,
        route: Some(best.route),
        start: Some(best.start),
        evaluated_routes,
    })
}

fn candidate_starts(
    decomposition: &Decomposition,
    catalog: &Catalog,
    policy: &StartPolicy,
) -> Result<Vec<CenterId>, PlannerError> {
    match policy {
        StartPolicy::RequiredCenters => Ok(decomposition.required_centers()),
        StartPolicy::AllCenters => Ok(catalog.centers().cloned().collect()),
        StartPolicy::Fixed(center) => {
            if catalog.contains_center(center) {
                Ok(vec![center.clone()])
            } else {
                Err(PlannerError::UnknownCenter(center.clone()))
            }
        }
    }
}

fn best_for_start<T>(
    start: &CenterId,
    required: &[CenterId],
    weights: &Decomposition,
    catalog: &Catalog,
    tariff: &T,
    mode: TripMode,
) -> Result<StartBest, PlannerError>
where
    T: Tariff + ?Sized,
{
    let mut best: Option<Candidate> = None;
    let mut evaluated = 0;

    for route in RouteEnumerator::new(required, std::slice::from_ref(start), mode) {
        let cost = evaluate(&route, weights, catalog, tariff)?;
        evaluated += 1;
        if best.as_ref().is_none_or(|current| cost < current.cost) {
            best = Some(Candidate {
                cost,
                route,
                start: start.clone(),
            });
        }
    }

    debug!(
        start = %start,
        evaluated,
        best = ?best.as_ref().map(|candidate| candidate.cost),
        "start searched"
    );
    Ok(StartBest { best, evaluated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tariff::BlockTariff;
    use crate::traits::Stop;

    fn catalog() -> Catalog {
        Catalog::builder()
            .product("A", "C1", 3.0)
            .product("D", "C2", 12.0)
            .product("H", "C3", 1.0)
            .distance(Stop::center("C1"), Stop::Depot, 3.0)
            .distance(Stop::center("C2"), Stop::Depot, 2.5)
            .distance(Stop::center("C3"), Stop::Depot, 2.0)
            .distance(Stop::center("C1"), Stop::center("C2"), 4.0)
            .distance(Stop::center("C1"), Stop::center("C3"), 3.0)
            .distance(Stop::center("C2"), Stop::center("C3"), 3.0)
            .build()
            .unwrap()
    }

    fn solve_with(order: &Order, options: SolveOptions) -> Result<CostResult, PlannerError> {
        solve(order, &catalog(), &BlockTariff::default(), &options)
    }

    #[test]
    fn test_empty_order_costs_nothing() {
        let result = solve_with(&Order::new(), SolveOptions::default()).unwrap();
        assert_eq!(result.minimum_cost, 0.0);
        assert!(result.route.is_none());
        assert_eq!(result.evaluated_routes, 0);
    }

    #[test]
    fn test_multi_trip_beats_single_trip() {
        let order = Order::new().with_line("A", 1.0).with_line("D", 1.0);

        let single = solve_with(
            &order,
            SolveOptions {
                trip_mode: TripMode::SingleTrip,
                ..Default::default()
            },
        )
        .unwrap();
        let multi = solve_with(&order, SolveOptions::default()).unwrap();

        assert_eq!(single.minimum_cost, 105.0);
        assert_eq!(multi.minimum_cost, 95.0);
        assert_eq!(
            multi.route.unwrap().to_string(),
            "C1 -> depot -> C2 -> depot"
        );
        assert_eq!(multi.start, Some(CenterId::from("C1")));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let order = Order::new()
            .with_line("A", 2.0)
            .with_line("D", 1.0)
            .with_line("H", 3.0);
        for trip_mode in [TripMode::SingleTrip, TripMode::MultiTrip, TripMode::Partitioned] {
            let parallel = solve_with(
                &order,
                SolveOptions {
                    trip_mode,
                    ..Default::default()
                },
            )
            .unwrap();
            let sequential = solve_with(
                &order,
                SolveOptions {
                    trip_mode,
                    parallel: false,
                    ..Default::default()
                },
            )
            .unwrap();
            assert_eq!(parallel, sequential, "mode {trip_mode:?}");
        }
    }

    #[test]
    fn test_partitioned_is_never_worse() {
        let order = Order::new()
            .with_line("A", 1.0)
            .with_line("D", 1.0)
            .with_line("H", 2.0);
        let multi = solve_with(&order, SolveOptions::default()).unwrap();
        let partitioned = solve_with(
            &order,
            SolveOptions {
                trip_mode: TripMode::Partitioned,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(partitioned.minimum_cost <= multi.minimum_cost);
        assert!(partitioned.evaluated_routes > multi.evaluated_routes);
    }

    #[test]
    fn test_fixed_start() {
        let order = Order::new().with_line("A", 1.0).with_line("D", 1.0);
        let result = solve_with(
            &order,
            SolveOptions {
                start: StartPolicy::Fixed(CenterId::from("C2")),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(result.start, Some(CenterId::from("C2")));
        // C2 -> L1 -> C1 -> L1: 2.5 * 26 + 3 * 10
        assert_eq!(result.minimum_cost, 95.0);
        assert_eq!(result.evaluated_routes, 2);
    }

    #[test]
    fn test_fixed_start_must_exist() {
        let order = Order::new().with_line("A", 1.0);
        let result = solve_with(
            &order,
            SolveOptions {
                start: StartPolicy::Fixed(CenterId::from("C9")),
                ..Default::default()
            },
        );
        assert_eq!(result, Err(PlannerError::UnknownCenter(CenterId::from("C9"))));
    }

    #[test]
    fn test_all_centers_start_never_beats_required_start() {
        let order = Order::new().with_line("A", 1.0);
        let result = solve_with(
            &order,
            SolveOptions {
                start: StartPolicy::AllCenters,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(result.minimum_cost, 30.0);
        assert_eq!(result.start, Some(CenterId::from("C1")));
        assert_eq!(result.evaluated_routes, 1 + 2 + 2);
    }

    #[test]
    fn test_too_many_centers() {
        let order = Order::new().with_line("A", 1.0).with_line("D", 1.0);
        let result = solve_with(
            &order,
            SolveOptions {
                max_required_centers: 1,
                ..Default::default()
            },
        );
        assert_eq!(
            result,
            Err(PlannerError::TooManyCenters {
                required: 2,
                limit: 1
            })
        );
    }

    #[test]
    fn test_reported_cost_rounds_at_the_end() {
        let whole = |cost: f64| MinimumCost::from_cost(cost).unwrap().minimum_cost;
        assert_eq!(whole(94.6), 95);
        assert_eq!(whole(94.5), 94);
        assert_eq!(whole(95.5), 96);
        assert_eq!(whole(0.0), 0);
    }

    #[test]
    fn test_unreportable_cost_is_an_error() {
        for cost in [f64::INFINITY, f64::NAN, -1.0, 1e30] {
            assert!(
                matches!(MinimumCost::from_cost(cost), Err(PlannerError::InvalidCost(_))),
                "cost {cost} should be rejected"
            );
        }
    }

    #[test]
    fn test_options_validate() {
        assert!(SolveOptions::default().validate().is_ok());
        let options = SolveOptions {
            max_required_centers: 0,
            ..Default::default()
        };
        assert!(matches!(options.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_minimum_cost_json_shape() {
        let json = serde_json::to_string(&MinimumCost { minimum_cost: 95 }).unwrap();
        assert_eq!(json, r#"{"minimum_cost":95}"#);
    }
}
