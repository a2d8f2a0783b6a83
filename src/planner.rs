//! Request-facing entry point over the static configuration.

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::PlannerConfig;
use crate::error::{ConfigError, PlannerError};
use crate::evaluator::{RouteTrace, trace};
use crate::order::{Order, decompose};
use crate::solver::{CostResult, MinimumCost, SolveOptions, solve};
use crate::tariff::BlockTariff;

/// Owns the catalog, tariff and options for the lifetime of the process and
/// answers one order at a time. Shareable across threads.
#[derive(Debug, Clone)]
pub struct Planner {
    catalog: Catalog,
    tariff: BlockTariff,
    options: SolveOptions,
}

impl Planner {
    /// Fails when the tariff or options are unusable; the catalog validates
    /// itself when built.
    pub fn new(
        catalog: Catalog,
        tariff: BlockTariff,
        options: SolveOptions,
    ) -> Result<Self, ConfigError> {
        tariff.validate()?;
        options.validate()?;
        Ok(Self {
            catalog,
            tariff,
            options,
        })
    }

    pub fn from_config(config: &PlannerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = config.catalog()?;
        debug!(
            products = catalog.product_count(),
            centers = catalog.centers().count(),
            "planner configured"
        );
        Self::new(catalog, config.tariff, config.options.clone())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tariff(&self) -> &BlockTariff {
        &self.tariff
    }

    pub fn options(&self) -> &SolveOptions {
        &self.options
    }

    /// Validate the order and search for its cheapest route.
    pub fn optimize(&self, order: &Order) -> Result<CostResult, PlannerError> {
        order.validate()?;
        solve(order, &self.catalog, &self.tariff, &self.options)
    }

    /// The single number reported back to callers.
    pub fn compute_minimum_cost(&self, order: &Order) -> Result<MinimumCost, PlannerError> {
        self.optimize(order)?.reported()
    }

    /// Leg-by-leg breakdown of the cheapest route, `None` when nothing needs
    /// picking up.
    pub fn explain(&self, order: &Order) -> Result<Option<RouteTrace>, PlannerError> {
        let result = self.optimize(order)?;
        let Some(route) = result.route else {
            return Ok(None);
        };
        let weights = decompose(order, &self.catalog)?;
        trace(&route, &weights, &self.catalog, &self.tariff).map(Some)
    }
}
