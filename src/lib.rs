//! delivery-planner core
//!
//! Minimum-cost pickup routing from stocking centers to a single depot under
//! a weight-dependent tariff.

pub mod traits;
pub mod error;
pub mod tariff;
pub mod catalog;
pub mod order;
pub mod route;
pub mod evaluator;
pub mod solver;
pub mod config;
pub mod planner;

pub use catalog::{Catalog, CenterId};
pub use config::PlannerConfig;
pub use error::{ConfigError, PlannerError};
pub use order::{Order, ProductId};
pub use planner::Planner;
pub use solver::{CostResult, MinimumCost, SolveOptions, StartPolicy};
pub use tariff::BlockTariff;
