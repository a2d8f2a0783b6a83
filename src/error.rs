//! Error types for planning requests and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CenterId;
use crate::order::ProductId;
use crate::traits::Stop;

/// Errors raised while answering a single optimization request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    /// The order references a product the catalog does not stock.
    #[error("unknown product `{0}`")]
    UnknownProduct(ProductId),
    /// A route needs an edge the distance table does not define.
    #[error("no distance configured between {from} and {to}")]
    MissingDistance { from: Stop, to: Stop },
    /// The order itself is malformed.
    #[error("invalid order: {0}")]
    InvalidOrder(String),
    /// A fixed start names a center the catalog does not know.
    #[error("unknown center `{0}`")]
    UnknownCenter(CenterId),
    /// Exhaustive enumeration would be impractical for this order.
    #[error("order requires {required} centers, limit is {limit}")]
    TooManyCenters { required: usize, limit: usize },
    /// The search produced a cost that cannot be reported as a whole number.
    #[error("cost {0} cannot be reported")]
    InvalidCost(f64),
}

/// Errors raised while loading the static planner configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration at {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
