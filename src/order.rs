//! Orders and their decomposition into per-center pickups.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CenterId};
use crate::error::PlannerError;

/// Identifier of a catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Requested quantity per product.
///
/// Serialises as a plain JSON object, e.g. `{"A": 1, "D": 2.5}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Order {
    lines: BTreeMap<ProductId, f64>,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line(mut self, product: impl Into<ProductId>, quantity: f64) -> Self {
        self.insert(product, quantity);
        self
    }

    /// Set the quantity for a product, replacing any previous line.
    pub fn insert(&mut self, product: impl Into<ProductId>, quantity: f64) {
        self.lines.insert(product.into(), quantity);
    }

    /// Parse an order from a request body.
    ///
    /// An empty body or anything other than an object of numbers is rejected.
    pub fn from_json(body: &str) -> Result<Self, PlannerError> {
        if body.trim().is_empty() {
            return Err(PlannerError::InvalidOrder("empty request body".to_string()));
        }
        serde_json::from_str(body).map_err(|err| PlannerError::InvalidOrder(err.to_string()))
    }

    pub fn lines(&self) -> impl Iterator<Item = (&ProductId, f64)> {
        self.lines.iter().map(|(product, quantity)| (product, *quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Reject negative or non-finite quantities.
    pub fn validate(&self) -> Result<(), PlannerError> {
        for (product, quantity) in self.lines() {
            if !quantity.is_finite() || quantity < 0.0 {
                return Err(PlannerError::InvalidOrder(format!(
                    "quantity {quantity} for product `{product}`"
                )));
            }
        }
        Ok(())
    }
}

impl<P: Into<ProductId>> FromIterator<(P, f64)> for Order {
    fn from_iter<I: IntoIterator<Item = (P, f64)>>(iter: I) -> Self {
        Self {
            lines: iter
                .into_iter()
                .map(|(product, quantity)| (product.into(), quantity))
                .collect(),
        }
    }
}

/// Centers an order must visit and the weight picked up at each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decomposition {
    weights: BTreeMap<CenterId, f64>,
}

impl Decomposition {
    /// Required centers in ascending identifier order.
    pub fn required_centers(&self) -> Vec<CenterId> {
        self.weights.keys().cloned().collect()
    }

    pub fn is_required(&self, center: &CenterId) -> bool {
        self.weights.contains_key(center)
    }

    /// Pickup weight at `center`; zero for centers the order does not need.
    pub fn weight(&self, center: &CenterId) -> f64 {
        self.weights.get(center).copied().unwrap_or(0.0)
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CenterId, f64)> {
        self.weights.iter().map(|(center, weight)| (center, *weight))
    }
}

/// Resolve the order lines against the catalog and sum pickup weight per
/// center.
///
/// Lines with a non-positive quantity are not required and are skipped
/// before lookup. Any other line naming a product the catalog does not stock
/// invalidates the whole order.
pub fn decompose(order: &Order, catalog: &Catalog) -> Result<Decomposition, PlannerError> {
    let mut weights: BTreeMap<CenterId, f64> = BTreeMap::new();

    for (product, quantity) in order.lines() {
        if quantity <= 0.0 {
            continue;
        }
        let (center, unit_weight) = catalog.center_and_weight(product)?;
        *weights.entry(center.clone()).or_insert(0.0) += quantity * unit_weight;
    }

    Ok(Decomposition { weights })
}
