//! Static product and distance catalog.
//!
//! Built once at startup and shared read-only by every request.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, PlannerError};
use crate::order::ProductId;
use crate::traits::{DistanceLookup, Stop};

/// Identifier of a stocking center.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CenterId(String);

impl CenterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CenterId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CenterId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for CenterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a product is stocked and how much one unit weighs.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub center: CenterId,
    pub unit_weight: f64,
}

/// Immutable lookup tables for products, centers and distances.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<ProductId, Product>,
    centers: BTreeSet<CenterId>,
    distances: HashMap<(Stop, Stop), f64>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Resolve the owning center and unit weight of a product.
    pub fn center_and_weight(&self, id: &ProductId) -> Result<(&CenterId, f64), PlannerError> {
        self.products
            .get(id)
            .map(|product| (&product.center, product.unit_weight))
            .ok_or_else(|| PlannerError::UnknownProduct(id.clone()))
    }

    /// All known centers, in ascending identifier order.
    pub fn centers(&self) -> impl Iterator<Item = &CenterId> {
        self.centers.iter()
    }

    pub fn contains_center(&self, id: &CenterId) -> bool {
        self.centers.contains(id)
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

impl DistanceLookup for Catalog {
    fn distance(&self, from: &Stop, to: &Stop) -> Result<f64, PlannerError> {
        if from == to {
            return Ok(0.0);
        }
        self.distances
            .get(&(from.clone(), to.clone()))
            .copied()
            .ok_or_else(|| PlannerError::MissingDistance {
                from: from.clone(),
                to: to.clone(),
            })
    }
}

/// Collects catalog entries and validates them on [`CatalogBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    products: Vec<(ProductId, Product)>,
    distances: Vec<(Stop, Stop, f64)>,
}

impl CatalogBuilder {
    pub fn product(
        mut self,
        id: impl Into<ProductId>,
        center: impl Into<CenterId>,
        unit_weight: f64,
    ) -> Self {
        self.products.push((
            id.into(),
            Product {
                center: center.into(),
                unit_weight,
            },
        ));
        self
    }

    /// Register the distance of an undirected edge. The reverse direction is
    /// added on build.
    pub fn distance(mut self, from: Stop, to: Stop, distance: f64) -> Self {
        self.distances.push((from, to, distance));
        self
    }

    pub fn build(self) -> Result<Catalog, ConfigError> {
        let mut products = HashMap::with_capacity(self.products.len());
        let mut centers = BTreeSet::new();

        for (id, product) in self.products {
            if !product.unit_weight.is_finite() || product.unit_weight < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "product `{id}` has invalid unit weight {}",
                    product.unit_weight
                )));
            }
            centers.insert(product.center.clone());
            if products.insert(id.clone(), product).is_some() {
                return Err(ConfigError::Invalid(format!("product `{id}` is defined twice")));
            }
        }

        let mut distances = HashMap::with_capacity(self.distances.len() * 2);
        for (from, to, distance) in self.distances {
            if from == to {
                return Err(ConfigError::Invalid(format!("self-distance entry for {from}")));
            }
            if !distance.is_finite() || distance < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "distance between {from} and {to} is invalid: {distance}"
                )));
            }
            if let Some(existing) = distances.get(&(from.clone(), to.clone())) {
                if *existing != distance {
                    return Err(ConfigError::Invalid(format!(
                        "conflicting distances between {from} and {to}: {existing} and {distance}"
                    )));
                }
            }
            for stop in [&from, &to] {
                if let Some(center) = stop.as_center() {
                    centers.insert(center.clone());
                }
            }
            distances.insert((to.clone(), from.clone()), distance);
            distances.insert((from, to), distance);
        }

        Ok(Catalog {
            products,
            centers,
            distances,
        })
    }
}
