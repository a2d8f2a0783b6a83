//! Static planner configuration.
//!
//! Loaded once at process start, typically from a JSON document such as:
//!
//! ```json
//! {
//!   "depot": "L1",
//!   "products": [{ "id": "A", "center": "C1", "weight": 3 }],
//!   "distances": [{ "from": "C1", "to": "L1", "distance": 3 }],
//!   "tariff": { "base_rate": 10, "threshold": 5, "block_size": 5, "surcharge": 8 },
//!   "options": { "trip_mode": "multi_trip", "max_required_centers": 8 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CenterId};
use crate::error::ConfigError;
use crate::order::ProductId;
use crate::solver::SolveOptions;
use crate::tariff::BlockTariff;
use crate::traits::Stop;

/// Depot name used by the stock configuration data.
pub const DEFAULT_DEPOT: &str = "L1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub id: ProductId,
    pub center: CenterId,
    pub weight: f64,
}

/// One undirected edge; either endpoint may name the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEntry {
    pub from: String,
    pub to: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Name the distance table uses for the depot.
    pub depot: String,
    pub products: Vec<ProductEntry>,
    pub distances: Vec<DistanceEntry>,
    pub tariff: BlockTariff,
    pub options: SolveOptions,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            depot: DEFAULT_DEPOT.to_string(),
            products: Vec::new(),
            distances: Vec::new(),
            tariff: BlockTariff::default(),
            options: SolveOptions::default(),
        }
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Map a configured location name to a route stop.
    pub fn stop(&self, name: &str) -> Stop {
        if name == self.depot {
            Stop::Depot
        } else {
            Stop::center(name)
        }
    }

    /// Check tariff parameters and solve options. Table contents are checked
    /// when the catalog is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depot.is_empty() {
            return Err(ConfigError::Invalid("depot name is empty".to_string()));
        }

        self.tariff.validate()?;
        self.options.validate()
    }

    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let mut builder = Catalog::builder();
        for product in &self.products {
            if product.center.as_str() == self.depot {
                return Err(ConfigError::Invalid(format!(
                    "product `{}` is stocked at the depot",
                    product.id
                )));
            }
            builder = builder.product(product.id.clone(), product.center.clone(), product.weight);
        }
        for entry in &self.distances {
            builder = builder.distance(self.stop(&entry.from), self.stop(&entry.to), entry.distance);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::TripMode;
    use crate::solver::StartPolicy;
    use crate::traits::DistanceLookup;

    const CONFIG: &str = r#"{
        "products": [
            { "id": "A", "center": "C1", "weight": 3 },
            { "id": "D", "center": "C2", "weight": 12 }
        ],
        "distances": [
            { "from": "C1", "to": "L1", "distance": 3 },
            { "from": "C2", "to": "L1", "distance": 2.5 },
            { "from": "C1", "to": "C2", "distance": 4 }
        ],
        "options": { "trip_mode": "partitioned", "start": { "fixed": "C2" } }
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = PlannerConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.depot, "L1");
        assert_eq!(config.tariff, BlockTariff::default());
        assert_eq!(config.options.trip_mode, TripMode::Partitioned);
        assert_eq!(config.options.start, StartPolicy::Fixed(CenterId::from("C2")));
        assert_eq!(config.options.max_required_centers, SolveOptions::default().max_required_centers);
    }

    #[test]
    fn test_catalog_maps_depot_name() {
        let config = PlannerConfig::from_json_str(CONFIG).unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.distance(&Stop::Depot, &Stop::center("C2")).unwrap(), 2.5);
        assert_eq!(catalog.product_count(), 2);
    }

    #[test]
    fn test_custom_depot_name() {
        let config = PlannerConfig::from_json_str(
            r#"{ "depot": "HQ", "distances": [{ "from": "HQ", "to": "C1", "distance": 7 }] }"#,
        )
        .unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.distance(&Stop::center("C1"), &Stop::Depot).unwrap(), 7.0);
        assert!(!catalog.contains_center(&CenterId::from("HQ")));
    }

    #[test]
    fn test_rejects_bad_tariff() {
        let result = PlannerConfig::from_json_str(r#"{ "tariff": { "block_size": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        let result = PlannerConfig::from_json_str(r#"{ "tariff": { "surcharge": -1 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            PlannerConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_product_at_depot() {
        let config = PlannerConfig::from_json_str(
            r#"{ "products": [{ "id": "A", "center": "L1", "weight": 1 }] }"#,
        )
        .unwrap();
        assert!(matches!(config.catalog(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = PlannerConfig::from_path("/nonexistent/planner.json");
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
