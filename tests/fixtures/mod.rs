//! Test fixtures for delivery-planner.
//!
//! Provides the three-center catalog used throughout the tests:
//! - C1 stocks A (3), B (2), C (8)
//! - C2 stocks D (12), E (25), F (15)
//! - C3 stocks G (0.5), H (1), I (2)

#![allow(dead_code)]

use delivery_planner::traits::Stop;
use delivery_planner::{BlockTariff, Catalog, Order, Planner, SolveOptions};

pub const PRODUCTS: &[(&str, &str, f64)] = &[
    ("A", "C1", 3.0),
    ("B", "C1", 2.0),
    ("C", "C1", 8.0),
    ("D", "C2", 12.0),
    ("E", "C2", 25.0),
    ("F", "C2", 15.0),
    ("G", "C3", 0.5),
    ("H", "C3", 1.0),
    ("I", "C3", 2.0),
];

/// Edges as (from, to, distance); "L1" is the depot.
pub const DISTANCES: &[(&str, &str, f64)] = &[
    ("C1", "L1", 3.0),
    ("C2", "L1", 2.5),
    ("C3", "L1", 2.0),
    ("C1", "C2", 4.0),
    ("C1", "C3", 3.0),
    ("C2", "C3", 3.0),
];

fn stop(name: &str) -> Stop {
    if name == "L1" { Stop::Depot } else { Stop::center(name) }
}

/// The fixture catalog with every distance multiplied by `scale`.
pub fn scaled_catalog(scale: f64) -> Catalog {
    let mut builder = Catalog::builder();
    for (id, center, weight) in PRODUCTS {
        builder = builder.product(*id, *center, *weight);
    }
    for (from, to, distance) in DISTANCES {
        builder = builder.distance(stop(from), stop(to), distance * scale);
    }
    builder.build().expect("fixture catalog is valid")
}

pub fn catalog() -> Catalog {
    scaled_catalog(1.0)
}

pub fn planner(options: SolveOptions) -> Planner {
    Planner::new(catalog(), BlockTariff::default(), options).expect("fixture planner is valid")
}

pub fn order(lines: &[(&str, f64)]) -> Order {
    lines.iter().map(|(product, quantity)| (*product, *quantity)).collect()
}
