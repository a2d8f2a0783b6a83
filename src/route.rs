//! Delivery routes and lazy enumeration of candidate routes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::CenterId;
use crate::traits::Stop;

/// An ordered sequence of stops ending at the depot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Route {
    stops: Vec<Stop>,
}

impl Route {
    pub fn new(stops: Vec<Stop>) -> Self {
        Self { stops }
    }

    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<Stop> {
        self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of depot arrivals, i.e. delivery trips.
    pub fn trips(&self) -> usize {
        self.stops.iter().filter(|stop| stop.is_depot()).count()
    }

    /// Whether the route ends at the depot, never repeats a stop back to back
    /// and visits every center in `required`.
    pub fn is_valid_for(&self, required: &[CenterId]) -> bool {
        if self.stops.last() != Some(&Stop::Depot) {
            return false;
        }
        if self.stops.windows(2).any(|pair| pair[0] == pair[1]) {
            return false;
        }
        required
            .iter()
            .all(|center| self.stops.iter().any(|stop| stop.as_center() == Some(center)))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{stop}")?;
        }
        Ok(())
    }
}

/// How a visiting order is split into depot trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripMode {
    /// Visit every center, then deliver once.
    SingleTrip,
    /// Deliver after every center, plus the single-trip variant.
    #[default]
    MultiTrip,
    /// Every way of cutting the visiting order into consecutive trips.
    Partitioned,
}

impl TripMode {
    /// Depot-return mask for the `cursor`-th split of an order with `stops`
    /// centers. Bit `i` set means "return to the depot after center `i`".
    fn split_mask(self, stops: usize, cursor: usize) -> Option<u64> {
        let full = full_mask(stops);
        match self {
            TripMode::SingleTrip => (cursor == 0).then_some(0),
            TripMode::MultiTrip => match cursor {
                0 => Some(full),
                1 if full != 0 => Some(0),
                _ => None,
            },
            TripMode::Partitioned => {
                let cursor = cursor as u64;
                (cursor <= full).then(|| full - cursor)
            }
        }
    }
}

fn full_mask(stops: usize) -> u64 {
    match stops.saturating_sub(1) {
        0 => 0,
        gaps if gaps >= 64 => u64::MAX,
        gaps => (1u64 << gaps) - 1,
    }
}

fn build_route(visit_order: &[CenterId], mask: u64) -> Route {
    let mut stops = Vec::with_capacity(visit_order.len() * 2);
    for (i, center) in visit_order.iter().enumerate() {
        stops.push(Stop::Center(center.clone()));
        let last = i + 1 == visit_order.len();
        if !last && i < 64 && mask & (1u64 << i) != 0 {
            stops.push(Stop::Depot);
        }
    }
    stops.push(Stop::Depot);
    Route::new(stops)
}

/// Lexicographic permutations of `0..len`, one at a time.
#[derive(Debug, Clone)]
struct Permutations {
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Permutations {
    fn new(len: usize) -> Self {
        Self {
            indices: (0..len).collect(),
            started: false,
            done: false,
        }
    }

    fn advance(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.indices);
        }

        let n = self.indices.len();
        let mut i = n.saturating_sub(1);
        while i > 0 && self.indices[i - 1] >= self.indices[i] {
            i -= 1;
        }
        if i == 0 {
            self.done = true;
            return None;
        }
        let mut j = n - 1;
        while self.indices[j] <= self.indices[i - 1] {
            j -= 1;
        }
        self.indices.swap(i - 1, j);
        self.indices[i..].reverse();
        Some(&self.indices)
    }
}

/// Enumeration state for one start center.
#[derive(Debug, Clone)]
struct StartCursor {
    start: CenterId,
    rest: Vec<CenterId>,
    permutations: Permutations,
    visit_order: Vec<CenterId>,
    split: usize,
}

impl StartCursor {
    fn new(start: CenterId, required: &[CenterId]) -> Self {
        let rest: Vec<CenterId> = required.iter().filter(|c| **c != start).cloned().collect();
        Self {
            permutations: Permutations::new(rest.len()),
            start,
            rest,
            visit_order: Vec::new(),
            split: 0,
        }
    }

    fn next_route(&mut self, mode: TripMode) -> Option<Route> {
        loop {
            if self.visit_order.is_empty() {
                let permutation = self.permutations.advance()?;
                self.visit_order.push(self.start.clone());
                self.visit_order
                    .extend(permutation.iter().map(|&i| self.rest[i].clone()));
                self.split = 0;
            }

            if let Some(mask) = mode.split_mask(self.visit_order.len(), self.split) {
                self.split += 1;
                return Some(build_route(&self.visit_order, mask));
            }
            self.visit_order.clear();
        }
    }
}

/// Lazily yields every candidate route for a set of required centers.
///
/// For each start center (in the given order) the remaining required centers
/// are permuted lexicographically, and each visiting order is split into
/// trips according to the [`TripMode`]. A start that is not itself required
/// is visited first without picking anything up. A clone resumes from the
/// same position, so cloning a fresh enumerator restarts the sequence.
#[derive(Debug, Clone)]
pub struct RouteEnumerator {
    required: Vec<CenterId>,
    starts: Vec<CenterId>,
    mode: TripMode,
    next_start: usize,
    cursor: Option<StartCursor>,
}

impl RouteEnumerator {
    pub fn new(required: &[CenterId], starts: &[CenterId], mode: TripMode) -> Self {
        Self {
            required: required.to_vec(),
            starts: starts.to_vec(),
            mode,
            next_start: 0,
            cursor: None,
        }
    }

    /// Enumerate with every required center as a possible start.
    pub fn from_required(required: &[CenterId], mode: TripMode) -> Self {
        Self::new(required, required, mode)
    }
}

impl Iterator for RouteEnumerator {
    type Item = Route;

    fn next(&mut self) -> Option<Route> {
        loop {
            if self.cursor.is_none() {
                let start = self.starts.get(self.next_start)?.clone();
                self.next_start += 1;
                self.cursor = Some(StartCursor::new(start, &self.required));
            }

            if let Some(cursor) = self.cursor.as_mut() {
                if let Some(route) = cursor.next_route(self.mode) {
                    return Some(route);
                }
            }
            self.cursor = None;
        }
    }
}
