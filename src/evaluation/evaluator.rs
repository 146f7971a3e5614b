//! Route evaluator that projects timing, load and distance for a trip.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::models::{Route, SimTime, Vehicle, Visit};
use crate::registry::Registry;

/// A problem a projected trip would run into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectedIssue {
    /// The stop would be reached after its earliest deadline.
    LateArrival {
        /// Stop concerned.
        destination: usize,
        /// Projected arrival.
        arrival: SimTime,
        /// Earliest deadline at the stop.
        deadline: SimTime,
    },
    /// The stop would be reached before all its parcels are ready.
    EarlyArrival {
        /// Stop concerned.
        destination: usize,
        /// Projected arrival.
        arrival: SimTime,
        /// Latest ready time at the stop.
        ready: SimTime,
    },
    /// More parcels than the vehicle holds.
    OverCapacity {
        /// Parcels on board at departure.
        load: usize,
        /// Vehicle capacity.
        capacity: usize,
    },
}

/// Projects a path for one vehicle: arrival at each stop, load on board and
/// total distance back to the depot.
///
/// Parcel counts and time aggregates are read from the registry, so the
/// projection must be made before the parcels are loaded.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::DistanceMatrix;
/// use u_dispatch::evaluation::RouteEvaluator;
/// use u_dispatch::models::{Parcel, SimTime, Vehicle};
/// use u_dispatch::registry::Registry;
///
/// let dm = DistanceMatrix::from_lower_triangle(&[vec![0.0], vec![9.0, 0.0]]).unwrap();
/// let registry = Registry::from_parcels(vec![Parcel::new(1, 1, 1.0)], &[]).unwrap();
/// let vehicle = Vehicle::new(1, 16).with_speed(18.0);
///
/// let evaluator = RouteEvaluator::new(&registry, &dm, &vehicle);
/// let (route, issues) = evaluator.build_route(&[1], SimTime::from_hm(8, 0));
/// assert_eq!(route.visits()[0].arrival_time, SimTime::from_hm(8, 30));
/// assert_eq!(route.return_time(), SimTime::from_hm(9, 0));
/// assert!(issues.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    registry: &'a Registry,
    distances: &'a DistanceMatrix,
    vehicle: &'a Vehicle,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given vehicle.
    pub fn new(registry: &'a Registry, distances: &'a DistanceMatrix, vehicle: &'a Vehicle) -> Self {
        Self {
            registry,
            distances,
            vehicle,
        }
    }

    /// Projects a trip leaving the vehicle's current location at `departure`
    /// and visiting `destination_ids` in order before returning to the depot.
    ///
    /// Returns the projected route and every issue found along it.
    pub fn build_route(&self, destination_ids: &[usize], departure: SimTime) -> (Route, Vec<ProjectedIssue>) {
        let mut route = Route::new(self.vehicle.id(), departure);
        let mut issues = Vec::new();
        let speed = self.vehicle.speed();

        let counts: Vec<usize> = destination_ids
            .iter()
            .map(|&d| self.registry.waiting_count(d))
            .collect();
        let mut on_board: usize = counts.iter().sum();
        if on_board > self.vehicle.capacity() {
            issues.push(ProjectedIssue::OverCapacity {
                load: on_board,
                capacity: self.vehicle.capacity(),
            });
        }

        let mut now = departure;
        let mut total_distance = 0.0;
        let mut prev = self.vehicle.location();

        for (&dest, &parcels) in destination_ids.iter().zip(&counts) {
            let travel = self.distances.get(prev, dest);
            total_distance += travel;
            now = now.after_drive(travel, speed);

            if let Some(info) = self.registry.destination(dest) {
                if let Some(deadline) = info.deadline() {
                    if now > deadline {
                        issues.push(ProjectedIssue::LateArrival {
                            destination: dest,
                            arrival: now,
                            deadline,
                        });
                    }
                }
                if let Some(ready) = info.ready_time() {
                    if now < ready {
                        issues.push(ProjectedIssue::EarlyArrival {
                            destination: dest,
                            arrival: now,
                            ready,
                        });
                    }
                }
            }

            on_board -= parcels;
            route.push_visit(Visit {
                destination_id: dest,
                arrival_time: now,
                departure_time: now,
                parcels,
                load_after: on_board,
            });
            prev = dest;
        }

        let back = self.distances.get(prev, self.vehicle.depot_id());
        total_distance += back;
        route.set_total_distance(total_distance);
        route.set_return_time(now.after_drive(back, speed));

        (route, issues)
    }
}
