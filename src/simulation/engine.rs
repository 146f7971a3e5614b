//! Discrete-event day simulator.

use std::cmp::Ordering;
use std::collections::VecDeque;

use log::{debug, info, warn};

use crate::availability::AvailabilityTracker;
use crate::cluster::{ClusterForest, Clusterer, Member, Summary};
use crate::error::{DispatchError, Result};
use crate::evaluation::{ProjectedIssue, RouteEvaluator};
use crate::models::{
    DayReport, Delivery, ParcelStatus, SimTime, Vehicle, VehiclePhase, Violation, ViolationType,
};
use crate::registry::Registry;
use crate::routing::RouteBuilder;

use super::config::{Scenario, SimulationConfig};
use super::context::{PendingCorrection, SimulationContext};
use super::status::StatusSnapshot;

/// A top-level group a vehicle could take next.
struct Candidate {
    order: usize,
    member: Member,
    summary: Summary,
    distance: f64,
}

/// Earliest deadline first (none last), then groups reserved for the
/// vehicle, then the closest center, then creation order.
fn dispatch_order(a: &Candidate, b: &Candidate) -> Ordering {
    let deadline = |c: &Candidate| (c.summary.deadline.is_none(), c.summary.deadline);
    deadline(a)
        .cmp(&deadline(b))
        .then(
            a.summary
                .required_vehicle
                .is_none()
                .cmp(&b.summary.required_vehicle.is_none()),
        )
        .then(a.distance.total_cmp(&b.distance))
        .then(a.order.cmp(&b.order))
}

/// Runs a delivery day over a [`Scenario`].
///
/// The earliest vehicle always moves next (lowest ID on ties). An idle
/// vehicle at the depot takes the best top-level group it may carry, waits
/// for the next wake-up or correction, or parks for the day. Waiting is a
/// clock jump, never a blocking call, so a run is fully deterministic.
///
/// # Examples
///
/// ```
/// use u_dispatch::distance::DistanceMatrix;
/// use u_dispatch::models::{Location, LocationTable, ManifestEntry};
/// use u_dispatch::simulation::{Scenario, SimulationConfig, Simulator};
///
/// let locations = LocationTable::new(vec![
///     Location::new(0, "Hub", "1 Depot Rd", "84000"),
///     Location::new(1, "Shop", "9 Elm St", "84001"),
/// ]);
/// let distances = DistanceMatrix::from_lower_triangle(&[vec![0.0], vec![9.0, 0.0]]).unwrap();
/// let manifest = vec![ManifestEntry::new(1, "9 Elm St", "Town", "84001", "10:30 AM", 2.0)];
///
/// let scenario = Scenario::new(locations, distances, manifest);
/// let report = Simulator::new(&scenario, SimulationConfig::default())
///     .unwrap()
///     .run()
///     .unwrap();
/// assert!(report.is_complete());
/// assert!(report.on_time());
/// assert_eq!(report.total_distance(), 18.0);
/// ```
pub struct Simulator<'a> {
    scenario: &'a Scenario,
    config: SimulationConfig,
}

impl<'a> Simulator<'a> {
    /// Creates a simulator, validating the configuration.
    pub fn new(scenario: &'a Scenario, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        scenario.distances.check(config.depot)?;
        if !scenario.distances.is_symmetric(1e-9) {
            return Err(DispatchError::InvalidMatrix {
                reason: "distances are not symmetric".to_string(),
            });
        }
        Ok(Self { scenario, config })
    }

    /// Configuration in use.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulates the whole day and returns its report.
    pub fn run(&self) -> Result<DayReport> {
        let mut ctx = self.start()?;
        self.advance(&mut ctx, SimTime::END_OF_DAY)?;
        self.finish(&mut ctx);
        Ok(ctx.into_report())
    }

    /// Simulates the day from scratch up to and including `time`, returning
    /// the live state at that moment.
    pub fn run_until(&self, time: SimTime) -> Result<SimulationContext> {
        let mut ctx = self.start()?;
        self.advance(&mut ctx, time)?;
        if time.is_end_of_day() {
            self.finish(&mut ctx);
        }
        debug!("replayed the day up to {time}, next event at {}", ctx.clock());
        Ok(ctx)
    }

    /// Status of every parcel at `time`.
    ///
    /// Each call replays the day from the start, so repeated queries for the
    /// same time return identical snapshots.
    pub fn status_at(&self, time: SimTime) -> Result<StatusSnapshot> {
        let ctx = self.run_until(time)?;
        Ok(StatusSnapshot::capture(&ctx, &self.scenario.locations, time))
    }

    fn start(&self) -> Result<SimulationContext> {
        let s = self.scenario;
        let registry = Registry::from_manifest(&s.locations, &s.distances, &s.manifest)?;

        for parcel in registry.parcels() {
            if let Some(vehicle) = parcel.required_vehicle() {
                if vehicle == 0 || vehicle > self.config.fleet_size {
                    return Err(DispatchError::UnknownVehicle {
                        parcel_id: parcel.id(),
                        vehicle,
                    });
                }
            }
        }

        let mut corrections = s
            .corrections
            .iter()
            .map(|c| {
                if registry.parcel(c.parcel_id).is_none() {
                    return Err(DispatchError::UnknownParcel {
                        parcel_id: c.parcel_id,
                    });
                }
                let destination = s
                    .locations
                    .lookup(&c.address, &c.postal_code)
                    .ok_or_else(|| DispatchError::UnknownAddress {
                        parcel_id: c.parcel_id,
                        address: c.address.clone(),
                        postal_code: c.postal_code.clone(),
                    })?;
                s.distances.check(destination)?;
                Ok(PendingCorrection {
                    parcel_id: c.parcel_id,
                    effective_at: c.effective_at,
                    destination,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        corrections.sort_by(|a, b| {
            a.effective_at
                .cmp(&b.effective_at)
                .then(a.parcel_id.cmp(&b.parcel_id))
        });

        let vehicles = (1..=self.config.fleet_size)
            .map(|id| {
                Vehicle::new(id, self.config.vehicle_capacity)
                    .with_speed(self.config.vehicle_speed)
                    .with_depot(self.config.depot)
                    .with_start_time(self.config.day_start)
            })
            .collect();

        info!(
            "starting day at {} with {} parcels and {} vehicles",
            self.config.day_start,
            registry.num_parcels(),
            self.config.fleet_size
        );

        Ok(SimulationContext {
            tracker: AvailabilityTracker::new(&registry, self.config.day_start),
            registry,
            forest: ClusterForest::new(),
            vehicles,
            report: DayReport::new(),
            corrections: corrections.into(),
            recluster: true,
        })
    }

    fn advance(&self, ctx: &mut SimulationContext, limit: SimTime) -> Result<()> {
        while let Some(idx) = ctx.next_vehicle() {
            let now = ctx.vehicles[idx].time();
            if now > limit {
                break;
            }
            self.apply_events(ctx, now)?;
            self.step(ctx, idx)?;
        }
        if !limit.is_end_of_day() {
            self.apply_events(ctx, limit)?;
        }
        Ok(())
    }

    /// Applies corrections and availability changes due by `now`.
    fn apply_events(&self, ctx: &mut SimulationContext, now: SimTime) -> Result<()> {
        while ctx.corrections.front().is_some_and(|c| c.effective_at <= now) {
            if let Some(correction) = ctx.corrections.pop_front() {
                self.apply_correction(ctx, correction, now)?;
            }
        }
        let released = ctx.tracker.release(now);
        if !released.is_empty() {
            info!("{now}: destinations {released:?} became available");
            ctx.recluster = true;
        }
        Ok(())
    }

    fn apply_correction(
        &self,
        ctx: &mut SimulationContext,
        correction: PendingCorrection,
        now: SimTime,
    ) -> Result<()> {
        let PendingCorrection {
            parcel_id,
            destination,
            ..
        } = correction;
        let status = ctx
            .registry
            .parcel(parcel_id)
            .map(|p| p.status())
            .ok_or(DispatchError::UnknownParcel { parcel_id })?;

        match status {
            ParcelStatus::AtDepot | ParcelStatus::ReturnedToDepot => {
                ctx.registry.update_destination(parcel_id, destination)?;
            }
            ParcelStatus::Assigned { vehicle } => {
                let idx = ctx
                    .vehicle_index(vehicle)
                    .ok_or(DispatchError::UnknownVehicle { parcel_id, vehicle })?;
                ctx.vehicles[idx].unqueue(parcel_id);
                ctx.registry.set_status(parcel_id, ParcelStatus::AtDepot)?;
                ctx.registry.update_destination(parcel_id, destination)?;
            }
            ParcelStatus::InTransit { vehicle } => {
                let idx = ctx
                    .vehicle_index(vehicle)
                    .ok_or(DispatchError::UnknownVehicle { parcel_id, vehicle })?;
                ctx.vehicles[idx].unqueue(parcel_id);
                ctx.vehicles[idx].push_returning(parcel_id);
                ctx.registry.update_destination(parcel_id, destination)?;
            }
            ParcelStatus::Delivered { .. } => {
                let old = ctx.registry.update_destination(parcel_id, destination)?;
                warn!(
                    "parcel {parcel_id} was delivered to {old} before its address was corrected to {destination}"
                );
                ctx.report
                    .add_violation(Violation::new(ViolationType::DeliveredBeforeCorrection {
                        parcel_id,
                        delivered_to: old,
                        corrected_to: destination,
                    }));
            }
        }

        info!("{now}: parcel {parcel_id} re-addressed to location {destination}");
        ctx.tracker.sync(&ctx.registry, now);
        ctx.recluster = true;
        Ok(())
    }

    fn step(&self, ctx: &mut SimulationContext, idx: usize) -> Result<()> {
        match ctx.vehicles[idx].phase() {
            VehiclePhase::Idle => self.on_idle(ctx, idx),
            VehiclePhase::Loaded => self.on_depart(ctx, idx),
            VehiclePhase::EnRoute | VehiclePhase::AtDestination => self.on_arrive(ctx, idx),
            VehiclePhase::ReturningToDepot => self.on_return(ctx, idx),
            VehiclePhase::Parked => Ok(()),
        }
    }

    fn on_idle(&self, ctx: &mut SimulationContext, idx: usize) -> Result<()> {
        if !ctx.tracker.has_pending() && ctx.corrections.is_empty() {
            Self::park(&mut ctx.vehicles[idx]);
            return Ok(());
        }
        if ctx.recluster {
            self.recluster(ctx)?;
        }
        if self.dispatch(ctx, idx)? {
            return Ok(());
        }

        let next_correction = ctx
            .corrections
            .front()
            .map_or(SimTime::END_OF_DAY, |c| c.effective_at);
        let wake = ctx.tracker.next_wake_time().min(next_correction);
        let vehicle = &mut ctx.vehicles[idx];
        if wake.is_end_of_day() {
            Self::park(vehicle);
        } else {
            debug!("vehicle {} waits at the depot until {wake}", vehicle.id());
            vehicle.set_time(wake);
        }
        Ok(())
    }

    fn park(vehicle: &mut Vehicle) {
        info!(
            "vehicle {} parked at {} after {:.1} distance units",
            vehicle.id(),
            vehicle.time(),
            vehicle.odometer()
        );
        vehicle.set_phase(VehiclePhase::Parked);
        vehicle.set_time(SimTime::END_OF_DAY);
    }

    fn recluster(&self, ctx: &mut SimulationContext) -> Result<()> {
        let deliverable = ctx.tracker.available();
        Clusterer::new(
            &self.scenario.distances,
            &ctx.registry,
            self.config.vehicle_capacity,
        )
        .cluster(&mut ctx.forest, &deliverable)?;
        ctx.recluster = false;
        info!(
            "clustered {} available destinations into {} groups",
            deliverable.len(),
            ctx.forest.roots().len()
        );
        Ok(())
    }

    /// Hands the best eligible top-level group to vehicle `idx`.
    ///
    /// Returns `false` if no group may go on this vehicle.
    fn dispatch(&self, ctx: &mut SimulationContext, idx: usize) -> Result<bool> {
        let distances = &self.scenario.distances;
        let (vid, origin, now) = {
            let v = &ctx.vehicles[idx];
            if !v.is_at_depot() {
                return Ok(false);
            }
            (v.id(), v.location(), v.time())
        };

        let chosen = ctx
            .forest
            .roots()
            .iter()
            .enumerate()
            .filter_map(|(order, &member)| {
                let summary = ctx.forest.summary(member, &ctx.registry);
                match summary.required_vehicle {
                    Some(required) if required != vid => None,
                    _ => Some(Candidate {
                        order,
                        member,
                        distance: distances.get(origin, summary.center),
                        summary,
                    }),
                }
            })
            .min_by(dispatch_order);
        let Some(chosen) = chosen else {
            return Ok(false);
        };

        let oversized = self.is_oversized(ctx, chosen.member);
        ctx.forest.take_root(chosen.member);
        let builder = RouteBuilder::new(distances, &ctx.registry);
        let path = if oversized {
            debug!("vehicle {vid}: large group, routing deadlines first");
            builder.build_timely_split(&mut ctx.forest, chosen.member, origin)
        } else {
            builder.build_path(&ctx.forest, chosen.member, origin)
        };
        if let Member::Group(id) = chosen.member {
            ctx.forest.set_path(id, path.clone());
        }

        let (route, issues) =
            RouteEvaluator::new(&ctx.registry, distances, &ctx.vehicles[idx]).build_route(&path, now);
        for issue in issues {
            match issue {
                ProjectedIssue::EarlyArrival {
                    destination,
                    arrival,
                    ready,
                } => {
                    return Err(DispatchError::ReadyTimeBreached {
                        destination,
                        arrival: arrival.to_string(),
                        ready: ready.to_string(),
                    });
                }
                ProjectedIssue::OverCapacity { load, capacity } => {
                    return Err(DispatchError::TripOverCapacity {
                        vehicle: vid,
                        parcels: load,
                        capacity,
                    });
                }
                ProjectedIssue::LateArrival {
                    destination,
                    arrival,
                    deadline,
                } => {
                    debug!("vehicle {vid}: projected at {destination} by {arrival}, after its {deadline} deadline");
                }
            }
        }

        let mut parcels = Vec::new();
        for &d in &path {
            parcels.extend(ctx.registry.waiting_parcels(d));
            ctx.tracker.mark_routed(d);
        }
        for &p in &parcels {
            ctx.registry
                .set_status(p, ParcelStatus::Assigned { vehicle: vid })?;
        }

        info!(
            "{now}: vehicle {vid} dispatched with {} parcels over {} stops {path:?}, back by {}",
            parcels.len(),
            path.len(),
            route.return_time()
        );
        let vehicle = &mut ctx.vehicles[idx];
        vehicle.load(parcels);
        vehicle.set_phase(VehiclePhase::Loaded);
        ctx.report.add_trip(route);
        Ok(true)
    }

    /// Returns `true` if `member` has more destinations than `split_factor`
    /// times the average over dispatched trips and current groups.
    fn is_oversized(&self, ctx: &SimulationContext, member: Member) -> bool {
        let sizes: Vec<usize> = ctx
            .report
            .trips()
            .iter()
            .map(|r| r.len())
            .chain(
                ctx.forest
                    .roots()
                    .iter()
                    .map(|&m| ctx.forest.destinations(m).len()),
            )
            .collect();
        if sizes.is_empty() {
            return false;
        }
        let average = sizes.iter().sum::<usize>() as f64 / sizes.len() as f64;
        ctx.forest.destinations(member).len() as f64 > self.config.split_factor * average
    }

    fn on_depart(&self, ctx: &mut SimulationContext, idx: usize) -> Result<()> {
        let vid = ctx.vehicles[idx].id();
        let queued: Vec<usize> = ctx.vehicles[idx].queue().iter().copied().collect();
        let Some(&first) = queued.first() else {
            ctx.vehicles[idx].set_phase(VehiclePhase::Idle);
            return Ok(());
        };
        for &p in &queued {
            ctx.registry
                .set_status(p, ParcelStatus::InTransit { vehicle: vid })?;
        }
        let next = self.destination_of(&ctx.registry, first)?;
        let vehicle = &mut ctx.vehicles[idx];
        let leg = self.scenario.distances.get(vehicle.location(), next);
        vehicle.drive(next, leg);
        vehicle.set_phase(VehiclePhase::EnRoute);
        Ok(())
    }

    fn on_arrive(&self, ctx: &mut SimulationContext, idx: usize) -> Result<()> {
        let (vid, here, now) = {
            let v = &mut ctx.vehicles[idx];
            v.set_phase(VehiclePhase::AtDestination);
            (v.id(), v.location(), v.time())
        };

        let queued: Vec<usize> = ctx.vehicles[idx].queue().iter().copied().collect();
        let mut remaining = VecDeque::with_capacity(queued.len());
        for p in queued {
            let parcel = ctx
                .registry
                .parcel(p)
                .ok_or(DispatchError::UnknownParcel { parcel_id: p })?;
            if parcel.destination() != here {
                remaining.push_back(p);
                continue;
            }
            if let Some(required) = parcel.required_vehicle() {
                if required != vid {
                    return Err(DispatchError::VehicleMismatch {
                        parcel_id: p,
                        required,
                        actual: vid,
                    });
                }
            }
            let deadline = parcel.deadline();
            ctx.registry.set_status(
                p,
                ParcelStatus::Delivered {
                    vehicle: vid,
                    at: now,
                },
            )?;
            ctx.report.add_delivery(Delivery {
                parcel_id: p,
                destination: here,
                vehicle_id: vid,
                delivered_at: now,
                deadline,
            });
            if let Some(deadline) = deadline {
                if now > deadline {
                    warn!("parcel {p} delivered at {now}, after its {deadline} deadline");
                    ctx.report
                        .add_violation(Violation::new(ViolationType::DeadlineMissed {
                            parcel_id: p,
                            deadline,
                            delivered_at: now,
                        }));
                }
            }
        }

        let next = match remaining.front() {
            Some(&p) => Some(self.destination_of(&ctx.registry, p)?),
            None => None,
        };
        let vehicle = &mut ctx.vehicles[idx];
        *vehicle.queue_mut() = remaining;
        match next {
            Some(stop) => {
                let leg = self.scenario.distances.get(here, stop);
                vehicle.drive(stop, leg);
                vehicle.set_phase(VehiclePhase::EnRoute);
            }
            None => {
                let depot = vehicle.depot_id();
                let leg = self.scenario.distances.get(here, depot);
                vehicle.drive(depot, leg);
                vehicle.set_phase(VehiclePhase::ReturningToDepot);
            }
        }
        Ok(())
    }

    fn on_return(&self, ctx: &mut SimulationContext, idx: usize) -> Result<()> {
        let vehicle = &mut ctx.vehicles[idx];
        vehicle.set_phase(VehiclePhase::Idle);
        let (vid, now) = (vehicle.id(), vehicle.time());
        let returned = vehicle.take_returning();
        if returned.is_empty() {
            return Ok(());
        }
        for &p in &returned {
            ctx.registry.set_status(p, ParcelStatus::ReturnedToDepot)?;
        }
        info!("{now}: vehicle {vid} brought parcels {returned:?} back to the depot");
        ctx.tracker.sync(&ctx.registry, now);
        ctx.recluster = true;
        Ok(())
    }

    fn finish(&self, ctx: &mut SimulationContext) {
        for parcel in ctx.registry.parcels() {
            if parcel.status().is_delivered() {
                continue;
            }
            warn!(
                "parcel {} for location {} was not delivered",
                parcel.id(),
                parcel.destination()
            );
            ctx.report.add_undelivered(parcel.id());
            ctx.report
                .add_violation(Violation::new(ViolationType::Undelivered {
                    parcel_id: parcel.id(),
                }));
        }
        for vehicle in &ctx.vehicles {
            ctx.report.set_odometer(vehicle.id(), vehicle.odometer());
        }
        info!(
            "day finished: {} of {} parcels delivered, {:.1} distance units driven",
            ctx.report.num_delivered(),
            ctx.registry.num_parcels(),
            ctx.report.total_distance()
        );
    }

    fn destination_of(&self, registry: &Registry, parcel_id: usize) -> Result<usize> {
        registry
            .parcel(parcel_id)
            .map(|p| p.destination())
            .ok_or(DispatchError::UnknownParcel { parcel_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Location, LocationTable, ManifestEntry};
    use crate::simulation::AddressCorrection;

    fn at(h: u32, m: u32) -> SimTime {
        SimTime::from_hm(h, m)
    }

    /// Depot 0 and stops 1..=4 on a line, 9 units (30 minutes) apart.
    fn line_scenario(manifest: Vec<ManifestEntry>) -> Scenario {
        let locations = LocationTable::new(
            (0..5)
                .map(|i| Location::new(i, format!("Stop {i}"), format!("{i} Main St"), "84000"))
                .collect(),
        );
        let rows: Vec<Vec<f64>> = (0..5usize)
            .map(|i| (0..=i).map(|j| 9.0 * (i - j) as f64).collect())
            .collect();
        let distances = DistanceMatrix::from_lower_triangle(&rows).expect("valid");
        Scenario::new(locations, distances, manifest)
    }

    fn entry(id: usize, stop: usize) -> ManifestEntry {
        ManifestEntry::new(id, format!("{stop} Main St"), "Town", "84000", "EOD", 1.0)
    }

    #[test]
    fn test_run_delivers_everything() {
        let scenario = line_scenario((1..=4).map(|i| entry(i, i)).collect());
        let report = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run()
            .expect("runs");

        assert!(report.is_complete());
        assert_eq!(report.num_delivered(), 4);
        assert_eq!(report.trips().len(), 1);
        assert_eq!(report.trips()[0].destination_ids(), vec![1, 2, 3, 4]);
        assert_eq!(report.delivery(4).map(|d| d.delivered_at), Some(at(10, 0)));
        assert!((report.total_distance() - 72.0).abs() < 1e-9);
        assert_eq!(report.odometers(), &[(1, 72.0), (2, 0.0)]);
    }

    #[test]
    fn test_ready_time_defers_destination() {
        let mut manifest: Vec<ManifestEntry> = (1..=3).map(|i| entry(i, i)).collect();
        manifest.push(entry(4, 4).with_note("Delayed on flight---will not arrive to depot until 10:00 am"));
        let scenario = line_scenario(manifest);
        let report = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run()
            .expect("runs");

        assert!(report.is_complete());
        let late = report.delivery(4).expect("delivered");
        assert!(late.delivered_at >= at(10, 0));
        assert_eq!(late.vehicle_id, 2);
        assert_eq!(report.trips().len(), 2);
        assert!(report.trips().iter().all(|r| r.departure() >= at(8, 0)));
        assert_eq!(report.trips()[1].departure(), at(10, 0));
    }

    #[test]
    fn test_deadline_miss_is_recorded_not_fatal() {
        let scenario = line_scenario(vec![ManifestEntry::new(
            1, "4 Main St", "Town", "84000", "9:00 AM", 1.0,
        )]);
        let report = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run()
            .expect("runs");

        assert!(report.is_complete());
        assert!(!report.on_time());
        assert_eq!(report.deadline_misses().count(), 1);
    }

    #[test]
    fn test_required_vehicle_is_honoured() {
        let scenario = line_scenario(vec![
            entry(1, 1).with_note("Can only be on truck 2"),
            entry(2, 2),
            entry(3, 4),
        ]);
        let report = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run()
            .expect("runs");
        assert_eq!(report.delivery(1).map(|d| d.vehicle_id), Some(2));
        assert!(report.is_complete());
    }

    #[test]
    fn test_unknown_vehicle_is_fatal() {
        let scenario = line_scenario(vec![entry(1, 1).with_note("Can only be on truck 3")]);
        let err = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run();
        assert_eq!(
            err,
            Err(DispatchError::UnknownVehicle {
                parcel_id: 1,
                vehicle: 3
            })
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let scenario = line_scenario(vec![entry(1, 1)]);
        let config = SimulationConfig::default().with_depot(9);
        assert!(matches!(
            Simulator::new(&scenario, config),
            Err(DispatchError::DestinationOutOfRange { .. })
        ));
    }

    #[test]
    fn test_status_at_mid_route() {
        let scenario = line_scenario((1..=4).map(|i| entry(i, i)).collect());
        let sim = Simulator::new(&scenario, SimulationConfig::default()).expect("valid");
        let snap = sim.status_at(at(9, 15)).expect("runs");

        assert_eq!(snap.num_delivered(), 2);
        assert_eq!(
            snap.parcel(3).map(|p| p.status),
            Some(ParcelStatus::InTransit { vehicle: 1 })
        );
        assert_eq!(snap.parcel(2).and_then(|p| p.delivered_at), Some(at(9, 0)));
        assert_eq!(snap.parcel(1).map(|p| p.address.as_str()), Some("1 Main St"));
        assert_eq!(sim.status_at(at(9, 15)).expect("runs"), snap);
    }

    #[test]
    fn test_correction_en_route_returns_parcel() {
        let scenario = line_scenario(vec![entry(1, 4), entry(2, 3)]).with_correction(
            AddressCorrection::new(1, at(9, 0), "2 Main St", "84000"),
        );
        let report = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run()
            .expect("runs");

        let redelivered = report.delivery(1).expect("delivered");
        assert_eq!(redelivered.destination, 2);
        assert_eq!(redelivered.delivered_at, at(12, 0));
        assert!(report.deliveries().iter().all(|d| d.destination != 4));
        assert!(report.is_complete());
    }

    #[test]
    fn test_correction_after_delivery_is_recorded() {
        let scenario = line_scenario(vec![entry(1, 1)]).with_correction(AddressCorrection::new(
            1,
            at(11, 0),
            "2 Main St",
            "84000",
        ));
        let report = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run()
            .expect("runs");
        assert!(report.violations().iter().any(|v| matches!(
            v.kind,
            ViolationType::DeliveredBeforeCorrection {
                parcel_id: 1,
                delivered_to: 1,
                corrected_to: 2
            }
        )));
    }

    #[test]
    fn test_held_parcel_without_correction_is_undelivered() {
        let scenario = line_scenario(vec![entry(1, 1), entry(2, 2).with_note("Wrong address listed")]);
        let report = Simulator::new(&scenario, SimulationConfig::default())
            .expect("valid")
            .run()
            .expect("runs");
        assert_eq!(report.undelivered(), &[2]);
        assert!(!report.is_complete());
        assert!(report
            .violations()
            .iter()
            .any(|v| v.kind == ViolationType::Undelivered { parcel_id: 2 }));
    }

    #[test]
    fn test_asymmetric_distances_rejected() {
        let base = line_scenario(vec![entry(1, 1)]);
        let mut distances = DistanceMatrix::new(5);
        for i in 0..5 {
            for j in 0..5 {
                distances.set(i, j, base.distances.get(i, j));
            }
        }
        distances.set(1, 2, 4.0);
        let scenario = Scenario::new(base.locations.clone(), distances, base.manifest.clone());
        assert!(matches!(
            Simulator::new(&scenario, SimulationConfig::default()),
            Err(DispatchError::InvalidMatrix { .. })
        ));
    }

    #[test]
    fn test_run_until_reports_next_event() {
        let scenario = line_scenario((1..=2).map(|i| entry(i, i)).collect());
        let sim = Simulator::new(&scenario, SimulationConfig::default()).expect("valid");

        let ctx = sim.run_until(at(8, 10)).expect("runs");
        assert_eq!(ctx.clock(), at(8, 30));

        let ctx = sim.run_until(SimTime::END_OF_DAY).expect("runs");
        assert_eq!(ctx.clock(), SimTime::END_OF_DAY);
        assert!(!ctx.tracker().has_pending());
    }

    #[test]
    fn test_large_group_routes_deadlines_first() {
        let timed = |id: usize| {
            ManifestEntry::new(id, format!("{id} Main St"), "Town", "84000", "10:30 AM", 1.0)
        };
        let scenario = line_scenario(vec![entry(1, 1), timed(2), entry(3, 3), timed(4)]);
        let config = SimulationConfig::default().with_split_factor(0.5);
        let report = Simulator::new(&scenario, config)
            .expect("valid")
            .run()
            .expect("runs");

        assert_eq!(report.trips().len(), 1);
        assert_eq!(report.trips()[0].destination_ids(), vec![2, 4, 3, 1]);
        assert!(report.on_time());
    }

    #[test]
    fn test_wrong_vehicle_delivery_is_fatal() {
        let scenario = line_scenario(vec![entry(1, 1).with_note("Can only be on truck 2")]);
        let sim = Simulator::new(&scenario, SimulationConfig::default()).expect("valid");
        let mut ctx = sim.start().expect("starts");

        ctx.vehicles[0].load([1]);
        ctx.registry
            .set_status(1, ParcelStatus::InTransit { vehicle: 1 })
            .expect("known");
        ctx.vehicles[0].drive(1, 9.0);
        ctx.vehicles[0].set_phase(VehiclePhase::EnRoute);

        assert_eq!(
            sim.on_arrive(&mut ctx, 0),
            Err(DispatchError::VehicleMismatch {
                parcel_id: 1,
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_route_reaching_unready_stop_is_fatal() {
        let scenario = line_scenario(vec![
            entry(1, 1).with_note("Delayed on flight---will not arrive to depot until 10:00 am"),
        ]);
        let sim = Simulator::new(&scenario, SimulationConfig::default()).expect("valid");
        let mut ctx = sim.start().expect("starts");
        ctx.forest.push_root(Member::Leaf(1));

        assert_eq!(
            sim.dispatch(&mut ctx, 0),
            Err(DispatchError::ReadyTimeBreached {
                destination: 1,
                arrival: "08:30".to_string(),
                ready: "10:00".to_string()
            })
        );
    }

    #[test]
    fn test_overloaded_trip_is_fatal() {
        let scenario = line_scenario(vec![entry(1, 1), entry(2, 1), entry(3, 1)]);
        let config = SimulationConfig::default().with_vehicle_capacity(2);
        let sim = Simulator::new(&scenario, config).expect("valid");
        let mut ctx = sim.start().expect("starts");
        ctx.forest.push_root(Member::Leaf(1));

        assert_eq!(
            sim.dispatch(&mut ctx, 0),
            Err(DispatchError::TripOverCapacity {
                vehicle: 1,
                parcels: 3,
                capacity: 2
            })
        );
    }

    #[test]
    fn test_vehicle_away_from_depot_is_not_dispatched() {
        let scenario = line_scenario(vec![entry(1, 1)]);
        let sim = Simulator::new(&scenario, SimulationConfig::default()).expect("valid");
        let mut ctx = sim.start().expect("starts");
        ctx.forest.push_root(Member::Leaf(1));
        ctx.vehicles[0].drive(2, 18.0);
        ctx.vehicles[0].set_phase(VehiclePhase::ReturningToDepot);

        assert_eq!(sim.dispatch(&mut ctx, 0), Ok(false));
        assert_eq!(ctx.forest.roots(), &[Member::Leaf(1)]);
    }

    #[test]
    fn test_dispatch_order_prefers_deadlines() {
        let summary = |deadline, required_vehicle| Summary {
            center: 1,
            parcel_count: 1,
            required_vehicle,
            deadline,
        };
        let candidate = |order, deadline, required, distance| Candidate {
            order,
            member: Member::Leaf(order),
            summary: summary(deadline, required),
            distance,
        };

        let urgent = candidate(3, Some(at(9, 0)), None, 50.0);
        let relaxed = candidate(0, Some(at(10, 30)), None, 1.0);
        let open = candidate(1, None, Some(1), 1.0);
        assert_eq!(dispatch_order(&urgent, &relaxed), Ordering::Less);
        assert_eq!(dispatch_order(&relaxed, &open), Ordering::Less);

        let reserved = candidate(2, None, Some(1), 9.0);
        let free = candidate(0, None, None, 1.0);
        assert_eq!(dispatch_order(&reserved, &free), Ordering::Less);

        let near = candidate(5, None, None, 1.0);
        let far = candidate(4, None, None, 2.0);
        assert_eq!(dispatch_order(&near, &far), Ordering::Less);
    }
}
