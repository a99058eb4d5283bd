//! Telemetry engine orchestration.
//!
//! Coordinates the full per-sample workflow:
//! 1. Trip lookup and lifecycle gate
//! 2. Sample validation (value ranges, temporal ordering)
//! 3. Aggregate update (duration/distance/speeds/violation count)
//! 4. Motion-event classification (hard braking / rapid acceleration)
//! 5. Safety-score recomputation
//! 6. Alert decision
//! 7. Store side effects (sample and alert appends)
//!
//! Steps 2-6 run under the trip's exclusive section, so updates for one
//! trip are never interleaved. The sample append also runs under it,
//! keeping the persisted history in acceptance order; the alert append
//! runs after release. Neither blocks or rolls back the aggregate update
//! that produced it.

use chrono::{DateTime, Utc};

use crate::alerts::emitter::evaluate_alert;
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::export::assembler::assemble_export;
use crate::logging::structured::LogContext;
use crate::scoring::safety::safety_score;
use crate::scoring::violations::{classify_sample, ViolationKind};
use crate::storage::models::{ExportRecord, Sample};
use crate::storage::store::TripStore;
use crate::trips::aggregate::TripAggregate;
use crate::trips::registry::{LastSample, TripRegistry};
use crate::trips::state::TripState;
use crate::validation::sample::validate_sample;

/// Handle returned by [`TelemetryEngine::start_trip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripHandle {
    pub trip_id: String,
    pub user_id: String,
    /// True when the user already had a live trip (Active, or Pending
    /// under a concurrent start) and it was returned instead of creating
    /// a new one.
    pub already_active: bool,
}

/// The trip telemetry aggregation and safety-scoring core.
///
/// Owns the trip arena; persistence and record fetching go through the
/// supplied [`TripStore`], timestamps through the supplied [`Clock`].
pub struct TelemetryEngine<S: TripStore, C: Clock> {
    registry: TripRegistry,
    store: S,
    clock: C,
    config: EngineConfig,
}

impl<S: TripStore, C: Clock> TelemetryEngine<S, C> {
    pub fn new(store: S, clock: C, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            registry: TripRegistry::new(),
            store,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The store this engine writes through.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Start a trip for a user.
    ///
    /// Idempotent while the user has a live trip: the existing handle
    /// comes back with `already_active` set and nothing is created. A
    /// concurrent start that is still persisting its Pending record
    /// counts as live, so racing starts converge on one trip.
    pub fn start_trip(
        &self,
        user_id: &str,
        vehicle_id: Option<&str>,
        nav_provider: Option<&str>,
        start_time: DateTime<Utc>,
    ) -> EngineResult<TripHandle> {
        if user_id.trim().is_empty() {
            return Err(EngineError::Validation(
                "user_id must not be empty".to_string(),
            ));
        }

        let (trip, created) = self.registry.create_or_existing(
            user_id,
            vehicle_id,
            nav_provider,
            start_time,
            &self.config,
        );

        if !created {
            let trip_id = trip.lock().trip_id.clone();
            let ctx = LogContext::new(&trip_id).with_user(user_id);
            log::info!("{} TRIP_START_IDEMPOTENT", ctx);
            return Ok(TripHandle {
                trip_id,
                user_id: user_id.to_string(),
                already_active: true,
            });
        }

        // Persist the requested (Pending) record, confirm Active, persist
        // again. Both writes are fire-and-forget: the in-memory record is
        // authoritative for the engine and store latency never holds the
        // trip lock.
        let pending = trip.lock().to_record();
        let ctx = LogContext::new(&pending.trip_id).with_user(user_id);
        log::info!(
            "{} TRIP_REQUESTED nav_provider={:?} vehicle={:?}",
            ctx,
            pending.nav_provider,
            pending.vehicle_id
        );
        if let Err(e) = self.store.put_trip(&pending) {
            log::warn!("{} TRIP_PERSIST_FAILED state=pending error={:#}", ctx, e);
        }

        let active = {
            let mut guard = trip.lock();
            guard.activate();
            guard.to_record()
        };
        if let Err(e) = self.store.put_trip(&active) {
            log::warn!("{} TRIP_PERSIST_FAILED state=active error={:#}", ctx, e);
        }
        log::info!("{} TRIP_STARTED start_time={}", ctx, active.start_time);

        Ok(TripHandle {
            trip_id: active.trip_id,
            user_id: user_id.to_string(),
            already_active: false,
        })
    }

    /// Ingest one telemetry sample for a trip, returning the updated
    /// aggregate.
    ///
    /// Fails with `NotFound`, `InvalidState`, `OutOfOrder`, or
    /// `InvalidValue`; a rejected sample never changes the aggregate.
    /// Store appends for the sample and any emitted alert are independent
    /// side effects; their failure is logged, never surfaced. The sample
    /// append happens inside the trip's exclusive section so the store
    /// sees samples in the order they were accepted.
    pub fn ingest_sample(&self, trip_id: &str, sample: Sample) -> EngineResult<TripAggregate> {
        let trip = self.registry.get(trip_id)?;

        let (ctx, aggregate, alert) = {
            let mut guard = trip.lock();
            let ctx = LogContext::new(&guard.trip_id).with_user(&guard.user_id);

            if !guard.state.accepts_mutation() {
                log::warn!(
                    "{} SAMPLE_REJECTED reason=invalid_state state={}",
                    ctx,
                    guard.state
                );
                return Err(EngineError::InvalidState {
                    trip_id: guard.trip_id.clone(),
                    state: guard.state,
                });
            }

            let last_timestamp = guard.last_sample.map(|l| l.timestamp);
            if let Err(e) = validate_sample(&sample, last_timestamp) {
                log::warn!("{} SAMPLE_REJECTED reason={}", ctx, e);
                return Err(e);
            }

            let previous_speed = guard.last_sample.map(|l| l.speed);
            let classification = classify_sample(
                sample.speed,
                sample.speed_limit,
                previous_speed,
                &self.config,
                &ctx,
            );

            guard
                .aggregate
                .apply_sample(sample.speed, sample.speed_limit, &self.config);
            match classification.motion {
                Some(ViolationKind::HardBraking) => guard.aggregate.hard_braking += 1,
                Some(ViolationKind::RapidAcceleration) => guard.aggregate.rapid_acceleration += 1,
                _ => {}
            }
            guard.aggregate.safety_score = safety_score(
                guard.aggregate.speed_violations,
                guard.aggregate.hard_braking,
                &self.config,
            );

            let (alert, latched) = evaluate_alert(
                classification.alertable,
                guard.speed_alert_latched,
                sample.speed,
                sample.speed_limit,
                &guard.trip_id,
                &guard.user_id,
                self.clock.now(),
                &ctx,
            );
            guard.speed_alert_latched = latched;

            guard.last_sample = Some(LastSample {
                speed: sample.speed,
                timestamp: sample.timestamp,
            });

            log::debug!(
                "{} SAMPLE_APPLIED duration={} distance={:.4} score={}",
                ctx,
                guard.aggregate.duration,
                guard.aggregate.distance,
                guard.aggregate.safety_score
            );

            // Appended under the exclusive section so the store's history
            // for this trip stays in acceptance order.
            if let Err(e) = self.store.append_sample(&guard.trip_id, &sample) {
                log::warn!("{} SAMPLE_PERSIST_FAILED error={:#}", ctx, e);
            }

            (ctx, guard.aggregate.clone(), alert)
        };

        if let Some(alert) = alert {
            if let Err(e) = self.store.append_alert(&alert) {
                log::warn!("{} ALERT_PERSIST_FAILED error={:#}", ctx, e);
            }
        }

        Ok(aggregate)
    }

    /// End a trip, returning the final aggregate. Idempotent: a second
    /// call returns the frozen aggregate unchanged.
    ///
    /// An in-flight sample holding the trip's exclusive section completes
    /// before the end transition is honored.
    pub fn end_trip(&self, trip_id: &str) -> EngineResult<TripAggregate> {
        let trip = self.registry.get(trip_id)?;

        let (record, was_active) = {
            let mut guard = trip.lock();

            if guard.state == TripState::Pending {
                return Err(EngineError::InvalidState {
                    trip_id: guard.trip_id.clone(),
                    state: guard.state,
                });
            }

            let was_active = guard.state == TripState::Active;
            if was_active {
                guard.end(self.clock.now());
            }
            (guard.to_record(), was_active)
        };

        let ctx = LogContext::new(&record.trip_id).with_user(&record.user_id);
        if was_active {
            self.registry.clear_active(&record.user_id, &record.trip_id);
            if let Err(e) = self.store.put_trip(&record) {
                log::warn!("{} TRIP_PERSIST_FAILED state=ended error={:#}", ctx, e);
            }
            log::info!(
                "{} TRIP_ENDED duration={} distance={:.4} score={}",
                ctx,
                record.aggregate.duration,
                record.aggregate.distance,
                record.aggregate.safety_score
            );
        } else {
            log::info!("{} TRIP_END_IDEMPOTENT", ctx);
        }

        Ok(record.aggregate)
    }

    /// Export a trip snapshot combined with alert/sample history and
    /// profile/vehicle/insurance context.
    ///
    /// The trip does not have to be Ended; exporting an Active trip yields
    /// a point-in-time snapshot. Never mutates the trip.
    pub fn export_trip(
        &self,
        trip_id: &str,
        insurance_provider: &str,
    ) -> EngineResult<ExportRecord> {
        let trip = self.registry.get(trip_id)?;

        // Momentary snapshot under the exclusive section; assembly reads
        // the store without holding it.
        let snapshot = trip.lock().to_record();
        let ctx = LogContext::new(&snapshot.trip_id).with_user(&snapshot.user_id);

        let export = assemble_export(
            &snapshot,
            insurance_provider,
            &self.store,
            self.clock.now(),
            &ctx,
        );

        if let Err(e) = self.store.record_export(&export) {
            log::warn!("{} EXPORT_PERSIST_FAILED error={:#}", ctx, e);
        }

        log::info!(
            "{} TRIP_EXPORTED provider={} state={} alerts={} samples={} status={}",
            ctx,
            export.insurance_provider,
            snapshot.state,
            export.alerts.len(),
            export.location_data.len(),
            export.status
        );

        Ok(export)
    }
}
