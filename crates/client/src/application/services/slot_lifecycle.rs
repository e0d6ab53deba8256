//! Slot lifecycle controller - the client-side state machine for the one
//! reservation a user may hold.
//!
//! The controller owns every transition between idle, holding, and the
//! in-flight phases around the remote calls. The server stays authoritative:
//! `expires_at` decides expiry, the local countdown only decides when to act
//! on it. Views never mutate lifecycle state directly; they call the
//! operations here and observe the result through [`LifecycleEvent`]s and
//! [`snapshot`](SlotLifecycleController::snapshot).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use commenter_domain::{ActiveReservation, CompanyId, ProofRef, SlotId, REVIEW_REWARD_CENTS};

use crate::application::services::availability::AvailabilityFeed;
use crate::application::timer_store::LocalTimerStore;
use crate::infrastructure::messaging::LifecycleEventBus;
use crate::ports::outbound::{PlatformPort, ServiceError, SlotServicePort};

/// Where the lifecycle currently stands, as exposed to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecyclePhase {
    /// No reservation held.
    Idle,
    /// Reservation request (or resume check) in flight.
    Reserving,
    /// Reservation held, countdown running.
    Active,
    /// User says the review is posted; proof entry shown, countdown still
    /// running.
    AwaitingConfirmation,
    /// Proof submission in flight.
    Submitting,
    /// Release in flight (user abandon or deadline hit).
    Releasing,
}

impl LifecyclePhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Reserving => "RESERVING",
            Self::Active => "ACTIVE",
            Self::AwaitingConfirmation => "AWAITING CONFIRMATION",
            Self::Submitting => "SUBMITTING",
            Self::Releasing => "RELEASING",
        }
    }

    /// Whether a reservation is currently attached to the lifecycle.
    pub fn is_holding(&self) -> bool {
        matches!(
            self,
            Self::Active | Self::AwaitingConfirmation | Self::Submitting | Self::Releasing
        )
    }
}

/// Notifications emitted as the lifecycle moves.
///
/// Dispatched through the controller's [`LifecycleEventBus`] after the
/// state change they describe has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    PhaseChanged(LifecyclePhase),
    ReservationStarted(ActiveReservation),
    ReservationResumed(ActiveReservation),
    CountdownTick {
        slot_id: SlotId,
        remaining_secs: i64,
    },
    /// The deadline passed (or a resumed hold was already dead) and the
    /// slot went back to the pool.
    ReservationExpired {
        slot_id: SlotId,
    },
    /// The user gave the slot up.
    ReservationAbandoned {
        slot_id: SlotId,
    },
    ReservationSubmitted {
        slot_id: SlotId,
        reward_cents: i64,
    },
    /// A reserve or resume attempt failed; the lifecycle stayed or went
    /// idle.
    ReservationFailed {
        message: String,
    },
    /// A submit attempt failed. When `reservation_lost` is set the slot is
    /// gone server-side and the lifecycle dropped to idle; otherwise the
    /// hold survives and the user may retry.
    SubmitFailed {
        slot_id: SlotId,
        message: String,
        reservation_lost: bool,
    },
    /// A release call failed. Local state proceeds to idle regardless.
    ReleaseFailed {
        slot_id: SlotId,
        message: String,
    },
}

/// Point-in-time view of the lifecycle for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleSnapshot {
    pub phase: LifecyclePhase,
    pub reservation: Option<ActiveReservation>,
    /// Whole seconds left before the deadline, clamped at zero. `None`
    /// when nothing is held.
    pub remaining_secs: Option<i64>,
}

/// Receipt returned on a successful proof submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub slot_id: SlotId,
    pub reward_cents: i64,
}

#[derive(Debug, Clone)]
enum SlotState {
    Idle,
    Reserving,
    Active(ActiveReservation),
    AwaitingConfirmation(ActiveReservation),
    Submitting {
        reservation: ActiveReservation,
        from_confirmation: bool,
    },
    Releasing(ActiveReservation),
}

impl SlotState {
    fn phase(&self) -> LifecyclePhase {
        match self {
            Self::Idle => LifecyclePhase::Idle,
            Self::Reserving => LifecyclePhase::Reserving,
            Self::Active(_) => LifecyclePhase::Active,
            Self::AwaitingConfirmation(_) => LifecyclePhase::AwaitingConfirmation,
            Self::Submitting { .. } => LifecyclePhase::Submitting,
            Self::Releasing(_) => LifecyclePhase::Releasing,
        }
    }

    fn reservation(&self) -> Option<&ActiveReservation> {
        match self {
            Self::Idle | Self::Reserving => None,
            Self::Active(reservation)
            | Self::AwaitingConfirmation(reservation)
            | Self::Submitting { reservation, .. }
            | Self::Releasing(reservation) => Some(reservation),
        }
    }
}

enum TickStep {
    Counting { slot_id: SlotId, remaining_secs: i64 },
    Expired { slot_id: SlotId },
    NotHolding,
}

#[derive(Clone)]
pub struct SlotLifecycleController {
    remote: Arc<dyn SlotServicePort>,
    platform: Arc<dyn PlatformPort>,
    timers: LocalTimerStore,
    feed: AvailabilityFeed,
    events: LifecycleEventBus,
    state: Arc<Mutex<SlotState>>,
}

impl SlotLifecycleController {
    pub fn new(
        remote: Arc<dyn SlotServicePort>,
        platform: Arc<dyn PlatformPort>,
        feed: AvailabilityFeed,
    ) -> Self {
        let timers = LocalTimerStore::new(platform.clone());
        Self {
            remote,
            platform,
            timers,
            feed,
            events: LifecycleEventBus::new(),
            state: Arc::new(Mutex::new(SlotState::Idle)),
        }
    }

    /// Bus carrying [`LifecycleEvent`]s; subscribe here to observe the
    /// lifecycle.
    pub fn events(&self) -> &LifecycleEventBus {
        &self.events
    }

    /// Reserve one slot of the given company.
    ///
    /// Only legal from idle: holding a slot already is rejected locally
    /// with `AlreadyHoldingSlot` before any network traffic. On failure the
    /// lifecycle returns to idle and the error message is surfaced
    /// unchanged.
    pub async fn start_reservation(
        &self,
        company_id: CompanyId,
    ) -> Result<ActiveReservation, ServiceError> {
        {
            let mut state = self.lock_state();
            match &*state {
                SlotState::Idle => {}
                SlotState::Active(_) | SlotState::AwaitingConfirmation(_) => {
                    return Err(ServiceError::AlreadyHoldingSlot(
                        "finish or abandon your current reservation first".to_string(),
                    ));
                }
                _ => {
                    return Err(ServiceError::OperationInFlight(
                        "another slot operation is still in progress".to_string(),
                    ));
                }
            }
            *state = SlotState::Reserving;
        }
        self.events
            .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Reserving))
            .await;

        match self.remote.reserve_slot(company_id).await {
            Ok(reservation) => {
                self.timers
                    .ensure_started(reservation.slot_id(), self.platform.now_millis());
                {
                    let mut state = self.lock_state();
                    *state = SlotState::Active(reservation.clone());
                }
                tracing::info!(
                    slot_id = %reservation.slot_id(),
                    expires_at = %reservation.expires_at(),
                    "reservation started"
                );
                self.events
                    .dispatch(LifecycleEvent::ReservationStarted(reservation.clone()))
                    .await;
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Active))
                    .await;
                Ok(reservation)
            }
            Err(err) => {
                {
                    let mut state = self.lock_state();
                    *state = SlotState::Idle;
                }
                tracing::warn!(kind = err.kind(), "reservation failed: {err}");
                self.events
                    .dispatch(LifecycleEvent::ReservationFailed {
                        message: err.to_string(),
                    })
                    .await;
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Idle))
                    .await;
                Err(err)
            }
        }
    }

    /// Check the server for a hold that survived a restart.
    ///
    /// Re-fetching does not extend anything: the reservation comes back with
    /// its original deadline. A hold the local clock already sees as dead is
    /// expired on the spot instead of resuming a zero countdown. With no
    /// hold found the lifecycle stays idle and the availability feed is
    /// refreshed.
    pub async fn resume_if_active(&self) -> Result<Option<ActiveReservation>, ServiceError> {
        {
            let mut state = self.lock_state();
            match &*state {
                SlotState::Idle => {}
                SlotState::Reserving => {
                    return Err(ServiceError::OperationInFlight(
                        "a reservation is already being made".to_string(),
                    ));
                }
                other => {
                    return Ok(other.reservation().cloned());
                }
            }
            *state = SlotState::Reserving;
        }

        match self.remote.fetch_active_slot().await {
            Ok(Some(reservation)) => {
                if reservation.is_past_deadline(self.now()) {
                    let slot_id = reservation.slot_id();
                    tracing::info!(%slot_id, "found hold already past its deadline");
                    {
                        let mut state = self.lock_state();
                        *state = SlotState::Releasing(reservation);
                    }
                    self.finish_expiry(slot_id).await;
                    return Ok(None);
                }
                self.timers
                    .ensure_started(reservation.slot_id(), self.platform.now_millis());
                {
                    let mut state = self.lock_state();
                    *state = SlotState::Active(reservation.clone());
                }
                tracing::info!(slot_id = %reservation.slot_id(), "resumed reservation");
                self.events
                    .dispatch(LifecycleEvent::ReservationResumed(reservation.clone()))
                    .await;
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Active))
                    .await;
                Ok(Some(reservation))
            }
            Ok(None) => {
                {
                    let mut state = self.lock_state();
                    *state = SlotState::Idle;
                }
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Idle))
                    .await;
                self.refresh_feed_quietly().await;
                Ok(None)
            }
            Err(err) => {
                {
                    let mut state = self.lock_state();
                    *state = SlotState::Idle;
                }
                tracing::warn!(kind = err.kind(), "resume check failed: {err}");
                self.events
                    .dispatch(LifecycleEvent::ReservationFailed {
                        message: err.to_string(),
                    })
                    .await;
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Idle))
                    .await;
                Err(err)
            }
        }
    }

    /// Advance the countdown one step.
    ///
    /// Returns the remaining whole seconds while a slot is attached, `None`
    /// otherwise. The first tick that observes zero moves the machine to
    /// the releasing phase itself; any later tick sees that phase and does
    /// nothing, so the expiry release fires exactly once no matter how many
    /// tickers run. While a submission is in flight the countdown is
    /// reported but never acted on: the server decides that race.
    pub async fn tick(&self) -> Option<i64> {
        let step = {
            let mut state = self.lock_state();
            let now = self.now();
            match state.clone() {
                SlotState::Active(reservation) | SlotState::AwaitingConfirmation(reservation) => {
                    let remaining_secs = reservation.remaining_at(now).num_seconds();
                    let slot_id = reservation.slot_id();
                    if remaining_secs > 0 {
                        TickStep::Counting {
                            slot_id,
                            remaining_secs,
                        }
                    } else {
                        *state = SlotState::Releasing(reservation);
                        TickStep::Expired { slot_id }
                    }
                }
                SlotState::Submitting { reservation, .. } => TickStep::Counting {
                    slot_id: reservation.slot_id(),
                    remaining_secs: reservation.remaining_at(now).num_seconds(),
                },
                SlotState::Idle | SlotState::Reserving | SlotState::Releasing(_) => {
                    TickStep::NotHolding
                }
            }
        };

        match step {
            TickStep::Counting {
                slot_id,
                remaining_secs,
            } => {
                self.events
                    .dispatch(LifecycleEvent::CountdownTick {
                        slot_id,
                        remaining_secs,
                    })
                    .await;
                Some(remaining_secs)
            }
            TickStep::Expired { slot_id } => {
                tracing::info!(%slot_id, "countdown reached zero, releasing slot");
                self.finish_expiry(slot_id).await;
                Some(0)
            }
            TickStep::NotHolding => None,
        }
    }

    /// Record that the user claims the review is posted, moving to the
    /// proof-entry phase. The countdown keeps running.
    pub async fn confirm_review_posted(&self) -> Result<(), ServiceError> {
        {
            let mut state = self.lock_state();
            match state.clone() {
                SlotState::Active(reservation) => {
                    *state = SlotState::AwaitingConfirmation(reservation);
                }
                SlotState::AwaitingConfirmation(_) => return Ok(()),
                SlotState::Idle => {
                    return Err(ServiceError::Validation(
                        "no reservation is currently held".to_string(),
                    ));
                }
                _ => {
                    return Err(ServiceError::OperationInFlight(
                        "another slot operation is still in progress".to_string(),
                    ));
                }
            }
        }
        self.events
            .dispatch(LifecycleEvent::PhaseChanged(
                LifecyclePhase::AwaitingConfirmation,
            ))
            .await;
        Ok(())
    }

    /// Step back from proof entry to the running countdown.
    pub async fn cancel_confirmation(&self) -> Result<(), ServiceError> {
        {
            let mut state = self.lock_state();
            match state.clone() {
                SlotState::AwaitingConfirmation(reservation) => {
                    *state = SlotState::Active(reservation);
                }
                SlotState::Active(_) => return Ok(()),
                SlotState::Idle => {
                    return Err(ServiceError::Validation(
                        "no reservation is currently held".to_string(),
                    ));
                }
                _ => {
                    return Err(ServiceError::OperationInFlight(
                        "another slot operation is still in progress".to_string(),
                    ));
                }
            }
        }
        self.events
            .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Active))
            .await;
        Ok(())
    }

    /// Submit proof for the held slot.
    ///
    /// On success the hold is done and the lifecycle returns to idle; the
    /// review sits in moderation from here on. A `SlotExpired` or
    /// `SlotNotFound` answer means the hold died server-side while the user
    /// was typing: local state is cleared and the feed refreshed. Any other
    /// failure keeps the hold so the user can retry in place.
    pub async fn submit(&self, proof: ProofRef) -> Result<SubmitReceipt, ServiceError> {
        let (slot_id, from_confirmation) = {
            let mut state = self.lock_state();
            match state.clone() {
                SlotState::Active(reservation) => {
                    let slot_id = reservation.slot_id();
                    *state = SlotState::Submitting {
                        reservation,
                        from_confirmation: false,
                    };
                    (slot_id, false)
                }
                SlotState::AwaitingConfirmation(reservation) => {
                    let slot_id = reservation.slot_id();
                    *state = SlotState::Submitting {
                        reservation,
                        from_confirmation: true,
                    };
                    (slot_id, true)
                }
                SlotState::Idle => {
                    return Err(ServiceError::Validation(
                        "no reservation is currently held".to_string(),
                    ));
                }
                _ => {
                    return Err(ServiceError::OperationInFlight(
                        "another slot operation is still in progress".to_string(),
                    ));
                }
            }
        };
        self.events
            .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Submitting))
            .await;

        match self.remote.submit_proof(slot_id, proof).await {
            Ok(()) => {
                self.timers.clear(slot_id);
                {
                    let mut state = self.lock_state();
                    *state = SlotState::Idle;
                }
                tracing::info!(%slot_id, "proof submitted, review under moderation");
                self.events
                    .dispatch(LifecycleEvent::ReservationSubmitted {
                        slot_id,
                        reward_cents: REVIEW_REWARD_CENTS,
                    })
                    .await;
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Idle))
                    .await;
                Ok(SubmitReceipt {
                    slot_id,
                    reward_cents: REVIEW_REWARD_CENTS,
                })
            }
            Err(err) if err.invalidates_slot() => {
                self.timers.clear(slot_id);
                {
                    let mut state = self.lock_state();
                    *state = SlotState::Idle;
                }
                tracing::warn!(%slot_id, kind = err.kind(), "submit lost the slot: {err}");
                self.events
                    .dispatch(LifecycleEvent::SubmitFailed {
                        slot_id,
                        message: err.to_string(),
                        reservation_lost: true,
                    })
                    .await;
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Idle))
                    .await;
                self.refresh_feed_quietly().await;
                Err(err)
            }
            Err(err) => {
                {
                    let mut state = self.lock_state();
                    if let SlotState::Submitting {
                        reservation,
                        from_confirmation,
                    } = state.clone()
                    {
                        *state = if from_confirmation {
                            SlotState::AwaitingConfirmation(reservation)
                        } else {
                            SlotState::Active(reservation)
                        };
                    }
                }
                let restored = if from_confirmation {
                    LifecyclePhase::AwaitingConfirmation
                } else {
                    LifecyclePhase::Active
                };
                tracing::warn!(%slot_id, kind = err.kind(), "submit failed, reservation kept: {err}");
                self.events
                    .dispatch(LifecycleEvent::SubmitFailed {
                        slot_id,
                        message: err.to_string(),
                        reservation_lost: false,
                    })
                    .await;
                self.events
                    .dispatch(LifecycleEvent::PhaseChanged(restored))
                    .await;
                Err(err)
            }
        }
    }

    /// Give up the held slot.
    ///
    /// Local state is always cleared; the remote release is best effort and
    /// never blocks the user. Idempotent: abandoning with nothing held, or
    /// while a release is already in flight, is a no-op.
    pub async fn abandon(&self) -> Result<(), ServiceError> {
        let slot_id = {
            let mut state = self.lock_state();
            match state.clone() {
                SlotState::Active(reservation) | SlotState::AwaitingConfirmation(reservation) => {
                    let slot_id = reservation.slot_id();
                    *state = SlotState::Releasing(reservation);
                    slot_id
                }
                SlotState::Idle | SlotState::Releasing(_) => return Ok(()),
                SlotState::Reserving | SlotState::Submitting { .. } => {
                    return Err(ServiceError::OperationInFlight(
                        "wait for the current operation to finish".to_string(),
                    ));
                }
            }
        };
        self.events
            .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Releasing))
            .await;

        self.timers.clear(slot_id);
        if let Err(err) = self.remote.release_or_expire_slot(slot_id).await {
            // The backend expires overdue holds on its own sweep too, so a
            // failed release only delays the capacity return.
            tracing::warn!(%slot_id, kind = err.kind(), "release on abandon failed: {err}");
            self.events
                .dispatch(LifecycleEvent::ReleaseFailed {
                    slot_id,
                    message: err.to_string(),
                })
                .await;
        }
        {
            let mut state = self.lock_state();
            *state = SlotState::Idle;
        }
        tracing::info!(%slot_id, "reservation abandoned");
        self.events
            .dispatch(LifecycleEvent::ReservationAbandoned { slot_id })
            .await;
        self.events
            .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Idle))
            .await;
        self.refresh_feed_quietly().await;
        Ok(())
    }

    /// Point-in-time view for rendering, with the remaining time computed
    /// against the platform clock.
    pub fn snapshot(&self) -> LifecycleSnapshot {
        let state = self.lock_state();
        let now = self.now();
        let reservation = state.reservation().cloned();
        LifecycleSnapshot {
            phase: state.phase(),
            remaining_secs: reservation
                .as_ref()
                .map(|r| r.remaining_at(now).num_seconds()),
            reservation,
        }
    }

    /// Complete an expiry: clear the local timer, tell the server (best
    /// effort), drop to idle, and ask the feed for fresh capacity.
    ///
    /// Expects the state to already be `Releasing`.
    async fn finish_expiry(&self, slot_id: SlotId) {
        self.timers.clear(slot_id);
        if let Err(err) = self.remote.release_or_expire_slot(slot_id).await {
            tracing::warn!(%slot_id, kind = err.kind(), "release after expiry failed: {err}");
            self.events
                .dispatch(LifecycleEvent::ReleaseFailed {
                    slot_id,
                    message: err.to_string(),
                })
                .await;
        }
        {
            let mut state = self.lock_state();
            *state = SlotState::Idle;
        }
        self.events
            .dispatch(LifecycleEvent::ReservationExpired { slot_id })
            .await;
        self.events
            .dispatch(LifecycleEvent::PhaseChanged(LifecyclePhase::Idle))
            .await;
        self.refresh_feed_quietly().await;
    }

    async fn refresh_feed_quietly(&self) {
        if let Err(err) = self.feed.refresh().await {
            tracing::debug!(kind = err.kind(), "feed refresh after lifecycle change failed: {err}");
        }
    }

    fn now(&self) -> DateTime<Utc> {
        // The platform clock drives all countdown math; the fallback only
        // triggers on a clock outside chrono's range.
        DateTime::from_timestamp_millis(self.platform.now_millis() as i64)
            .unwrap_or_else(Utc::now)
    }

    // A poisoned lock must not wedge the machine; state is only ever
    // mutated between awaits, so the inner value is always consistent.
    fn lock_state(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::memory::MemoryPlatform;
    use crate::ports::outbound::{storage_keys, MockSlotServicePort};
    use commenter_domain::CompanyRef;

    fn company() -> CompanyRef {
        CompanyRef::new(
            CompanyId::new(),
            "Padaria Central",
            "https://maps.example.com/padaria-central",
        )
    }

    fn reservation_ending_in(platform: &MemoryPlatform, secs: i64) -> ActiveReservation {
        let expires_at =
            DateTime::from_timestamp_millis(platform.now_millis() as i64 + secs * 1_000).unwrap();
        ActiveReservation::new(SlotId::new(), company(), expires_at)
    }

    fn controller_with(
        remote: MockSlotServicePort,
        platform: Arc<MemoryPlatform>,
    ) -> SlotLifecycleController {
        let remote: Arc<dyn SlotServicePort> = Arc::new(remote);
        let feed = AvailabilityFeed::new(remote.clone(), platform.clone());
        SlotLifecycleController::new(remote, platform, feed)
    }

    async fn capture_events(
        controller: &SlotLifecycleController,
    ) -> Arc<Mutex<Vec<LifecycleEvent>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        controller
            .events()
            .subscribe(move |event| {
                sink.lock().unwrap().push(event);
            })
            .await;
        log
    }

    #[tokio::test]
    async fn test_reserve_countdown_submit_happy_path() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));
        remote
            .expect_submit_proof()
            .times(1)
            .withf(move |id, proof| *id == slot_id && proof.is_link())
            .returning(|_, _| Ok(()));

        let controller = controller_with(remote, platform.clone());

        let held = controller
            .start_reservation(reservation.company().id())
            .await
            .unwrap();
        assert_eq!(held.slot_id(), slot_id);
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Active);
        assert!(platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .is_some());

        assert_eq!(controller.tick().await, Some(600));
        platform.advance_ms(100_000);
        assert_eq!(controller.tick().await, Some(500));

        let receipt = controller
            .submit(ProofRef::link("https://g.page/r/abc123").unwrap())
            .await
            .unwrap();
        assert_eq!(receipt.slot_id, slot_id);
        assert_eq!(receipt.reward_cents, REVIEW_REWARD_CENTS);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, LifecyclePhase::Idle);
        assert_eq!(snapshot.reservation, None);
        assert!(platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .is_none());
    }

    #[tokio::test]
    async fn test_reserve_failure_surfaces_backend_message_verbatim() {
        let platform = Arc::new(MemoryPlatform::new());
        let mut remote = MockSlotServicePort::new();
        remote.expect_reserve_slot().times(1).returning(|_| {
            Err(ServiceError::NoCapacity(
                "All slots for this company are taken.".to_string(),
            ))
        });

        let controller = controller_with(remote, platform);
        let err = controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All slots for this company are taken.");
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
    }

    #[tokio::test]
    async fn test_second_reservation_is_rejected_locally() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));

        let controller = controller_with(remote, platform);
        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();

        // The guard fires before any remote call, hence times(1) above.
        let err = controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::AlreadyHoldingSlot(_)));
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Active);
    }

    #[tokio::test]
    async fn test_resume_restores_hold_without_extending_deadline() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();

        // The start marker from the run that crashed.
        platform.storage_save(
            &storage_keys::slot_started(slot_id),
            &platform.now_millis().to_string(),
        );
        platform.advance_ms(100_000);

        let mut remote = MockSlotServicePort::new();
        let found = reservation.clone();
        remote
            .expect_fetch_active_slot()
            .times(1)
            .returning(move || Ok(Some(found.clone())));

        let controller = controller_with(remote, platform.clone());
        let resumed = controller.resume_if_active().await.unwrap().unwrap();
        assert_eq!(resumed.slot_id(), slot_id);

        // 100 s of the window are gone; the deadline did not move.
        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, LifecyclePhase::Active);
        assert_eq!(snapshot.remaining_secs, Some(500));

        // The surviving start marker was kept, not overwritten.
        let origin: u64 = platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(origin, platform.now_millis() - 100_000);
    }

    #[tokio::test]
    async fn test_resume_with_nothing_held_goes_idle_and_refreshes_feed() {
        let platform = Arc::new(MemoryPlatform::new());
        let mut remote = MockSlotServicePort::new();
        remote
            .expect_fetch_active_slot()
            .times(1)
            .returning(|| Ok(None));
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(|| Ok(vec![]));

        let controller = controller_with(remote, platform);
        assert_eq!(controller.resume_if_active().await.unwrap(), None);
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
    }

    #[tokio::test]
    async fn test_resume_of_dead_hold_expires_it_instead() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();
        platform.advance_ms(601_000);

        let mut remote = MockSlotServicePort::new();
        let found = reservation.clone();
        remote
            .expect_fetch_active_slot()
            .times(1)
            .returning(move || Ok(Some(found.clone())));
        remote
            .expect_release_or_expire_slot()
            .times(1)
            .withf(move |id| *id == slot_id)
            .returning(|_| Ok(()));
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(|| Ok(vec![]));

        let controller = controller_with(remote, platform);
        let events = capture_events(&controller).await;

        assert_eq!(controller.resume_if_active().await.unwrap(), None);
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
        assert!(events
            .lock()
            .unwrap()
            .contains(&LifecycleEvent::ReservationExpired { slot_id }));
    }

    #[tokio::test]
    async fn test_tick_fires_expiry_release_exactly_once() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));
        remote
            .expect_release_or_expire_slot()
            .times(1)
            .withf(move |id| *id == slot_id)
            .returning(|_| Ok(()));
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(|| Ok(vec![]));

        let controller = controller_with(remote, platform.clone());
        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();

        platform.advance_ms(600_000);
        assert_eq!(controller.tick().await, Some(0));
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
        assert!(platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .is_none());

        // Further ticks find nothing to do; release was called once.
        assert_eq!(controller.tick().await, None);
        assert_eq!(controller.tick().await, None);
    }

    #[tokio::test]
    async fn test_expiry_proceeds_to_idle_even_when_release_fails() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 60);

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));
        remote
            .expect_release_or_expire_slot()
            .times(1)
            .returning(|_| Err(ServiceError::Network("connection refused".to_string())));
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(|| Ok(vec![]));

        let controller = controller_with(remote, platform.clone());
        let events = capture_events(&controller).await;
        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();

        platform.advance_ms(61_000);
        assert_eq!(controller.tick().await, Some(0));
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);

        let events = events.lock().unwrap();
        assert!(events
            .iter()
            .any(|e| matches!(e, LifecycleEvent::ReleaseFailed { .. })));
        assert!(events
            .iter()
            .any(|e| matches!(e, LifecycleEvent::ReservationExpired { .. })));
    }

    #[tokio::test]
    async fn test_abandon_is_idempotent_and_tolerates_release_failure() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));
        remote
            .expect_release_or_expire_slot()
            .times(1)
            .returning(|_| Err(ServiceError::Network("timeout".to_string())));
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(|| Ok(vec![]));

        let controller = controller_with(remote, platform.clone());
        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();

        // The failed release never reaches the caller.
        controller.abandon().await.unwrap();
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
        assert!(platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .is_none());

        // A second abandon is a no-op: release stays at one call.
        controller.abandon().await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_expired_race_forces_idle_and_feed_refresh() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));
        remote.expect_submit_proof().times(1).returning(|_, _| {
            Err(ServiceError::SlotExpired(
                "the reservation window has closed".to_string(),
            ))
        });
        remote
            .expect_list_available_companies()
            .times(1)
            .returning(|| Ok(vec![]));

        let controller = controller_with(remote, platform.clone());
        let events = capture_events(&controller).await;
        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();

        let err = controller
            .submit(ProofRef::link("https://g.page/r/abc123").unwrap())
            .await
            .unwrap_err();
        assert!(err.invalidates_slot());

        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
        assert!(platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .is_none());
        assert!(events.lock().unwrap().contains(&LifecycleEvent::SubmitFailed {
            slot_id,
            message: err.to_string(),
            reservation_lost: true,
        }));
    }

    #[tokio::test]
    async fn test_submit_validation_failure_keeps_hold_for_retry() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));
        let mut submits = 0;
        remote.expect_submit_proof().times(2).returning(move |_, _| {
            submits += 1;
            if submits == 1 {
                Err(ServiceError::Validation(
                    "that link does not look like a review".to_string(),
                ))
            } else {
                Ok(())
            }
        });

        let controller = controller_with(remote, platform.clone());
        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();

        let err = controller
            .submit(ProofRef::link("https://example.com/not-a-review").unwrap())
            .await
            .unwrap_err();
        assert!(err.is_recoverable_in_place());
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Active);
        assert!(platform
            .storage_load(&storage_keys::slot_started(slot_id))
            .is_some());

        // Retry in place succeeds.
        controller
            .submit(ProofRef::link("https://g.page/r/abc123").unwrap())
            .await
            .unwrap();
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Idle);
    }

    #[tokio::test]
    async fn test_confirmation_phase_round_trip() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));

        let controller = controller_with(remote, platform.clone());
        assert!(matches!(
            controller.confirm_review_posted().await.unwrap_err(),
            ServiceError::Validation(_)
        ));

        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();
        controller.confirm_review_posted().await.unwrap();
        assert_eq!(
            controller.snapshot().phase,
            LifecyclePhase::AwaitingConfirmation
        );

        // The countdown still runs in the confirmation phase.
        platform.advance_ms(10_000);
        assert_eq!(controller.tick().await, Some(590));

        controller.cancel_confirmation().await.unwrap();
        assert_eq!(controller.snapshot().phase, LifecyclePhase::Active);
    }

    #[tokio::test]
    async fn test_reserve_emits_events_in_order() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);

        let mut remote = MockSlotServicePort::new();
        let granted = reservation.clone();
        remote
            .expect_reserve_slot()
            .times(1)
            .returning(move |_| Ok(granted.clone()));

        let controller = controller_with(remote, platform);
        let events = capture_events(&controller).await;
        controller
            .start_reservation(CompanyId::new())
            .await
            .unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            events[0],
            LifecycleEvent::PhaseChanged(LifecyclePhase::Reserving)
        );
        assert_eq!(events[1], LifecycleEvent::ReservationStarted(reservation));
        assert_eq!(
            events[2],
            LifecycleEvent::PhaseChanged(LifecyclePhase::Active)
        );
    }

    #[tokio::test]
    async fn test_remaining_time_ignores_stale_local_marker() {
        let platform = Arc::new(MemoryPlatform::new());
        let reservation = reservation_ending_in(&platform, 600);
        let slot_id = reservation.slot_id();

        // A wildly wrong local marker must not affect the countdown.
        platform.storage_save(&storage_keys::slot_started(slot_id), "12");

        let mut remote = MockSlotServicePort::new();
        let found = reservation.clone();
        remote
            .expect_fetch_active_slot()
            .times(1)
            .returning(move || Ok(Some(found.clone())));

        let controller = controller_with(remote, platform);
        controller.resume_if_active().await.unwrap();
        assert_eq!(controller.snapshot().remaining_secs, Some(600));
    }
}
