// Per-farm polling session - fixed-cadence sensor polling with gated,
// single-flight AI evaluation
use crate::application::clock::Clock;
use crate::application::cooldown_store::CooldownStore;
use crate::application::orchestrator::DecisionOrchestrator;
use crate::application::sensor_source::{InvalidSample, SensorSource};
use crate::domain::decision::{Decision, DiseaseRisk};
use crate::domain::farm::Farm;
use crate::domain::sensor::SensorSample;
use chrono::Duration as ChronoDuration;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex, RwLock};

/// Decisions kept per farm for the history endpoint, most recent first.
const HISTORY_CAP: usize = 50;

/// What the display layer reads. Replaced field-atomically under the lock;
/// a decision is never merged with a previous one.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSnapshot {
    pub vitals: Option<SensorSample>,
    pub decision: Option<Decision>,
    pub disease_risk: Option<DiseaseRisk>,
    pub history: VecDeque<Decision>,
}

/// How a tick resolved. Drives nothing at runtime; lets tests step the
/// state machine without timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Sensor fetch failed; previous vitals stay displayed.
    SensorUnavailable,
    /// Vitals refreshed; AI evaluation skipped because the cooldown is
    /// still running.
    VitalsOnly,
    /// Vitals refreshed; an AI attempt from a previous tick is still
    /// outstanding.
    AiInFlight,
    /// Vitals refreshed and a new AI attempt was started.
    AiStarted,
}

pub struct FarmSession {
    farm: Farm,
    sensors: Arc<dyn SensorSource>,
    orchestrator: DecisionOrchestrator,
    cooldown: Arc<dyn CooldownStore>,
    clock: Arc<dyn Clock>,
    poll_period: Duration,
    cooldown_period: ChronoDuration,
    state: Arc<RwLock<SessionSnapshot>>,
    // Single-flight turnstile for AI attempts. Held for the full duration of
    // an attempt; guard drop releases it on every exit path.
    turnstile: Arc<Mutex<()>>,
    cancelled: watch::Receiver<bool>,
}

impl FarmSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        farm: Farm,
        sensors: Arc<dyn SensorSource>,
        orchestrator: DecisionOrchestrator,
        cooldown: Arc<dyn CooldownStore>,
        clock: Arc<dyn Clock>,
        poll_period: Duration,
        cooldown_period: ChronoDuration,
        cancelled: watch::Receiver<bool>,
    ) -> Self {
        Self {
            farm,
            sensors,
            orchestrator,
            cooldown,
            clock,
            poll_period,
            cooldown_period,
            state: Arc::new(RwLock::new(SessionSnapshot::default())),
            turnstile: Arc::new(Mutex::new(())),
            cancelled,
        }
    }

    pub fn farm(&self) -> &Farm {
        &self.farm
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.clone()
    }

    /// Tick loop. Stops scheduling when the shutdown channel fires; an
    /// in-flight AI attempt is allowed to settle but its result is
    /// discarded by the cancellation check in `tick`.
    pub async fn run(self: Arc<Self>) {
        let mut shutdown = self.cancelled.clone();
        let mut ticker = tokio::time::interval(self.poll_period);
        tracing::info!(farm_id = %self.farm.id, "polling session started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.changed() => {
                    break;
                }
            }
        }

        tracing::info!(farm_id = %self.farm.id, "polling session stopped");
    }

    /// One poll cycle: refresh vitals unconditionally, then decide whether
    /// this tick may also invoke the decision orchestrator.
    pub async fn tick(&self) -> TickOutcome {
        // 1. Fresh sample every tick, independent of AI gating.
        let sample = match self.sensors.fetch_latest(&self.farm.id).await {
            Ok(sample) => sample,
            Err(e) => {
                tracing::warn!(farm_id = %self.farm.id, "sensor fetch failed, keeping previous vitals: {e}");
                return TickOutcome::SensorUnavailable;
            }
        };
        if !sample.is_plausible() {
            let e = InvalidSample {
                farm_id: self.farm.id.clone(),
                detail: format!("{sample:?}"),
            };
            tracing::warn!("rejected reading, keeping previous vitals: {e}");
            return TickOutcome::SensorUnavailable;
        }
        self.state.write().await.vitals = Some(sample.clone());

        // 2. At most one outstanding AI attempt per session.
        let Ok(permit) = Arc::clone(&self.turnstile).try_lock_owned() else {
            return TickOutcome::AiInFlight;
        };

        // 3. Cooldown gate. A store failure counts as elapsed: blocking
        //    guidance indefinitely is the worse failure mode.
        let now = self.clock.now();
        let cooldown_elapsed = match self.cooldown.read().await {
            Ok(Some(last_attempt)) => now.signed_duration_since(last_attempt) > self.cooldown_period,
            Ok(None) => true,
            Err(e) => {
                tracing::warn!(farm_id = %self.farm.id, "cooldown read failed, treating as elapsed: {e}");
                true
            }
        };
        let have_decision = self.state.read().await.decision.is_some();
        if have_decision && !cooldown_elapsed {
            return TickOutcome::VitalsOnly;
        }

        // 4. Run the attempt off-tick so sensor polling continues while the
        //    provider call is suspended.
        let orchestrator = self.orchestrator.clone();
        let cooldown = Arc::clone(&self.cooldown);
        let clock = Arc::clone(&self.clock);
        let state = Arc::clone(&self.state);
        let farm = self.farm.clone();
        let cancelled = self.cancelled.clone();

        tokio::spawn(async move {
            let decision = orchestrator.decide(&sample, &farm).await;
            let risk = orchestrator.disease_risk(&sample, &farm).await;

            // The cooldown clock advances on every settled attempt, degraded
            // or not, so a broken provider cannot cause a tight retry loop.
            if let Err(e) = cooldown.write(clock.now()).await {
                tracing::warn!(farm_id = %farm.id, "cooldown write failed: {e}");
            }

            if *cancelled.borrow() {
                tracing::debug!(farm_id = %farm.id, "session torn down mid-attempt, discarding result");
            } else {
                let mut snapshot = state.write().await;
                snapshot.disease_risk = Some(risk);
                snapshot.history.push_front(decision.clone());
                snapshot.history.truncate(HISTORY_CAP);
                snapshot.decision = Some(decision);
            }

            drop(permit);
        });

        TickOutcome::AiStarted
    }
}
