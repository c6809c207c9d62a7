//! Test session controller
//!
//! Owns the lifecycle of one speed test run: start request, single-flight
//! status polling, reconciliation of each snapshot into the presenter, and
//! the settle-then-finish sequence once the service reports a terminal
//! status.
//!
//! All mutable session state (phase, presenter, chart) sits behind one async
//! mutex. The poll task re-checks the phase after every await and drops the
//! response if its session is no longer the current one.


use crate::{
    chart::ChartBuffer,
    client::MeasurementService,
    error::{AppError, Result},
    logging::SessionLogger,
    mapper::map_snapshot,
    models::{Config, FinalResults, StatusSnapshot, TestStatus},
    output::Presenter,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use uuid::Uuid;

const DEFAULT_SERVER_ERROR: &str = "An error occurred";

/// Identity of one test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of [`SessionController::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new session is polling
    Started(SessionId),
    /// A session was already in progress; nothing changed
    AlreadyRunning,
}

/// How a session ended
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The service reported `completed`
    Completed(FinalResults),
    /// The service reported `error`
    ServerError(String),
    /// A status poll failed
    ConnectionLost(String),
    /// The session stopped being current before it finished
    Superseded,
}

impl SessionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed(_) => "completed",
            Self::ServerError(_) => "server_error",
            Self::ConnectionLost(_) => "connection_lost",
            Self::Superseded => "superseded",
        }
    }

    /// Convert a failed outcome into the matching error
    pub fn into_result(self) -> Result<FinalResults> {
        match self {
            Self::Completed(results) => Ok(results),
            Self::ServerError(msg) => Err(AppError::test_failed(msg)),
            Self::ConnectionLost(msg) => Err(AppError::poll_failure(msg)),
            Self::Superseded => Err(AppError::internal("Test session was superseded")),
        }
    }
}

/// Where the controller is in the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    /// Start request in flight
    Starting,
    Polling(SessionId),
    /// Terminal status seen; waiting out the settle delay
    Settling(SessionId),
}

// A zero period would make the poll ticker panic
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Timing knobs for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
    pub chart_capacity: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            poll_interval: crate::defaults::DEFAULT_POLL_INTERVAL,
            settle_delay: crate::defaults::DEFAULT_SETTLE_DELAY,
            chart_capacity: crate::defaults::CHART_CAPACITY,
        }
    }
}

impl SessionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            settle_delay: config.settle_delay(),
            ..Self::default()
        }
    }
}

struct SessionState<P> {
    phase: ControllerPhase,
    presenter: P,
    chart: ChartBuffer,
    last_status: Option<TestStatus>,
}

/// What the poll task does after a response has been applied
enum Handled {
    /// The session stopped being current while the request was in flight
    Stale,
    Failed(AppError),
    Polled { snapshot: StatusSnapshot, changed: bool },
}

impl<P: Presenter> SessionState<P> {
    fn handle_response(&mut self, id: SessionId, response: Result<StatusSnapshot>) -> Handled {
        if self.phase != ControllerPhase::Polling(id) {
            return Handled::Stale;
        }

        match response {
            Ok(snapshot) => {
                let changed = self.reconcile(&snapshot);
                if snapshot.status.is_terminal() {
                    self.phase = ControllerPhase::Settling(id);
                }
                Handled::Polled { snapshot, changed }
            }
            Err(e) => {
                let error = AppError::poll_failure(e.message());
                self.phase = ControllerPhase::Idle;
                self.presenter.show_error(&error.to_string());
                self.presenter.set_start_enabled(true);
                Handled::Failed(error)
            }
        }
    }

    /// Apply one snapshot; returns whether the reported phase changed
    fn reconcile(&mut self, snapshot: &StatusSnapshot) -> bool {
        let update = map_snapshot(snapshot);
        self.presenter.apply(&update);

        if let Some(speed) = update.speedometer {
            self.presenter.update_speedometer(speed);
        }
        if let Some(sample) = update.chart_sample {
            self.chart.push(sample.download, sample.upload);
            self.presenter.render_chart(&self.chart);
        }

        let changed = self.last_status.as_ref() != Some(&snapshot.status);
        self.last_status = Some(snapshot.status.clone());
        changed
    }
}

type SharedState<P> = Arc<Mutex<SessionState<P>>>;

/// Drives test sessions against a [`MeasurementService`] and renders them
/// through a [`Presenter`]
pub struct SessionController<S: ?Sized, P> {
    service: Arc<S>,
    state: SharedState<P>,
    settings: SessionSettings,
    logger: SessionLogger,
    poll_task: Option<JoinHandle<SessionOutcome>>,
}

impl<S, P> SessionController<S, P>
where
    S: MeasurementService + ?Sized + 'static,
    P: Presenter,
{
    pub fn new(service: Arc<S>, presenter: P, settings: SessionSettings) -> Self {
        let settings = SessionSettings {
            poll_interval: settings.poll_interval.max(MIN_POLL_INTERVAL),
            ..settings
        };

        Self {
            service,
            state: Arc::new(Mutex::new(SessionState {
                phase: ControllerPhase::Idle,
                presenter,
                chart: ChartBuffer::with_capacity(settings.chart_capacity),
                last_status: None,
            })),
            settings,
            logger: SessionLogger::silent(),
            poll_task: None,
        }
    }

    /// Attach a session logger
    pub fn with_logger(mut self, logger: SessionLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub async fn phase(&self) -> ControllerPhase {
        self.state.lock().await.phase
    }

    /// Whether a session is starting, polling or settling
    pub async fn is_active(&self) -> bool {
        self.phase().await != ControllerPhase::Idle
    }

    /// Inspect the presenter
    pub async fn with_presenter<R>(&self, f: impl FnOnce(&P) -> R) -> R {
        let state = self.state.lock().await;
        f(&state.presenter)
    }

    /// Number of samples currently in the chart
    pub async fn chart_len(&self) -> usize {
        self.state.lock().await.chart.len()
    }

    /// Start a new session unless one is already active
    ///
    /// A rejected or unreachable start request is shown through the presenter,
    /// re-enables the start affordance and is returned as
    /// [`AppError::StartFailure`]. No polling begins in that case.
    pub async fn start(&mut self) -> Result<StartOutcome> {
        {
            let mut state = self.state.lock().await;
            if state.phase != ControllerPhase::Idle {
                drop(state);
                self.logger.log_start_ignored().await;
                return Ok(StartOutcome::AlreadyRunning);
            }
            state.phase = ControllerPhase::Starting;

            if let Some(previous) = self.poll_task.take() {
                previous.abort();
            }

            state.chart.reset();
            state.last_status = None;
            state.presenter.reset();
            state.presenter.set_start_enabled(false);
        }

        if let Err(e) = self.service.start_test().await {
            let error = AppError::start_failure(e.message());
            {
                let mut state = self.state.lock().await;
                state.phase = ControllerPhase::Idle;
                state.presenter.show_error(&error.to_string());
                state.presenter.set_start_enabled(true);
            }
            self.logger.log_start_failed(&error).await;
            return Err(error);
        }

        let id = SessionId::new();
        self.state.lock().await.phase = ControllerPhase::Polling(id);
        self.logger.log_session_started(&id.to_string()).await;

        let task = poll_session(
            id,
            Arc::clone(&self.service),
            Arc::clone(&self.state),
            self.settings,
            self.logger.clone(),
        );
        self.poll_task = Some(tokio::spawn(task));

        Ok(StartOutcome::Started(id))
    }

    /// Wait for the current session to end
    pub async fn wait(&mut self) -> Result<SessionOutcome> {
        let task = self
            .poll_task
            .take()
            .ok_or_else(|| AppError::internal("No test session to wait for"))?;

        match task.await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // The task never reached a final phase; hand control back
                let mut state = self.state.lock().await;
                state.phase = ControllerPhase::Idle;
                state.presenter.set_start_enabled(true);
                Err(AppError::internal(format!("Poll task failed: {}", e)))
            }
        }
    }

    /// Start a session and wait for it to end
    pub async fn run(&mut self) -> Result<SessionOutcome> {
        self.start().await?;
        self.wait().await
    }
}

impl<S: ?Sized, P> Drop for SessionController<S, P> {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
        }
    }
}

async fn is_current<P>(state: &SharedState<P>, id: SessionId) -> bool {
    state.lock().await.phase == ControllerPhase::Polling(id)
}

/// Poll until a terminal status, a failed poll, or loss of currency.
///
/// The next tick is only awaited after the previous response has been
/// handled, so at most one status request is ever in flight.
async fn poll_session<S, P>(
    id: SessionId,
    service: Arc<S>,
    state: SharedState<P>,
    settings: SessionSettings,
    logger: SessionLogger,
) -> SessionOutcome
where
    S: MeasurementService + ?Sized,
    P: Presenter,
{
    let session = id.to_string();
    let mut ticker = interval_at(Instant::now() + settings.poll_interval, settings.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut polls: u64 = 0;

    let outcome = loop {
        ticker.tick().await;
        if !is_current(&state, id).await {
            break SessionOutcome::Superseded;
        }

        polls += 1;
        let response = service.fetch_status().await;
        let handled = state.lock().await.handle_response(id, response);

        match handled {
            Handled::Stale => {
                logger.log_stale_response(&session).await;
                break SessionOutcome::Superseded;
            }
            Handled::Failed(error) => {
                logger.log_poll_failed(&session, &error).await;
                break SessionOutcome::ConnectionLost(error.message().to_string());
            }
            Handled::Polled { snapshot, changed } => {
                if changed {
                    logger.log_status_transition(&session, &snapshot).await;
                }
                logger.log_poll(&session, polls, &snapshot).await;

                if snapshot.status.is_terminal() {
                    break finish_session(id, &state, settings.settle_delay, &snapshot).await;
                }
            }
        }
    };

    logger.log_session_finished(&session, outcome.label(), polls).await;
    outcome
}

/// Let the last transition land, then restore the start affordance and show
/// the terminal message
async fn finish_session<P: Presenter>(
    id: SessionId,
    state: &SharedState<P>,
    settle_delay: Duration,
    snapshot: &StatusSnapshot,
) -> SessionOutcome {
    sleep(settle_delay).await;

    let mut guard = state.lock().await;
    if guard.phase != ControllerPhase::Settling(id) {
        return SessionOutcome::Superseded;
    }
    guard.phase = ControllerPhase::Idle;
    guard.presenter.set_start_enabled(true);

    if snapshot.status == TestStatus::Error {
        let message = snapshot
            .error
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_SERVER_ERROR.to_string());
        guard.presenter.show_error(&message);
        SessionOutcome::ServerError(message)
    } else {
        guard.presenter.show_success();
        SessionOutcome::Completed(FinalResults::from(snapshot))
    }
}
