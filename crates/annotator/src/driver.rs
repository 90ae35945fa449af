use crate::inject::{inject_year_histogram, InjectOutcome};
use crate::page::{AnnotationBuilder, CurriculumPage, MutationRecord};
use crate::pass::{run_pass, PassReport};
use crate::{AnnotatorError, Result};
use lecture_dates_curriculum::{CurriculumItem, DateFormatter, YearHistogram};
use log::{debug, error};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{self, Instant};

const STARTUP_REASON: &str = "startup";
const MUTATION_REASON: &str = "mutation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Quiet period after the last structural mutation before a pass runs.
    pub debounce_ms: u64,
}

impl DriverConfig {
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self { debounce_ms: 300 }
    }
}

/// Handle to a running annotation driver.
///
/// Dropping the last clone disconnects the driver, as does
/// [`DriverHandle::disconnect`].
#[derive(Clone)]
pub struct DriverHandle {
    inner: Arc<DriverInner>,
}

struct DriverInner {
    command_tx: mpsc::Sender<DriverCommand>,
    report_tx: broadcast::Sender<PassReport>,
    latest_rx: watch::Receiver<Option<PassReport>>,
}

enum DriverCommand {
    Trigger { reason: String },
    Shutdown,
}

/// Re-runs the annotation pass whenever the page settles after structural
/// changes.
pub struct LectureDateDriver;

impl LectureDateDriver {
    /// Spawns the driver on the current tokio runtime.
    ///
    /// One pass runs immediately, since content rendered before the
    /// observer was attached produces no mutation records. Every pass also
    /// retries the year histogram until its anchor has rendered.
    pub fn start<P, B, D>(
        page: Arc<Mutex<P>>,
        items: Arc<[CurriculumItem]>,
        builder: B,
        formatter: D,
        mutations: mpsc::Receiver<MutationRecord>,
        config: DriverConfig,
    ) -> DriverHandle
    where
        P: CurriculumPage + Send + 'static,
        B: AnnotationBuilder<Fragment = P::Fragment> + Send + 'static,
        D: DateFormatter + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (report_tx, _) = broadcast::channel(32);
        let (latest_tx, latest_rx) = watch::channel(None);

        let pass = PassRunner {
            page,
            histogram: YearHistogram::from_items(&items),
            items,
            builder,
            formatter,
            report_tx: report_tx.clone(),
            latest_tx,
        };
        spawn_driver_loop(pass, config, mutations, command_rx);

        DriverHandle {
            inner: Arc::new(DriverInner {
                command_tx,
                report_tx,
                latest_rx,
            }),
        }
    }
}

impl DriverHandle {
    /// Runs a pass as soon as possible, bypassing the debounce.
    pub async fn trigger(&self, reason: impl Into<String>) -> Result<()> {
        self.inner
            .command_tx
            .send(DriverCommand::Trigger {
                reason: reason.into(),
            })
            .await
            .map_err(|_| AnnotatorError::DriverStopped)
    }

    /// Stops observing. A debounced pass that has not fired yet never runs.
    pub async fn disconnect(&self) {
        let _ = self.inner.command_tx.send(DriverCommand::Shutdown).await;
        self.inner.command_tx.closed().await;
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.inner.command_tx.is_closed()
    }

    #[must_use]
    pub fn subscribe_reports(&self) -> broadcast::Receiver<PassReport> {
        self.inner.report_tx.subscribe()
    }

    #[must_use]
    pub fn latest_report(&self) -> Option<PassReport> {
        self.inner.latest_rx.borrow().clone()
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        if Arc::strong_count(&self.inner) == 1 {
            let _ = self.inner.command_tx.try_send(DriverCommand::Shutdown);
        }
    }
}

struct PassRunner<P, B, D> {
    page: Arc<Mutex<P>>,
    items: Arc<[CurriculumItem]>,
    histogram: YearHistogram,
    builder: B,
    formatter: D,
    report_tx: broadcast::Sender<PassReport>,
    latest_tx: watch::Sender<Option<PassReport>>,
}

impl<P, B, D> PassRunner<P, B, D>
where
    P: CurriculumPage,
    B: AnnotationBuilder<Fragment = P::Fragment>,
    D: DateFormatter,
{
    fn run(&self, reason: &str) {
        let report = {
            let Ok(mut page) = self.page.lock() else {
                error!("Skipping annotation pass: {}", AnnotatorError::PagePoisoned);
                return;
            };
            if inject_year_histogram(&mut *page, &self.builder, &self.histogram)
                == InjectOutcome::Injected
            {
                debug!("Year histogram injected ({reason})");
            }
            run_pass(&mut *page, &self.items, &self.builder, &self.formatter, reason)
        };
        let _ = self.latest_tx.send(Some(report.clone()));
        let _ = self.report_tx.send(report);
    }
}

fn spawn_driver_loop<P, B, D>(
    pass: PassRunner<P, B, D>,
    config: DriverConfig,
    mut mutations: mpsc::Receiver<MutationRecord>,
    mut command_rx: mpsc::Receiver<DriverCommand>,
) where
    P: CurriculumPage + Send + 'static,
    B: AnnotationBuilder<Fragment = P::Fragment> + Send + 'static,
    D: DateFormatter + Send + 'static,
{
    tokio::spawn(async move {
        let mut state = DebounceState::new(config.debounce());
        let mut observing = true;

        pass.run(STARTUP_REASON);

        loop {
            let next_deadline = state.next_deadline();

            tokio::select! {
                biased;

                cmd = command_rx.recv() => {
                    match cmd {
                        Some(DriverCommand::Trigger { reason }) => state.force_run(reason),
                        Some(DriverCommand::Shutdown) | None => break,
                    }
                }
                record = mutations.recv(), if observing => {
                    match record {
                        Some(record) if record.is_structural() => state.record_mutation(),
                        Some(_) => {}
                        None => {
                            debug!("Mutation source closed; no further passes will be scheduled");
                            observing = false;
                        }
                    }
                }
                () = async {
                    if let Some(deadline) = next_deadline {
                        time::sleep_until(deadline).await;
                    }
                }, if next_deadline.is_some() => {
                    let reason = state.take_reason();
                    pass.run(&reason);
                    state.reset();
                }
            }
        }

        debug!("Annotation driver disconnected");
    });
}

/// Trailing-edge debounce: every mutation pushes the deadline out again.
struct DebounceState {
    debounce: Duration,
    dirty: bool,
    pending: usize,
    last_event: Option<Instant>,
    force_immediate: bool,
    reason: Option<String>,
}

impl DebounceState {
    const fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            dirty: false,
            pending: 0,
            last_event: None,
            force_immediate: false,
            reason: None,
        }
    }

    fn record_mutation(&mut self) {
        self.pending += 1;
        self.last_event = Some(Instant::now());
        self.dirty = true;
    }

    fn force_run(&mut self, reason: String) {
        self.pending += 1;
        self.reason = Some(reason);
        self.force_immediate = true;
        self.dirty = true;
    }

    fn next_deadline(&self) -> Option<Instant> {
        if !self.dirty {
            return None;
        }
        if self.force_immediate {
            return Some(Instant::now());
        }
        self.last_event.map(|last| last + self.debounce)
    }

    fn take_reason(&mut self) -> String {
        self.reason
            .take()
            .unwrap_or_else(|| format!("{MUTATION_REASON} x{}", self.pending))
    }

    fn reset(&mut self) {
        self.dirty = false;
        self.pending = 0;
        self.last_event = None;
        self.force_immediate = false;
        self.reason = None;
    }
}
