//! Directory watching and rebuild coordination.
//!
//! File system events from `notify` are filtered and forwarded to
//! a [`RebuildCoordinator`], a single task that owns the rebuild
//! state machine:
//!
//! ```text
//! Idle ──debounce elapsed──▶ Building
//! Building ──debounce elapsed──▶ BuildingWithPendingRequest
//! Building ──build finished──▶ Idle
//! BuildingWithPendingRequest ──build finished──▶ Building
//! ```
//!
//! Every event pushes the debounce deadline back (trailing edge),
//! so a burst of changes produces one rebuild. The deadline never
//! moves past `MAX_WAIT_FACTOR` windows after the first event of a
//! burst, so a steady trickle of changes still gets indexed. At
//! most one rebuild runs at a time and at most one more is queued
//! behind it.

use async_trait::async_trait;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

use crate::core::error::{DocseekError, Result};
use crate::core::types::{DocumentFormat, IndexStats};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Longest a burst can postpone a rebuild, in debounce windows
const MAX_WAIT_FACTOR: u32 = 4;

/// A relevant change in the source directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Created(PathBuf),
    Modified(PathBuf),
    Removed(PathBuf),
}

/// Something that can rebuild and publish the index
#[async_trait]
pub trait RebuildTarget: Send + Sync + 'static {
    async fn rebuild(&self) -> Result<IndexStats>;
}

/// Rebuild scheduling state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    Building,
    BuildingWithPendingRequest,
}

enum Step {
    Event(Option<WatchEvent>),
    DebounceElapsed,
    BuildFinished(std::result::Result<Result<IndexStats>, JoinError>),
}

/// Debounces change events and serialises rebuilds.
pub struct RebuildCoordinator {
    target: Arc<dyn RebuildTarget>,
    debounce: Duration,
    state: CoordinatorState,
    state_tx: watch::Sender<CoordinatorState>,
    deadline: Option<Instant>,

    /// First event of the burst the current deadline belongs to
    burst_started: Option<Instant>,
    in_flight: Option<JoinHandle<Result<IndexStats>>>,
}

/// Handle to a running coordinator task
pub struct CoordinatorHandle {
    events: mpsc::Sender<WatchEvent>,
    state: watch::Receiver<CoordinatorState>,
    task: JoinHandle<()>,
}

impl RebuildCoordinator {
    /// Spawn the coordinator on the current runtime
    pub fn spawn(target: Arc<dyn RebuildTarget>, debounce: Duration) -> CoordinatorHandle {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(CoordinatorState::Idle);

        let coordinator = Self {
            target,
            debounce,
            state: CoordinatorState::Idle,
            state_tx,
            deadline: None,
            burst_started: None,
            in_flight: None,
        };
        let task = tokio::spawn(coordinator.run(events_rx));

        CoordinatorHandle {
            events: events_tx,
            state: state_rx,
            task,
        }
    }

    async fn run(mut self, mut events: mpsc::Receiver<WatchEvent>) {
        let mut events_open = true;

        loop {
            if !events_open && self.deadline.is_none() && self.in_flight.is_none() {
                break;
            }

            let step = tokio::select! {
                event = events.recv(), if events_open => Step::Event(event),
                _ = wait_deadline(self.deadline) => Step::DebounceElapsed,
                outcome = wait_build(&mut self.in_flight) => Step::BuildFinished(outcome),
            };

            match step {
                Step::Event(Some(event)) => self.on_event(event),
                Step::Event(None) => {
                    tracing::debug!("Event channel closed");
                    events_open = false;
                }
                Step::DebounceElapsed => self.on_debounce_elapsed(),
                Step::BuildFinished(outcome) => self.on_build_finished(outcome),
            }
        }

        tracing::debug!("Rebuild coordinator stopped");
    }

    fn on_event(&mut self, event: WatchEvent) {
        tracing::debug!("Change detected: {:?}", event);
        let now = Instant::now();
        let started = *self.burst_started.get_or_insert(now);
        let latest = started + self.debounce * MAX_WAIT_FACTOR;
        self.deadline = Some((now + self.debounce).min(latest));
    }

    fn on_debounce_elapsed(&mut self) {
        self.deadline = None;
        self.burst_started = None;
        match self.state {
            CoordinatorState::Idle => self.start_build(),
            CoordinatorState::Building => {
                tracing::debug!("Rebuild in progress, queueing another");
                self.set_state(CoordinatorState::BuildingWithPendingRequest);
            }
            CoordinatorState::BuildingWithPendingRequest => {}
        }
    }

    fn on_build_finished(&mut self, outcome: std::result::Result<Result<IndexStats>, JoinError>) {
        self.in_flight = None;

        match outcome {
            Ok(Ok(stats)) => tracing::info!(
                "Rebuild complete: generation {}, {} documents, {} chunks",
                stats.generation,
                stats.documents_indexed,
                stats.chunks_created
            ),
            Ok(Err(e)) => tracing::warn!("Rebuild failed: {}", e),
            Err(e) => tracing::error!("Rebuild task aborted: {}", e),
        }

        match self.state {
            CoordinatorState::BuildingWithPendingRequest => self.start_build(),
            _ => self.set_state(CoordinatorState::Idle),
        }
    }

    fn start_build(&mut self) {
        let target = Arc::clone(&self.target);
        self.in_flight = Some(tokio::spawn(async move { target.rebuild().await }));
        self.set_state(CoordinatorState::Building);
    }

    fn set_state(&mut self, state: CoordinatorState) {
        self.state = state;
        self.state_tx.send_replace(state);
    }
}

async fn wait_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn wait_build(
    in_flight: &mut Option<JoinHandle<Result<IndexStats>>>,
) -> std::result::Result<Result<IndexStats>, JoinError> {
    match in_flight.as_mut() {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

impl CoordinatorHandle {
    /// Sender for feeding change events
    pub fn sender(&self) -> mpsc::Sender<WatchEvent> {
        self.events.clone()
    }

    /// Report a change
    pub async fn notify(&self, event: WatchEvent) -> Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| DocseekError::WatchFailed("coordinator stopped".to_string()))
    }

    pub fn state(&self) -> CoordinatorState {
        *self.state.borrow()
    }

    /// Stop accepting events; any running or queued rebuild still
    /// completes before the task exits.
    pub async fn shutdown(self) {
        drop(self.events);
        if let Err(e) = self.task.await {
            tracing::error!("Rebuild coordinator panicked: {}", e);
        }
    }
}

/// Map a raw `notify` event to the changes we care about.
///
/// Hidden files, unsupported extensions and access/metadata-only
/// events are dropped. Removal of an extensionless path is kept,
/// since it may be a directory holding documents.
pub fn convert_event(event: &Event) -> Vec<WatchEvent> {
    let make: fn(PathBuf) -> WatchEvent = match &event.kind {
        EventKind::Create(_) => WatchEvent::Created,
        EventKind::Modify(ModifyKind::Metadata(_)) => return Vec::new(),
        EventKind::Modify(_) | EventKind::Any | EventKind::Other => WatchEvent::Modified,
        EventKind::Remove(_) => WatchEvent::Removed,
        EventKind::Access(_) => return Vec::new(),
    };
    let removal = matches!(event.kind, EventKind::Remove(_));

    event
        .paths
        .iter()
        .filter(|path| !is_hidden(path))
        .filter(|path| {
            DocumentFormat::from_path(path).is_some() || (removal && path.extension().is_none())
        })
        .map(|path| make(path.clone()))
        .collect()
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Watches the source directory and drives rebuilds.
pub struct DirectoryWatcher {
    _watcher: RecommendedWatcher,
    coordinator: CoordinatorHandle,
}

impl DirectoryWatcher {
    /// Start watching `root`. Must be called within a tokio
    /// runtime.
    pub fn start(
        root: &Path,
        recursive: bool,
        target: Arc<dyn RebuildTarget>,
        debounce: Duration,
    ) -> Result<Self> {
        let coordinator = RebuildCoordinator::spawn(target, debounce);
        let events = coordinator.sender();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                for change in convert_event(&event) {
                    if let Err(mpsc::error::TrySendError::Closed(_)) = events.try_send(change) {
                        tracing::warn!("Event channel closed");
                        break;
                    }
                }
            }
            Err(e) => tracing::error!("Watch error: {}", e),
        })
        .map_err(|e| DocseekError::WatchFailed(e.to_string()))?;

        let mode = if recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        watcher
            .watch(root, mode)
            .map_err(|e| DocseekError::WatchFailed(format!("{root:?}: {e}")))?;

        tracing::info!("Watching {:?} for changes", root);

        Ok(Self {
            _watcher: watcher,
            coordinator,
        })
    }

    pub fn coordinator(&self) -> &CoordinatorHandle {
        &self.coordinator
    }

    /// Stop watching and wait for outstanding rebuilds
    pub async fn stop(self) {
        let Self {
            _watcher: watcher,
            coordinator,
        } = self;
        drop(watcher);
        coordinator.shutdown().await;
    }
}
