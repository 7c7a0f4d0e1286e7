use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::context::AppConfig;
use crate::countdown::{Clock, CountdownEngine};
use crate::feed::{FeedOutcome, RaceFeed};

use super::list_state::{ExpiryOutcome, RaceListState};
use super::race::Race;

const COMMAND_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("race service has stopped")]
    Stopped,
}

#[derive(Debug)]
enum RaceCommand {
    Refresh,
    ToggleFilter(String),
    ClearFilters,
    ShowFilters(bool),
    RaceExpired(String),
    // Sent back by the fetch task
    FetchStarted,
    FetchCompleted(FeedOutcome),
}

/// Single owner of the race list state.
///
/// Every mutation arrives through the command channel and is applied on the
/// service task, one at a time; each change is published to `watch`
/// subscribers. Feed requests run on their own task and report back through
/// the same channel.
pub struct RaceService<F: RaceFeed> {
    feed: Arc<F>,
    retrieval_count: usize,
    state: RaceListState,
    state_tx: watch::Sender<RaceListState>,
    // Weak so the service stops once every handle is dropped
    cmd_tx: mpsc::WeakSender<RaceCommand>,
    cmd_rx: mpsc::Receiver<RaceCommand>,
    fetching: bool,
    fetch_task: Option<JoinHandle<()>>,
}

impl<F: RaceFeed> RaceService<F> {
    /// Start the service and its initial fetch. Must be called within a
    /// tokio runtime.
    pub fn spawn(feed: F, config: &AppConfig) -> RaceServiceHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let state = RaceListState::with_display_count(config.race_display_count);
        let (state_tx, state_rx) = watch::channel(state.clone());

        let service = Self {
            feed: Arc::new(feed),
            retrieval_count: config.race_retrieval_count,
            state,
            state_tx,
            cmd_tx: cmd_tx.downgrade(),
            cmd_rx,
            fetching: false,
            fetch_task: None,
        };
        tokio::spawn(service.run());

        RaceServiceHandle { cmd_tx, state_rx }
    }

    async fn run(mut self) {
        self.start_fetch();
        while let Some(command) = self.cmd_rx.recv().await {
            self.handle_command(command);
        }
        if let Some(task) = self.fetch_task.take() {
            task.abort();
        }
        tracing::debug!("Race service stopped");
    }

    fn handle_command(&mut self, command: RaceCommand) {
        match command {
            RaceCommand::Refresh => self.start_fetch(),
            RaceCommand::ToggleFilter(category_id) => {
                self.state.toggle_filter(&category_id);
                self.publish();
            }
            RaceCommand::ClearFilters => {
                self.state.clear_filters();
                self.publish();
            }
            RaceCommand::ShowFilters(show) => {
                self.state.set_show_filters(show);
                self.publish();
            }
            RaceCommand::RaceExpired(race_id) => match self.state.on_race_expired(&race_id) {
                ExpiryOutcome::Ignored => {}
                ExpiryOutcome::Removed => self.publish(),
                ExpiryOutcome::RefillNeeded => {
                    self.publish();
                    self.start_fetch();
                }
            },
            RaceCommand::FetchStarted => {
                self.state.load(FeedOutcome::Loading);
                self.publish();
            }
            RaceCommand::FetchCompleted(outcome) => {
                self.fetching = false;
                self.fetch_task = None;
                self.state.load(outcome);
                self.publish();
            }
        }
    }

    /// Kick off a feed request unless one is already running.
    fn start_fetch(&mut self) {
        if self.fetching {
            tracing::debug!("Fetch already in flight, coalescing refresh");
            return;
        }
        let Some(tx) = self.cmd_tx.upgrade() else {
            return;
        };

        self.fetching = true;
        let feed = Arc::clone(&self.feed);
        let count = self.retrieval_count;
        self.fetch_task = Some(tokio::spawn(async move {
            if tx.send(RaceCommand::FetchStarted).await.is_err() {
                return;
            }
            let outcome = feed.fetch_next_races(count).await;
            let _ = tx.send(RaceCommand::FetchCompleted(outcome)).await;
        }));
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}

/// Cloneable handle for renderers: sends intents, reads state snapshots.
#[derive(Clone)]
pub struct RaceServiceHandle {
    cmd_tx: mpsc::Sender<RaceCommand>,
    state_rx: watch::Receiver<RaceListState>,
}

impl RaceServiceHandle {
    /// Fetch the race list again (manual retry after an error).
    pub async fn refresh(&self) -> Result<(), ServiceError> {
        self.send(RaceCommand::Refresh).await
    }

    pub async fn toggle_filter(&self, category_id: impl Into<String>) -> Result<(), ServiceError> {
        self.send(RaceCommand::ToggleFilter(category_id.into())).await
    }

    pub async fn clear_filters(&self) -> Result<(), ServiceError> {
        self.send(RaceCommand::ClearFilters).await
    }

    pub async fn show_filters(&self, show: bool) -> Result<(), ServiceError> {
        self.send(RaceCommand::ShowFilters(show)).await
    }

    pub async fn race_expired(&self, race_id: impl Into<String>) -> Result<(), ServiceError> {
        self.send(RaceCommand::RaceExpired(race_id.into())).await
    }

    pub fn subscribe(&self) -> watch::Receiver<RaceListState> {
        self.state_rx.clone()
    }

    pub fn snapshot(&self) -> RaceListState {
        self.state_rx.borrow().clone()
    }

    /// Expiry callback for a [`CountdownEngine`] that reports `race_id` back
    /// to this service.
    pub fn expiry_callback(&self, race_id: impl Into<String>) -> impl FnOnce() + Send + 'static {
        let handle = self.clone();
        let race_id = race_id.into();
        move || {
            tokio::spawn(async move {
                if let Err(e) = handle.race_expired(race_id.as_str()).await {
                    tracing::warn!(race_id = %race_id, error = %e, "Could not report expired race");
                }
            });
        }
    }

    /// Disarmed countdown for `race`, wired to report its expiry here.
    pub fn countdown_for(&self, race: &Race, clock: Arc<dyn Clock>) -> CountdownEngine {
        CountdownEngine::new(
            race.advertised_start,
            clock,
            self.expiry_callback(race.race_id.as_str()),
        )
    }

    async fn send(&self, command: RaceCommand) -> Result<(), ServiceError> {
        self.cmd_tx
            .send(command)
            .await
            .map_err(|_| ServiceError::Stopped)
    }
}
