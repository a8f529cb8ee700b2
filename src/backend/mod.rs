pub mod config;
pub mod error;
pub mod ids;
pub mod network;
pub mod provider;
pub mod store;
pub mod summary;
pub mod types;
pub mod upload;

use config::AppConfig;
use error::StorageError;
use ids::{IdSource, RandomIds};
use store::{Snapshot, StateStore};
use tokio::sync::mpsc;
use upload::{CancelToken, ProgressSequence, UploadPlan};

#[derive(Debug)]
pub enum AppCmd {
    Init,
    FetchState,
    Upload { name: String, size: u64 },
    ActivateProvider { gb: u64 },
    DeactivateProvider,
    UpdateAllocation { gb: u64 },
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    StateLoaded(Snapshot),
    UploadStarted { name: String, size: u64 },
    UploadProgress(u8),
    UploadCommitted { retrieval_code: String },
    UploadCancelled,
    /// The upload ran to completion but could not be committed.
    UploadFailed,
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, title: title.into(), description: description.into() }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, title: title.into(), description: description.into() }
    }
}

impl From<&StorageError> for Notification {
    fn from(err: &StorageError) -> Self {
        match err {
            StorageError::NoAllocation => {
                Notification::error("No storage allocated", "Please allocate storage space in the Provider tab first.")
            }
            StorageError::InsufficientAllocation { .. } => {
                Notification::error("Insufficient storage", "You need to allocate more storage space.")
            }
            StorageError::HasStoredData => {
                Notification::error("Cannot deactivate", "You have files stored. Remove them first.")
            }
            StorageError::AllocationBelowUsage { .. } => Notification::error(
                "Cannot reduce allocation",
                "New allocation must be larger than currently used storage.",
            ),
            StorageError::UploadInProgress => {
                Notification::error("Upload in progress", "Wait for the current upload to finish.")
            }
            other => Notification::error("Request failed", other.to_string()),
        }
    }
}

/// Owns the persisted state and applies commands one at a time. Uploads tick
/// on their own task and come back through `finished_rx` to be committed.
pub struct Backend {
    state: StateStore,
    config: AppConfig,
    ids: Box<dyn IdSource>,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    finished_tx: mpsc::UnboundedSender<UploadPlan>,
    finished_rx: mpsc::UnboundedReceiver<UploadPlan>,
    in_flight: Option<CancelToken>,
}

impl Backend {
    pub fn new(
        state: StateStore,
        config: AppConfig,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self::with_ids(state, config, Box::new(RandomIds::new()), cmd_rx, event_tx)
    }

    pub fn with_ids(
        state: StateStore,
        config: AppConfig,
        ids: Box<dyn IdSource>,
        cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        Self {
            state,
            config,
            ids,
            cmd_rx,
            event_tx,
            finished_tx,
            finished_rx,
            in_flight: None,
        }
    }

    pub async fn run(&mut self) {
        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => break,
                    }
                }
                Some(plan) = self.finished_rx.recv() => {
                    self.finish_upload(plan);
                }
            }
        }

        if let Some(cancel) = self.in_flight.take() {
            tracing::info!("Command channel closed, cancelling upload in flight");
            cancel.cancel();
        }
        tracing::debug!("Backend stopped");
    }

    fn emit(&self, event: AppEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("Event receiver dropped");
        }
    }

    fn reject(&self, err: StorageError) {
        match &err {
            StorageError::Store(_) | StorageError::Serialization(_) => {
                tracing::error!("Store failure: {}", err);
            }
            _ => tracing::warn!("Rejected: {}", err),
        }
        self.emit(AppEvent::Notify(Notification::from(&err)));
    }

    fn publish_state(&self) {
        match self.state.snapshot() {
            Ok(snapshot) => self.emit(AppEvent::StateLoaded(snapshot)),
            Err(e) => self.reject(e),
        }
    }

    fn handle_command(&mut self, cmd: AppCmd) {
        tracing::debug!("Handling {:?}", cmd);
        let result = match cmd {
            AppCmd::Init => {
                tracing::info!("Backend initialized");
                self.publish_state();
                Ok(())
            }
            AppCmd::FetchState => {
                self.publish_state();
                Ok(())
            }
            AppCmd::Upload { name, size } => self.start_upload(name, size),
            AppCmd::ActivateProvider { gb } => self.activate_provider(gb),
            AppCmd::DeactivateProvider => self.deactivate_provider(),
            AppCmd::UpdateAllocation { gb } => self.update_allocation(gb),
        };

        if let Err(e) = result {
            self.reject(e);
        }
    }

    fn start_upload(&mut self, name: String, size: u64) -> error::Result<()> {
        let stats = self.state.stats()?;
        let plan = upload::plan_upload(&stats, &name, size, &self.config)?;
        if self.in_flight.is_some() {
            return Err(StorageError::UploadInProgress);
        }

        tracing::info!("Uploading {} ({} bytes, {} shards)", plan.name, plan.size, plan.shards);
        let cancel = CancelToken::new();
        self.in_flight = Some(cancel.clone());
        self.emit(AppEvent::UploadStarted { name, size });

        let mut sequence = ProgressSequence::from_config(&self.config, cancel);
        let event_tx = self.event_tx.clone();
        let finished_tx = self.finished_tx.clone();
        spawn_task(async move {
            while let Some(percent) = sequence.next_tick().await {
                let _ = event_tx.send(AppEvent::UploadProgress(percent));
            }
            if sequence.finished() {
                let _ = finished_tx.send(plan);
            } else {
                let _ = event_tx.send(AppEvent::UploadCancelled);
            }
        });
        Ok(())
    }

    fn finish_upload(&mut self, plan: UploadPlan) {
        self.in_flight = None;
        let result = self.state.stats().and_then(|stats| {
            let done = upload::complete_upload(&plan, &stats, self.ids.as_mut());
            let code = done.file.retrieval_code.clone();
            self.state.commit_upload(done.file, &done.stats, done.transaction)?;
            Ok(code)
        });

        match result {
            Ok(code) => {
                tracing::info!("Upload of {} committed with code {}", plan.name, code);
                self.emit(AppEvent::UploadCommitted { retrieval_code: code.clone() });
                self.emit(AppEvent::Notify(Notification::success(
                    "File uploaded successfully!",
                    format!(
                        "Your file has been distributed across {} shards. Retrieval code: {}",
                        plan.shards, code
                    ),
                )));
                self.publish_state();
            }
            Err(e) => {
                tracing::error!("Upload of {} could not be committed", plan.name);
                self.emit(AppEvent::UploadFailed);
                self.reject(e);
            }
        }
    }

    fn activate_provider(&mut self, gb: u64) -> error::Result<()> {
        let stats = self.state.stats()?;
        let (next, tx) = provider::activate(&stats, gb, &self.config, self.ids.as_mut())?;
        self.state.commit_stats_with_transaction(&next, tx)?;

        tracing::info!("Provider activated with {} GB", gb);
        self.emit(AppEvent::Notify(Notification::success(
            "Storage provider activated!",
            format!("You're now providing {} GB to the network. Start earning points!", gb),
        )));
        self.publish_state();
        Ok(())
    }

    fn deactivate_provider(&mut self) -> error::Result<()> {
        self.state.update_stats(|stats| provider::deactivate(&stats))?;

        tracing::info!("Provider deactivated");
        self.emit(AppEvent::Notify(Notification::success(
            "Storage provider deactivated",
            "You are no longer providing storage to the network.",
        )));
        self.publish_state();
        Ok(())
    }

    fn update_allocation(&mut self, gb: u64) -> error::Result<()> {
        let config = &self.config;
        self.state.update_stats(|stats| provider::update_allocation(&stats, gb, config))?;

        tracing::info!("Allocation set to {} GB", gb);
        self.emit(AppEvent::Notify(Notification::success(
            "Allocation updated!",
            format!("Storage allocation set to {} GB.", gb),
        )));
        self.publish_state();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn_task<F>(future: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tokio::spawn(future);
}

#[cfg(target_arch = "wasm32")]
fn spawn_task<F>(future: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}

pub async fn init(
    state: StateStore,
    config: AppConfig,
    cmd_rx: mpsc::UnboundedReceiver<AppCmd>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) {
    let mut backend = Backend::new(state, config, cmd_rx, event_tx);
    backend.run().await
}
