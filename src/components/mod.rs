pub mod common;
pub mod dashboard_page;
#[cfg(any(target_arch = "wasm32", test))]
pub mod local_storage;
pub mod nav_bar;
pub mod network_page;
pub mod provider_page;
pub mod upload_page;

use dioxus::prelude::*;
use crate::backend::store::Snapshot;
use crate::backend::types::{StorageFile, StorageStats, Transaction};
use crate::backend::{AppEvent, Notification, NotificationLevel};

const TOAST_MILLIS: u64 = 5000;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadStatus {
    pub name: String,
    pub size: u64,
    pub progress: u8,
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub files: Signal<Vec<StorageFile>>,
    pub stats: Signal<StorageStats>,
    pub transactions: Signal<Vec<Transaction>>,
    pub upload: Signal<Option<UploadStatus>>,
    /// Retrieval code of the most recent committed upload
    pub last_code: Signal<Option<String>>,
    pub toasts: Signal<Vec<Toast>>,
    pub next_toast_id: Signal<u64>,
}

impl AppState {
    pub fn new(default_stats: StorageStats) -> Self {
        Self {
            files: use_signal(|| vec![]),
            stats: use_signal(|| default_stats),
            transactions: use_signal(|| vec![]),
            upload: use_signal(|| None),
            last_code: use_signal(|| None),
            toasts: use_signal(|| vec![]),
            next_toast_id: use_signal(|| 0),
        }
    }

    fn load(&mut self, snapshot: Snapshot) {
        self.files.set(snapshot.files);
        self.stats.set(snapshot.stats);
        self.transactions.set(snapshot.transactions);
    }

    pub fn push_toast(&mut self, notification: Notification) {
        let id = *self.next_toast_id.peek();
        self.next_toast_id.set(id + 1);
        self.toasts.write().push(Toast { id, notification });

        let mut toasts = self.toasts;
        spawn(async move {
            crate::backend::upload::sleep(std::time::Duration::from_millis(TOAST_MILLIS)).await;
            toasts.write().retain(|t| t.id != id);
        });
    }

    pub fn dismiss_toast(&mut self, id: u64) {
        self.toasts.write().retain(|t| t.id != id);
    }

    /// Mirrors one backend event into the UI signals.
    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::StateLoaded(snapshot) => {
                #[cfg(target_arch = "wasm32")]
                local_storage::persist(&snapshot);
                self.load(snapshot);
            }
            AppEvent::UploadStarted { name, size } => {
                self.upload.set(Some(UploadStatus { name, size, progress: 0 }));
            }
            AppEvent::UploadProgress(progress) => {
                if let Some(status) = self.upload.write().as_mut() {
                    status.progress = progress;
                }
            }
            AppEvent::UploadCommitted { retrieval_code } => {
                self.upload.set(None);
                self.last_code.set(Some(retrieval_code));
            }
            AppEvent::UploadCancelled | AppEvent::UploadFailed => {
                self.upload.set(None);
            }
            AppEvent::Notify(notification) => {
                if notification.level == NotificationLevel::Error {
                    tracing::warn!("{}: {}", notification.title, notification.description);
                }
                self.push_toast(notification);
            }
        }
    }
}
