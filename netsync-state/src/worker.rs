//! Control loop - owns the `StateStore` on a dedicated thread
//!
//! Transports usually deliver updates from their own threads. The control
//! loop funnels everything through one bounded channel so updates are
//! applied strictly in arrival order, one cycle at a time, and observers
//! are always called from the same thread.

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};

use crate::config::HandlerConfig;
use crate::error::{Result, StateError};
use crate::event::UpdateEvent;
use crate::store::StateStore;

type StoreTask = Box<dyn FnOnce(&mut StateStore) + Send>;

enum Command {
    Update(UpdateEvent),
    Run(StoreTask),
    Shutdown,
}

/// Cloneable handle for feeding updates into a running control loop
#[derive(Clone)]
pub struct UpdateSender {
    tx: SyncSender<Command>,
}

impl UpdateSender {
    /// Queue one update, blocking while the channel is full
    pub fn send(&self, event: UpdateEvent) -> Result<()> {
        self.tx
            .send(Command::Update(event))
            .map_err(|_| StateError::WorkerStopped)
    }

    /// Decode a JSON-encoded `UpdateEvent` and queue it
    pub fn send_json(&self, json: &str) -> Result<()> {
        let event: UpdateEvent = serde_json::from_str(json)?;
        self.send(event)
    }
}

/// Handle to the control thread
pub struct ControlLoop {
    sender: UpdateSender,
    handle: JoinHandle<StateStore>,
}

impl ControlLoop {
    /// Move `store` onto a new control thread
    ///
    /// The store's `init` runs on the control thread before any queued
    /// update is applied.
    pub fn spawn(store: StateStore, config: &HandlerConfig) -> Result<Self> {
        config.validate()?;

        let (tx, rx) = mpsc::sync_channel(config.event_buffer_size);
        let handle = thread::Builder::new()
            .name(config.worker_thread_name.clone())
            .spawn(move || run(store, rx))?;

        tracing::info!(
            "Control loop '{}' started (buffer {})",
            config.worker_thread_name,
            config.event_buffer_size
        );

        Ok(Self {
            sender: UpdateSender { tx },
            handle,
        })
    }

    pub fn sender(&self) -> UpdateSender {
        self.sender.clone()
    }

    pub fn send(&self, event: UpdateEvent) -> Result<()> {
        self.sender.send(event)
    }

    /// Run `f` against the store on the control thread and wait for its result
    ///
    /// Updates queued before this call are applied first.
    pub fn with_store<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut StateStore) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = mpsc::channel();
        let task: StoreTask = Box::new(move |store: &mut StateStore| {
            let _ = reply_tx.send(f(store));
        });

        self.sender
            .tx
            .send(Command::Run(task))
            .map_err(|_| StateError::WorkerStopped)?;
        reply_rx.recv().map_err(|_| StateError::WorkerStopped)
    }

    /// Apply everything already queued, stop the thread and return the store
    pub fn shutdown(self) -> Result<StateStore> {
        // A closed channel means the thread is already gone; join reports why
        let _ = self.sender.tx.send(Command::Shutdown);
        let store = self.handle.join().map_err(|_| StateError::WorkerPanicked)?;
        tracing::info!("Control loop stopped");
        Ok(store)
    }
}

fn run(mut store: StateStore, rx: Receiver<Command>) -> StateStore {
    tracing::debug!("Control loop running");
    store.init();

    for command in rx {
        match command {
            Command::Update(event) => {
                tracing::trace!("Applying update: {:?}", event);
                store.apply_event(event);
            }
            Command::Run(task) => task(&mut store),
            Command::Shutdown => break,
        }
    }

    store
}
