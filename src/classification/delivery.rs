//! Single-resolution delivery of a classification outcome.
//!
//! Both halves are consumed on use: a [`Delivery`] can send once and a
//! [`PendingClassification`] can be resolved once. A callback registered
//! through [`CallbackSlot`] runs at most once and never after a cancel.

use crate::classification::error::ClassificationError;
use crate::classification::result::ClassificationResult;
use std::sync::mpsc::{self, Receiver, SyncSender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

pub type ClassificationOutcome = Result<ClassificationResult, ClassificationError>;

fn worker_lost() -> ClassificationError {
    ClassificationError::InferenceFailed("classification worker stopped without a result".to_string())
}

pub fn one_shot() -> (Delivery, PendingClassification) {
    let (sender, receiver) = mpsc::sync_channel(1);
    (Delivery { sender }, PendingClassification { receiver })
}

pub struct Delivery {
    sender: SyncSender<ClassificationOutcome>,
}

impl Delivery {
    pub fn deliver(self, outcome: ClassificationOutcome) {
        // the receiver may already be gone; nobody is left to tell
        let _ = self.sender.send(outcome);
    }
}

pub enum DeliveryPoll {
    Ready(ClassificationOutcome),
    Pending(PendingClassification),
}

pub struct PendingClassification {
    receiver: Receiver<ClassificationOutcome>,
}

impl PendingClassification {
    /// Blocks until the outcome arrives.
    pub fn wait(self) -> ClassificationOutcome {
        self.receiver.recv().unwrap_or_else(|_| Err(worker_lost()))
    }

    pub fn poll(self) -> DeliveryPoll {
        match self.receiver.try_recv() {
            Ok(outcome) => DeliveryPoll::Ready(outcome),
            Err(TryRecvError::Empty) => DeliveryPoll::Pending(self),
            Err(TryRecvError::Disconnected) => DeliveryPoll::Ready(Err(worker_lost())),
        }
    }
}

type Callback = Box<dyn FnOnce(ClassificationOutcome) + Send>;

enum SlotState {
    Pending(Callback),
    Delivered,
    Cancelled,
}

pub struct CallbackSlot {
    state: Mutex<SlotState>,
}

impl CallbackSlot {
    pub fn new(callback: impl FnOnce(ClassificationOutcome) + Send + 'static) -> Self {
        Self {
            state: Mutex::new(SlotState::Pending(Box::new(callback))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Invokes the callback unless it already ran or was cancelled.
    pub fn complete(&self, outcome: ClassificationOutcome) {
        let callback = {
            let mut state = self.lock();
            match std::mem::replace(&mut *state, SlotState::Delivered) {
                SlotState::Pending(callback) => Some(callback),
                previous => {
                    *state = previous;
                    None
                }
            }
        };

        if let Some(callback) = callback {
            callback(outcome);
        }
    }

    /// Returns true when the callback had not started yet and never will.
    pub fn cancel(&self) -> bool {
        let mut state = self.lock();
        match *state {
            SlotState::Pending(_) => {
                *state = SlotState::Cancelled;
                true
            }
            SlotState::Delivered | SlotState::Cancelled => false,
        }
    }
}

pub struct CancelHandle {
    slot: Arc<CallbackSlot>,
    worker: Option<JoinHandle<()>>,
}

impl CancelHandle {
    pub fn new(slot: Arc<CallbackSlot>, worker: Option<JoinHandle<()>>) -> Self {
        Self { slot, worker }
    }

    pub fn cancel(&self) -> bool {
        self.slot.cancel()
    }

    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, |worker| worker.is_finished())
    }

    /// Waits for the worker thread, and with it any callback it runs.
    pub fn join(mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
