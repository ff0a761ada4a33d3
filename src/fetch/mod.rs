//! Background effect execution (impure shell).
//!
//! Each [`Effect`] runs on its own thread against the shared record store
//! and reports an [`Outcome`] over a channel. Outcomes may arrive in any
//! order; request sequence numbers in the state layer make late arrivals
//! harmless.

use crate::state::{Effect, Mutation, Outcome, TagUniverse};
use crate::store::{RecordStore, fetch_detail, fetch_page};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tracing::{debug, warn};

/// Execute one effect synchronously.
pub fn execute(store: &dyn RecordStore, effect: Effect) -> Outcome {
    match effect {
        Effect::LoadPage(request) => Outcome::Page {
            seq: request.seq,
            result: fetch_page(store, &request.query),
        },
        Effect::LoadTags { seq } => Outcome::Tags {
            seq,
            result: TagUniverse::load(store),
        },
        Effect::LoadDetail { seq, id } => Outcome::Detail {
            seq,
            result: fetch_detail(store, &id),
            id,
        },
        Effect::Mutate(mutation) => {
            let result = apply_mutation(store, mutation.clone());
            if let Err(err) = &result {
                warn!(error = %err, "Store rejected write");
            }
            Outcome::Mutated { mutation, result }
        }
    }
}

fn apply_mutation(
    store: &dyn RecordStore,
    mutation: Mutation,
) -> Result<(), crate::model::StoreError> {
    match mutation {
        Mutation::InsertQuestion(record) => store.insert_question(record).map(drop),
        Mutation::UpdateQuestion { id, patch } => store.update_question(&id, patch).map(drop),
        Mutation::InsertAnswer(record) => store.insert_answers(vec![record]).map(drop),
        Mutation::UpdateAnswer { id, patch } => store.update_answer(&id, patch).map(drop),
        Mutation::DeleteAnswer(id) => store.delete_answer(&id).map(drop),
    }
}

/// Runs effects on worker threads and collects their outcomes.
pub struct FetchWorker {
    store: Arc<dyn RecordStore>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl FetchWorker {
    /// Worker over `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { store, tx, rx }
    }

    /// Start `effect` in the background.
    pub fn spawn(&self, effect: Effect) {
        let store = Arc::clone(&self.store);
        let tx = self.tx.clone();
        debug!(?effect, "Spawning effect");
        thread::spawn(move || {
            let outcome = execute(store.as_ref(), effect);
            // The receiver only goes away on shutdown.
            let _ = tx.send(outcome);
        });
    }

    /// Start every effect in order.
    pub fn spawn_all(&self, effects: impl IntoIterator<Item = Effect>) {
        for effect in effects {
            self.spawn(effect);
        }
    }

    /// Outcomes that have arrived so far, without blocking.
    pub fn drain(&self) -> Vec<Outcome> {
        self.rx.try_iter().collect()
    }

    /// Block for the next outcome, up to `timeout`.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<Outcome> {
        self.rx.recv_timeout(timeout).ok()
    }
}
