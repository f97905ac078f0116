//! Observable state container for the composer.
//!
//! Every committed mutation bumps the revision and pushes a snapshot to each
//! subscriber before the call returns. Snapshots are published while the
//! state lock is held, so subscribers see them in commit order.

use std::convert::Infallible;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::types::{ComposerSnapshot, ComposerState};

#[derive(Debug, Default)]
struct Committed {
    state: ComposerState,
    revision: u64,
}

#[derive(Debug, Default)]
pub struct ComposerStore {
    inner: Mutex<Committed>,
    subscribers: Mutex<Vec<Sender<ComposerSnapshot>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Recover from poisoning; reads must keep working after a panicked writer.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ComposerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ComposerSnapshot {
        let committed = lock(&self.inner);
        committed.state.snapshot(committed.revision)
    }

    /// Read without committing anything.
    pub fn read<R>(&self, f: impl FnOnce(&ComposerState) -> R) -> R {
        f(&lock(&self.inner).state)
    }

    /// Run `f` against the state and commit if it returns `Ok`.
    ///
    /// `f` must leave the state untouched when it returns `Err`; nothing is
    /// published in that case.
    pub fn try_update<R, E>(
        &self,
        f: impl FnOnce(&mut ComposerState) -> Result<R, E>,
    ) -> Result<R, E> {
        let mut committed = lock(&self.inner);
        let out = f(&mut committed.state)?;
        committed.revision += 1;

        let snapshot = committed.state.snapshot(committed.revision);
        let mut subs = lock(&self.subscribers);
        // Drop any dead subscribers while publishing.
        subs.retain(|tx| tx.send(snapshot.clone()).is_ok());

        Ok(out)
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ComposerState) -> R) -> R {
        match self.try_update(|state| Ok::<R, Infallible>(f(state))) {
            Ok(out) => out,
            Err(never) => match never {},
        }
    }

    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        lock(&self.subscribers).push(tx);
        Subscription::new(rx)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }
}

/// Receives a snapshot per committed mutation.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<ComposerSnapshot>,
}

impl Subscription {
    fn new(receiver: Receiver<ComposerSnapshot>) -> Self {
        Self { receiver }
    }

    /// Next snapshot, if one is already queued.
    pub fn try_recv(&self) -> Option<ComposerSnapshot> {
        self.receiver.try_recv().ok()
    }

    /// Block for up to `timeout` waiting for a snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<ComposerSnapshot, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// All queued snapshots, oldest first.
    pub fn drain(&self) -> Vec<ComposerSnapshot> {
        self.receiver.try_iter().collect()
    }

    /// Most recent queued snapshot, discarding older ones.
    pub fn latest(&self) -> Option<ComposerSnapshot> {
        self.receiver.try_iter().last()
    }
}
