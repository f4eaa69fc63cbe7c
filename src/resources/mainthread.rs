//! Queue of closures to run on the thread that owns the [`World`].
//!
//! Worker threads cannot touch the world directly. They clone a
//! [`MainThreadSender`] from the [`MainThreadQueue`] resource and post
//! closures; the engine drains the queue at the start of every tick, before
//! any timer runs.

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Work posted from another thread.
pub type DeferredCall = Box<dyn FnOnce(&mut World) + Send>;

#[derive(Resource)]
pub struct MainThreadQueue {
    tx: Sender<DeferredCall>,
    rx: Receiver<DeferredCall>,
}

impl Default for MainThreadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl MainThreadQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded::<DeferredCall>();
        Self { tx, rx }
    }

    /// A handle that can be moved to other threads.
    pub fn sender(&self) -> MainThreadSender {
        MainThreadSender(self.tx.clone())
    }

    /// Calls waiting for the next drain.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Take everything posted so far.
    pub(crate) fn drain(&self) -> Vec<DeferredCall> {
        self.rx.try_iter().collect()
    }
}

#[derive(Clone)]
pub struct MainThreadSender(Sender<DeferredCall>);

impl MainThreadSender {
    /// Post `call`. Returns `false` if the queue has been dropped.
    pub fn send(&self, call: impl FnOnce(&mut World) + Send + 'static) -> bool {
        self.0.send(Box::new(call)).is_ok()
    }
}
