// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Change Event Source
//!
//! The alert store calls `ChangeHooks::fire` synchronously after each
//! successful insert, update and delete. Observers run outside the store's
//! failure domain: whatever an observer does, the mutation stands.

use crate::alert::Alert;
use crate::record::Operation;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Receives post-mutation snapshots of alerts.
pub trait ChangeObserver: Send + Sync {
    fn on_change(&self, operation: Operation, alert: &Alert);
}

impl<F> ChangeObserver for F
where
    F: Fn(Operation, &Alert) + Send + Sync,
{
    fn on_change(&self, operation: Operation, alert: &Alert) {
        self(operation, alert)
    }
}

/// Ordered set of observers notified of every alert mutation.
#[derive(Clone, Default)]
pub struct ChangeHooks {
    observers: Vec<Arc<dyn ChangeObserver>>,
}

impl ChangeHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn ChangeObserver>) {
        self.observers.push(observer);
    }

    pub fn with(mut self, observer: Arc<dyn ChangeObserver>) -> Self {
        self.register(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify every observer once, in registration order. No retries.
    pub fn fire(&self, operation: Operation, alert: &Alert) {
        for observer in &self.observers {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                observer.on_change(operation, alert)
            }));
            if outcome.is_err() {
                tracing::error!(
                    "Change observer panicked on {} for alert {:?}",
                    operation,
                    alert.id
                );
            }
        }
    }
}

impl std::fmt::Debug for ChangeHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeHooks")
            .field("observers", &self.observers.len())
            .finish()
    }
}
