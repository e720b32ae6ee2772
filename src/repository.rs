// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! In-memory Alert store.
//!
//! Stands in for the relational persistence layer. Every successful
//! mutation fires the registered `ChangeHooks` with the post-mutation
//! snapshot, after the store lock has been released.

use crate::alert::Alert;
use crate::error::{ChangeLogError, Result};
use crate::hooks::ChangeHooks;
use crate::record::Operation;
use chrono::{Local, NaiveDateTime, SubsecRound};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct AlertRepository {
    alerts: RwLock<BTreeMap<i64, Alert>>,
    next_id: AtomicI64,
    hooks: ChangeHooks,
}

impl AlertRepository {
    pub fn new(hooks: ChangeHooks) -> Self {
        Self {
            alerts: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            hooks,
        }
    }

    pub fn hooks(&self) -> &ChangeHooks {
        &self.hooks
    }

    /// Assign identity, timestamps and version 0, store, then fire CREATE.
    pub fn insert(&self, mut alert: Alert) -> Result<Alert> {
        check_confidence(alert.confidence)?;
        let now = now();
        let saved = {
            let mut alerts = self.write();
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            alert.id = Some(id);
            alert.created_date = Some(now);
            alert.last_modified_date = Some(now);
            alert.version = Some(0);
            if alert.time_detected.is_none() {
                alert.time_detected = Some(now);
            }
            alerts.insert(id, alert.clone());
            alert
        };
        self.hooks.fire(Operation::Create, &saved);
        Ok(saved)
    }

    /// Apply `change` to the stored alert, bump its version, then fire
    /// UPDATE. Identity and creation time cannot be changed. A change that
    /// leaves the confidence non-finite is rejected and nothing is stored.
    pub fn update<F>(&self, id: i64, change: F) -> Result<Alert>
    where
        F: FnOnce(&mut Alert),
    {
        let saved = {
            let mut alerts = self.write();
            let current = alerts.get_mut(&id).ok_or(ChangeLogError::AlertNotFound(id))?;
            let mut next = current.clone();
            change(&mut next);
            check_confidence(next.confidence)?;
            next.id = Some(id);
            next.created_date = current.created_date;
            next.last_modified_date = Some(now());
            next.version = Some(current.version.unwrap_or(0) + 1);
            *current = next.clone();
            next
        };
        self.hooks.fire(Operation::Update, &saved);
        Ok(saved)
    }

    /// Remove the alert, then fire DELETE with its last known state.
    pub fn delete(&self, id: i64) -> Result<Alert> {
        let removed = self
            .write()
            .remove(&id)
            .ok_or(ChangeLogError::AlertNotFound(id))?;
        self.hooks.fire(Operation::Delete, &removed);
        Ok(removed)
    }

    /// Remove every alert matching `pred`, firing DELETE for each.
    /// Returns the removed alerts in id order.
    pub fn delete_where<P>(&self, pred: P) -> Vec<Alert>
    where
        P: Fn(&Alert) -> bool,
    {
        let removed: Vec<Alert> = {
            let mut alerts = self.write();
            let ids: Vec<i64> = alerts
                .iter()
                .filter(|(_, a)| pred(a))
                .map(|(id, _)| *id)
                .collect();
            ids.iter().filter_map(|id| alerts.remove(id)).collect()
        };
        for alert in &removed {
            self.hooks.fire(Operation::Delete, alert);
        }
        removed
    }

    pub fn get(&self, id: i64) -> Option<Alert> {
        self.read().get(&id).cloned()
    }

    pub fn exists(&self, id: i64) -> bool {
        self.read().contains_key(&id)
    }

    pub fn list(&self) -> Vec<Alert> {
        self.read().values().cloned().collect()
    }

    pub fn list_by_spam(&self, is_spam: bool) -> Vec<Alert> {
        self.read()
            .values()
            .filter(|a| a.is_spam == is_spam)
            .cloned()
            .collect()
    }

    /// Alerts with confidence strictly above `threshold`.
    pub fn list_above_confidence(&self, threshold: f64) -> Vec<Alert> {
        self.read()
            .values()
            .filter(|a| a.confidence > threshold)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.read().len()
    }

    pub fn count_spam(&self) -> usize {
        self.read().values().filter(|a| a.is_spam).count()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<i64, Alert>> {
        self.alerts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<i64, Alert>> {
        self.alerts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AlertRepository {
    fn default() -> Self {
        Self::new(ChangeHooks::new())
    }
}

// NaN and infinities have no JSON form and would not survive the change log.
fn check_confidence(confidence: f64) -> Result<()> {
    if confidence.is_finite() {
        Ok(())
    } else {
        Err(ChangeLogError::InvalidParameter(format!(
            "confidence must be finite, got {}",
            confidence
        )))
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(3)
}
