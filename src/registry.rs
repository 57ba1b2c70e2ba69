//! Registry holding the current value of every declared gauge.
//!
//! Slots are declared once at startup and live for the whole process. A slot is
//! only overwritten when its report parses successfully, so a failed report
//! leaves the last known values in place.

use ahash::AHashMap as HashMap;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::RwLock;

use crate::error::CatalogError;
use crate::parser::Field;

/// Current state of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricValue {
    pub name: String,
    pub help: String,
    pub value: f64,
    /// Time of the sample that last updated this slot. `None` until the first
    /// successful update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Slots {
    values: Vec<MetricValue>,
    index: HashMap<String, usize>,
}

/// Thread-safe store of gauge values, in declaration order.
#[derive(Default)]
pub struct MetricRegistry {
    inner: RwLock<Slots>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    /// Registers a metric slot with value `0.0`.
    ///
    /// Declaring the same name with the same help text again is a no-op.
    pub fn declare(&self, name: &str, help: &str) -> Result<(), CatalogError> {
        let mut slots = self.write();
        if let Some(&idx) = slots.index.get(name) {
            if slots.values[idx].help == help {
                return Ok(());
            }
            return Err(CatalogError::DuplicateMetric(name.to_string()));
        }

        let idx = slots.values.len();
        slots.values.push(MetricValue {
            name: name.to_string(),
            help: help.to_string(),
            value: 0.0,
            updated_at: None,
        });
        slots.index.insert(name.to_string(), idx);
        Ok(())
    }

    /// Overwrites the value and timestamp of a declared metric.
    pub fn update(&self, name: &str, value: f64, at: DateTime<Utc>) -> Result<(), CatalogError> {
        let mut slots = self.write();
        let idx = *slots
            .index
            .get(name)
            .ok_or_else(|| CatalogError::UnknownMetric(name.to_string()))?;
        let slot = &mut slots.values[idx];
        slot.value = value;
        slot.updated_at = Some(at);
        Ok(())
    }

    /// Applies all fields of one report or none of them.
    pub fn update_all(&self, fields: &[Field], at: DateTime<Utc>) -> Result<(), CatalogError> {
        let mut slots = self.write();
        let mut targets = Vec::with_capacity(fields.len());
        for field in fields {
            let idx = *slots
                .index
                .get(field.metric)
                .ok_or_else(|| CatalogError::UnknownMetric(field.metric.to_string()))?;
            targets.push((idx, field.value));
        }
        for (idx, value) in targets {
            let slot = &mut slots.values[idx];
            slot.value = value;
            slot.updated_at = Some(at);
        }
        Ok(())
    }

    /// Copy of all slots, in declaration order.
    pub fn snapshot(&self) -> Vec<MetricValue> {
        self.read().values.clone()
    }

    pub fn len(&self) -> usize {
        self.read().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A poisoned lock only means a writer panicked between two plain
    // assignments; the slots themselves are still well-formed.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, Slots> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Slots> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}
