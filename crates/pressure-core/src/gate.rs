use crate::catalog::{Crisis, CrisisCatalog};
use crate::timeline::NewsItem;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// CooldownBounds
// ---------------------------------------------------------------------------

/// Inclusive range an instructor may set the cooldown to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownBounds {
    pub min: u32,
    pub max: u32,
}

impl CooldownBounds {
    /// Inverted bounds are read as the range between the two values.
    pub fn clamp(&self, seconds: i64) -> u32 {
        let lo = self.min.min(self.max);
        let hi = self.min.max(self.max);
        let clamped = seconds.clamp(i64::from(lo), i64::from(hi));
        u32::try_from(clamped).unwrap_or(hi)
    }
}

impl Default for CooldownBounds {
    fn default() -> Self {
        Self { min: 10, max: 600 }
    }
}

// ---------------------------------------------------------------------------
// CrisisGate
// ---------------------------------------------------------------------------

/// Rate limiter deciding whether a served headline may set off its crisis.
///
/// A crisis id fires at most once for the lifetime of the gate, and never
/// sooner than `cooldown_seconds` after the previous automatic fire.
#[derive(Debug, Clone)]
pub struct CrisisGate {
    last_fired_at: Option<DateTime<Utc>>,
    cooldown_seconds: u32,
    bounds: CooldownBounds,
    fired: BTreeSet<String>,
}

impl CrisisGate {
    pub fn new(cooldown_seconds: u32, bounds: CooldownBounds) -> Self {
        Self {
            last_fired_at: None,
            cooldown_seconds: bounds.clamp(i64::from(cooldown_seconds)),
            bounds,
            fired: BTreeSet::new(),
        }
    }

    pub fn cooldown_seconds(&self) -> u32 {
        self.cooldown_seconds
    }

    pub fn bounds(&self) -> CooldownBounds {
        self.bounds
    }

    pub fn last_fired_at(&self) -> Option<DateTime<Utc>> {
        self.last_fired_at
    }

    pub fn fired_ids(&self) -> impl Iterator<Item = &str> {
        self.fired.iter().map(String::as_str)
    }

    pub fn has_fired(&self, crisis_id: &str) -> bool {
        self.fired.contains(crisis_id)
    }

    /// `true` when no automatic fire happened within the cooldown window.
    /// A gate that never fired is always cool.
    pub fn is_cool(&self, now: DateTime<Utc>) -> bool {
        match self.last_fired_at {
            None => true,
            Some(last) => now - last >= Duration::seconds(i64::from(self.cooldown_seconds)),
        }
    }

    /// Decide whether `item` sets off its crisis, recording the fire if so.
    ///
    /// Checks, in order: the item has a trigger, the trigger has not fired
    /// before, the cooldown elapsed, the catalog defines the crisis. Any
    /// failed check leaves the gate untouched.
    pub fn try_fire<'c>(
        &mut self,
        item: &NewsItem,
        catalog: &'c CrisisCatalog,
        now: DateTime<Utc>,
    ) -> Option<&'c Crisis> {
        let crisis_id = item.trigger.as_deref()?;
        if self.has_fired(crisis_id) || !self.is_cool(now) {
            return None;
        }
        let crisis = catalog.get(crisis_id)?;

        self.fired.insert(crisis.id.clone());
        self.last_fired_at = Some(match self.last_fired_at {
            Some(last) if last > now => last,
            _ => now,
        });
        Some(crisis)
    }

    /// Clamp and store a new cooldown; returns the effective value.
    pub fn set_cooldown(&mut self, seconds: i64) -> u32 {
        self.cooldown_seconds = self.bounds.clamp(seconds);
        self.cooldown_seconds
    }

    /// Whole seconds until the gate is cool again, floored at zero.
    pub fn time_until_next(&self, now: DateTime<Utc>) -> u64 {
        let Some(last) = self.last_fired_at else {
            return 0;
        };
        let cooldown_ms = i64::from(self.cooldown_seconds) * 1000;
        let remaining_ms = (cooldown_ms - (now - last).num_milliseconds()).min(cooldown_ms);
        u64::try_from(remaining_ms / 1000).unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
