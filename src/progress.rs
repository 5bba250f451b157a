// src/progress.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::chart::{self, ChartData, ColorScheme};
use crate::defaults::SliceDefaults;
use crate::edit::{EditError, EditMode};
use crate::input::{parse_finite, parse_leading_number, InputError};
use crate::store::KeyValueStore;
use crate::sync::{Slice, SyncError, Synced};

pub const PROGRESS_KEY: &str = "monochrome-gym-progress";
pub const WEEKLY_KEY: &str = "monochrome-gym-weekly-progress";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEntry {
    /// ISO `YYYY-MM-DD`, so string order is date order.
    pub date: String,
    pub value: f64,
}

impl ProgressEntry {
    pub fn new(date: &str, value: f64) -> Self {
        Self {
            date: date.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Daily measurements, unique by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressEntries(Vec<ProgressEntry>);

impl From<Vec<ProgressEntry>> for ProgressEntries {
    fn from(entries: Vec<ProgressEntry>) -> Self {
        Self(entries)
    }
}

impl ProgressEntries {
    pub fn entries(&self) -> &[ProgressEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_date(&self, date: &str) -> bool {
        self.0.iter().any(|e| e.date == date)
    }

    /// Replaces the value for `date` or adds a new entry, then re-sorts the
    /// whole collection by date string.
    pub fn upsert(&mut self, date: &str, value: f64) -> Upsert {
        let outcome = match self.0.iter_mut().find(|e| e.date == date) {
            Some(existing) => {
                existing.value = value;
                Upsert::Replaced
            }
            None => {
                self.0.push(ProgressEntry::new(date, value));
                Upsert::Inserted
            }
        };
        self.0.sort_by(|a, b| a.date.cmp(&b.date));
        outcome
    }
}

impl Slice for ProgressEntries {
    const KEY: &'static str = PROGRESS_KEY;

    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for entry in &self.0 {
            if entry.date.is_empty() {
                return Err("entry with empty date".to_string());
            }
            if !entry.value.is_finite() {
                return Err(format!("non-finite value on {}", entry.date));
            }
            if !seen.insert(entry.date.as_str()) {
                return Err(format!("duplicate date {}", entry.date));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMetric {
    pub week: String,
    pub weight: f64,
    pub muscle: f64,
    pub fat: f64,
}

impl WeeklyMetric {
    pub fn new(week: &str, weight: f64, muscle: f64, fat: f64) -> Self {
        Self {
            week: week.to_string(),
            weight,
            muscle,
            fat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    Weight,
    Muscle,
    Fat,
}

/// Fixed `Week N` rows. Rows are edited in place, never added or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyMetrics(Vec<WeeklyMetric>);

impl From<Vec<WeeklyMetric>> for WeeklyMetrics {
    fn from(rows: Vec<WeeklyMetric>) -> Self {
        Self(rows)
    }
}

impl WeeklyMetrics {
    pub fn rows(&self) -> &[WeeklyMetric] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `false` when `index` is out of range.
    pub fn set(&mut self, index: usize, field: MetricField, value: f64) -> bool {
        let Some(row) = self.0.get_mut(index) else {
            return false;
        };
        match field {
            MetricField::Weight => row.weight = value,
            MetricField::Muscle => row.muscle = value,
            MetricField::Fat => row.fat = value,
        }
        true
    }
}

impl Slice for WeeklyMetrics {
    const KEY: &'static str = WEEKLY_KEY;

    fn validate(&self) -> Result<(), String> {
        match self
            .0
            .iter()
            .find(|r| !(r.weight.is_finite() && r.muscle.is_finite() && r.fat.is_finite()))
        {
            Some(row) => Err(format!("non-finite metric in {}", row.week)),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    #[default]
    Daily,
    Weekly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressField {
    #[default]
    Date,
    Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressForm {
    pub date: String,
    pub value: String,
    pub focus: ProgressField,
}

/// Progress feature: daily entries, weekly metrics, the mode switch and the
/// weekly table's edit toggle.
#[derive(Debug, Clone)]
pub struct ProgressView {
    entries: Synced<ProgressEntries>,
    weekly: Synced<WeeklyMetrics>,
    mode: ProgressMode,
    edit: EditMode,
    form: ProgressForm,
}

impl ProgressView {
    /// # Errors
    /// Returns `SyncError` if the store cannot be read.
    pub fn load(store: &dyn KeyValueStore, defaults: &SliceDefaults) -> Result<Self, SyncError> {
        Ok(Self {
            entries: Synced::load_or(store, defaults.progress.clone())?,
            weekly: Synced::load_or(store, defaults.weekly.clone())?,
            mode: ProgressMode::default(),
            edit: EditMode::default(),
            form: ProgressForm::default(),
        })
    }

    pub const fn entries(&self) -> &ProgressEntries {
        self.entries.get()
    }

    pub const fn weekly(&self) -> &WeeklyMetrics {
        self.weekly.get()
    }

    pub const fn mode(&self) -> ProgressMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProgressMode) {
        self.mode = mode;
    }

    pub const fn form(&self) -> &ProgressForm {
        &self.form
    }

    pub fn set_date(&mut self, date: &str) {
        self.form.date = date.to_string();
        self.form.focus = ProgressField::Date;
    }

    pub fn set_value(&mut self, value: &str) {
        self.form.value = value.to_string();
        self.form.focus = ProgressField::Value;
    }

    /// "Edit" when the typed date already has an entry, "Add" otherwise.
    pub fn submit_label(&self) -> &'static str {
        if self.entries.get().contains_date(&self.form.date) {
            "Edit"
        } else {
            "Add"
        }
    }

    /// Upserts the form's entry, clears the form and focuses the date field.
    /// # Errors
    /// Returns `InputError` for an empty date, a non-numeric value or a
    /// failed store write.
    pub fn submit(&mut self, store: &mut dyn KeyValueStore) -> Result<Upsert, InputError> {
        if self.form.date.is_empty() {
            return Err(InputError::EmptyDate);
        }
        let value = parse_finite(&self.form.value)
            .ok_or_else(|| InputError::InvalidValue(self.form.value.clone()))?;
        let date = self.form.date.clone();
        let outcome = self.entries.update(store, |e| e.upsert(&date, value))?;
        self.form = ProgressForm::default();
        Ok(outcome)
    }

    pub const fn edit_mode(&self) -> EditMode {
        self.edit
    }

    pub fn toggle_edit(&mut self) -> bool {
        self.edit.toggle()
    }

    /// Sets one weekly cell from raw text. Text without a leading number
    /// stores 0.
    /// # Errors
    /// - `EditError::NotEditing` while read-only.
    /// - `EditError::NoSuchRow` for an unknown row.
    /// - `EditError::Sync` if the store write fails.
    pub fn set_weekly_field(
        &mut self,
        store: &mut dyn KeyValueStore,
        index: usize,
        field: MetricField,
        raw: &str,
    ) -> Result<f64, EditError> {
        self.edit.ensure_editing()?;
        if index >= self.weekly.get().len() {
            return Err(EditError::NoSuchRow(index));
        }
        let value = parse_leading_number(raw);
        self.weekly.update(store, |w| w.set(index, field, value))?;
        Ok(value)
    }

    pub fn chart(&self, scheme: ColorScheme) -> ChartData {
        match self.mode {
            ProgressMode::Daily => chart::daily_progress_chart(self.entries.get(), scheme),
            ProgressMode::Weekly => chart::weekly_progress_chart(self.weekly.get(), scheme),
        }
    }
}
