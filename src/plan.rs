// src/plan.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::chart::{self, ChartData, ColorScheme};
use crate::clock::Clock;
use crate::defaults::SliceDefaults;
use crate::edit::{EditError, EditMode};
use crate::store::KeyValueStore;
use crate::sync::{Slice, SyncError, Synced};

pub const PLAN_KEY: &str = "monochrome-gym-weekly-plan";
pub const CHECKLIST_KEY: &str = "monochrome-gym-workout-todo";

/// Placeholder exercise list for a rest day.
pub const REST_MARKER: &str = "-";

#[derive(Error, Debug)]
pub enum ChecklistError {
    #[error("There is no checklist on {0}.")]
    NoChecklist(Day),
    #[error("'{exercise}' is not on the plan for {day}.")]
    NotPlanned { exercise: String, day: Day },
    #[error(transparent)]
    Sync(#[from] SyncError),
}

/// Weekday names in plan order (Monday first).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<chrono::Weekday> for Day {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    pub workout: String,
    /// Comma-separated exercise names.
    pub exercises: String,
}

impl DayPlan {
    pub fn new(workout: &str, exercises: &str) -> Self {
        Self {
            workout: workout.to_string(),
            exercises: exercises.to_string(),
        }
    }
}

static EMPTY_DAY: DayPlan = DayPlan {
    workout: String::new(),
    exercises: String::new(),
};

/// Which `DayPlan` field an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    Workout,
    Exercises,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyPlan(BTreeMap<Day, DayPlan>);

impl WeeklyPlan {
    /// Builds a plan from the given days; any day not listed gets an empty entry.
    pub fn from_days(days: impl IntoIterator<Item = (Day, DayPlan)>) -> Self {
        let mut map: BTreeMap<Day, DayPlan> = days.into_iter().collect();
        for day in Day::iter() {
            map.entry(day).or_default();
        }
        Self(map)
    }

    pub fn day(&self, day: Day) -> &DayPlan {
        self.0.get(&day).unwrap_or(&EMPTY_DAY)
    }

    pub fn days(&self) -> impl Iterator<Item = (Day, &DayPlan)> {
        Day::iter().map(move |d| (d, self.day(d)))
    }

    pub fn set_field(&mut self, day: Day, field: PlanField, value: &str) {
        let entry = self.0.entry(day).or_default();
        match field {
            PlanField::Workout => entry.workout = value.to_string(),
            PlanField::Exercises => entry.exercises = value.to_string(),
        }
    }

    /// Number of real exercises per day, Monday to Sunday. Blank tokens and
    /// the rest marker don't count.
    pub fn exercise_counts(&self) -> Vec<usize> {
        self.days()
            .map(|(_, plan)| count_exercises(&plan.exercises))
            .collect()
    }
}

impl Slice for WeeklyPlan {
    const KEY: &'static str = PLAN_KEY;

    fn validate(&self) -> Result<(), String> {
        let missing: Vec<String> = Day::iter()
            .filter(|d| !self.0.contains_key(d))
            .map(|d| d.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("plan is missing {}", missing.join(", ")))
        }
    }
}

/// Trimmed, non-empty comma tokens.
pub fn exercise_items(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn count_exercises(list: &str) -> usize {
    list.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty() && *e != REST_MARKER)
        .count()
}

/// Done flags keyed by exercise name. Entries appear on first toggle and are
/// never removed, even when the exercise leaves the plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseChecklist(BTreeMap<String, bool>);

impl ExerciseChecklist {
    pub fn is_done(&self, exercise: &str) -> bool {
        self.0.get(exercise).copied().unwrap_or(false)
    }

    /// Flips the flag and returns the new value.
    pub fn toggle(&mut self, exercise: &str) -> bool {
        let flag = self.0.entry(exercise.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Slice for ExerciseChecklist {
    const KEY: &'static str = CHECKLIST_KEY;
}

/// One day as shown in read-only mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCard {
    pub day: Day,
    pub workout: String,
    pub exercises: Vec<String>,
}

/// One day as shown in edit mode: the raw field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFields {
    pub day: Day,
    pub workout: String,
    pub exercises: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRendering {
    ReadOnly(Vec<DayCard>),
    Editing(Vec<DayFields>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub exercise: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodaysWorkout {
    /// Saturday: the whole list as static badges, no checklist.
    Badges {
        day: Day,
        workout: String,
        exercises: Vec<String>,
    },
    Checklist {
        day: Day,
        workout: String,
        items: Vec<ChecklistItem>,
    },
    NothingPlanned {
        day: Day,
        workout: String,
    },
}

/// Weekly plan feature: the plan, today's checklist and the edit toggle.
#[derive(Debug, Clone)]
pub struct PlanView {
    plan: Synced<WeeklyPlan>,
    checklist: Synced<ExerciseChecklist>,
    edit: EditMode,
    today: Day,
}

impl PlanView {
    /// Loads both slices and fixes "today" for the lifetime of the view.
    /// # Errors
    /// Returns `SyncError` if the store cannot be read.
    pub fn load(
        store: &dyn KeyValueStore,
        defaults: &SliceDefaults,
        clock: &dyn Clock,
    ) -> Result<Self, SyncError> {
        Ok(Self {
            plan: Synced::load_or(store, defaults.plan.clone())?,
            checklist: Synced::load_or(store, defaults.checklist.clone())?,
            edit: EditMode::default(),
            today: clock.weekday(),
        })
    }

    pub const fn plan(&self) -> &WeeklyPlan {
        self.plan.get()
    }

    pub const fn checklist(&self) -> &ExerciseChecklist {
        self.checklist.get()
    }

    pub const fn today(&self) -> Day {
        self.today
    }

    pub const fn edit_mode(&self) -> EditMode {
        self.edit
    }

    pub fn toggle_edit(&mut self) -> bool {
        self.edit.toggle()
    }

    pub fn render(&self) -> PlanRendering {
        let plan = self.plan.get();
        if self.edit.is_editing() {
            PlanRendering::Editing(
                plan.days()
                    .map(|(day, p)| DayFields {
                        day,
                        workout: p.workout.clone(),
                        exercises: p.exercises.clone(),
                    })
                    .collect(),
            )
        } else {
            PlanRendering::ReadOnly(
                plan.days()
                    .map(|(day, p)| DayCard {
                        day,
                        workout: p.workout.clone(),
                        exercises: exercise_items(&p.exercises),
                    })
                    .collect(),
            )
        }
    }

    /// Writes one field verbatim and persists the plan.
    /// # Errors
    /// - `EditError::NotEditing` while read-only.
    /// - `EditError::Sync` if the store write fails.
    pub fn set_field(
        &mut self,
        store: &mut dyn KeyValueStore,
        day: Day,
        field: PlanField,
        value: &str,
    ) -> Result<(), EditError> {
        self.edit.ensure_editing()?;
        self.plan.update(store, |plan| plan.set_field(day, field, value))?;
        Ok(())
    }

    pub fn todays_workout(&self) -> TodaysWorkout {
        let entry = self.plan.get().day(self.today);
        let day = self.today;
        let workout = entry.workout.clone();

        if day == Day::Saturday {
            if entry.exercises.is_empty() || entry.exercises == REST_MARKER {
                return TodaysWorkout::NothingPlanned { day, workout };
            }
            let exercises = entry
                .exercises
                .split(',')
                .map(|e| e.trim().to_string())
                .collect();
            return TodaysWorkout::Badges {
                day,
                workout,
                exercises,
            };
        }

        let items: Vec<ChecklistItem> = exercise_items(&entry.exercises)
            .into_iter()
            .map(|exercise| ChecklistItem {
                done: self.checklist.get().is_done(&exercise),
                exercise,
            })
            .collect();
        if items.is_empty() {
            TodaysWorkout::NothingPlanned { day, workout }
        } else {
            TodaysWorkout::Checklist {
                day,
                workout,
                items,
            }
        }
    }

    /// Flips the done flag of one of today's checklist items and persists
    /// the checklist.
    /// # Errors
    /// - `ChecklistError::NoChecklist` when today shows badges or nothing.
    /// - `ChecklistError::NotPlanned` when `exercise` is not a checklist item.
    /// - `ChecklistError::Sync` if the store write fails.
    pub fn toggle_exercise(
        &mut self,
        store: &mut dyn KeyValueStore,
        exercise: &str,
    ) -> Result<bool, ChecklistError> {
        let TodaysWorkout::Checklist { day, items, .. } = self.todays_workout() else {
            return Err(ChecklistError::NoChecklist(self.today));
        };
        if !items.iter().any(|item| item.exercise == exercise) {
            return Err(ChecklistError::NotPlanned {
                exercise: exercise.to_string(),
                day,
            });
        }
        Ok(self.checklist.update(store, |c| c.toggle(exercise))?)
    }

    pub fn chart(&self, scheme: ColorScheme) -> ChartData {
        chart::plan_chart(self.plan.get(), scheme)
    }
}
