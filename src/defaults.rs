// src/defaults.rs
use crate::nutrition::{Meal, MealLog};
use crate::plan::{Day, DayPlan, ExerciseChecklist, WeeklyPlan};
use crate::progress::{ProgressEntries, ProgressEntry, WeeklyMetric, WeeklyMetrics};

/// Seed values adopted by each slice when the store has nothing usable.
/// Passed into every view at construction; nothing reads these globally.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceDefaults {
    pub plan: WeeklyPlan,
    pub checklist: ExerciseChecklist,
    pub meals: MealLog,
    pub progress: ProgressEntries,
    pub weekly: WeeklyMetrics,
}

impl Default for SliceDefaults {
    fn default() -> Self {
        Self {
            plan: default_plan(),
            checklist: ExerciseChecklist::default(),
            meals: default_meals(),
            progress: default_progress(),
            weekly: default_weekly_metrics(),
        }
    }
}

pub fn default_plan() -> WeeklyPlan {
    WeeklyPlan::from_days([
        (Day::Monday, DayPlan::new("Chest & Triceps", "Bench Press, Dips")),
        (Day::Tuesday, DayPlan::new("Back & Biceps", "Pull Ups, Deadlifts")),
        (Day::Wednesday, DayPlan::new("Legs", "Squats, Lunges")),
        (
            Day::Thursday,
            DayPlan::new("Shoulders", "Military Press, Lateral Raises"),
        ),
        (Day::Friday, DayPlan::new("Core", "Planks, Russian Twists")),
        (Day::Saturday, DayPlan::new("Cardio/HIIT", "Sprints, Jump Rope")),
        (Day::Sunday, DayPlan::new("Rest", "-")),
    ])
}

pub fn default_meals() -> MealLog {
    MealLog::from(vec![
        Meal::new("Oatmeal & Berries", 250.0),
        Meal::new("Chicken Avocado Wrap", 400.0),
    ])
}

pub fn default_progress() -> ProgressEntries {
    ProgressEntries::from(vec![
        ProgressEntry::new("2025-04-13", 60.0),
        ProgressEntry::new("2025-04-14", 62.0),
        ProgressEntry::new("2025-04-15", 61.0),
        ProgressEntry::new("2025-04-16", 63.0),
        ProgressEntry::new("2025-04-17", 64.0),
        ProgressEntry::new("2025-04-18", 63.5),
    ])
}

pub fn default_weekly_metrics() -> WeeklyMetrics {
    WeeklyMetrics::from(vec![
        WeeklyMetric::new("Week 1", 70.0, 40.0, 20.0),
        WeeklyMetric::new("Week 2", 69.5, 41.0, 19.5),
        WeeklyMetric::new("Week 3", 69.0, 41.5, 19.0),
        WeeklyMetric::new("Week 4", 68.5, 42.0, 18.5),
    ])
}
