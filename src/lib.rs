// src/lib.rs
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

// --- Declare modules ---
pub mod chart;
pub mod clock;
mod config;
pub mod defaults;
pub mod edit;
pub mod input;
pub mod nutrition;
pub mod plan;
pub mod progress;
pub mod store;
pub mod sync;

// --- Expose public types ---
pub use chart::{CalorieShare, ChartData, ChartKind, ColorScheme, Dataset, SeriesColors};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    get_config_path as get_config_path_util, load as load_config_util, parse_color,
    save as save_config_util, ColorSchemePreference, Config, ConfigError, StandardColor, Theme,
};
pub use defaults::SliceDefaults;
pub use edit::{EditError, EditMode};
pub use input::InputError;
pub use nutrition::{Meal, MealLog, NutritionView};
pub use plan::{
    ChecklistError, Day, DayPlan, ExerciseChecklist, PlanField, PlanRendering, PlanView,
    TodaysWorkout, WeeklyPlan,
};
pub use progress::{
    MetricField, ProgressEntries, ProgressEntry, ProgressMode, ProgressView, Upsert,
    WeeklyMetric, WeeklyMetrics,
};
pub use store::{KeyValueStore, MemoryStore, SqliteStore, StoreError};
pub use sync::{LoadOutcome, Slice, SyncError, Synced};

/// Field changes for one day of the plan. `None` leaves a field alone.
#[derive(Debug, Default, Clone)]
pub struct DayEdit<'a> {
    pub workout: Option<&'a str>,
    pub exercises: Option<&'a str>,
}

/// Raw cell text for one weekly-metrics row. `None` leaves a cell alone.
#[derive(Debug, Default, Clone)]
pub struct WeekEdit<'a> {
    pub weight: Option<&'a str>,
    pub muscle: Option<&'a str>,
    pub fat: Option<&'a str>,
}

pub struct AppService {
    pub config: Config,
    pub store: Box<dyn KeyValueStore>,
    pub defaults: SliceDefaults,
    pub clock: Box<dyn Clock>,
    pub store_path: PathBuf,
    pub config_path: PathBuf,
}

impl AppService {
    /// Initializes the application service.
    /// # Errors
    /// Returns `anyhow::Error` if config/store path determination, loading, or opening fails.
    pub fn initialize() -> Result<Self> {
        let config_path =
            config::get_config_path().context("Failed to determine configuration file path")?;
        let config = config::load(&config_path)
            .with_context(|| format!("Failed to load config from {config_path:?}"))?;

        let store_path = match &config.store_path {
            Some(path) => path.clone(),
            None => store::get_store_path().context("Failed to determine store path")?,
        };
        let store = SqliteStore::open(&store_path)
            .with_context(|| format!("Failed to open store at {store_path:?}"))?;

        info!(
            config = %config_path.display(),
            store = %store_path.display(),
            "service initialized"
        );

        Ok(Self {
            config,
            store: Box::new(store),
            defaults: SliceDefaults::default(),
            clock: Box::new(SystemClock),
            store_path,
            config_path,
        })
    }

    /// Builds a service around an existing store with default seeds.
    pub fn with_store(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        Self {
            config: Config::default(),
            store,
            defaults: SliceDefaults::default(),
            clock,
            store_path: ":memory:".into(),
            config_path: "config.toml".into(),
        }
    }

    pub fn get_config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn get_store_path(&self) -> &Path {
        &self.store_path
    }

    /// Saves the current configuration state.
    /// # Errors
    /// Returns `ConfigError` if saving fails.
    pub fn save_config(&self) -> Result<(), ConfigError> {
        config::save(&self.config_path, &self.config)
    }

    /// Sets the chart color scheme preference.
    /// # Errors
    /// Returns `ConfigError` variants if saving fails.
    pub fn set_color_scheme(
        &mut self,
        preference: ColorSchemePreference,
    ) -> Result<(), ConfigError> {
        self.config.color_scheme = preference;
        self.save_config()
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.config.color_scheme.resolve()
    }

    // --- Weekly plan ---

    /// # Errors
    /// Returns `anyhow::Error` if the store cannot be read.
    pub fn plan_view(&self) -> Result<PlanView> {
        PlanView::load(self.store.as_ref(), &self.defaults, self.clock.as_ref())
            .context("Failed to load weekly plan")
    }

    /// Opens the plan for editing, applies the given fields and closes it again.
    /// # Errors
    /// Returns `anyhow::Error` if nothing is to be changed or persisting fails.
    pub fn edit_day(&mut self, day: Day, edit: &DayEdit<'_>) -> Result<PlanView> {
        if edit.workout.is_none() && edit.exercises.is_none() {
            bail!("No fields provided to update for {day}.");
        }
        let mut view = self.plan_view()?;
        view.toggle_edit();
        if let Some(workout) = edit.workout {
            view.set_field(self.store.as_mut(), day, PlanField::Workout, workout)
                .with_context(|| format!("Failed to update workout for {day}"))?;
        }
        if let Some(exercises) = edit.exercises {
            view.set_field(self.store.as_mut(), day, PlanField::Exercises, exercises)
                .with_context(|| format!("Failed to update exercises for {day}"))?;
        }
        view.toggle_edit();
        Ok(view)
    }

    /// # Errors
    /// Returns `anyhow::Error` if the store cannot be read.
    pub fn todays_workout(&self) -> Result<TodaysWorkout> {
        Ok(self.plan_view()?.todays_workout())
    }

    /// Toggles an exercise on today's checklist and returns its new state.
    /// # Errors
    /// Returns `anyhow::Error` if the name is empty, today has no checklist,
    /// the exercise isn't on it, or persisting fails.
    pub fn toggle_exercise(&mut self, exercise: &str) -> Result<bool> {
        let trimmed = exercise.trim();
        if trimmed.is_empty() {
            bail!("Exercise name cannot be empty.");
        }
        let mut view = self.plan_view()?;
        view.toggle_exercise(self.store.as_mut(), trimmed)
            .with_context(|| format!("Failed to toggle '{trimmed}'"))
    }

    // --- Nutrition ---

    /// # Errors
    /// Returns `anyhow::Error` if the store cannot be read.
    pub fn nutrition_view(&self) -> Result<NutritionView> {
        NutritionView::load(self.store.as_ref(), &self.defaults).context("Failed to load meal log")
    }

    /// Validates and logs a meal.
    /// # Errors
    /// Returns `InputError` (via `anyhow`) for rejected input, or a store failure.
    pub fn add_meal(&mut self, name: &str, calories: &str) -> Result<Meal> {
        let mut view = self.nutrition_view()?;
        view.set_name(name);
        view.set_calories(calories);
        Ok(view.submit(self.store.as_mut())?)
    }

    /// Removes the meal at `index` (0-based).
    /// # Errors
    /// Returns `anyhow::Error` if there is no such meal or persisting fails.
    pub fn delete_meal(&mut self, index: usize) -> Result<Meal> {
        let mut view = self.nutrition_view()?;
        match view.delete(self.store.as_mut(), index)? {
            Some(meal) => Ok(meal),
            None => bail!("No meal at index {index} ({} logged).", view.meals().len()),
        }
    }

    // --- Progress ---

    /// # Errors
    /// Returns `anyhow::Error` if the store cannot be read.
    pub fn progress_view(&self) -> Result<ProgressView> {
        ProgressView::load(self.store.as_ref(), &self.defaults)
            .context("Failed to load progress data")
    }

    /// Adds or replaces the measurement for `date` (`YYYY-MM-DD`, not after today).
    /// # Errors
    /// Returns `InputError` (via `anyhow`) for rejected input, or a store failure.
    pub fn log_progress(&mut self, date: &str, value: &str) -> Result<Upsert> {
        if !date.is_empty() {
            input::parse_entry_date(date, self.clock.today())?;
        }
        let mut view = self.progress_view()?;
        view.set_date(date);
        view.set_value(value);
        Ok(view.submit(self.store.as_mut())?)
    }

    /// Opens the weekly table for editing, applies the given cells and closes it.
    /// # Errors
    /// Returns `anyhow::Error` if nothing is to be changed, the row doesn't
    /// exist, or persisting fails.
    pub fn edit_week(&mut self, index: usize, edit: &WeekEdit<'_>) -> Result<WeeklyMetric> {
        let cells = [
            (MetricField::Weight, edit.weight),
            (MetricField::Muscle, edit.muscle),
            (MetricField::Fat, edit.fat),
        ];
        if cells.iter().all(|(_, raw)| raw.is_none()) {
            bail!("No fields provided to update for week {}.", index + 1);
        }
        let mut view = self.progress_view()?;
        view.toggle_edit();
        for (field, raw) in cells {
            if let Some(raw) = raw {
                view.set_weekly_field(self.store.as_mut(), index, field, raw)?;
            }
        }
        view.toggle_edit();
        view.weekly()
            .rows()
            .get(index)
            .cloned()
            .with_context(|| format!("Week row {index} disappeared after edit"))
    }
}
