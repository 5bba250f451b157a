// src/nutrition.rs
use serde::{Deserialize, Serialize};

use crate::chart::{self, CalorieShare, ChartData};
use crate::defaults::SliceDefaults;
use crate::input::{parse_finite, InputError};
use crate::store::KeyValueStore;
use crate::sync::{Slice, SyncError, Synced};

pub const MEALS_KEY: &str = "monochrome-gym-meals";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    #[serde(alias = "cals")]
    pub calories: f64,
}

impl Meal {
    pub fn new(name: &str, calories: f64) -> Self {
        Self {
            name: name.to_string(),
            calories,
        }
    }
}

/// Meals in the order they were logged. Position is the only identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealLog(Vec<Meal>);

impl From<Vec<Meal>> for MealLog {
    fn from(meals: Vec<Meal>) -> Self {
        Self(meals)
    }
}

impl MealLog {
    pub fn meals(&self) -> &[Meal] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_calories(&self) -> f64 {
        self.0.iter().map(|m| m.calories).sum()
    }

    pub fn push(&mut self, meal: Meal) {
        self.0.push(meal);
    }

    /// Removes the meal at `index`; out-of-range indexes leave the log as is.
    pub fn remove(&mut self, index: usize) -> Option<Meal> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }
}

impl Slice for MealLog {
    const KEY: &'static str = MEALS_KEY;

    fn validate(&self) -> Result<(), String> {
        for (i, meal) in self.0.iter().enumerate() {
            if meal.name.trim().is_empty() {
                return Err(format!("meal {i} has an empty name"));
            }
            if !meal.calories.is_finite() || meal.calories <= 0.0 {
                return Err(format!("meal {i} has invalid calories {}", meal.calories));
            }
        }
        Ok(())
    }
}

/// Checks a raw meal submission.
/// # Errors
/// Returns the first `InputError` that applies: empty name, empty or
/// non-numeric calories, or calories not above zero.
pub fn validate_meal(name: &str, calories: &str) -> Result<Meal, InputError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(InputError::EmptyName);
    }
    if calories.trim().is_empty() {
        return Err(InputError::EmptyCalories);
    }
    let value =
        parse_finite(calories).ok_or_else(|| InputError::InvalidCalories(calories.to_string()))?;
    if value <= 0.0 {
        return Err(InputError::NonPositiveCalories(value));
    }
    Ok(Meal::new(name, value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MealField {
    #[default]
    Name,
    Calories,
}

/// Pending input of the meal form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealForm {
    pub name: String,
    pub calories: String,
    pub focus: MealField,
}

/// Nutrition feature: the meal log plus its entry form.
#[derive(Debug, Clone)]
pub struct NutritionView {
    meals: Synced<MealLog>,
    form: MealForm,
}

impl NutritionView {
    /// # Errors
    /// Returns `SyncError` if the store cannot be read.
    pub fn load(store: &dyn KeyValueStore, defaults: &SliceDefaults) -> Result<Self, SyncError> {
        Ok(Self {
            meals: Synced::load_or(store, defaults.meals.clone())?,
            form: MealForm::default(),
        })
    }

    pub const fn meals(&self) -> &MealLog {
        self.meals.get()
    }

    pub const fn form(&self) -> &MealForm {
        &self.form
    }

    pub fn set_name(&mut self, name: &str) {
        self.form.name = name.to_string();
        self.form.focus = MealField::Name;
    }

    pub fn set_calories(&mut self, calories: &str) {
        self.form.calories = calories.to_string();
        self.form.focus = MealField::Calories;
    }

    /// Appends the form's meal, clears the form and focuses the name field.
    /// On rejection the log and the form stay as they were.
    /// # Errors
    /// Returns `InputError` for invalid input or a failed store write.
    pub fn submit(&mut self, store: &mut dyn KeyValueStore) -> Result<Meal, InputError> {
        let meal = validate_meal(&self.form.name, &self.form.calories)?;
        self.meals.update(store, |log| log.push(meal.clone()))?;
        self.form = MealForm::default();
        Ok(meal)
    }

    /// Removes the meal at `index`. Out-of-range indexes are a no-op and
    /// nothing is written.
    /// # Errors
    /// Returns `SyncError` if the store write fails.
    pub fn delete(
        &mut self,
        store: &mut dyn KeyValueStore,
        index: usize,
    ) -> Result<Option<Meal>, SyncError> {
        if index >= self.meals.get().len() {
            return Ok(None);
        }
        self.meals.update(store, |log| log.remove(index))
    }

    pub fn chart(&self) -> ChartData {
        chart::meal_chart(self.meals.get())
    }

    pub fn shares(&self) -> Vec<CalorieShare> {
        chart::calorie_shares(self.meals.get())
    }
}
