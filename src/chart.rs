// src/chart.rs
//! Chart-ready projections of the slices. Everything here is a pure function
//! of its inputs; callers recompute on every render.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::nutrition::MealLog;
use crate::plan::{Day, WeeklyPlan};
use crate::progress::{ProgressEntries, WeeklyMetric, WeeklyMetrics};
use strum::IntoEnumIterator;

/// Doughnut segment palette. Meals past the last entry get no color.
pub const SEGMENT_PALETTE: [&str; 7] = ["#222", "#555", "#aaa", "#eee", "#999", "#444", "#ccc"];

const COLOR_FG_BG_VAR: &str = "COLORFGBG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

impl ColorScheme {
    /// Reads the terminal's `COLORFGBG` hint ("fg;bg"). Background colors
    /// 0-6 and 8 are dark; anything else, or no hint, is light.
    pub fn detect() -> Self {
        std::env::var(COLOR_FG_BG_VAR)
            .ok()
            .map_or(Self::Light, |v| Self::from_colorfgbg(&v))
    }

    pub fn from_colorfgbg(value: &str) -> Self {
        match value.rsplit(';').next().and_then(|bg| bg.trim().parse::<u8>().ok()) {
            Some(0..=6 | 8) => Self::Dark,
            _ => Self::Light,
        }
    }

    const fn pick(self, light: &'static str, dark: &'static str) -> &'static str {
        match self {
            Self::Light => light,
            Self::Dark => dark,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Doughnut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesColors {
    Line {
        border: &'static str,
        fill: &'static str,
        point: &'static str,
    },
    /// One color per data point, possibly shorter than the data.
    Segments(Vec<&'static str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    pub colors: SeriesColors,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisColors {
    pub tick: &'static str,
    pub x_grid: &'static str,
    pub y_grid: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub show_legend: bool,
    /// `None` for charts without axes.
    pub axis: Option<AxisColors>,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Largest value across all datasets, or 0 for an empty chart.
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().copied())
            .fold(0.0, f64::max)
    }
}

pub fn segment_color(index: usize) -> Option<&'static str> {
    SEGMENT_PALETTE.get(index).copied()
}

pub fn meal_chart(meals: &MealLog) -> ChartData {
    let segments = (0..meals.len()).map_while(segment_color).collect();
    ChartData {
        kind: ChartKind::Doughnut,
        labels: meals.meals().iter().map(|m| m.name.clone()).collect(),
        datasets: vec![Dataset {
            label: "Calories".to_string(),
            data: meals.meals().iter().map(|m| m.calories).collect(),
            colors: SeriesColors::Segments(segments),
        }],
        show_legend: true,
        axis: None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalorieShare {
    pub name: String,
    pub calories: f64,
    pub percent: f64,
}

impl fmt::Display for CalorieShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} kcal ({:.1}%)", self.name, self.calories, self.percent)
    }
}

pub fn calorie_shares(meals: &MealLog) -> Vec<CalorieShare> {
    let total = meals.total_calories();
    meals
        .meals()
        .iter()
        .map(|m| CalorieShare {
            name: m.name.clone(),
            calories: m.calories,
            percent: if total > 0.0 {
                m.calories / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

pub fn plan_chart(plan: &WeeklyPlan, scheme: ColorScheme) -> ChartData {
    let line = scheme.pick("#181818", "#fff");
    #[allow(clippy::cast_precision_loss)]
    let data = plan.exercise_counts().into_iter().map(|c| c as f64).collect();
    ChartData {
        kind: ChartKind::Line,
        labels: Day::iter().map(|d| d.to_string()).collect(),
        datasets: vec![Dataset {
            label: "Exercises".to_string(),
            data,
            colors: SeriesColors::Line {
                border: line,
                fill: scheme.pick("rgba(0,0,0,0.11)", "rgba(255,255,255,0.08)"),
                point: line,
            },
        }],
        show_legend: false,
        axis: Some(AxisColors {
            tick: scheme.pick("#222", "#eaeaea"),
            x_grid: scheme.pick("#eee", "#353535"),
            y_grid: scheme.pick("#eee", "#353535"),
        }),
    }
}

fn progress_axis(scheme: ColorScheme) -> AxisColors {
    // Light y grid is a translucent grey (#bbb at 2/15 alpha).
    AxisColors {
        tick: scheme.pick("#444", "#eaeaea"),
        x_grid: scheme.pick("#eee", "#444"),
        y_grid: scheme.pick("#bbb2", "#444"),
    }
}

pub fn daily_progress_chart(entries: &ProgressEntries, scheme: ColorScheme) -> ChartData {
    ChartData {
        kind: ChartKind::Line,
        labels: entries.entries().iter().map(|e| e.date.clone()).collect(),
        datasets: vec![Dataset {
            label: "Weight (kg)".to_string(),
            data: entries.entries().iter().map(|e| e.value).collect(),
            colors: SeriesColors::Line {
                border: "#000",
                fill: "#fff",
                point: "#000",
            },
        }],
        show_legend: false,
        axis: Some(progress_axis(scheme)),
    }
}

pub fn weekly_progress_chart(weekly: &WeeklyMetrics, scheme: ColorScheme) -> ChartData {
    let rows = weekly.rows();
    let series = |label: &str, pick: fn(&WeeklyMetric) -> f64, colors: SeriesColors| Dataset {
        label: label.to_string(),
        data: rows.iter().map(pick).collect(),
        colors,
    };
    ChartData {
        kind: ChartKind::Line,
        labels: rows.iter().map(|r| r.week.clone()).collect(),
        datasets: vec![
            series(
                "Weight (kg)",
                |r: &WeeklyMetric| r.weight,
                SeriesColors::Line {
                    border: "#000",
                    fill: "#fff",
                    point: "#222",
                },
            ),
            series(
                "Muscle (%)",
                |r: &WeeklyMetric| r.muscle,
                SeriesColors::Line {
                    border: "#555",
                    fill: "#e5e5e5",
                    point: "#555",
                },
            ),
            series(
                "Body Fat (%)",
                |r: &WeeklyMetric| r.fat,
                SeriesColors::Line {
                    border: "#aaa",
                    fill: "#fff",
                    point: "#bbb",
                },
            ),
        ],
        show_legend: true,
        axis: Some(progress_axis(scheme)),
    }
}
