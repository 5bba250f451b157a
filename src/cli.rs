// src/cli.rs
use chrono::{Duration, Local, NaiveDate};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use gym_tracker_lib::{ColorSchemePreference, Day};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plan workouts, log meals and track progress", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Print lists as CSV instead of tables
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayCli {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl From<DayCli> for Day {
    fn from(value: DayCli) -> Self {
        match value {
            DayCli::Monday => Self::Monday,
            DayCli::Tuesday => Self::Tuesday,
            DayCli::Wednesday => Self::Wednesday,
            DayCli::Thursday => Self::Thursday,
            DayCli::Friday => Self::Friday,
            DayCli::Saturday => Self::Saturday,
            DayCli::Sunday => Self::Sunday,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSchemeCli {
    Auto,
    Light,
    Dark,
}

impl From<ColorSchemeCli> for ColorSchemePreference {
    fn from(value: ColorSchemeCli) -> Self {
        match value {
            ColorSchemeCli::Auto => Self::Auto,
            ColorSchemeCli::Light => Self::Light,
            ColorSchemeCli::Dark => Self::Dark,
        }
    }
}

// Custom parser for date strings and shorthands
pub fn parse_date_shorthand(s: &str) -> Result<NaiveDate, String> {
    match s.to_lowercase().as_str() {
        "today" => Ok(Local::now().date_naive()),
        "yesterday" => Ok((Local::now() - Duration::days(1)).date_naive()),
        _ => ["%Y-%m-%d", "%d.%m.%Y", "%Y/%m/%d"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .ok_or_else(|| {
                format!(
                    "Invalid date format: '{s}'. Use 'today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY, or YYYY/MM/DD."
                )
            }),
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Weekly workout plan
    #[command(subcommand)]
    Plan(PlanCommands),
    /// Show today's workout
    Today,
    /// Tick or untick an exercise on today's checklist
    Check {
        /// Exercise name as it appears in today's plan
        exercise: String,
    },
    /// Meal log
    #[command(subcommand)]
    Meal(MealCommands),
    /// Body progress
    #[command(subcommand)]
    Progress(ProgressCommands),
    /// Show the path to the store file
    StorePath,
    /// Show the path to the config file
    ConfigPath,
    /// Choose light or dark chart colors (auto follows the terminal)
    SetColorScheme {
        #[arg(value_enum)]
        scheme: ColorSchemeCli,
    },
    /// Generate shell completion script
    GenerateCompletion {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Show the plan for the whole week
    Show,
    /// Change one day of the plan
    Edit {
        #[arg(value_enum)]
        day: DayCli,
        /// Workout label (e.g., "Legs")
        #[arg(short, long)]
        workout: Option<String>,
        /// Comma-separated exercises (e.g., "Squats, Lunges")
        #[arg(short, long)]
        exercises: Option<String>,
    },
    /// Chart the number of exercises per day
    Chart,
}

#[derive(Subcommand, Debug)]
pub enum MealCommands {
    /// Log a meal
    Add {
        name: String,
        /// Calories (kcal), must be above zero
        #[arg(allow_hyphen_values = true)]
        calories: String,
    },
    /// Remove a meal by its position in `meal list`
    Delete {
        /// 1-based position
        position: usize,
    },
    /// List logged meals
    List,
    /// Show each meal's share of the calories
    Chart,
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    /// Add a measurement, or replace the one already logged for that date
    Add {
        /// Date ('today', 'yesterday', YYYY-MM-DD, DD.MM.YYYY, YYYY/MM/DD)
        #[arg(value_parser = parse_date_shorthand)]
        date: NaiveDate,
        /// Weight (kg)
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// List measurements
    List {
        /// Show the weekly analytics table instead of daily entries
        #[arg(long)]
        weekly: bool,
    },
    /// Chart measurements
    Chart {
        #[arg(long)]
        weekly: bool,
    },
    /// Change one row of the weekly analytics table
    EditWeek {
        /// Week number as shown in `progress list --weekly`
        week: usize,
        #[arg(long)]
        weight: Option<String>,
        #[arg(long)]
        muscle: Option<String>,
        #[arg(long)]
        fat: Option<String>,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> clap::Command {
    Cli::command()
}
