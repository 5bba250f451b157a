//src/main.rs
mod cli; // Keep cli module for parsing args

use anyhow::{bail, Context, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, stdout};
use tracing_subscriber::{fmt, EnvFilter};

use gym_tracker_lib::{
    AppService, ChartData, DayEdit, Meal, PlanRendering, ProgressEntry, TodaysWorkout, Upsert,
    WeekEdit, WeeklyMetric,
};

const BAR_WIDTH: f64 = 40.0;

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli_args = cli::parse_args(); // Parse arguments once
    let export_csv = cli_args.export_csv;

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;
    let header_color = gym_tracker_lib::parse_color(&service.config.theme.header_color)
        .map(Color::from)
        .unwrap_or(Color::Green); // Fallback

    match cli_args.command {
        cli::Commands::GenerateCompletion { .. } => {
            unreachable!("Completion generation should have exited already");
        }

        // --- Weekly plan ---
        cli::Commands::Plan(cli::PlanCommands::Show) => {
            let view = service.plan_view()?;
            print_plan(&view.render(), header_color);
        }
        cli::Commands::Plan(cli::PlanCommands::Edit {
            day,
            workout,
            exercises,
        }) => {
            let day = day.into();
            let edit = DayEdit {
                workout: workout.as_deref(),
                exercises: exercises.as_deref(),
            };
            match service.edit_day(day, &edit) {
                Ok(view) => {
                    let entry = view.plan().day(day);
                    println!("Updated {day}: {} ({})", entry.workout, entry.exercises);
                }
                Err(e) => bail!("Error editing plan for {day}: {e}"),
            }
        }
        cli::Commands::Plan(cli::PlanCommands::Chart) => {
            let chart = service.plan_view()?.chart(service.color_scheme());
            print_bar_chart(&chart);
        }
        cli::Commands::Today => print_todays_workout(&service.todays_workout()?),
        cli::Commands::Check { exercise } => match service.toggle_exercise(&exercise) {
            Ok(true) => println!("Done: {}", exercise.trim()),
            Ok(false) => println!("Not done: {}", exercise.trim()),
            Err(e) => bail!("Error updating checklist: {e}"),
        },

        // --- Nutrition ---
        cli::Commands::Meal(cli::MealCommands::Add { name, calories }) => {
            match service.add_meal(&name, &calories) {
                Ok(meal) => println!("Logged meal '{}' ({} kcal)", meal.name, meal.calories),
                Err(e) => bail!("Error adding meal: {e}"),
            }
        }
        cli::Commands::Meal(cli::MealCommands::Delete { position }) => {
            if position == 0 {
                bail!("Meal positions start at 1.");
            }
            match service.delete_meal(position - 1) {
                Ok(meal) => println!("Removed meal '{}' ({} kcal)", meal.name, meal.calories),
                Err(e) => bail!("Error deleting meal: {e}"),
            }
        }
        cli::Commands::Meal(cli::MealCommands::List) => {
            let view = service.nutrition_view()?;
            let meals = view.meals().meals();
            if meals.is_empty() {
                println!("No meals logged yet.");
            } else if export_csv {
                print_meals_csv(meals)?;
            } else {
                print_meal_table(meals, header_color);
            }
        }
        cli::Commands::Meal(cli::MealCommands::Chart) => {
            let view = service.nutrition_view()?;
            if view.meals().is_empty() {
                println!("No data");
            } else {
                print_bar_chart(&view.chart());
                for share in view.shares() {
                    println!("{share}");
                }
            }
        }

        // --- Progress ---
        cli::Commands::Progress(cli::ProgressCommands::Add { date, value }) => {
            let date_str = date.format("%Y-%m-%d").to_string();
            match service.log_progress(&date_str, &value) {
                Ok(Upsert::Inserted) => println!("Added {date_str}: {}", value.trim()),
                Ok(Upsert::Replaced) => println!("Updated {date_str}: {}", value.trim()),
                Err(e) => bail!("Error logging progress: {e}"),
            }
        }
        cli::Commands::Progress(cli::ProgressCommands::List { weekly }) => {
            let view = service.progress_view()?;
            match (weekly, export_csv) {
                (false, false) => print_progress_table(view.entries().entries(), header_color),
                (false, true) => print_progress_csv(view.entries().entries())?,
                (true, false) => print_weekly_table(view.weekly().rows(), header_color),
                (true, true) => print_weekly_csv(view.weekly().rows())?,
            }
        }
        cli::Commands::Progress(cli::ProgressCommands::Chart { weekly }) => {
            let mut view = service.progress_view()?;
            if weekly {
                view.set_mode(gym_tracker_lib::ProgressMode::Weekly);
            }
            print_bar_chart(&view.chart(service.color_scheme()));
        }
        cli::Commands::Progress(cli::ProgressCommands::EditWeek {
            week,
            weight,
            muscle,
            fat,
        }) => {
            if week == 0 {
                bail!("Week numbers start at 1.");
            }
            let edit = WeekEdit {
                weight: weight.as_deref(),
                muscle: muscle.as_deref(),
                fat: fat.as_deref(),
            };
            match service.edit_week(week - 1, &edit) {
                Ok(row) => println!(
                    "Updated {}: weight {} kg, muscle {}%, body fat {}%",
                    row.week, row.weight, row.muscle, row.fat
                ),
                Err(e) => bail!("Error editing week {week}: {e}"),
            }
        }

        // --- Settings ---
        cli::Commands::StorePath => println!("{}", service.get_store_path().display()),
        cli::Commands::ConfigPath => println!("{}", service.get_config_path().display()),
        cli::Commands::SetColorScheme { scheme } => {
            service
                .set_color_scheme(scheme.into())
                .context("Failed to save color scheme")?;
            println!("Chart colors set to {scheme:?}.");
        }
    }

    Ok(())
}

fn new_table(headers: &[&str], header_color: Color) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(header_color).add_attribute(Attribute::Bold)),
        );
    table
}

fn print_plan(rendering: &PlanRendering, header_color: Color) {
    let mut table = new_table(&["Day", "Workout", "Exercises"], header_color);
    match rendering {
        PlanRendering::ReadOnly(cards) => {
            for card in cards {
                let exercises = card
                    .exercises
                    .iter()
                    .map(|e| format!("• {e}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                table.add_row(vec![
                    Cell::new(card.day.to_string()),
                    Cell::new(&card.workout),
                    Cell::new(exercises),
                ]);
            }
        }
        PlanRendering::Editing(fields) => {
            for day in fields {
                table.add_row(vec![
                    Cell::new(day.day.to_string()),
                    Cell::new(&day.workout),
                    Cell::new(&day.exercises),
                ]);
            }
        }
    }
    println!("{table}");
}

fn print_todays_workout(today: &TodaysWorkout) {
    match today {
        TodaysWorkout::Badges {
            day,
            workout,
            exercises,
        } => {
            println!("Today's Workout: {day}");
            println!("{workout}");
            let badges: Vec<String> = exercises.iter().map(|e| format!("[{e}]")).collect();
            println!("{}", badges.join(" "));
        }
        TodaysWorkout::Checklist {
            day,
            workout,
            items,
        } => {
            println!("Today's Workout: {day} ({workout})");
            for item in items {
                let mark = if item.done { "x" } else { " " };
                println!("[{mark}] {}", item.exercise);
            }
        }
        TodaysWorkout::NothingPlanned { day, .. } => {
            println!("Today's Workout: {day}");
            println!("No exercises planned.");
        }
    }
}

/// Prints each series as horizontal bars scaled to the largest value.
fn print_bar_chart(chart: &ChartData) {
    if chart.is_empty() {
        println!("No data");
        return;
    }
    let max = chart.max_value();
    let label_width = chart.labels.iter().map(String::len).max().unwrap_or(0);
    for dataset in &chart.datasets {
        if chart.datasets.len() > 1 || chart.show_legend {
            println!("{}", dataset.label);
        }
        for (label, value) in chart.labels.iter().zip(&dataset.data) {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let len = if max > 0.0 {
                (value.max(0.0) / max * BAR_WIDTH).round() as usize
            } else {
                0
            };
            println!("{label:<label_width$} │{} {value}", "█".repeat(len));
        }
    }
}

fn print_meal_table(meals: &[Meal], header_color: Color) {
    let mut table = new_table(&["#", "Meal", "Calories (kcal)"], header_color);
    for (i, meal) in meals.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&meal.name),
            Cell::new(meal.calories),
        ]);
    }
    println!("{table}");
}

fn print_meals_csv(meals: &[Meal]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Position", "Meal", "Calories_kcal"])?;
    for (i, meal) in meals.iter().enumerate() {
        writer.write_record([
            (i + 1).to_string(),
            meal.name.clone(),
            meal.calories.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_progress_table(entries: &[ProgressEntry], header_color: Color) {
    if entries.is_empty() {
        println!("No progress entries yet.");
        return;
    }
    let mut table = new_table(&["Date", "Weight (kg)"], header_color);
    for entry in entries {
        table.add_row(vec![Cell::new(&entry.date), Cell::new(entry.value)]);
    }
    println!("{table}");
}

fn print_progress_csv(entries: &[ProgressEntry]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Date", "Weight_kg"])?;
    for entry in entries {
        writer.write_record([entry.date.clone(), entry.value.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn print_weekly_table(rows: &[WeeklyMetric], header_color: Color) {
    let mut table = new_table(
        &["Week", "Weight (kg)", "Muscle (%)", "Body Fat (%)"],
        header_color,
    );
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.week).add_attribute(Attribute::Bold),
            Cell::new(row.weight),
            Cell::new(row.muscle),
            Cell::new(row.fat),
        ]);
    }
    println!("{table}");
}

fn print_weekly_csv(rows: &[WeeklyMetric]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["Week", "Weight_kg", "Muscle_pct", "Body_Fat_pct"])?;
    for row in rows {
        writer.write_record([
            row.week.clone(),
            row.weight.to_string(),
            row.muscle.to_string(),
            row.fat.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
