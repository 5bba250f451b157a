use anyhow::Result;
use chrono::NaiveDate;
use gym_tracker_lib::{
    AppService, ChecklistError, Day, DayEdit, FixedClock, InputError, KeyValueStore, Meal,
    MemoryStore, PlanRendering, ProgressEntry, SliceDefaults, SqliteStore, TodaysWorkout, Upsert,
    WeekEdit,
};

// 2025-04-14 was a Monday, 2025-04-19 a Saturday, 2025-04-20 a Sunday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 14).unwrap()
}

// Helper function to create a test service with in-memory store
fn create_test_service() -> Result<AppService> {
    create_test_service_on(monday())
}

fn create_test_service_on(date: NaiveDate) -> Result<AppService> {
    let store = SqliteStore::open_in_memory()?;
    Ok(AppService::with_store(
        Box::new(store),
        Box::new(FixedClock(date)),
    ))
}

#[test]
fn test_empty_store_yields_defaults() -> Result<()> {
    let service = create_test_service()?;
    let defaults = SliceDefaults::default();

    let plan = service.plan_view()?;
    assert_eq!(plan.plan(), &defaults.plan);
    assert!(plan.checklist().is_empty());
    assert_eq!(service.nutrition_view()?.meals(), &defaults.meals);
    let progress = service.progress_view()?;
    assert_eq!(progress.entries(), &defaults.progress);
    assert_eq!(progress.weekly(), &defaults.weekly);

    // Loading alone writes nothing.
    assert!(service.store.keys()?.is_empty());
    Ok(())
}

#[test]
fn test_add_meal_scenario() -> Result<()> {
    let mut service = create_test_service()?;

    let meal = service.add_meal("Protein Shake", "150")?;
    assert_eq!(meal, Meal::new("Protein Shake", 150.0));

    let meals = service.nutrition_view()?.meals().meals().to_vec();
    assert_eq!(meals.len(), 3);
    assert_eq!(meals[2], Meal::new("Protein Shake", 150.0));

    let removed = service.delete_meal(0)?;
    assert_eq!(removed.name, "Oatmeal & Berries");

    let meals = service.nutrition_view()?.meals().meals().to_vec();
    assert_eq!(
        meals,
        vec![
            Meal::new("Chicken Avocado Wrap", 400.0),
            Meal::new("Protein Shake", 150.0),
        ]
    );
    Ok(())
}

#[test]
fn test_add_meal_trims_name() -> Result<()> {
    let mut service = create_test_service()?;
    let meal = service.add_meal("  Greek Yogurt  ", " 120 ")?;
    assert_eq!(meal.name, "Greek Yogurt");
    assert_eq!(meal.calories, 120.0);
    Ok(())
}

#[test]
fn test_invalid_meals_leave_log_unchanged() -> Result<()> {
    let mut service = create_test_service()?;
    let before = service.nutrition_view()?.meals().clone();

    for (name, calories) in [
        ("", "100"),
        ("   ", "100"),
        ("Toast", ""),
        ("Toast", "0"),
        ("Toast", "-20"),
        ("Toast", "lots"),
        ("Toast", "NaN"),
    ] {
        let result = service.add_meal(name, calories);
        assert!(result.is_err(), "accepted ({name:?}, {calories:?})");
        assert!(result.unwrap_err().downcast_ref::<InputError>().is_some());
    }

    assert_eq!(service.nutrition_view()?.meals(), &before);
    Ok(())
}

#[test]
fn test_delete_meal_out_of_range() -> Result<()> {
    let mut service = create_test_service()?;
    let result = service.delete_meal(5);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("No meal at index 5"));
    assert_eq!(service.nutrition_view()?.meals().len(), 2);
    Ok(())
}

#[test]
fn test_duplicate_meal_names_allowed() -> Result<()> {
    let mut service = create_test_service()?;
    service.add_meal("Apple", "80")?;
    service.add_meal("Apple", "80")?;
    let meals = service.nutrition_view()?.meals().clone();
    assert_eq!(meals.len(), 4);
    assert_eq!(meals.meals()[2], meals.meals()[3]);
    Ok(())
}

#[test]
fn test_progress_overwrite_scenario() -> Result<()> {
    let mut store = MemoryStore::new();
    store.set(
        "monochrome-gym-progress",
        r#"[{"date":"2025-04-13","value":60},{"date":"2025-04-14","value":62}]"#,
    )?;
    let mut service = AppService::with_store(Box::new(store), Box::new(FixedClock(monday())));

    let outcome = service.log_progress("2025-04-13", "61")?;
    assert_eq!(outcome, Upsert::Replaced);
    assert_eq!(
        service.progress_view()?.entries().entries(),
        &[
            ProgressEntry::new("2025-04-13", 61.0),
            ProgressEntry::new("2025-04-14", 62.0),
        ]
    );
    Ok(())
}

#[test]
fn test_progress_insert_keeps_sorted() -> Result<()> {
    let mut service = create_test_service()?;
    let before = service.progress_view()?.entries().len();

    assert_eq!(service.log_progress("2025-04-01", "58.5")?, Upsert::Inserted);
    assert_eq!(service.log_progress("2025-04-12", "65")?, Upsert::Inserted);

    let entries = service.progress_view()?.entries().clone();
    assert_eq!(entries.len(), before + 2);
    assert_eq!(entries.entries()[0], ProgressEntry::new("2025-04-01", 58.5));
    assert!(entries
        .entries()
        .windows(2)
        .all(|w| w[0].date <= w[1].date));
    Ok(())
}

#[test]
fn test_progress_rejects_bad_input() -> Result<()> {
    let mut service = create_test_service()?;
    let before = service.progress_view()?.entries().clone();

    assert!(service.log_progress("", "60").is_err());
    assert!(service.log_progress("2025-04-13", "").is_err());
    assert!(service.log_progress("2025-04-13", "heavy").is_err());
    assert!(service.log_progress("2025-04-13", "NaN").is_err());

    assert_eq!(service.progress_view()?.entries(), &before);
    Ok(())
}

#[test]
fn test_edit_day_persists() -> Result<()> {
    let mut service = create_test_service()?;
    service.edit_day(
        Day::Monday,
        &DayEdit {
            workout: Some("Push"),
            exercises: Some("Bench Press, Overhead Press, Dips"),
        },
    )?;

    let view = service.plan_view()?;
    let monday = view.plan().day(Day::Monday);
    assert_eq!(monday.workout, "Push");
    assert_eq!(monday.exercises, "Bench Press, Overhead Press, Dips");
    // The view handed back is read-only again.
    assert!(matches!(view.render(), PlanRendering::ReadOnly(_)));
    // Other days untouched.
    assert_eq!(
        view.plan().day(Day::Tuesday),
        SliceDefaults::default().plan.day(Day::Tuesday)
    );
    Ok(())
}

#[test]
fn test_edit_day_requires_fields() -> Result<()> {
    let mut service = create_test_service()?;
    let result = service.edit_day(Day::Friday, &DayEdit::default());
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("No fields provided"));
    Ok(())
}

#[test]
fn test_todays_checklist_roundtrip() -> Result<()> {
    let mut service = create_test_service()?;

    assert!(service.toggle_exercise("Dips")?);

    match service.todays_workout()? {
        TodaysWorkout::Checklist { day, items, .. } => {
            assert_eq!(day, Day::Monday);
            let names: Vec<_> = items.iter().map(|i| i.exercise.as_str()).collect();
            assert_eq!(names, ["Bench Press", "Dips"]);
            assert!(!items[0].done);
            assert!(items[1].done);
        }
        other => panic!("expected checklist, got {other:?}"),
    }

    assert!(!service.toggle_exercise("Dips")?);
    assert!(service.toggle_exercise("  ").is_err());
    Ok(())
}

#[test]
fn test_checklist_rejects_exercises_not_planned_today() -> Result<()> {
    let mut service = create_test_service()?;

    let err = service.toggle_exercise("Squats").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ChecklistError>(),
        Some(ChecklistError::NotPlanned { day: Day::Monday, .. })
    ));
    assert!(service.store.keys()?.is_empty());
    assert!(service.plan_view()?.checklist().is_empty());
    Ok(())
}

#[test]
fn test_saturday_has_no_checklist() -> Result<()> {
    let mut service = create_test_service_on(NaiveDate::from_ymd_opt(2025, 4, 19).unwrap())?;

    for exercise in ["Sprints", "Not In Plan"] {
        let err = service.toggle_exercise(exercise).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ChecklistError>(),
            Some(ChecklistError::NoChecklist(Day::Saturday))
        ));
    }
    assert!(service.store.keys()?.is_empty());
    Ok(())
}

#[test]
fn test_progress_rejects_future_dates() -> Result<()> {
    let mut service = create_test_service()?;
    let before = service.progress_view()?.entries().clone();

    let err = service.log_progress("2025-04-15", "64").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::FutureDate(d)) if *d == NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()
    ));
    let err = service.log_progress("15.04.2025", "64").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::InvalidDate(_))
    ));
    assert_eq!(service.progress_view()?.entries(), &before);

    // Today itself is allowed.
    assert_eq!(service.log_progress("2025-04-14", "62.4")?, Upsert::Replaced);
    Ok(())
}

#[test]
fn test_saturday_shows_badges() -> Result<()> {
    let service = create_test_service_on(NaiveDate::from_ymd_opt(2025, 4, 19).unwrap())?;
    match service.todays_workout()? {
        TodaysWorkout::Badges {
            day,
            workout,
            exercises,
        } => {
            assert_eq!(day, Day::Saturday);
            assert_eq!(workout, "Cardio/HIIT");
            assert_eq!(exercises, ["Sprints", "Jump Rope"]);
        }
        other => panic!("expected badges, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_sunday_rest_marker_is_a_checklist_item() -> Result<()> {
    let service = create_test_service_on(NaiveDate::from_ymd_opt(2025, 4, 20).unwrap())?;
    match service.todays_workout()? {
        TodaysWorkout::Checklist { items, .. } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].exercise, "-");
        }
        other => panic!("expected checklist, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_edit_week() -> Result<()> {
    let mut service = create_test_service()?;
    let row = service.edit_week(
        1,
        &WeekEdit {
            weight: Some("68.9"),
            fat: Some("abc"),
            ..Default::default()
        },
    )?;
    assert_eq!(row.week, "Week 2");
    assert_eq!(row.weight, 68.9);
    assert_eq!(row.muscle, 41.0);
    assert_eq!(row.fat, 0.0);

    let stored = service.progress_view()?.weekly().rows()[1].clone();
    assert_eq!(stored, row);
    Ok(())
}

#[test]
fn test_edit_week_unknown_row() -> Result<()> {
    let mut service = create_test_service()?;
    let before = service.progress_view()?.weekly().clone();
    let result = service.edit_week(
        9,
        &WeekEdit {
            weight: Some("70"),
            ..Default::default()
        },
    );
    assert!(result.is_err());
    assert_eq!(service.progress_view()?.weekly(), &before);
    Ok(())
}

#[test]
fn test_state_survives_reopening_the_store() -> Result<()> {
    let mut service = create_test_service()?;
    service.add_meal("Rice Bowl", "550")?;
    service.log_progress("2025-04-12", "63.2")?;
    service.edit_day(
        Day::Sunday,
        &DayEdit {
            workout: Some("Mobility"),
            exercises: Some("Stretching"),
        },
    )?;

    // A second service over the same store sees the same state.
    let placeholder: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
    let store = std::mem::replace(&mut service.store, placeholder);
    let reopened = AppService::with_store(store, Box::new(FixedClock(monday())));

    let mut expected_meals = SliceDefaults::default().meals;
    expected_meals.push(Meal::new("Rice Bowl", 550.0));
    assert_eq!(reopened.nutrition_view()?.meals(), &expected_meals);
    assert!(reopened
        .progress_view()?
        .entries()
        .contains_date("2025-04-12"));
    assert_eq!(
        reopened.plan_view()?.plan().day(Day::Sunday).workout,
        "Mobility"
    );
    Ok(())
}

#[test]
fn test_color_scheme_preference() -> Result<()> {
    let mut service = create_test_service()?;
    let dir = std::env::temp_dir().join(format!("gym-tracker-test-{}", std::process::id()));
    service.config_path = dir.join("config.toml");

    service.set_color_scheme(gym_tracker_lib::ColorSchemePreference::Dark)?;
    assert_eq!(service.color_scheme(), gym_tracker_lib::ColorScheme::Dark);

    let reloaded = gym_tracker_lib::load_config_util(&service.config_path)?;
    assert_eq!(
        reloaded.color_scheme,
        gym_tracker_lib::ColorSchemePreference::Dark
    );

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
