//! End-to-end flows through `Tracker` over an in-memory store.

use chrono::{DateTime, TimeZone, Utc};
use wellday_core::habits::EventKind;
use wellday_core::storage::{keys, MemoryStore};
use wellday_core::{
    Config, DateKey, DayStatus, FixedClock, FoodItem, Meal, NewHabit, PersonalDataPatch, Sex, Tracker,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn noon_utc(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap()
}

fn day(d: u32) -> DateKey {
    DateKey::new(d, 5, 2024)
}

fn tracker_at(store: MemoryStore, now: DateTime<Utc>) -> Tracker<MemoryStore, FixedClock> {
    Tracker::load(store, FixedClock::new(now), Config::default()).unwrap()
}

fn reload(tracker: Tracker<MemoryStore, FixedClock>) -> Tracker<MemoryStore, FixedClock> {
    let now = tracker.clock().at;
    tracker_at(tracker.into_store(), now)
}

// ============================================================================
// Habits
// ============================================================================

#[test]
fn smoking_streak_grows_then_resets_on_relapse() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    let id = t
        .add_habit(NewHabit {
            title: "Smoking".into(),
            icon: Some("🚬".into()),
            ..NewHabit::default()
        })
        .unwrap();

    assert!(t.mark_clean(id, day(20)).unwrap());
    assert_eq!(t.streak(id), 1);

    assert!(t.mark_clean(id, day(19)).unwrap());
    assert_eq!(t.streak(id), 2);

    assert!(t.mark_relapse(id, day(20)).unwrap());
    assert_eq!(t.streak(id), 0);

    let habit = t.habits().habit(id).unwrap();
    let relapses = habit.relapses();
    assert_eq!(relapses.len(), 1);
    assert_eq!(relapses[0].date, day(20));
    assert_eq!(habit.status_of(day(20)), DayStatus::Relapse);
    assert!(habit
        .events()
        .iter()
        .all(|e| !(e.date == day(20) && e.kind == EventKind::Success)));
    assert_eq!(habit.status_of(day(19)), DayStatus::Clean);
}

#[test]
fn habit_log_survives_reload() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    let id = t
        .add_habit(NewHabit {
            title: "Sugar".into(),
            ..NewHabit::default()
        })
        .unwrap();
    t.activate_habit(id).unwrap();
    t.select_habit(id).unwrap();
    t.mark_clean(id, day(18)).unwrap();
    t.mark_clean(id, day(19)).unwrap();
    t.mark_clean(id, day(20)).unwrap();
    let before = t.habits().clone();

    let t = reload(t);
    assert_eq!(t.habits(), &before);
    assert_eq!(t.streak(id), 3);
    assert_eq!(t.habits().selected(), Some(id));
}

#[test]
fn retroactive_relapse_is_stamped_at_noon_and_drives_time_clean() {
    let now = Utc.with_ymd_and_hms(2024, 5, 20, 18, 0, 0).unwrap();
    let mut t = tracker_at(MemoryStore::new(), now);
    let id = t
        .add_habit(NewHabit {
            title: "Soda".into(),
            ..NewHabit::default()
        })
        .unwrap();

    t.mark_relapse(id, day(19)).unwrap();
    // created "now", which is later than yesterday's relapse
    assert_eq!(t.time_clean(id), chrono::Duration::zero());

    let relapse = &t.habits().habit(id).unwrap().relapses()[0];
    assert_eq!(relapse.timestamp, noon_utc(19));
}

#[test]
fn deleting_the_selected_habit_falls_back_to_first_active() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    let ids: Vec<u32> = t.habits().habits().iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    t.activate_habit(2).unwrap();
    t.activate_habit(3).unwrap();
    t.select_habit(2).unwrap();
    t.mark_clean(2, day(20)).unwrap();

    assert!(t.delete_habit(2).unwrap());
    assert_eq!(t.habits().selected(), Some(3));
    assert_eq!(t.habits().active(), &[3]);
    assert!(t.habits().habit(2).is_none());

    let t = reload(t);
    assert_eq!(t.habits().selected(), Some(3));
    assert_eq!(t.habits().habits().len(), 2);
}

#[test]
fn default_catalog_keeps_its_first_creation_time() {
    let t = tracker_at(MemoryStore::new(), noon_utc(10));
    assert!(t.store().raw(keys::HABITS_DATA).is_some());

    let t = tracker_at(t.into_store(), noon_utc(20));
    for habit in t.habits().habits() {
        assert_eq!(habit.created_at, noon_utc(10), "{}", habit.title);
    }
    assert_eq!(t.time_clean(1), chrono::Duration::days(10));
}

#[test]
fn summary_reports_derived_values() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.mark_clean(1, day(19)).unwrap();
    t.mark_clean(1, day(20)).unwrap();
    let summary = t.habit_summary(1).unwrap();
    assert_eq!(summary.title, "Alcohol");
    assert_eq!(summary.today, DayStatus::Clean);
    assert_eq!(summary.streak, 2);
    assert_eq!(summary.total_days, 2);
    assert_eq!(summary.relapses, 0);
}

// ============================================================================
// Water
// ============================================================================

#[test]
fn two_glasses_reach_a_quarter_of_the_goal() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.select_water_day(day(20)).unwrap();
    t.add_water(250).unwrap();
    t.add_water(250).unwrap();

    let current = t.water().ledger.current().unwrap();
    assert_eq!(current.intake(), 500.0);
    assert_eq!(current.glasses.len(), 2);
    assert_eq!(t.water().daily_goal, 2000);
    assert_eq!(t.water().percentage(), 25);
    assert_eq!(t.water().remaining(), 1500);

    let stored: serde_json::Value =
        serde_json::from_str(t.store().raw(keys::WATER_CURRENT_DAY).unwrap()).unwrap();
    assert_eq!(stored["waterIntake"], 500.0);
}

#[test]
fn adding_water_without_a_day_changes_nothing() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    assert!(!t.add_water(250).unwrap());
    assert!(t.water().ledger.days().is_empty());
}

#[test]
fn water_series_fills_missing_days_with_zero() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.select_water_day(day(19)).unwrap();
    t.add_water(300).unwrap();
    t.select_water_day(day(20)).unwrap();
    assert_eq!(t.water_series(&[day(18), day(19), day(20)]), vec![0.0, 300.0, 0.0]);
}

// ============================================================================
// Nutrition
// ============================================================================

#[test]
fn egg_added_then_removed_leaves_exact_zeros() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.select_meal_day(day(20)).unwrap();
    t.add_food(Meal::Breakfast, FoodItem::new("Egg", 70.0, 6.0, 5.0, 1.0))
        .unwrap();
    assert_eq!(t.meals().current().unwrap().total.get("calories"), 70.0);

    let removed = t.remove_food(Meal::Breakfast, 0).unwrap();
    assert_eq!(removed.map(|f| f.name), Some("Egg".to_string()));

    let total = &t.meals().current().unwrap().total;
    for field in ["calories", "proteins", "fats", "carbs"] {
        assert_eq!(total.get(field), 0.0, "{field}");
    }
}

#[test]
fn calorie_series_follows_request_order() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.select_meal_day(day(19)).unwrap();
    t.add_food(Meal::Dinner, FoodItem::new("Pasta", 420.5, 14.0, 9.0, 70.0))
        .unwrap();
    t.add_food(Meal::Lunch, FoodItem::new("Apple", 52.0, 0.3, 0.2, 14.0))
        .unwrap();

    assert_eq!(t.calorie_series(&[day(19), day(20)]), vec![472.5, 0.0]);
    assert_eq!(t.calorie_series(&[day(20), day(19)]), vec![0.0, 472.5]);
}

#[test]
fn out_of_range_removal_is_a_no_op() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.select_meal_day(day(20)).unwrap();
    t.add_food(Meal::Lunch, FoodItem::new("Rice", 130.0, 2.7, 0.3, 28.0))
        .unwrap();
    assert!(t.remove_food(Meal::Lunch, 5).unwrap().is_none());
    assert!(t.remove_food(Meal::Dinner, 0).unwrap().is_none());
    assert_eq!(t.meals().current().unwrap().lunch.len(), 1);
}

#[test]
fn reselecting_a_day_keeps_its_items() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.select_meal_day(day(19)).unwrap();
    t.add_food(Meal::Lunch, FoodItem::new("Soup", 120.0, 4.0, 3.5, 15.0))
        .unwrap();
    t.select_meal_day(day(20)).unwrap();
    let back = t.select_meal_day(day(19)).unwrap();
    assert_eq!(back.lunch.len(), 1);
    assert_eq!(t.meals().days().len(), 2);
}

// ============================================================================
// Profile and products
// ============================================================================

#[test]
fn daily_intake_is_calculated_and_persisted() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.update_profile(PersonalDataPatch {
        age: Some(30.0),
        weight: Some(70.0),
        height: Some(175.0),
        sex: Some(Sex::Male),
        activity: Some(1.55),
    })
    .unwrap();
    assert_eq!(t.calculate_daily_intake().unwrap(), 2555);

    let t = reload(t);
    assert_eq!(t.profile().daily_intake, 2555);
}

#[test]
fn product_import_skips_known_names() {
    let mut t = tracker_at(MemoryStore::new(), noon_utc(20));
    t.add_product(FoodItem::new("Banana", 89.0, 1.1, 0.3, 23.0))
        .unwrap();
    let added = t
        .import_products(vec![
            FoodItem::new("banana", 90.0, 1.0, 0.3, 23.0),
            FoodItem::new("Bread", 265.0, 9.0, 3.2, 49.0),
        ])
        .unwrap();
    assert_eq!(added, 1);

    let t = reload(t);
    assert_eq!(t.products().products().len(), 2);
    assert_eq!(t.products().search("b").len(), 2);
}
