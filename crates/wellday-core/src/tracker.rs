//! The per-process service object.
//!
//! A [`Tracker`] owns the store gateway, the clock and every domain state.
//! Each mutating method applies the change in memory and then writes the
//! whole affected domain back before returning, so the stored values always
//! match what a fresh [`Tracker::load`] would rebuild.

use chrono::{DateTime, Duration, Utc};

use crate::clock::{Clock, SystemClock};
use crate::date::DateKey;
use crate::error::Result;
use crate::habits::{event_timestamp, Habit, HabitBook, HabitSummary};
use crate::ledger::nutrition::CALORIES;
use crate::ledger::water::WATER_INTAKE;
use crate::ledger::{FoodItem, Glass, Meal, MealDay, MealLedger, WaterDay, WaterLedger, WaterLog};
use crate::products::{Product, ProductCatalog};
use crate::profile::{PersonalData, PersonalDataPatch};
use crate::storage::migrations::{migrate_habits, LegacyHabitMarks};
use crate::storage::{keys, Config, Gateway, KeyValueStore};

/// Input for [`Tracker::add_habit`]. Unset icon and color fall back to the
/// configured defaults.
#[derive(Debug, Clone, Default)]
pub struct NewHabit {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub color: Option<String>,
}

pub struct Tracker<S, C = SystemClock> {
    gateway: Gateway<S>,
    clock: C,
    config: Config,
    meals: MealLedger,
    water: WaterLog,
    habits: HabitBook,
    profile: PersonalData,
    products: ProductCatalog,
}

impl<S: KeyValueStore, C: Clock> Tracker<S, C> {
    /// Load every domain from `store`. Absent or malformed values load as
    /// the domain default; habit records are migrated first.
    ///
    /// # Errors
    /// Returns an error only if the store backend fails.
    pub fn load(store: S, clock: C, config: Config) -> Result<Self> {
        let mut gateway = Gateway::new(store);

        let meals = MealLedger::restore(
            gateway.load_or_default(keys::CALENDAR_DATA)?,
            gateway.load_optional::<MealDay>(keys::CALENDAR_CURRENT_DAY)?,
        );

        let water = WaterLog {
            ledger: WaterLedger::restore(
                gateway.load_or_default(keys::WATER_CALENDAR)?,
                gateway.load_optional::<WaterDay>(keys::WATER_CURRENT_DAY)?,
            ),
            daily_goal: gateway
                .load::<u32>(keys::WATER_DAILY_GOAL)?
                .unwrap_or(config.water.daily_goal),
        };

        let habits = Self::load_habits(&mut gateway, clock.now())?;
        let profile = gateway.load_or_default(keys::PERSONAL_DATA)?;
        let products = ProductCatalog::new(gateway.load_or_default(keys::PRODUCTS_DATA)?);

        Ok(Self {
            gateway,
            clock,
            config,
            meals,
            water,
            habits,
            profile,
            products,
        })
    }

    fn load_habits(gateway: &mut Gateway<S>, now: DateTime<Utc>) -> Result<HabitBook> {
        let legacy = LegacyHabitMarks {
            calendar: gateway.load_value(keys::HABITS_CALENDAR)?,
            tracked: gateway.load_value(keys::HABITS_TRACKED)?,
        };
        let active: Vec<u32> = gateway.load_or_default(keys::HABITS_ACTIVE)?;
        let selected = gateway.load_optional::<u32>(keys::HABITS_SELECTED)?;

        let stored: Option<Vec<Habit>> =
            gateway.load_migrated(keys::HABITS_DATA, |records| migrate_habits(records, &legacy, now))?;
        if let Some(habits) = stored {
            return Ok(HabitBook::restore(habits, active, selected));
        }

        let defaults = HabitBook::with_defaults(now);
        if legacy.calendar.is_none() && legacy.tracked.is_none() {
            // Stored so the catalog keeps its first creation time.
            gateway.save(keys::HABITS_DATA, defaults.habits())?;
            return Ok(defaults);
        }

        // Marks from the status-map era refer to the built-in catalog, which
        // was never stored. Run the default catalog through migration as if
        // it were a legacy record set.
        let mut seed = serde_json::to_value(defaults.habits())?;
        for record in seed.as_array_mut().into_iter().flatten() {
            if let Some(obj) = record.as_object_mut() {
                obj.remove("schemaVersion");
            }
        }
        migrate_habits(&mut seed, &legacy, now);
        let habits: Vec<Habit> = serde_json::from_value(seed)?;
        tracing::info!(count = habits.len(), "seeded default habits from legacy marks");
        gateway.save(keys::HABITS_DATA, &habits)?;
        Ok(HabitBook::restore(habits, active, selected))
    }

    pub fn store(&self) -> &S {
        self.gateway.store()
    }

    pub fn into_store(self) -> S {
        self.gateway.into_inner()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ---- nutrition -------------------------------------------------------

    pub fn meals(&self) -> &MealLedger {
        &self.meals
    }

    fn persist_meals(&mut self) -> Result<()> {
        self.gateway.save(keys::CALENDAR_DATA, self.meals.days())?;
        self.gateway
            .save(keys::CALENDAR_CURRENT_DAY, &self.meals.current())
    }

    /// Make `date` the current meal day, creating it on first use.
    pub fn select_meal_day(&mut self, date: DateKey) -> Result<&MealDay> {
        let idx = self.meals.select_day(date);
        self.persist_meals()?;
        Ok(&self.meals.days()[idx])
    }

    /// Add `item` to `meal` of the current day. `false` when no day is
    /// selected.
    ///
    /// # Errors
    /// Rejects items with non-finite amounts before anything changes.
    pub fn add_food(&mut self, meal: Meal, item: FoodItem) -> Result<bool> {
        item.validate()?;
        let added = self.meals.add_item(meal, item);
        self.persist_meals()?;
        Ok(added)
    }

    /// Remove the item at position `index` of `meal` on the current day.
    ///
    /// Positions shift after every removal; re-read the day before removing
    /// again. Out-of-range positions remove nothing.
    pub fn remove_food(&mut self, meal: Meal, index: usize) -> Result<Option<FoodItem>> {
        let removed = self.meals.remove_item(meal, index);
        self.persist_meals()?;
        Ok(removed)
    }

    /// Calories per requested day, 0 for days without entries.
    pub fn calorie_series(&self, dates: &[DateKey]) -> Vec<f64> {
        self.meals.series_for(dates, CALORIES)
    }

    // ---- water -----------------------------------------------------------

    pub fn water(&self) -> &WaterLog {
        &self.water
    }

    fn persist_water(&mut self) -> Result<()> {
        self.gateway
            .save(keys::WATER_CALENDAR, self.water.ledger.days())?;
        self.gateway
            .save(keys::WATER_CURRENT_DAY, &self.water.ledger.current())?;
        self.gateway
            .save(keys::WATER_DAILY_GOAL, &self.water.daily_goal)
    }

    pub fn select_water_day(&mut self, date: DateKey) -> Result<&WaterDay> {
        let idx = self.water.ledger.select_day(date);
        self.persist_water()?;
        Ok(&self.water.ledger.days()[idx])
    }

    /// Log a glass of `amount` ml on the current day, stamped with the local
    /// time. `false` when no day is selected.
    pub fn add_water(&mut self, amount: u32) -> Result<bool> {
        let glass = Glass {
            amount,
            time: self.clock.time_label(),
        };
        let added = self.water.ledger.add_item((), glass);
        self.persist_water()?;
        Ok(added)
    }

    /// Remove the glass at position `index` of the current day. Same
    /// positional contract as [`Tracker::remove_food`].
    pub fn remove_water(&mut self, index: usize) -> Result<Option<Glass>> {
        let removed = self.water.ledger.remove_item((), index);
        self.persist_water()?;
        Ok(removed)
    }

    pub fn set_water_goal(&mut self, goal_ml: u32) -> Result<()> {
        self.water.daily_goal = goal_ml;
        self.persist_water()
    }

    /// Milliliters per requested day, 0 for days without entries.
    pub fn water_series(&self, dates: &[DateKey]) -> Vec<f64> {
        self.water.ledger.series_for(dates, WATER_INTAKE)
    }

    // ---- habits ----------------------------------------------------------

    pub fn habits(&self) -> &HabitBook {
        &self.habits
    }

    fn persist_habits(&mut self) -> Result<()> {
        self.gateway.save(keys::HABITS_DATA, self.habits.habits())?;
        self.gateway.save(keys::HABITS_ACTIVE, self.habits.active())?;
        self.gateway
            .save(keys::HABITS_SELECTED, &self.habits.selected())
    }

    pub fn add_habit(&mut self, habit: NewHabit) -> Result<u32> {
        let icon = habit
            .icon
            .unwrap_or_else(|| self.config.habits.default_icon.clone());
        let color = habit
            .color
            .unwrap_or_else(|| self.config.habits.default_color.clone());
        let id = self.habits.add_habit(
            &habit.title,
            &habit.description,
            &icon,
            &color,
            self.clock.now(),
        );
        self.persist_habits()?;
        Ok(id)
    }

    pub fn delete_habit(&mut self, id: u32) -> Result<bool> {
        let deleted = self.habits.delete_habit(id);
        self.persist_habits()?;
        Ok(deleted)
    }

    pub fn activate_habit(&mut self, id: u32) -> Result<bool> {
        let changed = self.habits.activate(id);
        self.persist_habits()?;
        Ok(changed)
    }

    pub fn deactivate_habit(&mut self, id: u32) -> Result<bool> {
        let changed = self.habits.deactivate(id);
        self.persist_habits()?;
        Ok(changed)
    }

    pub fn select_habit(&mut self, id: u32) -> Result<bool> {
        let changed = self.habits.select(id);
        self.persist_habits()?;
        Ok(changed)
    }

    /// Mark `date` clean. No-op when the day already has a mark.
    pub fn mark_clean(&mut self, id: u32, date: DateKey) -> Result<bool> {
        let at = event_timestamp(date, self.clock.today(), self.clock.now());
        let changed = self.habits.mark_clean(id, date, at);
        self.persist_habits()?;
        Ok(changed)
    }

    /// Mark `date` as a relapse, replacing a clean mark on that day.
    pub fn mark_relapse(&mut self, id: u32, date: DateKey) -> Result<bool> {
        let at = event_timestamp(date, self.clock.today(), self.clock.now());
        let changed = self.habits.mark_relapse(id, date, at);
        self.persist_habits()?;
        Ok(changed)
    }

    pub fn clear_mark(&mut self, id: u32, date: DateKey) -> Result<bool> {
        let changed = self.habits.clear_mark(id, date);
        self.persist_habits()?;
        Ok(changed)
    }

    /// Current streak, 0 for unknown habits.
    pub fn streak(&self, id: u32) -> u32 {
        self.habits
            .habit(id)
            .map_or(0, |h| h.streak(self.clock.today()))
    }

    /// Time clean, zero for unknown habits.
    pub fn time_clean(&self, id: u32) -> Duration {
        self.habits
            .habit(id)
            .map_or_else(Duration::zero, |h| h.time_clean(self.clock.now()))
    }

    pub fn habit_summary(&self, id: u32) -> Option<HabitSummary> {
        self.habits
            .habit(id)
            .map(|h| h.summary(self.clock.today(), self.clock.now()))
    }

    // ---- profile ---------------------------------------------------------

    pub fn profile(&self) -> &PersonalData {
        &self.profile
    }

    pub fn update_profile(&mut self, patch: PersonalDataPatch) -> Result<&PersonalData> {
        self.profile.apply(patch);
        self.gateway.save(keys::PERSONAL_DATA, &self.profile)?;
        Ok(&self.profile)
    }

    pub fn calculate_daily_intake(&mut self) -> Result<i64> {
        let intake = self.profile.calculate_daily_intake();
        self.gateway.save(keys::PERSONAL_DATA, &self.profile)?;
        Ok(intake)
    }

    // ---- products --------------------------------------------------------

    pub fn products(&self) -> &ProductCatalog {
        &self.products
    }

    pub fn add_product(&mut self, product: Product) -> Result<()> {
        product.validate()?;
        self.products.add(product);
        self.gateway
            .save(keys::PRODUCTS_DATA, self.products.products())
    }

    /// Add the products not yet in the catalog; returns how many were new.
    /// A batch holding any non-finite amount is rejected whole.
    pub fn import_products(&mut self, products: Vec<Product>) -> Result<usize> {
        products.iter().try_for_each(Product::validate)?;
        let added = self.products.import(products);
        self.gateway
            .save(keys::PRODUCTS_DATA, self.products.products())?;
        Ok(added)
    }
}
