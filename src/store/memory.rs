//! In-memory store: ordered maps behind one mutex, monotonic id counters.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{FoodEntry, NewFoodEntry, NewUser, ProfileUpdate, Store, User};
use crate::clock::local_day_bounds;

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    entries: BTreeMap<i64, FoodEntry>,
    next_user_id: i64,
    next_entry_id: i64,
}

/// Map-backed store. Ids are never reused, even after deletes.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means a panic mid-mutation elsewhere; the
        // maps themselves are still structurally sound.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn insert_entry_at(
        &self,
        new: NewFoodEntry,
        created_at: chrono::DateTime<Utc>,
    ) -> FoodEntry {
        let mut inner = self.lock();
        inner.next_entry_id += 1;
        let entry = FoodEntry {
            id: inner.next_entry_id,
            user_id: new.user_id,
            food_name: new.food_name,
            calories: new.calories,
            protein: new.protein,
            carbs: new.carbs,
            fat: new.fat,
            image_url: new.image_url,
            confidence: new.confidence,
            meal_type: new.meal_type,
            created_at,
        };
        inner.entries.insert(entry.id, entry.clone());
        entry
    }
}

#[async_trait]
impl Store for MemStore {
    async fn user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let mut inner = self.lock();
        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            age: new.age,
            weight: new.weight,
            height: new.height,
            activity_level: new.activity_level,
            goal: new.goal,
            daily_calorie_goal: new.daily_calorie_goal,
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: i64, update: ProfileUpdate) -> anyhow::Result<Option<User>> {
        let mut inner = self.lock();
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(age) = update.age {
            user.age = Some(age);
        }
        if let Some(weight) = update.weight {
            user.weight = Some(weight);
        }
        if let Some(height) = update.height {
            user.height = Some(height);
        }
        if let Some(activity_level) = update.activity_level {
            user.activity_level = Some(activity_level);
        }
        if let Some(goal) = update.goal {
            user.goal = Some(goal);
        }
        if let Some(daily_calorie_goal) = update.daily_calorie_goal {
            user.daily_calorie_goal = Some(daily_calorie_goal);
        }
        Ok(Some(user.clone()))
    }

    async fn entry_by_id(&self, id: i64) -> anyhow::Result<Option<FoodEntry>> {
        Ok(self.lock().entries.get(&id).cloned())
    }

    async fn entries_by_user(&self, user_id: i64) -> anyhow::Result<Vec<FoodEntry>> {
        Ok(self
            .lock()
            .entries
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn entries_by_user_on(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> anyhow::Result<Vec<FoodEntry>> {
        let (start, end) = local_day_bounds(day);
        Ok(self
            .lock()
            .entries
            .values()
            .filter(|e| e.user_id == user_id && e.created_at >= start && e.created_at < end)
            .cloned()
            .collect())
    }

    async fn create_entry(&self, new: NewFoodEntry) -> anyhow::Result<FoodEntry> {
        let mut inner = self.lock();
        inner.next_entry_id += 1;
        let entry = FoodEntry {
            id: inner.next_entry_id,
            user_id: new.user_id,
            food_name: new.food_name,
            calories: new.calories,
            protein: new.protein,
            carbs: new.carbs,
            fat: new.fat,
            image_url: new.image_url,
            confidence: new.confidence,
            meal_type: new.meal_type,
            created_at: Utc::now(),
        };
        inner.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn delete_entry(&self, id: i64, user_id: i64) -> anyhow::Result<bool> {
        let mut inner = self.lock();
        match inner.entries.get(&id) {
            Some(entry) if entry.user_id == user_id => {
                inner.entries.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
            age: None,
            weight: None,
            height: None,
            activity_level: None,
            goal: None,
            daily_calorie_goal: None,
        }
    }

    fn new_entry(user_id: i64, food_name: &str, calories: i32) -> NewFoodEntry {
        NewFoodEntry {
            user_id,
            food_name: food_name.into(),
            calories,
            protein: None,
            carbs: None,
            fat: None,
            image_url: None,
            confidence: None,
            meal_type: None,
        }
    }

    #[tokio::test]
    async fn ids_are_sequential_and_never_reused() {
        let store = MemStore::new();
        let user = store.create_user(new_user("a", "a@x.com")).await.unwrap();
        let first = store.create_entry(new_entry(user.id, "Rice", 130)).await.unwrap();
        let second = store.create_entry(new_entry(user.id, "Egg", 78)).await.unwrap();
        assert_eq!(second.id, first.id + 1);

        assert!(store.delete_entry(second.id, user.id).await.unwrap());
        let third = store.create_entry(new_entry(user.id, "Toast", 90)).await.unwrap();
        assert_eq!(third.id, second.id + 1);
    }

    #[tokio::test]
    async fn optional_fields_default_to_none() {
        let store = MemStore::new();
        let user = store.create_user(new_user("a", "a@x.com")).await.unwrap();
        let entry = store.create_entry(new_entry(user.id, "Rice", 130)).await.unwrap();
        assert!(entry.protein.is_none());
        assert!(entry.carbs.is_none());
        assert!(entry.fat.is_none());
        assert!(entry.image_url.is_none());
        assert!(entry.confidence.is_none());
        assert!(entry.meal_type.is_none());
    }

    #[tokio::test]
    async fn entries_are_scoped_to_their_owner() {
        let store = MemStore::new();
        let alice = store.create_user(new_user("alice", "alice@x.com")).await.unwrap();
        let bob = store.create_user(new_user("bob", "bob@x.com")).await.unwrap();

        let entry = store.create_entry(new_entry(alice.id, "Rice", 130)).await.unwrap();

        assert!(store.entries_by_user(bob.id).await.unwrap().is_empty());
        assert!(!store.delete_entry(entry.id, bob.id).await.unwrap());
        // The failed foreign delete left the entry in place.
        assert_eq!(store.entries_by_user(alice.id).await.unwrap().len(), 1);
        assert!(store.delete_entry(entry.id, alice.id).await.unwrap());
    }

    #[tokio::test]
    async fn delete_of_missing_entry_reports_false() {
        let store = MemStore::new();
        assert!(!store.delete_entry(42, 1).await.unwrap());
    }

    #[tokio::test]
    async fn day_bucketing_covers_exact_bounds() {
        let store = MemStore::new();
        let user = store.create_user(new_user("a", "a@x.com")).await.unwrap();
        let day = chrono::NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let (start, end) = local_day_bounds(day);

        let at_midnight = store.insert_entry_at(new_entry(user.id, "Midnight", 1), start);
        let last_ms = store.insert_entry_at(
            new_entry(user.id, "LastMs", 2),
            end - Duration::milliseconds(1),
        );
        let next_day = store.insert_entry_at(new_entry(user.id, "NextDay", 3), end);

        let found = store.entries_by_user_on(user.id, day).await.unwrap();
        let ids: Vec<i64> = found.iter().map(|e| e.id).collect();
        assert!(ids.contains(&at_midnight.id));
        assert!(ids.contains(&last_ms.id));
        assert!(!ids.contains(&next_day.id));
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let store = MemStore::new();
        let mut new = new_user("a", "a@x.com");
        new.age = Some(30);
        new.goal = Some("maintain".into());
        let user = store.create_user(new).await.unwrap();

        let updated = store
            .update_user(
                user.id,
                ProfileUpdate {
                    daily_calorie_goal: Some(1800),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.daily_calorie_goal, Some(1800));
        assert_eq!(updated.age, Some(30));
        assert_eq!(updated.goal.as_deref(), Some("maintain"));
        assert_eq!(updated.created_at, user.created_at);
        assert_eq!(updated.username, user.username);
    }

    #[tokio::test]
    async fn update_of_missing_user_is_none() {
        let store = MemStore::new();
        let result = store.update_user(7, ProfileUpdate::default()).await.unwrap();
        assert!(result.is_none());
    }
}
