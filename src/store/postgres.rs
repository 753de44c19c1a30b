//! Postgres store: same contract as [`MemStore`], durable backend.

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{postgres::PgPoolOptions, PgPool};

use super::{FoodEntry, NewFoodEntry, NewUser, ProfileUpdate, Store, User};
use crate::clock::local_day_bounds;

const USER_COLUMNS: &str = "id, username, email, password_hash, age, weight, height, \
                            activity_level, goal, daily_calorie_goal, created_at";
const ENTRY_COLUMNS: &str = "id, user_id, food_name, calories, protein, carbs, fat, \
                             image_url, confidence, meal_type, created_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn user_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash, age, weight, height,
                               activity_level, goal, daily_calorie_goal)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.username)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.age)
        .bind(new.weight)
        .bind(new.height)
        .bind(&new.activity_level)
        .bind(&new.goal)
        .bind(new.daily_calorie_goal)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn update_user(&self, id: i64, update: ProfileUpdate) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                age = COALESCE($2, age),
                weight = COALESCE($3, weight),
                height = COALESCE($4, height),
                activity_level = COALESCE($5, activity_level),
                goal = COALESCE($6, goal),
                daily_calorie_goal = COALESCE($7, daily_calorie_goal)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.age)
        .bind(update.weight)
        .bind(update.height)
        .bind(&update.activity_level)
        .bind(&update.goal)
        .bind(update.daily_calorie_goal)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn entry_by_id(&self, id: i64) -> anyhow::Result<Option<FoodEntry>> {
        let entry = sqlx::query_as::<_, FoodEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM food_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn entries_by_user(&self, user_id: i64) -> anyhow::Result<Vec<FoodEntry>> {
        let rows = sqlx::query_as::<_, FoodEntry>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM food_entries WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn entries_by_user_on(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> anyhow::Result<Vec<FoodEntry>> {
        let (start, end) = local_day_bounds(day);
        let rows = sqlx::query_as::<_, FoodEntry>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS} FROM food_entries
            WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
            ORDER BY id
            "#
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_entry(&self, new: NewFoodEntry) -> anyhow::Result<FoodEntry> {
        let entry = sqlx::query_as::<_, FoodEntry>(&format!(
            r#"
            INSERT INTO food_entries (user_id, food_name, calories, protein, carbs, fat,
                                      image_url, confidence, meal_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(&new.food_name)
        .bind(new.calories)
        .bind(new.protein)
        .bind(new.carbs)
        .bind(new.fat)
        .bind(&new.image_url)
        .bind(new.confidence)
        .bind(&new.meal_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn delete_entry(&self, id: i64, user_id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM food_entries WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
