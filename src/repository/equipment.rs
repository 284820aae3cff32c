//! Equipment repository for database operations

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{is_unique_violation, lock_sequence};
use crate::{
    error::{AppError, AppResult},
    models::equipment::{allocate_unique_ids, Equipment, EquipmentStatus, NewEquipment, UpdateEquipment},
};

/// Persistence operations the equipment registry relies on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentStore: Send + Sync {
    /// List equipment, most recent first, optionally filtered by status
    async fn list(&self, status: Option<EquipmentStatus>) -> AppResult<Vec<Equipment>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment>;

    async fn get_by_unique_id(&self, unique_id: &str) -> AppResult<Equipment>;

    /// Allocate `count` sequential unique ids under `data.prefix` and insert one
    /// available record per id
    async fn create_batch(&self, data: &NewEquipment, count: u32) -> AppResult<Vec<Equipment>>;

    async fn update(&self, id: Uuid, data: &UpdateEquipment) -> AppResult<Equipment>;

    async fn set_status(&self, id: Uuid, status: EquipmentStatus) -> AppResult<Equipment>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Number of available items per equipment name
    async fn available_count_by_name(&self) -> AppResult<BTreeMap<String, i64>>;
}

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Equipment not found".to_string())
}

#[async_trait]
impl EquipmentStore for EquipmentRepository {
    async fn list(&self, status: Option<EquipmentStatus>) -> AppResult<Vec<Equipment>> {
        let rows = sqlx::query_as::<_, Equipment>(
            r#"
            SELECT * FROM equipment
            WHERE $1::equipment_status IS NULL OR status = $1
            ORDER BY created_at DESC, unique_id DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn get_by_unique_id(&self, unique_id: &str) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE unique_id = $1")
            .bind(unique_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn create_batch(&self, data: &NewEquipment, count: u32) -> AppResult<Vec<Equipment>> {
        let mut tx = self.pool.begin().await?;
        lock_sequence(&mut tx, &format!("equipment:{}", data.prefix)).await?;

        let existing: Vec<String> = sqlx::query_scalar(
            "SELECT unique_id FROM equipment WHERE starts_with(unique_id, $1)",
        )
        .bind(format!("{}-", data.prefix))
        .fetch_all(&mut *tx)
        .await?;

        let unique_ids = allocate_unique_ids(&data.prefix, existing.iter().map(String::as_str), count);

        let mut created = Vec::with_capacity(unique_ids.len());
        for unique_id in unique_ids {
            let row = sqlx::query_as::<_, Equipment>(
                r#"
                INSERT INTO equipment (id, unique_id, serial_no, name, quantity, purchased_from, place, phone, status, created_by)
                VALUES ($1, $2, $3, $4, 1, $5, $6, $7, 'available', $8)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&unique_id)
            .bind(&data.prefix)
            .bind(&data.name)
            .bind(&data.purchased_from)
            .bind(&data.place)
            .bind(&data.phone)
            .bind(data.created_by)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict(format!("Equipment {} already exists", unique_id))
                } else {
                    AppError::Database(e)
                }
            })?;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: Uuid, data: &UpdateEquipment) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment SET
                serial_no = COALESCE($2, serial_no),
                name = COALESCE($3, name),
                purchased_from = COALESCE($4, purchased_from),
                place = COALESCE($5, place),
                phone = COALESCE($6, phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.serial_no)
        .bind(&data.name)
        .bind(&data.purchased_from)
        .bind(&data.place)
        .bind(&data.phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn set_status(&self, id: Uuid, status: EquipmentStatus) -> AppResult<Equipment> {
        sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }

    async fn available_count_by_name(&self) -> AppResult<BTreeMap<String, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT name, COUNT(*) FROM equipment
            WHERE status = 'available'
            GROUP BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }
}
