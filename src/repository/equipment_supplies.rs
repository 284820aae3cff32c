//! Equipment supplies (loans) repository
//!
//! Every write that changes whether a loan is active also moves the referenced
//! equipment's status, inside the same transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::is_unique_violation;
use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::Equipment,
        equipment_supply::{EquipmentSupply, NewEquipmentSupply, SupplyStatus, UpdateEquipmentSupply},
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EquipmentSupplyStore: Send + Sync {
    /// List loans, most recent first, optionally filtered by status
    async fn list(&self, status: Option<SupplyStatus>) -> AppResult<Vec<EquipmentSupply>>;

    async fn get_by_id(&self, id: Uuid) -> AppResult<EquipmentSupply>;

    /// Claim available equipment (available -> supplied) and record an active
    /// loan for it. Fails with `Conflict` when the equipment is no longer
    /// available.
    async fn create_active(
        &self,
        equipment_id: Uuid,
        data: &NewEquipmentSupply,
        supply_date: DateTime<Utc>,
    ) -> AppResult<EquipmentSupply>;

    /// Patch a loan without touching equipment
    async fn update(&self, id: Uuid, data: &UpdateEquipmentSupply) -> AppResult<EquipmentSupply>;

    /// Apply `data` to an active loan, mark it returned at `returned_at` and
    /// make its equipment available again
    async fn mark_returned(
        &self,
        id: Uuid,
        data: &UpdateEquipmentSupply,
        returned_at: DateTime<Utc>,
    ) -> AppResult<EquipmentSupply>;

    /// Delete a loan, releasing its equipment when the loan was active.
    /// Returns the deleted record.
    async fn delete(&self, id: Uuid) -> AppResult<EquipmentSupply>;
}

#[derive(Clone)]
pub struct EquipmentSuppliesRepository {
    pool: Pool<Postgres>,
}

impl EquipmentSuppliesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Equipment supply not found".to_string())
}

fn map_write_error(error: sqlx::Error, equipment: Option<&str>) -> AppError {
    if is_unique_violation(&error) {
        AppError::Conflict(match equipment {
            Some(unique_id) => format!("Equipment {} already has an active supply", unique_id),
            None => "Equipment already has an active supply".to_string(),
        })
    } else {
        AppError::Database(error)
    }
}

async fn release_equipment(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    equipment_id: Uuid,
) -> Result<(), sqlx::Error> {
    // Equipment may have been deleted since the loan was made
    sqlx::query("UPDATE equipment SET status = 'available', updated_at = NOW() WHERE id = $1")
        .bind(equipment_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

#[async_trait]
impl EquipmentSupplyStore for EquipmentSuppliesRepository {
    async fn list(&self, status: Option<SupplyStatus>) -> AppResult<Vec<EquipmentSupply>> {
        let rows = sqlx::query_as::<_, EquipmentSupply>(
            r#"
            SELECT * FROM equipment_supplies
            WHERE $1::supply_status IS NULL OR status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<EquipmentSupply> {
        sqlx::query_as::<_, EquipmentSupply>("SELECT * FROM equipment_supplies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn create_active(
        &self,
        equipment_id: Uuid,
        data: &NewEquipmentSupply,
        supply_date: DateTime<Utc>,
    ) -> AppResult<EquipmentSupply> {
        let mut tx = self.pool.begin().await?;

        // Conditional claim: only one writer can move the item out of `available`
        let equipment = sqlx::query_as::<_, Equipment>(
            r#"
            UPDATE equipment SET status = 'supplied', updated_at = NOW()
            WHERE id = $1 AND status = 'available'
            RETURNING *
            "#,
        )
        .bind(equipment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict("Equipment is no longer available".to_string()))?;

        let supply = sqlx::query_as::<_, EquipmentSupply>(
            r#"
            INSERT INTO equipment_supplies (
                id, equipment_id, equipment_unique_id, equipment_name,
                patient_name, patient_phone, patient_address,
                supply_date, return_date, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(equipment.id)
        .bind(&equipment.unique_id)
        .bind(&equipment.name)
        .bind(&data.patient_name)
        .bind(&data.patient_phone)
        .bind(&data.patient_address)
        .bind(supply_date)
        .bind(&data.return_date)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, Some(&equipment.unique_id)))?;

        tx.commit().await?;
        Ok(supply)
    }

    async fn update(&self, id: Uuid, data: &UpdateEquipmentSupply) -> AppResult<EquipmentSupply> {
        sqlx::query_as::<_, EquipmentSupply>(
            r#"
            UPDATE equipment_supplies SET
                patient_name = COALESCE($2, patient_name),
                patient_phone = COALESCE($3, patient_phone),
                patient_address = COALESCE($4, patient_address),
                return_date = COALESCE($5, return_date),
                actual_return_date = COALESCE($6, actual_return_date),
                status = COALESCE($7, status),
                notes = COALESCE($8, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.patient_name)
        .bind(&data.patient_phone)
        .bind(&data.patient_address)
        .bind(&data.return_date)
        .bind(data.actual_return_date)
        .bind(data.status)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, None))?
        .ok_or_else(not_found)
    }

    async fn mark_returned(
        &self,
        id: Uuid,
        data: &UpdateEquipmentSupply,
        returned_at: DateTime<Utc>,
    ) -> AppResult<EquipmentSupply> {
        let mut tx = self.pool.begin().await?;

        let supply = sqlx::query_as::<_, EquipmentSupply>(
            r#"
            UPDATE equipment_supplies SET
                patient_name = COALESCE($2, patient_name),
                patient_phone = COALESCE($3, patient_phone),
                patient_address = COALESCE($4, patient_address),
                return_date = COALESCE($5, return_date),
                notes = COALESCE($6, notes),
                actual_return_date = $7,
                status = 'returned',
                updated_at = NOW()
            WHERE id = $1 AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.patient_name)
        .bind(&data.patient_phone)
        .bind(&data.patient_address)
        .bind(&data.return_date)
        .bind(&data.notes)
        .bind(returned_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Conflict("Equipment supply is no longer active".to_string()))?;

        release_equipment(&mut tx, supply.equipment_id).await?;

        tx.commit().await?;
        Ok(supply)
    }

    async fn delete(&self, id: Uuid) -> AppResult<EquipmentSupply> {
        let mut tx = self.pool.begin().await?;

        let supply = sqlx::query_as::<_, EquipmentSupply>(
            "DELETE FROM equipment_supplies WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(not_found)?;

        if supply.status == SupplyStatus::Active {
            release_equipment(&mut tx, supply.equipment_id).await?;
        }

        tx.commit().await?;
        Ok(supply)
    }
}
