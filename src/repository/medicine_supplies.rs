//! Medicine supplies repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::medicine_supply::{CreateMedicineSupply, MedicineSupply, UpdateMedicineSupply},
};

#[derive(Clone)]
pub struct MedicineSuppliesRepository {
    pool: Pool<Postgres>,
}

fn not_found() -> AppError {
    AppError::NotFound("Medicine supply not found".to_string())
}

impl MedicineSuppliesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<MedicineSupply>> {
        let rows = sqlx::query_as::<_, MedicineSupply>(
            "SELECT * FROM medicine_supplies ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MedicineSupply> {
        sqlx::query_as::<_, MedicineSupply>("SELECT * FROM medicine_supplies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    /// Insert a dispensation; `data.quantity` must already carry its default
    pub async fn create(
        &self,
        data: &CreateMedicineSupply,
        created_by: Option<Uuid>,
    ) -> AppResult<MedicineSupply> {
        let supply = sqlx::query_as::<_, MedicineSupply>(
            r#"
            INSERT INTO medicine_supplies (id, patient_name, medicine, quantity, phone, address, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.patient_name)
        .bind(&data.medicine)
        .bind(data.quantity)
        .bind(&data.phone)
        .bind(&data.address)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(supply)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateMedicineSupply) -> AppResult<MedicineSupply> {
        sqlx::query_as::<_, MedicineSupply>(
            r#"
            UPDATE medicine_supplies SET
                patient_name = COALESCE($2, patient_name),
                medicine = COALESCE($3, medicine),
                quantity = COALESCE($4, quantity),
                phone = COALESCE($5, phone),
                address = COALESCE($6, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.patient_name)
        .bind(&data.medicine)
        .bind(data.quantity)
        .bind(&data.phone)
        .bind(&data.address)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM medicine_supplies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
