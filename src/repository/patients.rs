//! Patients repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{is_unique_violation, lock_sequence};
use crate::{
    error::{AppError, AppResult},
    models::patient::{next_register_id, register_year, CreatePatient, Patient, UpdatePatient},
};

#[derive(Clone)]
pub struct PatientsRepository {
    pool: Pool<Postgres>,
}

fn not_found() -> AppError {
    AppError::NotFound("Patient not found".to_string())
}

impl PatientsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List patients, most recent first
    pub async fn list(&self) -> AppResult<Vec<Patient>> {
        let rows = sqlx::query_as::<_, Patient>("SELECT * FROM patients ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Patient> {
        sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    /// Create a patient, allocating the next `NN/YY` register id for the year
    /// of `now`
    pub async fn create(
        &self,
        data: &CreatePatient,
        created_by: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> AppResult<Patient> {
        let year = register_year(now);

        let mut tx = self.pool.begin().await?;
        lock_sequence(&mut tx, &format!("patients:register:{}", year)).await?;

        let existing: Vec<String> = sqlx::query_scalar(
            "SELECT register_id FROM patients WHERE register_id LIKE '%/' || $1",
        )
        .bind(&year)
        .fetch_all(&mut *tx)
        .await?;

        let register_id = next_register_id(&year, existing.iter().map(String::as_str));

        let patient = sqlx::query_as::<_, Patient>(
            r#"
            INSERT INTO patients (
                id, register_id, name, relation, gender, address, phone, age,
                place, village, disease, plan, is_dead, date_of_death, created_by,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $16)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&register_id)
        .bind(&data.name)
        .bind(&data.relation)
        .bind(data.gender)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(data.age)
        .bind(&data.place)
        .bind(&data.village)
        .bind(&data.disease)
        .bind(&data.plan)
        .bind(data.is_dead.unwrap_or(false))
        .bind(data.date_of_death)
        .bind(created_by)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Register id {} is already taken", register_id))
            } else {
                AppError::Database(e)
            }
        })?;

        tx.commit().await?;
        Ok(patient)
    }

    pub async fn update(&self, id: Uuid, data: &UpdatePatient) -> AppResult<Patient> {
        sqlx::query_as::<_, Patient>(
            r#"
            UPDATE patients SET
                name = COALESCE($2, name),
                relation = COALESCE($3, relation),
                gender = COALESCE($4, gender),
                address = COALESCE($5, address),
                phone = COALESCE($6, phone),
                age = COALESCE($7, age),
                place = COALESCE($8, place),
                village = COALESCE($9, village),
                disease = COALESCE($10, disease),
                plan = COALESCE($11, plan),
                is_dead = COALESCE($12, is_dead),
                date_of_death = COALESCE($13, date_of_death),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.relation)
        .bind(data.gender)
        .bind(&data.address)
        .bind(&data.phone)
        .bind(data.age)
        .bind(&data.place)
        .bind(&data.village)
        .bind(&data.disease)
        .bind(&data.plan)
        .bind(data.is_dead)
        .bind(data.date_of_death)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM patients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
