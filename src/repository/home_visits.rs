//! Home visits repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::home_visit::{CreateHomeVisit, HomeVisit, UpdateHomeVisit},
};

#[derive(Clone)]
pub struct HomeVisitsRepository {
    pool: Pool<Postgres>,
}

fn not_found() -> AppError {
    AppError::NotFound("Home visit not found".to_string())
}

impl HomeVisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<HomeVisit>> {
        let rows = sqlx::query_as::<_, HomeVisit>("SELECT * FROM home_visits ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<HomeVisit> {
        sqlx::query_as::<_, HomeVisit>("SELECT * FROM home_visits WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    pub async fn create(&self, data: &CreateHomeVisit, created_by: Option<Uuid>) -> AppResult<HomeVisit> {
        let visit = sqlx::query_as::<_, HomeVisit>(
            r#"
            INSERT INTO home_visits (id, patient_name, address, visit_date, visit_mode, notes, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.patient_name)
        .bind(&data.address)
        .bind(&data.visit_date)
        .bind(data.visit_mode.unwrap_or_default())
        .bind(&data.notes)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(visit)
    }

    pub async fn update(&self, id: Uuid, data: &UpdateHomeVisit) -> AppResult<HomeVisit> {
        sqlx::query_as::<_, HomeVisit>(
            r#"
            UPDATE home_visits SET
                patient_name = COALESCE($2, patient_name),
                address = COALESCE($3, address),
                visit_date = COALESCE($4, visit_date),
                visit_mode = COALESCE($5, visit_mode),
                notes = COALESCE($6, notes),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.patient_name)
        .bind(&data.address)
        .bind(&data.visit_date)
        .bind(data.visit_mode)
        .bind(&data.notes)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(not_found)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM home_visits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found());
        }
        Ok(())
    }
}
