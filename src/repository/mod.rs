//! Repository layer for database operations

pub mod equipment;
pub mod equipment_supplies;
pub mod home_visits;
pub mod medicine_supplies;
pub mod patients;
pub mod users;

use sqlx::{Pool, Postgres};

pub use equipment::EquipmentStore;
pub use equipment_supplies::EquipmentSupplyStore;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub patients: patients::PatientsRepository,
    pub home_visits: home_visits::HomeVisitsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub equipment_supplies: equipment_supplies::EquipmentSuppliesRepository,
    pub medicine_supplies: medicine_supplies::MedicineSuppliesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            patients: patients::PatientsRepository::new(pool.clone()),
            home_visits: home_visits::HomeVisitsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            equipment_supplies: equipment_supplies::EquipmentSuppliesRepository::new(pool.clone()),
            medicine_supplies: medicine_supplies::MedicineSuppliesRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database (readiness check)
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Whether a database error is a unique-constraint violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|e| e.code())
        .map_or(false, |code| code == "23505")
}

/// Serialize allocations of one sequence for the rest of the transaction
pub(crate) async fn lock_sequence(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    key: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(key)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
