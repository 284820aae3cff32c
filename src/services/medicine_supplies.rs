//! Medicine dispensation log

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::medicine_supply::{CreateMedicineSupply, MedicineSupply, UpdateMedicineSupply},
    repository::medicine_supplies::MedicineSuppliesRepository,
};

/// Units recorded when a dispensation does not say how many
pub const DEFAULT_QUANTITY: i32 = 1;

#[derive(Clone)]
pub struct MedicineSuppliesService {
    repository: MedicineSuppliesRepository,
}

impl MedicineSuppliesService {
    pub fn new(repository: MedicineSuppliesRepository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<MedicineSupply>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<MedicineSupply> {
        self.repository.get_by_id(id).await
    }

    pub async fn create(
        &self,
        mut data: CreateMedicineSupply,
        created_by: Option<Uuid>,
    ) -> AppResult<MedicineSupply> {
        data.validate()?;
        data.quantity.get_or_insert(DEFAULT_QUANTITY);
        self.repository.create(&data, created_by).await
    }

    pub async fn update(&self, id: Uuid, data: &UpdateMedicineSupply) -> AppResult<MedicineSupply> {
        data.validate()?;
        self.repository.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
