//! Equipment loan ledger
//!
//! A loan may only be opened against available equipment; returning or
//! deleting an active loan puts the equipment back in circulation.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::EquipmentStatus,
        equipment_supply::{CreateEquipmentSupply, EquipmentSupply, NewEquipmentSupply, SupplyStatus, UpdateEquipmentSupply},
    },
    repository::{EquipmentStore, EquipmentSupplyStore},
};

#[derive(Clone)]
pub struct EquipmentSuppliesService {
    equipment: Arc<dyn EquipmentStore>,
    supplies: Arc<dyn EquipmentSupplyStore>,
}

impl EquipmentSuppliesService {
    pub fn new(equipment: Arc<dyn EquipmentStore>, supplies: Arc<dyn EquipmentSupplyStore>) -> Self {
        Self { equipment, supplies }
    }

    pub async fn list(&self) -> AppResult<Vec<EquipmentSupply>> {
        self.supplies.list(None).await
    }

    /// Loans whose equipment is still out
    pub async fn list_active(&self) -> AppResult<Vec<EquipmentSupply>> {
        self.supplies.list(Some(SupplyStatus::Active)).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<EquipmentSupply> {
        self.supplies.get_by_id(id).await
    }

    /// Lend available equipment to a recipient
    pub async fn create(&self, data: CreateEquipmentSupply) -> AppResult<EquipmentSupply> {
        data.validate()?;
        let (Some(equipment_id), Some(patient_name), Some(patient_phone)) =
            (data.equipment_id, data.patient_name, data.patient_phone)
        else {
            return Err(AppError::Validation(
                "Missing required fields: equipmentId, patientName, patientPhone".to_string(),
            ));
        };

        let equipment_id = Uuid::parse_str(equipment_id.trim())
            .map_err(|_| AppError::NotFound("Equipment not found".to_string()))?;
        let equipment = self.equipment.get_by_id(equipment_id).await?;

        if equipment.status != EquipmentStatus::Available {
            tracing::warn!(
                unique_id = %equipment.unique_id,
                status = %equipment.status,
                "Loan rejected, equipment not available"
            );
            return Err(AppError::Conflict(format!(
                "Equipment {} is not available (Status: {})",
                equipment.unique_id, equipment.status
            )));
        }

        let new = NewEquipmentSupply {
            patient_name,
            patient_phone,
            patient_address: data.patient_address,
            return_date: data.return_date,
            notes: data.notes,
        };
        let supply = self.supplies.create_active(equipment.id, &new, Utc::now()).await?;

        tracing::info!(
            supply_id = %supply.id,
            unique_id = %supply.equipment_unique_id,
            "Equipment supplied"
        );
        Ok(supply)
    }

    /// Patch a loan. Moving an active loan to `returned` records the actual
    /// return time and releases the equipment.
    pub async fn update(&self, id: Uuid, data: UpdateEquipmentSupply) -> AppResult<EquipmentSupply> {
        data.validate()?;
        let current = self.supplies.get_by_id(id).await?;

        if data.status == Some(SupplyStatus::Returned) && current.status == SupplyStatus::Active {
            let supply = self.supplies.mark_returned(id, &data, Utc::now()).await?;
            tracing::info!(
                supply_id = %supply.id,
                unique_id = %supply.equipment_unique_id,
                "Equipment returned"
            );
            return Ok(supply);
        }

        self.supplies.update(id, &data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let supply = self.supplies.delete(id).await?;
        tracing::info!(
            supply_id = %supply.id,
            released = supply.status == SupplyStatus::Active,
            "Equipment supply deleted"
        );
        Ok(())
    }
}
