//! Equipment registry: intake with generated unique ids, status changes

use std::{collections::BTreeMap, sync::Arc};

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::equipment::{
        derive_prefix, CreateEquipment, Equipment, EquipmentStatus, NewEquipment, UpdateEquipment,
    },
    repository::EquipmentStore,
};

const INVALID_STATUS: &str = "Invalid status. Must be: available, supplied, or maintenance";

/// Parse a status coming from a request
pub fn parse_status(raw: &str) -> AppResult<EquipmentStatus> {
    raw.parse()
        .map_err(|_| AppError::Validation(INVALID_STATUS.to_string()))
}

#[derive(Clone)]
pub struct EquipmentService {
    store: Arc<dyn EquipmentStore>,
}

impl EquipmentService {
    pub fn new(store: Arc<dyn EquipmentStore>) -> Self {
        Self { store }
    }

    /// Register `quantity` new units, each under its own `PREFIX-NNN` id
    pub async fn intake(&self, data: CreateEquipment, created_by: Option<Uuid>) -> AppResult<Vec<Equipment>> {
        data.validate()?;
        let (Some(name), Some(phone)) = (data.name, data.phone) else {
            return Err(AppError::Validation("Missing required fields: name, phone".to_string()));
        };

        let prefix = match data.serial_no.as_deref().map(str::trim) {
            Some(serial) if !serial.is_empty() => serial.to_string(),
            _ => derive_prefix(&name),
        };
        let count = data.quantity.unwrap_or(1).max(1) as u32;

        let new = NewEquipment {
            prefix,
            name,
            purchased_from: data.purchased_from,
            place: data.place,
            phone,
            created_by,
        };
        let created = self.store.create_batch(&new, count).await?;

        tracing::info!(
            prefix = %new.prefix,
            count = created.len(),
            "Equipment intake recorded"
        );
        Ok(created)
    }

    /// List equipment, optionally filtered by a raw status string. A blank
    /// filter lists everything.
    pub async fn list(&self, status: Option<&str>) -> AppResult<Vec<Equipment>> {
        let status = status
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(parse_status)
            .transpose()?;
        self.store.list(status).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Equipment> {
        self.store.get_by_id(id).await
    }

    pub async fn get_by_unique_id(&self, unique_id: &str) -> AppResult<Equipment> {
        self.store.get_by_unique_id(unique_id).await
    }

    pub async fn update(&self, id: Uuid, data: &UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        self.store.update(id, data).await
    }

    /// Manual status change (e.g. sending an item to maintenance)
    pub async fn set_status(&self, id: Uuid, status: Option<&str>) -> AppResult<Equipment> {
        let status = parse_status(status.unwrap_or_default())?;
        let equipment = self.store.set_status(id, status).await?;
        tracing::info!(unique_id = %equipment.unique_id, status = %status, "Equipment status changed");
        Ok(equipment)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(id).await?;
        tracing::info!(equipment_id = %id, "Equipment deleted");
        Ok(())
    }

    /// Available units per equipment name
    pub async fn available_summary(&self) -> AppResult<BTreeMap<String, i64>> {
        self.store.available_count_by_name().await
    }
}
