//! Business logic services

pub mod auth;
pub mod equipment;
pub mod equipment_supplies;
pub mod home_visits;
pub mod medicine_supplies;
pub mod patients;

use std::sync::Arc;

use crate::{
    config::AuthConfig,
    repository::{EquipmentStore, EquipmentSupplyStore, Repository},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub patients: patients::PatientsService,
    pub home_visits: home_visits::HomeVisitsService,
    pub equipment: equipment::EquipmentService,
    pub equipment_supplies: equipment_supplies::EquipmentSuppliesService,
    pub medicine_supplies: medicine_supplies::MedicineSuppliesService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let equipment: Arc<dyn EquipmentStore> = Arc::new(repository.equipment.clone());
        let supplies: Arc<dyn EquipmentSupplyStore> =
            Arc::new(repository.equipment_supplies.clone());

        Self {
            auth: auth::AuthService::new(repository.users.clone(), auth_config),
            patients: patients::PatientsService::new(repository.patients.clone()),
            home_visits: home_visits::HomeVisitsService::new(repository.home_visits.clone()),
            equipment: equipment::EquipmentService::new(equipment.clone()),
            equipment_supplies: equipment_supplies::EquipmentSuppliesService::new(equipment, supplies),
            medicine_supplies: medicine_supplies::MedicineSuppliesService::new(repository.medicine_supplies),
        }
    }
}
