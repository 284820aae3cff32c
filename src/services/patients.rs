//! Patient register

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::patient::{CreatePatient, Patient, UpdatePatient},
    repository::patients::PatientsRepository,
};

#[derive(Clone)]
pub struct PatientsService {
    repository: PatientsRepository,
}

impl PatientsService {
    pub fn new(repository: PatientsRepository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Patient>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Patient> {
        self.repository.get_by_id(id).await
    }

    /// Register a patient under the next register id of the current year
    pub async fn create(&self, data: &CreatePatient, created_by: Option<Uuid>) -> AppResult<Patient> {
        data.validate()?;
        let patient = self.repository.create(data, created_by, Utc::now()).await?;
        tracing::info!(
            register_id = patient.register_id.as_deref().unwrap_or_default(),
            "Patient registered"
        );
        Ok(patient)
    }

    pub async fn update(&self, id: Uuid, data: &UpdatePatient) -> AppResult<Patient> {
        data.validate()?;
        self.repository.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
