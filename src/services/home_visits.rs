//! Home visit log

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppResult,
    models::home_visit::{CreateHomeVisit, HomeVisit, UpdateHomeVisit},
    repository::home_visits::HomeVisitsRepository,
};

#[derive(Clone)]
pub struct HomeVisitsService {
    repository: HomeVisitsRepository,
}

impl HomeVisitsService {
    pub fn new(repository: HomeVisitsRepository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<HomeVisit>> {
        self.repository.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<HomeVisit> {
        self.repository.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateHomeVisit, created_by: Option<Uuid>) -> AppResult<HomeVisit> {
        data.validate()?;
        self.repository.create(data, created_by).await
    }

    pub async fn update(&self, id: Uuid, data: &UpdateHomeVisit) -> AppResult<HomeVisit> {
        data.validate()?;
        self.repository.update(id, data).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
