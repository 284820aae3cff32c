//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, equipment_supplies, health, home_visits, medicine_supplies, patients};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Oruma API",
        version = "1.0.0",
        description = "Palliative care clinic REST API: patients, home visits, equipment loans and medicine supplies",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::welcome,
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Patients
        patients::list_patients,
        patients::get_patient,
        patients::create_patient,
        patients::update_patient,
        patients::delete_patient,
        // Home visits
        home_visits::list_home_visits,
        home_visits::get_home_visit,
        home_visits::create_home_visit,
        home_visits::update_home_visit,
        home_visits::delete_home_visit,
        // Equipment
        equipment::list_equipment,
        equipment::available_summary,
        equipment::get_equipment,
        equipment::get_equipment_by_unique_id,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::update_equipment_status,
        equipment::delete_equipment,
        // Equipment supplies
        equipment_supplies::list_supplies,
        equipment_supplies::list_active_supplies,
        equipment_supplies::get_supply,
        equipment_supplies::create_supply,
        equipment_supplies::update_supply,
        equipment_supplies::delete_supply,
        // Medicine supplies
        medicine_supplies::list_medicine_supplies,
        medicine_supplies::get_medicine_supply,
        medicine_supplies::create_medicine_supply,
        medicine_supplies::update_medicine_supply,
        medicine_supplies::delete_medicine_supply,
    ),
    components(
        schemas(
            // Auth
            crate::models::user::UserRole,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::AuthResponse,
            crate::models::user::MeResponse,
            // Patients
            crate::models::patient::Gender,
            crate::models::patient::Patient,
            crate::models::patient::CreatePatient,
            crate::models::patient::UpdatePatient,
            // Home visits
            crate::models::home_visit::VisitMode,
            crate::models::home_visit::HomeVisit,
            crate::models::home_visit::CreateHomeVisit,
            crate::models::home_visit::UpdateHomeVisit,
            // Equipment
            crate::models::equipment::EquipmentStatus,
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::CreateEquipmentResponse,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::UpdateEquipmentStatus,
            // Equipment supplies
            crate::models::equipment_supply::SupplyStatus,
            crate::models::equipment_supply::EquipmentSupply,
            crate::models::equipment_supply::CreateEquipmentSupply,
            crate::models::equipment_supply::UpdateEquipmentSupply,
            // Medicine supplies
            crate::models::medicine_supply::MedicineSupply,
            crate::models::medicine_supply::CreateMedicineSupply,
            crate::models::medicine_supply::UpdateMedicineSupply,
            // Common
            health::HealthResponse,
            health::WelcomeResponse,
            crate::api::MessageResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "patients", description = "Patient register"),
        (name = "home-visits", description = "Home visit log"),
        (name = "equipment", description = "Equipment registry"),
        (name = "equipment-supplies", description = "Equipment loans"),
        (name = "medicine-supplies", description = "Medicine dispensation")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_security() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/equipment-supplies/{id}"));
        assert!(doc.paths.paths.contains_key("/api/equipment/{id}/status"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
