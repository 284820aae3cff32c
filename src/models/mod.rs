//! Data models for Oruma

pub mod equipment;
pub mod equipment_supply;
pub mod home_visit;
pub mod input;
pub mod medicine_supply;
pub mod patient;
pub mod user;

// Re-export commonly used types
pub use equipment::{Equipment, EquipmentStatus};
pub use equipment_supply::{EquipmentSupply, SupplyStatus};
pub use home_visit::{HomeVisit, VisitMode};
pub use medicine_supply::MedicineSupply;
pub use patient::{Gender, Patient};
pub use user::{User, UserClaims, UserRole};
