pub mod user;
pub mod pharmacy;
pub mod medication;
pub mod inventory;
pub mod order;

// Re-export only the types we actually use
pub use user::{User, UserRole};
pub use pharmacy::{Pharmacy, CreatePharmacy};
pub use medication::{Medication, CreateMedication};
pub use inventory::{InventoryItem, CreateInventoryItem, UpdateInventoryItem};
