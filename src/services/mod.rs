pub mod inventory;

pub use inventory::InventoryService;
