pub mod assets;
pub mod inventory;
pub mod reports;
pub mod work_orders;
