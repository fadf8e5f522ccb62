pub mod db;
pub mod images;
pub mod layout;
pub mod preferences;
pub mod records;

pub use db::{Database, ImportBatch};
pub use layout::{DropAndRecreate, UpgradePolicy, SCHEMA_VERSION};
pub use records::{Collection, Record};
