pub mod prelude;

pub mod audit_logs;
pub mod configurations;
pub mod lost_documents;
pub mod lost_items;
pub mod residents;
pub mod users;
