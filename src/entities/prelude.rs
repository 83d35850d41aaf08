pub use super::audit_logs::Entity as AuditLogs;
pub use super::configurations::Entity as Configurations;
pub use super::lost_documents::Entity as LostDocuments;
pub use super::lost_items::Entity as LostItems;
pub use super::residents::Entity as Residents;
pub use super::users::Entity as Users;
