mod audit;
mod backup;

pub use audit::cmd_audit;
pub use backup::cmd_backup;
