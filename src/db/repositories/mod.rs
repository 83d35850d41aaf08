pub mod audit;
pub mod config;
pub mod document;
pub mod resident;
pub mod user;
