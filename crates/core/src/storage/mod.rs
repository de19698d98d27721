pub mod manager;
pub mod migration;
pub mod snapshot;
