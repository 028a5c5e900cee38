pub mod incidents;
pub mod report;
pub mod traffic;
pub mod upload;
