pub mod config;
pub mod incident;
pub mod packet;
pub mod stats;
