pub mod aggregator;
pub mod detector;
pub mod generator;
pub mod manager;
pub mod sink;
