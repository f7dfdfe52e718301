// Adapters binding the criteria engine to live sea_orm connections

pub mod counter;

pub use counter::ConnectionCounter;
