pub mod calendar;
pub mod error;
pub mod habit;
pub mod period;
pub mod service;
pub mod stats;
pub mod store;
pub mod streak;

pub use crate::error::HabitError;
pub use crate::service::{HabitService, HabitServiceBuilder};
