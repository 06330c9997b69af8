pub mod appointments;
pub mod availability;
pub mod blocked_dates;
pub mod professionals;
pub mod services;
