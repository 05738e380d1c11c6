pub mod application;
pub mod date_range;
pub mod leave;
