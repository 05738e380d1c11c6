pub mod aggregator;
pub mod dto;
pub mod leave_service;

#[cfg(test)]
mod leave_service_test;
