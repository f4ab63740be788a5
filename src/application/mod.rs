// Application layer - Use cases and storage ports
pub mod error;
pub mod reading_repository;
pub mod trend_service;

#[cfg(test)]
pub mod memory_repository;
