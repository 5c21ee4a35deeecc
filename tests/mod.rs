// Test Module Organization

// Unit tests - Fast tests with no external dependencies
pub mod unit;

// Integration tests - Require running Kafka
pub mod integration;
