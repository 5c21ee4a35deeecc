//! Domain models updated from consumed records

pub mod weather;

pub use weather::Weather;
