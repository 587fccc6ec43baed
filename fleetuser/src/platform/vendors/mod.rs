//! Built-in vendor platform definitions.

pub mod mikrotik;
