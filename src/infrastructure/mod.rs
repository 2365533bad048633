//! Adapters implementing the gateway port.

pub mod campay;
pub mod in_memory;
