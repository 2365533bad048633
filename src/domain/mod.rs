//! Domain layer: value objects for collections and the gateway port.

pub mod payment;
pub mod ports;
pub mod transaction;
