//! Application layer orchestrating a collection.
//!
//! `PaymentInitiator` submits the request, `StatusPoller` follows the resulting reference
//! to a terminal state, and `CollectionWorkflow` runs the two strictly one after the other.

pub mod initiator;
pub mod poller;
pub mod workflow;
