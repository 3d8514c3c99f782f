//! Domain models for the clinic queue.

mod notification;
mod patient;
mod queue_entry;
mod service;
mod staff;

pub use notification::*;
pub use patient::*;
pub use queue_entry::*;
pub use service::*;
pub use staff::*;
