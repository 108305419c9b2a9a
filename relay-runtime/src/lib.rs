//! Community relay runtime
//!
//! - **Webhook**: posts one embed per request to the configured endpoint
//! - **Delivery queue**: FIFO, one delivery in flight, fixed pause after each
//! - **Poller**: scan, dedup against the known-post store, enqueue, persist

pub mod webhook;
pub mod delivery;
pub mod poller;

pub use webhook::*;
pub use delivery::*;
pub use poller::*;
