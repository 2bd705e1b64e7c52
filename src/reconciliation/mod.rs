//! Reconciliation of gateway transmission outcomes against file records
//!
//! Leaves first: [`classify`] and [`status`] are pure functions,
//! [`engine`] reconciles one notification against a [`RecordStore`](crate::traits::RecordStore),
//! and [`batch`] drives a whole batch through the engine.

pub mod batch;
pub mod classify;
pub mod engine;
pub mod status;

pub use batch::*;
pub use classify::*;
pub use engine::*;
pub use status::*;
