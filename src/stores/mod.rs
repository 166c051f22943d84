//! Passive stores populated by the pipeline and read by the views.
//!
//! Each store is mutated only through its owning pipeline step; readers never
//! mutate. No locking: mutation is confined to discrete stages on one logical
//! thread of control.

pub mod bounded;
pub mod dispatch;
pub mod persist;

pub use bounded::BoundedList;
pub use dispatch::DispatchTracker;
pub use persist::Snapshot;
