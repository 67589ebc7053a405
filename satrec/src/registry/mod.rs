//! Durable registry of recordings the controller believes are active.
//!
//! The registry is a cache, not the truth: entries are only
//! meaningful while a matching live transcoder process exists. The
//! [reconciler](crate::reconciler) repairs the registry against the
//! OS process table on every read.

mod record;
mod store;

pub use record::RecordingRecord;
pub use store::RegistryStore;
