//! Lifecycle orchestration over the store.
//!
//! Each service receives a cloned [`crate::store::Store`] handle; nothing is
//! ambient. Services own the multi-entity rules: who gets notified, which
//! role may act, and which config knobs apply. Single-record atomicity stays
//! in the store.

mod complaints;
mod identity;
mod notifications;
mod suggestions;

pub use complaints::ComplaintService;
pub use identity::IdentityService;
pub use notifications::NotificationService;
pub use suggestions::SuggestionService;
