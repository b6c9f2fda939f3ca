//! External system adapters
//!
//! Everything that talks to the outside world lives here: the portal
//! browser session, the object store, and the chat notifier. Each adapter
//! exposes a trait so the export pipeline can be tested without real
//! services.

pub mod notify;
pub mod portal;
pub mod storage;
