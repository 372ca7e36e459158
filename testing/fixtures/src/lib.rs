//! Record, payload, and store fixtures shared by integration tests.

pub mod client;
pub mod contact;
pub mod store;

pub use client::{Client, ClientCreate, ClientKind, ClientPatch};
pub use contact::{Contact, ContactPatch};
pub use store::RecordingStore;
