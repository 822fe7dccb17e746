pub mod client;
pub mod event;
pub mod timestamp;

pub use client::ClientProfile;
pub use event::EventRecord;
