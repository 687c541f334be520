mod client;
mod phone;

pub use client::{Client, ClientChanges, ClientFilter, ClientMatch, NewClient};
pub use phone::Phone;
