pub mod client;

pub use client::{HttpSessionApi, SessionApi};
