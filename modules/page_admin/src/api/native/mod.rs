//! In-process API layer

mod client;

pub use client::NativeClient;
