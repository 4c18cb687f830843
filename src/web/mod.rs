//! Web front-end for medscribe
//!
//! One page with a transcript form; each POST runs through the task gateway.

pub mod page;
pub mod server;

pub use server::{router, serve};
