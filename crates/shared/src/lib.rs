//! Types shared between the Savvy-Snip client core and its backing service.

pub mod domain;
pub mod error;
pub mod protocol;
