//! Data models for the RFI Dashboard backend.
//!
//! These models match the frontend TypeScript interfaces exactly for seamless interoperability.

mod refresh;
mod rfi;
mod token;

pub use refresh::*;
pub use rfi::*;
pub use token::*;
