//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.
//! The exchange-token and refresh endpoints keep their historical ad-hoc
//! response shapes (`{success,...}` / `{ok,...}`) because the browser UI
//! consumes them verbatim; everything else uses [`crate::errors::AppError`].

mod refresh;
mod rfis;
mod tokens;

pub use refresh::*;
pub use rfis::*;
pub use tokens::*;
