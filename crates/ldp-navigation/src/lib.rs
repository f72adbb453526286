//! Loco Dev Preview URL handling
//!
//! Address prompt input resolution:
//! 1. Loopback address → accepted regardless of policy
//! 2. `http://` / `https://` → accepted unless the http-only restriction is on
//! 3. Anything else → rejected with a message shown inline at the prompt
//!
//! Accepted input lacking a scheme is normalized to `http://` before it is
//! stored as the preview URL.

mod error;
mod validate;

pub use error::NavigationError;
pub use validate::{
    accept, has_scheme, normalize, validate, value_selection, RestrictionPolicy, UrlCheck,
    LOOPBACK_PREFIXES, REJECT_REASON,
};

pub type Result<T> = std::result::Result<T, NavigationError>;
