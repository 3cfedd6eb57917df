//! Checks user-supplied redirect targets against a [`Policy`] to prevent open
//! redirects.
//!
//! ```
//! use redirect_safely::{is_safe, make_safe, Policy};
//!
//! let policy = Policy::new().with_subdomains([".example.com"]);
//!
//! assert!(is_safe("/account", &policy).unwrap());
//! assert!(is_safe("https://www.example.com/account", &policy).unwrap());
//! assert!(!is_safe("https://evil.com/account", &policy).unwrap());
//! assert_eq!(make_safe(Some("//evil.com"), "/", &policy).unwrap(), "/");
//! ```

mod policy;
mod safety;

pub use policy::{PathMatch, Policy, PolicyError};
pub use safety::{evaluate, is_safe, make_safe, ParsingError, Rejection, Verdict};
