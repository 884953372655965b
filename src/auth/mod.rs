//! Authentication module
//!
//! The `TokenStore` owns the cached token and the locking discipline
//! around reading and refreshing it. The login exchange itself is an
//! `AuthFlow`, selectable at construction: either an OAuth password grant
//! against a separate token endpoint, or a form login against the
//! service's own unauthenticated login endpoint.

mod flows;
mod store;
mod types;

pub use store::TokenStore;
pub use types::{AuthFlow, AuthHeaderFormat, Credentials};

#[cfg(test)]
mod tests;
