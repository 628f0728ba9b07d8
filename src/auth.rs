//! Bearer-token pipeline: credentials, token values, the authenticator, and the token cache.

pub mod authenticator;
pub mod cache;
pub mod credentials;
pub mod secret;
pub mod token;

pub use authenticator::*;
pub use cache::*;
pub use credentials::*;
pub use secret::*;
pub use token::*;
