//! Bearer-token verification. Tokens are minted by the identity provider;
//! this service only checks them and resolves the caller's user id.

mod claims;
pub(crate) mod jwt;

pub use jwt::AuthUser;
