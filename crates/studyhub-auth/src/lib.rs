//! # studyhub-auth
//!
//! Identity seam for StudyHub. Users sign in with an external identity
//! provider; requests carry its HS256-signed bearer token, which is verified
//! here.
//!
//! ## Modules
//!
//! - `jwt`: claims, token verification, dev token minting

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
