pub mod claims;
pub mod errors;
pub mod handler;
pub mod key;

pub use claims::SessionClaims;
pub use errors::JwtError;
pub use handler::JwtHandler;
pub use key::SigningKey;
