pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use claims::Role;
pub use claims::TOKEN_LIFETIME_HOURS;
pub use errors::JwtError;
pub use handler::IssuedToken;
pub use handler::JwtHandler;
