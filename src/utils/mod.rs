pub mod json_extract;
pub mod jwt;
pub mod password;
pub mod signature;

pub use json_extract::*;
pub use jwt::*;
pub use password::*;
pub use signature::*;
