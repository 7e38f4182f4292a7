//! Authentication: JWT issuing/validation, middleware and extractors

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtService, generate_secret};
pub use middleware::{require_admin, require_auth};
