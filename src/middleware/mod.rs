pub mod api_version;
pub mod auth;
pub mod cache_headers;
pub mod media_type;
pub mod rate_limit;
pub mod validation;

pub use api_version::{api_version_middleware, ApiVersion};
pub use auth::{jwt_auth_middleware, AuthUser};
pub use cache_headers::{http_cache_headers, if_match_precondition, HttpCacheStore};
pub use media_type::ValidatedMediaType;
pub use rate_limit::retry_after_header;
pub use validation::{JsonBody, ValidatedJson};
