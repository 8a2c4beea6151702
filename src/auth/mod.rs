/// Authentication core
///
/// Handles JWT token issuance and validation, password hashing, and
/// credential verification. The core is pure computation over its inputs
/// plus configuration; the only I/O happens through the credential and
/// revocation store traits in `crate::store`.

mod claims;
mod jwt;
mod keys;
mod password;
mod tokens;
mod validator;

pub use claims::Claims;
pub use claims::TokenType;
pub use jwt::decode_token;
pub use jwt::encode_token;
pub use keys::JwtKeys;
pub use password::hash_password;
pub use password::verify_password;
pub use tokens::issue_access_token;
pub use tokens::issue_refresh_token;
pub use tokens::issue_token_pair;
pub use tokens::TokenPair;
pub use validator::authenticate;
pub use validator::validate_token;
