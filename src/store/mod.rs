/// External collaborators of the authentication core: the relational
/// credential store (users) and the key-value revocation store (one live
/// refresh token per principal).

mod credential;
mod revocation;

pub use credential::Credential;
pub use credential::CredentialStore;
pub use credential::PasswordHash;
pub use credential::PgCredentialStore;
pub use credential::Principal;
pub use revocation::RedisRevocationStore;
pub use revocation::RevocationStore;
