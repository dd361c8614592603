pub mod credentials;
pub mod password;

pub use credentials::CredentialService;
