pub mod account;
pub mod memory;

pub use account::PostgresCredentialStore;
pub use memory::InMemoryCredentialStore;
