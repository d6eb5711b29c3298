mod memory;
mod provider;

pub use memory::{MemoryKeyStore, MemoryKeyStoreError};
pub use provider::{KeyStore, KeyStoreError};
