mod memory;
mod provider;

pub use memory::{MemoryMessageStore, MemoryMessageStoreError};
pub use provider::{MessageStore, MessageStoreError};
