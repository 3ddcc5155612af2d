// --- Output collaborators: message files and the legacy payload shape ---

pub mod legacy;
pub mod writer;

pub use legacy::LegacyPayload;
pub use writer::{MessageWriter, StorageError};
