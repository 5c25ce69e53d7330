mod storage;
mod version;

pub use storage::Storage;
pub use version::StorageVersion;
