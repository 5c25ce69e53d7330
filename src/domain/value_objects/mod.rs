mod content_hash;
mod file_entry;
mod owner_id;
mod storage_name;
mod storage_type;
mod upload_session;

pub use content_hash::ContentHash;
pub use file_entry::{normalize_path, FileEntry};
pub use owner_id::OwnerId;
pub use storage_name::StorageName;
pub use storage_type::StorageType;
pub use upload_session::UploadSession;
