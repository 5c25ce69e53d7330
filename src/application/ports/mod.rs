mod object_store;
mod storage_repository;

pub use object_store::{ObjectStore, ObjectStoreError, PresignedUrl};
pub use storage_repository::{NewVersion, RepositoryError, StorageRepository};

#[cfg(test)]
pub use object_store::MockObjectStore;
#[cfg(test)]
pub use storage_repository::MockStorageRepository;
