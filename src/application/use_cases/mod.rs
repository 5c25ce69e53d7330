//! Use cases orchestrating the upload protocol, version resolution, and
//! retrieval over the repository and object-store ports.

mod commit_version;
mod create_storage;
mod download_file;
mod list_versions;
mod package_version;
mod prepare_upload;
mod resolve_version;
mod upload_blobs;

pub use commit_version::CommitVersionUseCase;
pub use create_storage::CreateStorageUseCase;
pub use download_file::DownloadFileUseCase;
pub use list_versions::ListVersionsUseCase;
pub use package_version::{PackageVersionUseCase, PackagedVersion};
pub use prepare_upload::PrepareUploadUseCase;
pub use resolve_version::ResolveVersionUseCase;
pub use upload_blobs::UploadBlobsUseCase;
