mod local_object_store;

pub use local_object_store::{verify_signature, LocalObjectStore};
