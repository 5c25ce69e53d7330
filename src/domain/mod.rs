pub mod entities;
pub mod errors;
pub mod hashing;
pub mod manifest;
pub mod value_objects;
