pub mod dto;
pub mod errors;
pub mod object_keys;
pub mod ports;
pub mod use_cases;
