pub mod address;
pub mod encoding;
pub mod hash;
pub mod selector;
