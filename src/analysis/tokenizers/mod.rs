pub mod standard;
pub mod address;
