pub mod file;
pub mod params;
pub mod user;
