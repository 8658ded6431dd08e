pub mod filter;
pub mod assets;
