pub mod assets;
pub mod bootstrap;
pub mod core;
pub mod records;
