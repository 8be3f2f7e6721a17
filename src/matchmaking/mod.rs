pub mod generator;
pub mod pool;
pub mod quality;
pub mod roles;
