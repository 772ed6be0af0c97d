pub mod beaches;
pub mod serve;
pub mod setup;
pub mod sync;
