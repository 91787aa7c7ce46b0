pub mod local;

pub use local::LocalObjectStorage;
