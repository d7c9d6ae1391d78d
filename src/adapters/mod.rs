// Adapters layer: concrete implementations of the domain ports.

pub mod codec;
pub mod http;
pub mod storage;
