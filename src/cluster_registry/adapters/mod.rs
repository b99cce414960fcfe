//! Adapter implementations for cluster handles and discovery providers.

pub mod memory;

mod static_handle;

pub use static_handle::StaticClusterHandle;
