//! Test utilities for reactrole tests.
//!
//! This module provides a recording platform fake and store helpers.

#![allow(dead_code)]

pub mod mock_platform;

#[allow(unused_imports)]
pub use mock_platform::{Call, MockPlatform};

use reactrole_storage::{CorruptStatePolicy, MappingStore, MemoryBackend};
use std::sync::Arc;

/// A fresh in-memory mapping store.
pub async fn memory_store() -> Arc<MappingStore> {
    Arc::new(
        MappingStore::open(Arc::new(MemoryBackend::new()), CorruptStatePolicy::Reset)
            .await
            .unwrap(),
    )
}
