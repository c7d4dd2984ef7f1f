//! redis-model Comprehensive Test Suite
//!
//! Exercises the public API end to end through the `redis_model` facade.
//! Everything except the live-server tier runs against `MemoryStore`.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Schema resolution and duplicate definitions
//! - **Tier 2**: Key labels
//! - **Tier 3**: Scalar and collection accessors
//! - **Tier 4**: Ordered-set algebra and intersections
//! - **Tier 5**: Pagination
//! - **Tier 6**: Attribute binding
//! - **Tier 7**: Concurrent use of one context
//! - **Tier 8**: Live Redis server (ignored by default, needs `REDIS_URL`)
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test model_comprehensive
//! REDIS_URL=redis://127.0.0.1:6379/15 cargo test --test model_comprehensive -- --ignored
//! ```


mod tier1_schema_resolution;
mod tier2_key_labels;
mod tier3_accessors;
mod tier4_sorted_set_algebra;
mod tier5_pagination;
mod tier6_attributes;
mod tier7_concurrency;
