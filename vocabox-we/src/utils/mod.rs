//! Shared utilities for vocabox-we

pub mod rate_limit;
