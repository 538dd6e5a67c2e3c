// src/crawl/mod.rs
// =============================================================================
// This module handles the crawl itself.
//
// Submodules:
// - controller: breadth-first, depth-bounded walk with a worker pool
// - filter: which discovered links are worth following
// - visited: the ledger that makes sure no URL is fetched twice
// =============================================================================

mod controller;
mod filter;
mod visited;

pub use controller::Crawler;
