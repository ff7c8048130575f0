//! Integration test suite for pkgctl
//!
//! Drives the library end to end against the in-memory store, and the
//! binary for the commands that need no package server.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **identifiers**: Package and package revision names
//! - **resource_tree**: Directory and stream round trips
//! - **clone**: Lineage recorded by create and clone
//! - **push_pull**: Content synchronisation and its failure modes
//! - **lifecycle**: Status updates and their effect on push
//! - **registry**: The repository registry in the configuration file
//! - **cli**: Binary smoke tests

mod common;

mod cli;
mod clone;
mod identifiers;
mod lifecycle;
mod push_pull;
mod registry;
mod resource_tree;
