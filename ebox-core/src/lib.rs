//! EBox Core
//!
//! Core types and pure logic for deploying boxes from a build pipeline.
//!
//! This crate contains:
//! - Domain types: boxes, variable bindings, deployment requests and status
//! - Factory: typed box construction from raw API records
//! - Criteria: classification of raw box collections into buckets
//! - Resolver: rewriting of variable bindings that reference other steps
//! - DTOs: wire bodies sent to the box platform
//!
//! Nothing in here performs I/O or logs; errors are returned to the caller.

pub mod criteria;
pub mod domain;
pub mod dto;
pub mod error;
pub mod factory;
pub mod resolver;
