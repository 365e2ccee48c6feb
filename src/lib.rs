//! Resolve and exercise declarative BOSH task definitions inside containers.
//!
//! A task definition maps a handful of named parameters (deployment,
//! instance group, credentials and so on) onto an invocation of the `bosh`
//! CLI inside a container. `boshtask` merges a definition's defaults with
//! caller overrides, runs the result once through a container runtime, and
//! reports the exit code together with the environment and arguments the
//! target echoed back.
//!
//! # Modules
//!
//! - [`config`]: Layered configuration and CLI definitions
//! - [`error`]: Semantic error types
//! - [`harness`]: Container invocation and diagnostic parsing
//! - [`resolve`]: Merging defaults with overrides into an invocation
//! - [`task`]: Task definition documents and the task catalog

pub mod config;
pub mod error;
pub mod harness;
pub mod resolve;
pub mod task;
