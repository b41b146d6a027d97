//! # st-core
//!
//! Agent coordination core for SmartTask.
//!
//! This crate provides:
//! - A bounded, queryable audit log of everything that happens
//! - An in-process agent-to-agent (A2A) message bus
//! - A keyword-routed multi-agent orchestrator
//! - A file-backed task and goal store exposed as agent tools
//! - Configuration loading from the `.smarttask/` directory
//!
//! ## Modules
//!
//! - [`observability`]: Event tracker and metrics
//! - [`a2a`]: Message bus and built-in message handlers
//! - [`agents`]: Agent trait, adapters and registry
//! - [`orchestrator`]: Routing and sequential workflow execution
//! - [`store`]: Task/goal persistence and the tool boundary
//! - [`chat`]: Quick commands in front of the orchestrator
//! - [`config`]: Configuration loading
//! - [`init`]: `.smarttask/` scaffolding
//! - [`runtime`]: Wiring of all of the above

pub mod a2a;
pub mod agents;
pub mod chat;
pub mod config;
pub mod init;
pub mod observability;
pub mod orchestrator;
pub mod runtime;
pub mod store;

pub use runtime::SmartTask;
