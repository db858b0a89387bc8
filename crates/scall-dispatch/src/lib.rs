//! # scall-dispatch: the dispatcher
//!
//! Maps operation identifiers to implementations, loading each one lazily
//! on first use (or eagerly via [`Dispatcher::preload`]) and forwarding
//! calls through the policy layer in `scall-core`.
//!
//! ```text
//! caller ──call("rmdir_if_exists", args)──► Dispatcher
//!                                              │ miss
//!                                              ▼
//!                                  UnitLoader::load("scall/op/rmdir_if_exists")
//!                                              │
//!                                              ▼
//!                               Registry State (append-only, once per key)
//!                                              │
//!                                              ▼
//!                                policy::invoke → Outcome / Error
//! ```
//!
//! The dispatcher is generic over the loader and the failure factory.
//! Swap either and the resolution path doesn't change.

pub mod config;
mod dispatcher;
mod registry;

pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use registry::OpStats;
