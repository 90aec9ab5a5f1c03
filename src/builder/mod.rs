//! Extension build orchestration.
//!
//! This module drives CMake for native extension targets: one configure and
//! one build invocation per target, with platform policy supplied by a
//! [`PlatformStrategy`].

pub mod cmake;
pub mod context;
pub mod strategy;

pub use cmake::CMakeBuilder;
pub use context::BuildContext;
pub use strategy::{
    strategy_for, BuildArgs, MultiConfigStrategy, PlatformStrategy, SingleConfigStrategy,
};
