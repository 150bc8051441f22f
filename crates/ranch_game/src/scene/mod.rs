//! Entity/component scene
//!
//! Entities live in a generational arena and form a parent/child tree.
//! Components attach at most one per kind and update in a fixed order,
//! each seeing its owner's body, its siblings and a shared [`FrameView`].

mod component;
mod context;
mod entity;
mod graph;

pub use component::{Attachable, Component, ComponentKind, ComponentVariant, Components, Updatable};
pub use context::{Command, Commands, ComponentContext, EnemySnapshot, FrameInput, FrameView};
pub use entity::{Body, Entity};
pub use graph::Scene;
