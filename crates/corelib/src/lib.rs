//! Core types: math re-exports and zero-anchored bounding boxes.

pub use glam::{Vec2, Vec3, vec2, vec3};

pub mod bounds;

pub use bounds::Bounds;
