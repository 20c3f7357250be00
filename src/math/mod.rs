//! Geometry primitives shared across the crate

pub mod aabb;
pub mod ibox;
pub mod ray;

pub use aabb::Aabb;
pub use ibox::IBox3;
pub use ray::Ray;
