//! Core types shared by the fire controller and its driver

pub mod ids;
pub mod vec3;

pub use ids::{ActorId, FireId, StructureId};
pub use vec3::Vec3;
