//! Physics engine wiring on top of rapier3d

pub mod joints;
pub mod spring;
pub mod world;

pub use spring::SpringForce;
pub use world::PhysicsWorld;
