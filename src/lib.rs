//! flexsim - interactive flexible-body simulation
//!
//! Simulates flexible linear objects (a coil spring, a rope and a chain) as
//! chains of mass points coupled by distance joints or explicit spring
//! forces, with pointer-based dragging of the simulated points. Rendering
//! and windowing stay outside this crate: bodies expose renderer-agnostic
//! visual data, and pointer input arrives as normalized device coordinates.

pub mod body;
pub mod camera;
pub mod config;
pub mod error;
pub mod interaction;
pub mod physics;
pub mod scene;
pub mod visual;

pub use body::{build_body, build_body_with, Chain, FlexibleBody, Rope, Spring};
pub use camera::Camera;
pub use config::{BodyKind, BodyParams};
pub use error::{Result, SimError};
pub use interaction::InteractionController;
pub use physics::{PhysicsWorld, SpringForce};
pub use scene::Scene;
pub use visual::{TubeMesh, Visual};
