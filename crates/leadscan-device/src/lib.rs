mod camera;
mod permissions;

pub use camera::SimulatedCamera;
pub use permissions::SimulatedPlatform;
