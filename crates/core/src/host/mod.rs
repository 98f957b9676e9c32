pub mod global;
pub mod surface;

pub use surface::{HostSurface, SurfaceHandle, SurfaceSignal};
