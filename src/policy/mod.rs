pub mod arc;

pub use arc::{ArcCore, ConcurrentArcCache};
