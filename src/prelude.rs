pub use crate::ds::{EvictCallback, IntrusiveList, RecencyList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::policy::arc::{ArcCore, ConcurrentArcCache};
pub use crate::traits::{ConcurrentCache, CoreCache, MutableCache, ReadOnlyCache};
