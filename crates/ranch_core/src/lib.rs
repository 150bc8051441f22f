//! # ranch_core - Ranch Core
//!
//! Zero-dependency primitives shared by every simulation crate:
//! - **Generational ids**: `Id` detects stale references after reuse
//! - **Arena storage**: `Arena<T>` hands out generation-checked slots
//! - **Serials**: a process-wide monotonic counter for entity numbers

pub mod arena;
pub mod id;

pub use arena::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::arena::Arena;
    pub use crate::id::{next_serial, Id, SerialCounter};
}
