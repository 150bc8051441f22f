//! Unique identifiers with generational indices

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A slot identifier with a generation counter for safe reuse
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id {
    /// Lower 32 bits: index, Upper 32 bits: generation
    bits: u64,
}

impl Id {
    /// Create a new ID from index and generation
    #[inline]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            bits: (generation as u64) << 32 | index as u64,
        }
    }

    /// Create a null/invalid ID
    #[inline]
    pub const fn null() -> Self {
        Self { bits: u64::MAX }
    }

    /// Check if this ID is null
    #[inline]
    pub const fn is_null(&self) -> bool {
        self.bits == u64::MAX
    }

    /// Get the index portion
    #[inline]
    pub const fn index(&self) -> u32 {
        self.bits as u32
    }

    /// Get the generation portion
    #[inline]
    pub const fn generation(&self) -> u32 {
        (self.bits >> 32) as u32
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Id(null)")
        } else {
            write!(f, "Id({}v{})", self.index(), self.generation())
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

/// Monotonic counter handing out serial numbers starting at 1
#[derive(Debug)]
pub struct SerialCounter {
    next: AtomicU64,
}

impl SerialCounter {
    /// Create a counter whose first serial is 1
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Take the next serial
    #[inline]
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for SerialCounter {
    fn default() -> Self {
        Self::new()
    }
}

static ENTITY_SERIALS: SerialCounter = SerialCounter::new();

/// Next process-wide entity serial. Never repeats for the lifetime of the process.
pub fn next_serial() -> u64 {
    ENTITY_SERIALS.next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parts() {
        let id = Id::new(7, 3);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
        assert_ne!(id, Id::new(7, 4));
        assert_eq!(format!("{:?}", id), "Id(7v3)");
    }

    #[test]
    fn test_null_id() {
        assert!(Id::null().is_null());
        assert!(Id::default().is_null());
        assert!(!Id::new(0, 0).is_null());
    }

    #[test]
    fn test_serials_are_monotonic() {
        let counter = SerialCounter::new();
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);

        let a = next_serial();
        let b = next_serial();
        assert!(b > a);
    }
}
