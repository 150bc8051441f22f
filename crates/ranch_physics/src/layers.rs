//! Collision layers and filtering

use serde::{Deserialize, Serialize};

/// A collision layer bitmask
///
/// Each built-in layer is a single bit; a mask may combine several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// No layer (never collides)
    pub const NONE: Self = Self(0);
    /// Player layer
    pub const PLAYER: Self = Self(1);
    /// Enemy layer
    pub const ENEMY: Self = Self(2);
    /// Projectile layer
    pub const PROJECTILE: Self = Self(4);
    /// Static environment layer
    pub const ENVIRONMENT: Self = Self(8);
    /// Pickup/item layer
    pub const PICKUP: Self = Self(16);
    /// Every layer
    pub const ALL: Self = Self(u32::MAX);

    /// The five built-in layers
    pub const BUILTIN: [Self; 5] = [
        Self::PLAYER,
        Self::ENEMY,
        Self::PROJECTILE,
        Self::ENVIRONMENT,
        Self::PICKUP,
    ];

    /// Get the layer as a bitmask
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if any bit of `other` is set in this mask
    #[inline]
    pub const fn intersects(self, other: CollisionLayer) -> bool {
        self.0 & other.0 != 0
    }

    /// Look up a built-in layer by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "player" => Some(Self::PLAYER),
            "enemy" | "enemies" => Some(Self::ENEMY),
            "projectile" | "projectiles" => Some(Self::PROJECTILE),
            "environment" => Some(Self::ENVIRONMENT),
            "pickup" | "pickups" => Some(Self::PICKUP),
            _ => None,
        }
    }
}

impl Default for CollisionLayer {
    fn default() -> Self {
        Self::ENVIRONMENT
    }
}

impl std::ops::BitOr for CollisionLayer {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Symmetric table of which layer pairs are tested at all
///
/// Row `i` holds the mask of layers that bit `i` collides with. Every
/// write sets both rows, so `should_collide(a, b) == should_collide(b, a)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionMatrix {
    rows: [u32; 32],
}

impl Default for CollisionMatrix {
    fn default() -> Self {
        use CollisionLayer as L;

        let mut matrix = Self::new();
        matrix.set_collides_with(L::PLAYER, &[L::ENEMY, L::ENVIRONMENT, L::PICKUP]);
        matrix.set_collides_with(L::ENEMY, &[L::PLAYER, L::PROJECTILE, L::ENVIRONMENT]);
        matrix.set_collides_with(L::PROJECTILE, &[L::ENEMY, L::ENVIRONMENT]);
        matrix.set_collides_with(L::ENVIRONMENT, &[L::PLAYER, L::ENEMY, L::PROJECTILE]);
        matrix.set_collides_with(L::PICKUP, &[L::PLAYER]);
        matrix
    }
}

impl CollisionMatrix {
    /// Create a matrix where nothing collides
    pub fn new() -> Self {
        Self { rows: [0; 32] }
    }

    /// Enable or disable a layer pair (both directions)
    pub fn set_pair(&mut self, a: CollisionLayer, b: CollisionLayer, enabled: bool) {
        for i in bit_indices(a.0) {
            if enabled {
                self.rows[i] |= b.0;
            } else {
                self.rows[i] &= !b.0;
            }
        }
        for j in bit_indices(b.0) {
            if enabled {
                self.rows[j] |= a.0;
            } else {
                self.rows[j] &= !a.0;
            }
        }
    }

    /// Enable every pair between `layer` and `collides_with`
    pub fn set_collides_with(&mut self, layer: CollisionLayer, collides_with: &[CollisionLayer]) {
        for other in collides_with {
            self.set_pair(layer, *other, true);
        }
    }

    /// Mask of layers that `layer` collides with
    pub fn mask_for(&self, layer: CollisionLayer) -> CollisionLayer {
        CollisionLayer(bit_indices(layer.0).fold(0, |acc, i| acc | self.rows[i]))
    }

    /// Check if two layers are tested against each other
    pub fn should_collide(&self, a: CollisionLayer, b: CollisionLayer) -> bool {
        self.mask_for(a).intersects(b)
    }
}

fn bit_indices(mask: u32) -> impl Iterator<Item = usize> {
    (0..32).filter(move |i| mask & (1 << i) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use CollisionLayer as L;

    #[test]
    fn test_default_table() {
        let matrix = CollisionMatrix::default();

        assert!(matrix.should_collide(L::PLAYER, L::ENEMY));
        assert!(matrix.should_collide(L::PROJECTILE, L::ENVIRONMENT));
        assert!(matrix.should_collide(L::PICKUP, L::PLAYER));
        assert!(!matrix.should_collide(L::PICKUP, L::PROJECTILE));
        assert!(!matrix.should_collide(L::PROJECTILE, L::PLAYER));
        assert!(!matrix.should_collide(L::PROJECTILE, L::PROJECTILE));
        assert!(!matrix.should_collide(L::ENEMY, L::ENEMY));
    }

    #[test]
    fn test_table_is_symmetric() {
        let matrix = CollisionMatrix::default();
        for a in L::BUILTIN {
            for b in L::BUILTIN {
                assert_eq!(
                    matrix.should_collide(a, b),
                    matrix.should_collide(b, a),
                    "{:?} vs {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_set_pair_both_ways() {
        let mut matrix = CollisionMatrix::new();
        matrix.set_pair(L::ENEMY, L::ENEMY, true);
        assert!(matrix.should_collide(L::ENEMY, L::ENEMY));

        matrix.set_pair(L::PLAYER, L::PICKUP, true);
        matrix.set_pair(L::PICKUP, L::PLAYER, false);
        assert!(!matrix.should_collide(L::PLAYER, L::PICKUP));
    }

    #[test]
    fn test_layer_names() {
        assert_eq!(L::from_name("Environment"), Some(L::ENVIRONMENT));
        assert_eq!(L::from_name("enemies"), Some(L::ENEMY));
        assert_eq!(L::from_name("water"), None);
    }
}
