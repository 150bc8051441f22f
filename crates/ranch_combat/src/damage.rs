//! Damage information and falloff

use ranch_core::Id;
use ranch_math::Vec3;

/// Information about a damage instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInfo {
    /// Damage amount
    pub amount: f32,
    /// Entity that caused the damage (if any)
    pub source: Option<Id>,
    /// World position where damage was applied
    pub hit_point: Option<Vec3>,
}

impl DamageInfo {
    /// Create new damage info
    pub fn new(amount: f32) -> Self {
        Self {
            amount,
            source: None,
            hit_point: None,
        }
    }

    /// Set the source entity
    pub fn with_source(mut self, source: Id) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the hit point
    pub fn with_hit_point(mut self, point: Vec3) -> Self {
        self.hit_point = Some(point);
        self
    }
}

/// Linear falloff: full damage at the center, zero at and beyond `radius`
pub fn falloff_damage(damage: f32, distance: f32, radius: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    damage * (1.0 - distance.max(0.0) / radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff_bounds() {
        assert_eq!(falloff_damage(100.0, 0.0, 8.0), 100.0);
        assert_eq!(falloff_damage(100.0, 4.0, 8.0), 50.0);
        assert_eq!(falloff_damage(100.0, 8.0, 8.0), 0.0);
        assert_eq!(falloff_damage(100.0, 9.0, 8.0), 0.0);
    }

    #[test]
    fn test_damage_builder() {
        let info = DamageInfo::new(25.0).with_source(Id::new(1, 0));
        assert_eq!(info.source, Some(Id::new(1, 0)));
        assert!(info.hit_point.is_none());
    }
}
