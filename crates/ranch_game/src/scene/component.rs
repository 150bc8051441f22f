//! Component storage and capability traits
//!
//! An entity owns at most one component of each [`ComponentKind`]. Each
//! component is a variant of the closed [`Component`] enum; typed access goes
//! through [`ComponentVariant`] so callers write `components.get::<EnemyAi>()`.

use super::context::ComponentContext;
use crate::components::CombatManager;
use ranch_ai::{EnemyAi, EnemyManager};
use ranch_combat::{Projectile, WeaponSystem};
use ranch_core::Id;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Component type tag
///
/// Ordering is the per-entity update order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Combat,
    Weapons,
    EnemyManager,
    EnemyAi,
    Projectile,
}

impl ComponentKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Combat => "combat",
            Self::Weapons => "weapons",
            Self::EnemyManager => "enemy_manager",
            Self::EnemyAi => "enemy_ai",
            Self::Projectile => "projectile",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle hooks
///
/// All hooks default to no-ops.
pub trait Attachable {
    fn on_attach(&mut self, _owner: Id) {}
    fn on_detach(&mut self, _owner: Id) {}
    fn on_destroy(&mut self, _owner: Id) {}
}

/// Per-frame behavior
pub trait Updatable {
    fn update(&mut self, ctx: &mut ComponentContext<'_>);
}

/// Every component the scene knows about
#[derive(Debug)]
pub enum Component {
    Combat(Box<CombatManager>),
    Weapons(WeaponSystem),
    EnemyManager(EnemyManager),
    EnemyAi(Box<EnemyAi>),
    Projectile(Projectile),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Combat(_) => ComponentKind::Combat,
            Self::Weapons(_) => ComponentKind::Weapons,
            Self::EnemyManager(_) => ComponentKind::EnemyManager,
            Self::EnemyAi(_) => ComponentKind::EnemyAi,
            Self::Projectile(_) => ComponentKind::Projectile,
        }
    }

    pub(crate) fn update(&mut self, ctx: &mut ComponentContext<'_>) {
        match self {
            Self::Combat(c) => Updatable::update(c.as_mut(), ctx),
            Self::Weapons(c) => Updatable::update(c, ctx),
            Self::EnemyManager(c) => Updatable::update(c, ctx),
            Self::EnemyAi(c) => Updatable::update(c.as_mut(), ctx),
            Self::Projectile(c) => Updatable::update(c, ctx),
        }
    }

    fn as_attachable(&mut self) -> &mut dyn Attachable {
        match self {
            Self::Combat(c) => c.as_mut(),
            Self::Weapons(c) => c,
            Self::EnemyManager(c) => c,
            Self::EnemyAi(c) => c.as_mut(),
            Self::Projectile(c) => c,
        }
    }

    pub(crate) fn on_attach(&mut self, owner: Id) {
        self.as_attachable().on_attach(owner);
    }

    pub(crate) fn on_detach(&mut self, owner: Id) {
        self.as_attachable().on_detach(owner);
    }

    pub(crate) fn on_destroy(&mut self, owner: Id) {
        self.as_attachable().on_destroy(owner);
    }
}

/// Typed view of one [`Component`] variant
pub trait ComponentVariant: Sized {
    const KIND: ComponentKind;

    fn wrap(self) -> Component;
    fn from_ref(component: &Component) -> Option<&Self>;
    fn from_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! component_variant {
    ($ty:ty, $variant:ident, boxed) => {
        impl ComponentVariant for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn wrap(self) -> Component {
                Component::$variant(Box::new(self))
            }

            fn from_ref(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(c) => Some(c.as_ref()),
                    _ => None,
                }
            }

            fn from_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(c) => Some(c.as_mut()),
                    _ => None,
                }
            }
        }
    };
    ($ty:ty, $variant:ident) => {
        impl ComponentVariant for $ty {
            const KIND: ComponentKind = ComponentKind::$variant;

            fn wrap(self) -> Component {
                Component::$variant(self)
            }

            fn from_ref(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }

            fn from_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

component_variant!(CombatManager, Combat, boxed);
component_variant!(WeaponSystem, Weapons);
component_variant!(EnemyManager, EnemyManager);
component_variant!(EnemyAi, EnemyAi, boxed);
component_variant!(Projectile, Projectile);

/// The components of one entity, at most one per kind
#[derive(Debug, Default)]
pub struct Components {
    map: BTreeMap<ComponentKind, Component>,
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: ComponentVariant>(&self) -> Option<&T> {
        self.map.get(&T::KIND).and_then(T::from_ref)
    }

    pub fn get_mut<T: ComponentVariant>(&mut self) -> Option<&mut T> {
        self.map.get_mut(&T::KIND).and_then(T::from_mut)
    }

    pub fn has<T: ComponentVariant>(&self) -> bool {
        self.has_kind(T::KIND)
    }

    pub fn has_kind(&self, kind: ComponentKind) -> bool {
        self.map.contains_key(&kind)
    }

    /// Attached kinds in update order
    pub fn kinds(&self) -> Vec<ComponentKind> {
        self.map.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.map.values()
    }

    /// Insert unless a component of the same kind is present
    ///
    /// On conflict the rejected component is handed back.
    pub(crate) fn insert(&mut self, component: Component) -> std::result::Result<(), Component> {
        let kind = component.kind();
        if self.map.contains_key(&kind) {
            return Err(component);
        }
        self.map.insert(kind, component);
        Ok(())
    }

    pub(crate) fn remove(&mut self, kind: ComponentKind) -> Option<Component> {
        self.map.remove(&kind)
    }

    /// Take a component out for the duration of its update
    pub(crate) fn take(&mut self, kind: ComponentKind) -> Option<Component> {
        self.map.remove(&kind)
    }

    pub(crate) fn put_back(&mut self, component: Component) {
        self.map.insert(component.kind(), component);
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Component> {
        self.map.values_mut()
    }
}
