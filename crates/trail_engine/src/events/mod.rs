//! Projectile lifecycle notifications
//!
//! The projectile source reports every state change synchronously through
//! [`ProjectileListener`]. Slots are integers in `[0, max_tracked_objects)`
//! that the source reuses cyclically; a slot is never shared by two live
//! projectiles.

use crate::foundation::math::Vec3;

/// Stable numeric identity of a projectile during its lifetime
pub type Slot = usize;

/// Receiver of projectile lifecycle notifications
pub trait ProjectileListener {
    /// A projectile was spawned into `slot`
    fn on_projectile_created(&mut self, slot: Slot, position: Vec3);

    /// The projectile in `slot` moved to `position`
    fn on_projectile_moved(&mut self, slot: Slot, position: Vec3);

    /// The projectile in `slot` was destroyed at `position`
    fn on_projectile_removed(&mut self, slot: Slot, position: Vec3);
}

/// A single lifecycle notification, for sources that batch their updates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileEvent {
    /// Projectile spawned
    Created {
        /// Slot assigned by the source
        slot: Slot,
        /// Spawn position
        position: Vec3,
    },

    /// Projectile moved
    Moved {
        /// Slot of the projectile
        slot: Slot,
        /// New position
        position: Vec3,
    },

    /// Projectile destroyed
    Removed {
        /// Slot being released
        slot: Slot,
        /// Last known position
        position: Vec3,
    },
}

impl ProjectileEvent {
    /// Deliver this event to `listener`
    pub fn dispatch(&self, listener: &mut dyn ProjectileListener) {
        match *self {
            Self::Created { slot, position } => listener.on_projectile_created(slot, position),
            Self::Moved { slot, position } => listener.on_projectile_moved(slot, position),
            Self::Removed { slot, position } => listener.on_projectile_removed(slot, position),
        }
    }
}

/// Deliver `events` to `listener` in order
pub fn dispatch_all<'e>(
    events: impl IntoIterator<Item = &'e ProjectileEvent>,
    listener: &mut dyn ProjectileListener,
) {
    for event in events {
        event.dispatch(listener);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, Slot)>,
    }

    impl ProjectileListener for Recorder {
        fn on_projectile_created(&mut self, slot: Slot, _position: Vec3) {
            self.calls.push(("created", slot));
        }

        fn on_projectile_moved(&mut self, slot: Slot, _position: Vec3) {
            self.calls.push(("moved", slot));
        }

        fn on_projectile_removed(&mut self, slot: Slot, _position: Vec3) {
            self.calls.push(("removed", slot));
        }
    }

    #[test]
    fn test_dispatch_all_preserves_order() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let events = [
            ProjectileEvent::Created { slot: 2, position: p },
            ProjectileEvent::Moved { slot: 2, position: p },
            ProjectileEvent::Removed { slot: 2, position: p },
            ProjectileEvent::Created { slot: 0, position: p },
        ];
        let mut recorder = Recorder::default();

        dispatch_all(&events, &mut recorder);

        assert_eq!(
            recorder.calls,
            vec![("created", 2), ("moved", 2), ("removed", 2), ("created", 0)]
        );
    }
}
