//! Simulated gun feeding projectile lifecycle events to the trail system
//!
//! Projectiles fly in straight lines from the muzzle and are removed when
//! their lifetime runs out. Slots are handed out round-robin, so a slot is
//! only reused after its previous projectile has been removed.

use rand::prelude::*;
use trail_engine::prelude::*;

#[derive(Debug, Clone)]
struct Projectile {
    position: Vec3,
    velocity: Vec3,
    age: f32,
}

/// Headless projectile source
pub struct Gun {
    muzzle: Vec3,
    muzzle_speed: f32,
    spread: f32,
    projectile_lifetime: f32,
    fire_interval: f32,
    fire_timer: f32,
    next_slot: Slot,
    projectiles: Vec<Option<Projectile>>,
    rng: StdRng,
}

impl Gun {
    /// Create a gun with `max_projectiles` slots
    pub fn new(muzzle: Vec3, max_projectiles: usize, seed: u64) -> Self {
        Self {
            muzzle,
            muzzle_speed: 60.0,
            spread: 0.15,
            projectile_lifetime: 2.5,
            fire_interval: 0.05,
            fire_timer: 0.0,
            next_slot: 0,
            projectiles: vec![None; max_projectiles],
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Projectiles currently in flight
    pub fn live_count(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_some()).count()
    }

    /// Advance the simulation, notifying `listener` of every change
    pub fn update(&mut self, delta_time: f32, listener: &mut dyn ProjectileListener) {
        for (slot, entry) in self.projectiles.iter_mut().enumerate() {
            let Some(projectile) = entry else { continue };

            projectile.age += delta_time;
            if projectile.age >= self.projectile_lifetime {
                listener.on_projectile_removed(slot, projectile.position);
                *entry = None;
                continue;
            }

            projectile.position += projectile.velocity * delta_time;
            listener.on_projectile_moved(slot, projectile.position);
        }

        self.fire_timer += delta_time;
        while self.fire_timer >= self.fire_interval {
            self.fire_timer -= self.fire_interval;
            self.fire(listener);
        }
    }

    fn fire(&mut self, listener: &mut dyn ProjectileListener) {
        let slot = self.next_slot;
        if self.projectiles[slot].is_some() {
            log::trace!("All projectile slots busy, holding fire");
            return;
        }
        self.next_slot = (self.next_slot + 1) % self.projectiles.len();

        let direction = Vec3::new(
            self.rng.gen_range(-self.spread..=self.spread),
            self.rng.gen_range(0.0..=self.spread),
            -1.0,
        )
        .normalize();

        let projectile = Projectile {
            position: self.muzzle,
            velocity: direction * self.muzzle_speed,
            age: 0.0,
        };
        listener.on_projectile_created(slot, projectile.position);
        self.projectiles[slot] = Some(projectile);
    }
}
