//! Trail system binding trails to projectile slots and drawing them each frame

use crate::core::{TrailConfig, TrailRendererConfig};
use crate::events::{ProjectileListener, Slot};
use crate::foundation::math::Vec3;
use crate::render::{Camera, FrameCompositor, FrameStats, TrailRenderBackend};
use crate::trail::Trail;
use crate::TrailError;

/// Trail storage for one projectile slot
#[derive(Debug, Clone)]
struct TrailSlot {
    trail: Trail,
    live: bool,
}

/// Result of one frame's trail pass
#[derive(Debug)]
pub enum FrameOutcome {
    /// No trail had geometry, nothing was uploaded
    Skipped,
    /// The merged mesh was uploaded
    Drawn(FrameStats),
    /// The frame was abandoned; later frames are unaffected
    Dropped(TrailError),
}

impl FrameOutcome {
    /// Stats of a drawn frame
    pub fn stats(&self) -> Option<FrameStats> {
        match self {
            Self::Drawn(stats) => Some(*stats),
            _ => None,
        }
    }
}

/// System for keeping one trail per projectile slot
///
/// Receives lifecycle notifications through [`ProjectileListener`] and, once
/// per frame, merges every trail into a single mesh for the backend. Trails
/// are never deallocated; a removed projectile's trail is cleared and reused
/// for the next projectile in that slot.
pub struct TrailSystem {
    slots: Vec<TrailSlot>,
    trail_config: TrailConfig,
    emitter_position: Vec3,
    compositor: FrameCompositor,
}

impl TrailSystem {
    /// Create a trail system with one empty trail per slot
    pub fn new(config: TrailRendererConfig) -> Result<Self, TrailError> {
        let config = config.validated()?;
        let idle = TrailSlot {
            trail: Trail::new(config.trail.max_segment_length, config.trail.quad_width),
            live: false,
        };

        log::info!(
            "Trail system ready: {} slots, width {}, segment length {}, parallel generation {}",
            config.max_tracked_objects,
            config.trail.quad_width,
            config.trail.max_segment_length,
            config.parallel_generation
        );

        Ok(Self {
            slots: vec![idle; config.max_tracked_objects],
            emitter_position: config.emitter_position(),
            compositor: FrameCompositor::new(config.parallel_generation)
                .with_vertex_budget(config.max_frame_vertices),
            trail_config: config.trail,
        })
    }

    /// Number of projectile slots
    pub fn max_tracked_objects(&self) -> usize {
        self.slots.len()
    }

    /// Position first quads start from
    pub fn emitter_position(&self) -> Vec3 {
        self.emitter_position
    }

    /// Move the emitter; affects trails started afterwards
    pub fn set_emitter_position(&mut self, position: Vec3) {
        self.emitter_position = position;
    }

    /// Trail in `slot`, if the slot exists
    pub fn trail(&self, slot: Slot) -> Option<&Trail> {
        self.slots.get(slot).map(|s| &s.trail)
    }

    /// Whether a projectile currently occupies `slot`
    pub fn is_live(&self, slot: Slot) -> bool {
        self.slots.get(slot).is_some_and(|s| s.live)
    }

    /// All trails in slot order
    pub fn trails(&self) -> impl Iterator<Item = &Trail> + '_ {
        self.slots.iter().map(|s| &s.trail)
    }

    /// Quads across every trail
    pub fn total_quad_count(&self) -> usize {
        self.trails().map(Trail::quad_count).sum()
    }

    /// Trails that currently have geometry
    pub fn active_trail_count(&self) -> usize {
        self.trails().filter(|t| !t.is_empty()).count()
    }

    /// Merge and upload every trail for `view_direction`
    ///
    /// Returns `Ok(None)` when there is nothing to draw.
    pub fn draw(
        &mut self,
        view_direction: Vec3,
        backend: &mut dyn TrailRenderBackend,
    ) -> Result<Option<FrameStats>, TrailError> {
        let trails = self.slots.iter().map(|s| &s.trail);
        self.compositor.draw(trails, view_direction, backend)
    }

    /// End-of-frame trail pass, run after all projectiles have moved
    ///
    /// Failures drop this frame only and are reported in the outcome.
    pub fn late_update(&mut self, camera: &Camera, backend: &mut dyn TrailRenderBackend) -> FrameOutcome {
        match self.draw(camera.forward(), backend) {
            Ok(Some(stats)) => FrameOutcome::Drawn(stats),
            Ok(None) => FrameOutcome::Skipped,
            Err(e) => {
                log::warn!("Dropping trail frame: {}", e);
                FrameOutcome::Dropped(e)
            }
        }
    }

    fn live_slot_mut(&mut self, slot: Slot, action: &str) -> Option<&mut TrailSlot> {
        match self.slots.get_mut(slot) {
            Some(entry) if entry.live => Some(entry),
            Some(_) => {
                log::debug!("Ignoring {} for idle projectile slot {}", action, slot);
                None
            }
            None => {
                log::debug!("Ignoring {} for unknown projectile slot {}", action, slot);
                None
            }
        }
    }
}

impl ProjectileListener for TrailSystem {
    fn on_projectile_created(&mut self, slot: Slot, _position: Vec3) {
        let Some(entry) = self.slots.get_mut(slot) else {
            log::debug!("Ignoring creation for unknown projectile slot {}", slot);
            return;
        };

        entry.trail.reset(&self.trail_config);
        entry.live = true;
    }

    fn on_projectile_moved(&mut self, slot: Slot, position: Vec3) {
        let emitter = self.emitter_position;
        if let Some(entry) = self.live_slot_mut(slot, "move") {
            entry.trail.expand(position, emitter);
        }
    }

    fn on_projectile_removed(&mut self, slot: Slot, _position: Vec3) {
        if let Some(entry) = self.live_slot_mut(slot, "removal") {
            entry.trail.clear();
            entry.live = false;
        }
    }
}
