//! Headless trail demo
//!
//! Fires projectiles from a simulated gun, keeps a trail per projectile and
//! merges them into one mesh each frame. The "GPU" just logs what it would
//! upload.
//!
//! Usage: `trail_demo [config.toml|config.ron]`

mod gun;

use std::time::Instant;

use thiserror::Error;
use trail_engine::foundation::logging;
use trail_engine::prelude::*;

use gun::Gun;

// Simulation constants
const FRAME_COUNT: u32 = 600;
const DELTA_TIME: f32 = 1.0 / 60.0;
const STATS_INTERVAL: u32 = 60;
const RNG_SEED: u64 = 0x5EED;

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Trail(#[from] TrailError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Backend that records upload sizes instead of talking to a GPU
#[derive(Default)]
struct LoggingBackend {
    uploads: u64,
    bytes_uploaded: u64,
}

impl TrailRenderBackend for LoggingBackend {
    fn upload_trail_mesh(&mut self, upload: &MeshUpload<'_>) -> BackendResult<()> {
        self.uploads += 1;
        self.bytes_uploaded += (upload.vertex_bytes().len() + upload.index_bytes().len()) as u64;
        log::trace!(
            "Upload: {} vertices, {} indices, {:?}",
            upload.vertex_count(),
            upload.index_count(),
            upload.sub_mesh
        );
        Ok(())
    }
}

fn load_config() -> Result<TrailRendererConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading trail config from {}", path);
            Ok(TrailRendererConfig::load_from_file(&path)?)
        }
        None => Ok(TrailRendererConfig::new(64)
            .with_emitter_position(Vec3::new(0.0, 1.5, 0.0))
            .with_trail(TrailConfig::new(4.0, 0.3))),
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    let muzzle = config.emitter_position();
    let mut trails = TrailSystem::new(config)?;
    let mut gun = Gun::new(muzzle, trails.max_tracked_objects(), RNG_SEED);
    let mut backend = LoggingBackend::default();

    let mut camera = Camera::look_at(Vec3::new(25.0, 10.0, -20.0), Vec3::new(0.0, 1.5, -40.0));
    let started = Instant::now();
    let mut dropped = 0u32;

    for frame in 0..FRAME_COUNT {
        gun.update(DELTA_TIME, &mut trails);

        // Slow orbit so the ribbons have to re-face the camera.
        let angle = frame as f32 * DELTA_TIME * 0.2;
        camera.position = Vec3::new(25.0 * angle.cos(), 10.0, -40.0 + 25.0 * angle.sin());

        match trails.late_update(&camera, &mut backend) {
            FrameOutcome::Drawn(stats) if frame % STATS_INTERVAL == 0 => {
                log::info!(
                    "Frame {}: {} projectiles, {} trails, {} quads, {} vertices",
                    frame,
                    gun.live_count(),
                    stats.trail_count,
                    stats.quad_count,
                    stats.vertex_count
                );
            }
            FrameOutcome::Dropped(_) => dropped += 1,
            _ => {}
        }
    }

    log::info!(
        "Finished {} frames in {:.1} ms: {} uploads, {} KiB, {} dropped",
        FRAME_COUNT,
        started.elapsed().as_secs_f64() * 1000.0,
        backend.uploads,
        backend.bytes_uploaded / 1024,
        dropped
    );

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if logging::init_with_level("info").is_err() {
        eprintln!("Logger already initialised");
    }

    log::info!("Starting trail demo");

    match run() {
        Ok(()) => {
            log::info!("Trail demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Trail demo failed: {:?}", e);
            Err(e.into())
        }
    }
}
