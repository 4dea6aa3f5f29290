//! Seasonal decoration: falling particles and the night starfield.
//!
//! Both collections are owned values; the dashboard holds the starfield and
//! the decoration loop shares the particle field behind a mutex.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// One falling decoration element.
#[derive(Debug, Clone)]
pub struct Particle {
    pub glyph: &'static str,
    /// Horizontal position in columns, `0..width`
    pub x: f32,
    /// Glyph size in px, `10..20`
    pub size: f32,
    /// Time to fall the full height, `5..10` s
    pub fall_duration: Duration,
    pub spawned_at: Instant,
}

impl Particle {
    /// Fraction of the fall completed at `now`; 1.0 or more means off screen.
    pub fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.spawned_at);
        elapsed.as_secs_f32() / self.fall_duration.as_secs_f32()
    }
}

#[derive(Debug)]
pub struct DecorationField {
    glyph: &'static str,
    width: u16,
    lifetime: Duration,
    particles: Vec<Particle>,
}

impl DecorationField {
    pub fn new(glyph: &'static str, width: u16, lifetime: Duration) -> Self {
        Self {
            glyph,
            width: width.max(1),
            lifetime,
            particles: Vec::new(),
        }
    }

    pub fn spawn<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        self.particles.push(Particle {
            glyph: self.glyph,
            x: rng.random_range(0.0..f32::from(self.width)),
            size: rng.random_range(10.0..20.0),
            fall_duration: Duration::from_secs_f32(rng.random_range(5.0..10.0)),
            spawned_at: now,
        });
    }

    /// Remove particles that have outlived their lifetime.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.particles.len();
        let lifetime = self.lifetime;
        self.particles
            .retain(|p| now.saturating_duration_since(p.spawned_at) < lifetime);
        before - self.particles.len()
    }

    /// One generator step: drop expired particles, then add a new one.
    pub fn tick<R: Rng + ?Sized>(&mut self, now: Instant, rng: &mut R) {
        self.prune(now);
        self.spawn(now, rng);
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Draw the particles still in view as `rows` lines of text.
    ///
    /// Each cell is two columns wide since the glyphs are emoji.
    pub fn render_frame(&self, now: Instant, rows: u16) -> Vec<String> {
        let cols = usize::from(self.width / 2).max(1);
        let rows = usize::from(rows);
        let mut grid = vec![vec!["  "; cols]; rows];

        for particle in &self.particles {
            let progress = particle.progress(now);
            if !(0.0..1.0).contains(&progress) {
                continue;
            }
            let row = (progress * rows as f32) as usize;
            let col = (particle.x / 2.0) as usize;
            if let Some(cell) = grid.get_mut(row).and_then(|r| r.get_mut(col)) {
                *cell = particle.glyph;
            }
        }

        grid.into_iter().map(|cells| cells.concat()).collect()
    }
}

/// Run the particle generator until `token` is cancelled.
pub fn spawn_decoration_loop(
    field: Arc<Mutex<DecorationField>>,
    interval: Duration,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut rng = StdRng::from_os_rng();

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    field.lock().tick(Instant::now(), &mut rng);
                }
            }
        }

        tracing::debug!("Decoration loop stopped");
    })
}

/// A twinkling star on the night background, positioned in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Star {
    pub top: f32,
    pub left: f32,
    /// Diameter in px, `1..3`
    pub size: f32,
    /// Twinkle period in seconds, `1..4`
    pub twinkle: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Starfield {
    count: usize,
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            stars: Vec::with_capacity(count),
        }
    }

    /// Replace all stars with a fresh random set.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.stars.clear();
        for _ in 0..self.count {
            self.stars.push(Star {
                top: rng.random_range(0.0..100.0),
                left: rng.random_range(0.0..100.0),
                size: rng.random_range(1.0..3.0),
                twinkle: rng.random_range(1.0..4.0),
            });
        }
    }

    pub fn clear(&mut self) {
        self.stars.clear();
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}
