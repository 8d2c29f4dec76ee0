use rand::seq::SliceRandom;
use rand::Rng;

const BANNERS: [&str; 4] = ["WORKOUT DONE!", "CRUSHED IT!", "STRONG WORK!", "ALL SETS IN!"];
const CONFETTI: [char; 6] = ['*', '+', '•', '✦', '✚', '◆'];
const GRAVITY: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct ConfettiParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: char,
    pub color_index: usize,
    pub age: f64,
    pub max_age: f64,
}

impl ConfettiParticle {
    fn burst<R: Rng>(x: f64, y: f64, rng: &mut R) -> Self {
        Self {
            x,
            y,
            vel_x: rng.gen_range(-4.0..4.0),
            vel_y: rng.gen_range(-6.0..-2.0),
            symbol: *CONFETTI.choose(rng).unwrap_or(&'*'),
            color_index: rng.gen_range(0..6),
            age: 0.0,
            max_age: rng.gen_range(1.5..3.0),
        }
    }

    fn update(&mut self, dt: f64) -> bool {
        self.x += self.vel_x * dt;
        self.y += self.vel_y * dt;
        self.vel_y += GRAVITY * dt;
        self.age += dt;
        self.age < self.max_age
    }
}

/// Confetti burst shown once the last exercise is done
#[derive(Debug)]
pub struct Celebration {
    pub particles: Vec<ConfettiParticle>,
    pub banner: &'static str,
    pub elapsed: f64,
    pub duration: f64,
    pub is_active: bool,
    width: f64,
    height: f64,
}

impl Celebration {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            banner: BANNERS[0],
            elapsed: 0.0,
            duration: 3.0,
            is_active: false,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16) {
        let mut rng = rand::thread_rng();

        self.width = width as f64;
        self.height = height as f64;
        self.elapsed = 0.0;
        self.is_active = true;
        self.banner = BANNERS.choose(&mut rng).copied().unwrap_or(BANNERS[0]);

        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;
        self.particles = (0..40)
            .map(|_| {
                let x = center_x + rng.gen_range(-12.0..12.0);
                let y = center_y + rng.gen_range(-4.0..4.0);
                ConfettiParticle::burst(x, y, &mut rng)
            })
            .collect();
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f64) {
        if !self.is_active {
            return;
        }

        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.stop();
            return;
        }

        let (width, height) = (self.width, self.height);
        self.particles.retain_mut(|p| {
            let alive = p.update(dt);
            alive && p.y <= height + 2.0 && p.x >= -2.0 && p.x <= width + 2.0
        });
    }

    pub fn stop(&mut self) {
        self.is_active = false;
        self.particles.clear();
    }
}

impl Default for Celebration {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_falls() {
        let mut rng = rand::thread_rng();
        let mut p = ConfettiParticle::burst(10.0, 10.0, &mut rng);
        let vel_y = p.vel_y;

        assert!(p.update(0.1));
        assert!(p.vel_y > vel_y);
    }

    #[test]
    fn test_start_spawns_particles() {
        let mut c = Celebration::new();
        assert!(!c.is_active);

        c.start(80, 24);
        assert!(c.is_active);
        assert_eq!(c.particles.len(), 40);
        assert!(BANNERS.contains(&c.banner));
    }

    #[test]
    fn test_ends_after_duration() {
        let mut c = Celebration::new();
        c.start(80, 24);

        for _ in 0..10 {
            c.update(0.1);
        }
        assert!(c.is_active);

        for _ in 0..25 {
            c.update(0.1);
        }
        assert!(!c.is_active);
        assert!(c.particles.is_empty());
    }

    #[test]
    fn test_update_inactive_is_noop() {
        let mut c = Celebration::new();
        c.update(1.0);
        assert!(!c.is_active);
        assert_eq!(c.elapsed, 0.0);
    }
}
