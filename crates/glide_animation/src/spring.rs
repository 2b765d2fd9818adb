//! Spring physics
//!
//! RK4-integrated springs. Glide drives springs over normalized progress
//! (0.0 to 1.0) rather than pixels, so the rest thresholds are part of the
//! configuration instead of fixed pixel epsilons.

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from target below which the spring may come to rest
    pub rest_delta: f32,
    /// Speed below which the spring may come to rest
    pub rest_speed: f32,
}

impl SpringConfig {
    /// Create a spring tuned for normalized progress
    pub const fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_delta: 0.001,
            rest_speed: 0.01,
        }
    }

    /// Soft spring with a little overshoot (page-level motion)
    pub const fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Quick spring that barely overshoots (UI feedback, reveals)
    pub const fn snappy() -> Self {
        Self::new(260.0, 30.0, 1.0)
    }

    /// Use pixel-scale rest thresholds instead of progress-scale ones
    pub const fn with_rest(self, rest_delta: f32, rest_speed: f32) -> Self {
        Self {
            rest_delta,
            rest_speed,
            ..self
        }
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::snappy()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    /// Longest step integrated in one go; larger frame gaps are subdivided
    const MAX_STEP: f32 = 1.0 / 60.0;

    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retarget the spring; current velocity is kept
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Jump to the target and stop
    pub fn snap_to_target(&mut self) {
        self.value = self.target;
        self.velocity = 0.0;
    }

    /// Check if the spring has settled (close to target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.config.rest_delta
            && self.velocity.abs() < self.config.rest_speed
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Frame gaps longer than a 60fps frame (a backgrounded tab, a long
    /// layout pass) are split into sub-steps so the integration stays stable.
    pub fn step(&mut self, dt: f32) {
        let mut remaining = dt.max(0.0);
        while remaining > 0.0 {
            if self.is_settled() {
                self.snap_to_target();
                return;
            }
            let h = remaining.min(Self::MAX_STEP);
            self.integrate(h);
            remaining -= h;
        }
        if self.is_settled() {
            self.snap_to_target();
        }
    }

    /// One classic Runge-Kutta step over `h` seconds
    fn integrate(&mut self, h: f32) {
        let s0 = (self.value, self.velocity);
        let d1 = self.derive(s0);
        let d2 = self.derive(advance(s0, d1, h * 0.5));
        let d3 = self.derive(advance(s0, d2, h * 0.5));
        let d4 = self.derive(advance(s0, d3, h));

        let weighted = |a: f32, b: f32, c: f32, d: f32| (a + 2.0 * (b + c) + d) * h / 6.0;
        self.value += weighted(d1.0, d2.0, d3.0, d4.0);
        self.velocity += weighted(d1.1, d2.1, d3.1, d4.1);
    }

    /// Time derivative of (position, velocity) under Hooke's law with damping
    fn derive(&self, (x, v): (f32, f32)) -> (f32, f32) {
        let force = -self.config.stiffness * (x - self.target) - self.config.damping * v;
        (v, force / self.config.mass)
    }
}

fn advance((x, v): (f32, f32), (dx, dv): (f32, f32), h: f32) -> (f32, f32) {
    (x + dx * h, v + dv * h)
}
