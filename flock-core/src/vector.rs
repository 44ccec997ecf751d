use core::f32::consts::TAU;
use core::ops::{Add, AddAssign, Div, Mul, Sub};

use rand::Rng;

/// A 2D vector used for position and velocity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2D {
    pub x: f32,
    pub y: f32,
}

impl Vector2D {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn magnitude(&self) -> f32 {
        hypot(self.x, self.y)
    }

    /// Unit vector in the same direction, or `None` when the magnitude is
    /// zero (or not finite) and no direction exists.
    pub fn try_normalize(&self) -> Option<Self> {
        let mag = self.magnitude();
        if mag > 0.0 && mag.is_finite() {
            Some(Self {
                x: self.x / mag,
                y: self.y / mag,
            })
        } else {
            None
        }
    }

    /// Caps the magnitude at `max`, keeping the direction.
    pub fn limit(&self, max: f32) -> Self {
        if self.magnitude() > max {
            match self.try_normalize() {
                Some(unit) => unit * max,
                None => *self,
            }
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector2D) -> f32 {
        (*self - *other).magnitude()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vector2D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Vector2D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Vector2D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Div<f32> for Vector2D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl AddAssign for Vector2D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

/// Draws a velocity with a uniform direction and a speed drawn uniformly
/// from `[0, max_magnitude]`.
///
/// The speed is linear in the radius, not area-weighted, so samples cluster
/// towards the origin compared to a uniform disk.
pub fn sample_random_velocity<R: Rng + ?Sized>(max_magnitude: f32, rng: &mut R) -> Vector2D {
    let theta = rng.gen_range(0.0..TAU);
    let speed = rng.gen_range(0.0..=max_magnitude.max(0.0));
    Vector2D::new(speed * cos(theta), speed * sin(theta))
}

#[cfg(feature = "std")]
fn hypot(x: f32, y: f32) -> f32 {
    x.hypot(y)
}

#[cfg(not(feature = "std"))]
fn hypot(x: f32, y: f32) -> f32 {
    libm::hypotf(x, y)
}

#[cfg(feature = "std")]
fn sin(value: f32) -> f32 {
    value.sin()
}

#[cfg(not(feature = "std"))]
fn sin(value: f32) -> f32 {
    libm::sinf(value)
}

#[cfg(feature = "std")]
fn cos(value: f32) -> f32 {
    value.cos()
}

#[cfg(not(feature = "std"))]
fn cos(value: f32) -> f32 {
    libm::cosf(value)
}
