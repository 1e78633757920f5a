//! 9-axis inertial sample types and unit scaling
//!
//! A sample is three 3-vectors (acceleration, angular rate, magnetic field).
//! Raw sensor counts are `i16`; physical values are `f32`.

use serde::{Deserialize, Serialize};

use crate::CHANNEL_COUNT;

/// Standard gravity in m/s^2
pub const G_ACCEL: f32 = 9.80665;

/// Accelerometer full scale in g (+-2g)
pub const ACCEL_RANGE_G: f32 = 2.0;

/// Gyroscope full scale in degrees per second (+-245dps)
pub const GYRO_RANGE_DPS: f32 = 245.0;

/// Magnetometer full scale in gauss (+-4 gauss)
pub const MAG_RANGE_GAUSS: f32 = 4.0;

/// Counts per full scale (i16 range, +1 for the negative side)
const FULL_SCALE_COUNTS: f32 = 32768.0;

/// m/s^2 per accelerometer count
pub const ACCEL_SCALE: f32 = ACCEL_RANGE_G * G_ACCEL / FULL_SCALE_COUNTS;

/// deg/s per gyroscope count
pub const GYRO_SCALE: f32 = GYRO_RANGE_DPS / FULL_SCALE_COUNTS;

/// gauss per magnetometer count
pub const MAG_SCALE: f32 = MAG_RANGE_GAUSS / FULL_SCALE_COUNTS;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Copy> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }

    fn map<U>(self, f: impl Fn(T) -> U) -> Vector3<U> {
        Vector3 {
            x: f(self.x),
            y: f(self.y),
            z: f(self.z),
        }
    }
}

/// One reading from all three sensors
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuReading<T> {
    /// Linear acceleration
    pub accel: Vector3<T>,
    /// Angular rate
    pub gyro: Vector3<T>,
    /// Magnetic field
    pub mag: Vector3<T>,
}

/// Sensor counts as produced by the driver
pub type RawSample = ImuReading<i16>;

/// Physical units: m/s^2, deg/s, gauss
pub type Sample = ImuReading<f32>;

impl<T: Copy> ImuReading<T> {
    pub fn new(accel: Vector3<T>, gyro: Vector3<T>, mag: Vector3<T>) -> Self {
        Self { accel, gyro, mag }
    }

    /// Flatten in wire order: ax, ay, az, gx, gy, gz, mx, my, mz
    pub fn to_channels(&self) -> [T; CHANNEL_COUNT] {
        [
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
            self.mag.x,
            self.mag.y,
            self.mag.z,
        ]
    }

    /// Inverse of [`Self::to_channels`]
    pub fn from_channels(c: [T; CHANNEL_COUNT]) -> Self {
        Self {
            accel: Vector3::new(c[0], c[1], c[2]),
            gyro: Vector3::new(c[3], c[4], c[5]),
            mag: Vector3::new(c[6], c[7], c[8]),
        }
    }
}

impl RawSample {
    /// Convert counts to physical units
    pub fn to_physical(&self) -> Sample {
        Sample {
            accel: self.accel.map(|v| f32::from(v) * ACCEL_SCALE),
            gyro: self.gyro.map(|v| f32::from(v) * GYRO_SCALE),
            mag: self.mag.map(|v| f32::from(v) * MAG_SCALE),
        }
    }
}
