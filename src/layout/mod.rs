//! Data layout workloads.
//!
//! Two ways of storing the same records and walking them:
//!
//! - [`Particle`] slices (array of structures) against [`Particles`]
//!   (structure of arrays), both advanced by the same position update
//! - [`Padded`] records against [`LineAligned`] ones, each occupying a full
//!   cache line, summed over one field
//!
//! The runner times each pair through [`compare`](crate::harness::compare).

use rand::Rng;

use crate::error::{Result, shape_mismatch};

/// Cache line size assumed for [`LineAligned`].
pub const CACHE_LINE_SIZE: usize = 64;

/// Timestep of [`advance_aos`] / [`Particles::advance`].
pub const DT: f32 = 0.01;

/// One particle, all fields side by side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    pub mass: f32,
}

impl Particle {
    /// Position and velocity uniform in `[-1, 1)`, unit mass.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Particle {
            x: rng.random_range(-1.0..1.0),
            y: rng.random_range(-1.0..1.0),
            z: rng.random_range(-1.0..1.0),
            vx: rng.random_range(-1.0..1.0),
            vy: rng.random_range(-1.0..1.0),
            vz: rng.random_range(-1.0..1.0),
            mass: 1.0,
        }
    }
}

/// `n` random particles.
pub fn random_particles<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Particle> {
    (0..n).map(|_| Particle::random(rng)).collect()
}

/// `p += v · dt` for every particle, in place.
///
/// Every update drags the unused `mass` field through the cache along with
/// the six it needs.
pub fn advance_aos(particles: &mut [Particle], dt: f32) {
    for p in particles.iter_mut() {
        p.x += p.vx * dt;
        p.y += p.vy * dt;
        p.z += p.vz * dt;
    }
}

/// The same particles, one vector per field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Particles {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
    pub vx: Vec<f32>,
    pub vy: Vec<f32>,
    pub vz: Vec<f32>,
    pub mass: Vec<f32>,
}

impl Particles {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `p += v · dt` for every particle, one field at a time.
    ///
    /// # Panics
    ///
    /// Panics if the field vectors have different lengths.
    pub fn advance(&mut self, dt: f32) {
        let n = self.len();
        assert!(
            [&self.y, &self.z, &self.vx, &self.vy, &self.vz]
                .iter()
                .all(|v| v.len() == n),
            "particle fields have different lengths"
        );
        for (p, v) in self.x.iter_mut().zip(&self.vx) {
            *p += v * dt;
        }
        for (p, v) in self.y.iter_mut().zip(&self.vy) {
            *p += v * dt;
        }
        for (p, v) in self.z.iter_mut().zip(&self.vz) {
            *p += v * dt;
        }
    }

    /// `true` if every position equals the matching particle's exactly.
    pub fn same_positions(&self, aos: &[Particle]) -> bool {
        self.len() == aos.len()
            && aos.iter().enumerate().all(|(i, p)| {
                self.x[i] == p.x && self.y[i] == p.y && self.z[i] == p.z
            })
    }

    /// Reassembles the records.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the field vectors have different lengths.
    pub fn to_aos(&self) -> Result<Vec<Particle>> {
        let n = self.len();
        for v in [&self.y, &self.z, &self.vx, &self.vy, &self.vz, &self.mass] {
            if v.len() != n {
                return Err(shape_mismatch("particles_to_aos", (n, 1), (v.len(), 1)));
            }
        }
        Ok((0..n)
            .map(|i| Particle {
                x: self.x[i],
                y: self.y[i],
                z: self.z[i],
                vx: self.vx[i],
                vy: self.vy[i],
                vz: self.vz[i],
                mass: self.mass[i],
            })
            .collect())
    }
}

impl From<&[Particle]> for Particles {
    fn from(aos: &[Particle]) -> Self {
        Particles {
            x: aos.iter().map(|p| p.x).collect(),
            y: aos.iter().map(|p| p.y).collect(),
            z: aos.iter().map(|p| p.z).collect(),
            vx: aos.iter().map(|p| p.vx).collect(),
            vy: aos.iter().map(|p| p.vy).collect(),
            vz: aos.iter().map(|p| p.vz).collect(),
            mass: aos.iter().map(|p| p.mass).collect(),
        }
    }
}

/// A record whose only use is its `payload`.
pub trait Payload {
    fn payload(&self) -> f64;
}

/// Mixed-width fields in declaration order with natural padding only.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padded {
    pub tag: u8,
    pub id: i32,
    pub flag: u8,
    pub value: f64,
}

/// The same fields, one record per cache line.
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineAligned {
    pub tag: u8,
    pub id: i32,
    pub flag: u8,
    pub value: f64,
}

impl Payload for Padded {
    fn payload(&self) -> f64 {
        self.value
    }
}

impl Payload for LineAligned {
    fn payload(&self) -> f64 {
        self.value
    }
}

/// Records `0..n` with `value = i`.
pub fn padded_records(n: usize) -> Vec<Padded> {
    (0..n)
        .map(|i| Padded {
            tag: b'x',
            id: i as i32,
            flag: b'y',
            value: i as f64,
        })
        .collect()
}

/// Records `0..n` with `value = i`.
pub fn aligned_records(n: usize) -> Vec<LineAligned> {
    (0..n)
        .map(|i| LineAligned {
            tag: b'x',
            id: i as i32,
            flag: b'y',
            value: i as f64,
        })
        .collect()
}

/// Sum of every record's payload, in order.
pub fn sum_payloads<T: Payload>(records: &[T]) -> f64 {
    records.iter().map(Payload::payload).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_sizes() {
        assert_eq!(size_of::<Padded>(), 24);
        assert_eq!(size_of::<LineAligned>(), CACHE_LINE_SIZE);
        assert_eq!(align_of::<LineAligned>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn test_to_aos_rejects_ragged_fields() {
        let mut soa = Particles::from(&[Particle::default(); 3][..]);
        soa.mass.pop();
        assert!(soa.to_aos().is_err());
    }
}
