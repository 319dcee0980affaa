//! Collision queries against the host scene.

use glam::Vec3;
use spillway_utils::Aabb;

use crate::container::{ContainerId, ContainerStore};

/// Identifies a collider in the host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// One probe hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// World contact point.
    pub point: Vec3,
    /// Surface normal at the contact.
    pub normal: Vec3,
    /// Distance travelled by the probe before the contact.
    pub distance: f32,
    /// The collider that was hit.
    pub collider: ColliderId,
    /// World bounds of the hit collider.
    pub bounds: Aabb,
    /// Whether the collider is a non-physical trigger volume.
    pub is_trigger: bool,
}

/// The opening of a container that can receive liquid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiquidOpening {
    /// The receiving container.
    pub container: ContainerId,
    /// World position of the opening center.
    pub position: Vec3,
    /// World radius of the opening.
    pub radius: f32,
}

/// Fixed-capacity scratch space for probe results.
///
/// Scenes push hits until the buffer is full; further hits are dropped and
/// only counted. A dropped hit may be the nearest one, so size the buffer for
/// the densest spot a probe can pass through.
#[derive(Debug, Clone)]
pub struct HitBuffer {
    hits: Vec<Hit>,
    capacity: usize,
    truncated: usize,
}

impl HitBuffer {
    /// Creates an empty buffer holding at most `capacity` hits.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: Vec::with_capacity(capacity),
            capacity,
            truncated: 0,
        }
    }

    /// Removes all hits and resets the truncation counter.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.truncated = 0;
    }

    /// Records a hit. Returns `false` if the buffer was full and the hit was dropped.
    pub fn push(&mut self, hit: Hit) -> bool {
        if self.hits.len() < self.capacity {
            self.hits.push(hit);
            true
        } else {
            self.truncated += 1;
            false
        }
    }

    /// Number of stored hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether no hits are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Maximum number of stored hits.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of hits dropped since the last [`clear`](Self::clear).
    #[must_use]
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Stored hits in insertion order.
    #[must_use]
    pub fn hits(&self) -> &[Hit] {
        &self.hits
    }

    /// The closest stored hit accepted by `filter`.
    pub fn nearest_where<F>(&self, mut filter: F) -> Option<Hit>
    where
        F: FnMut(&Hit) -> bool,
    {
        self.hits
            .iter()
            .filter(|hit| filter(hit))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
            .copied()
    }
}

/// Synchronous collision queries.
///
/// Implementations append hits to the given buffer with [`HitBuffer::push`]
/// and return the number stored; callers clear the buffer beforehand. Hit
/// order does not matter.
pub trait SceneQuery {
    /// Sweeps a sphere of `radius` straight down from `origin`.
    fn cast_down(&self, origin: Vec3, radius: f32, hits: &mut HitBuffer) -> usize;

    /// Casts an unbounded ray from `origin` along `direction`.
    fn cast_ray(&self, origin: Vec3, direction: Vec3, hits: &mut HitBuffer) -> usize;

    /// The liquid opening attached to `collider`, if it belongs to a receiving container.
    fn opening_of(&self, collider: ColliderId) -> Option<LiquidOpening>;
}

/// Everything a splitter needs from the host.
pub trait SpillScene: SceneQuery + ContainerStore {}

impl<T: SceneQuery + ContainerStore + ?Sized> SpillScene for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(collider: u32, distance: f32) -> Hit {
        Hit {
            point: Vec3::new(0.0, -distance, 0.0),
            normal: Vec3::Y,
            distance,
            collider: ColliderId(collider),
            bounds: Aabb::new(Vec3::ZERO, Vec3::ONE),
            is_trigger: false,
        }
    }

    #[test]
    fn test_push_truncates_at_capacity() {
        let mut buffer = HitBuffer::with_capacity(2);
        assert!(buffer.push(hit(1, 1.0)));
        assert!(buffer.push(hit(2, 2.0)));
        assert!(!buffer.push(hit(3, 0.5)));

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.truncated(), 1);

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.truncated(), 0);
    }

    #[test]
    fn test_nearest_where() {
        let mut buffer = HitBuffer::with_capacity(4);
        buffer.push(hit(1, 3.0));
        buffer.push(hit(2, 1.0));
        buffer.push(hit(3, 2.0));

        assert_eq!(buffer.nearest_where(|_| true).map(|h| h.collider), Some(ColliderId(2)));
        assert_eq!(
            buffer
                .nearest_where(|h| h.collider != ColliderId(2))
                .map(|h| h.collider),
            Some(ColliderId(3))
        );
        assert!(buffer.nearest_where(|_| false).is_none());
    }
}
