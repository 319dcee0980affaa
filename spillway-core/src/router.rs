//! Routes spilled liquid down through the scene.
//!
//! From the spill point a sphere probe is cast straight down. If it lands in
//! another container's opening the liquid is transferred; otherwise the liquid
//! runs down the surface it hit, falls off that surface's edge and the search
//! repeats from there, up to a fixed number of hops.
//!
//! Edge finding only looks at the hit collider's bounding box, so it is exact
//! for boxes and ramps and an approximation for anything rounder.

use glam::Vec3;
use smallvec::SmallVec;
use spillway_utils::slope_direction;

use crate::config::SplitterConfig;
use crate::container::ContainerId;
use crate::scene::{ColliderId, Hit, HitBuffer, SpillScene};

/// Where a routed spill ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RouteOutcome {
    /// Liquid landed in a container opening.
    Transferred {
        /// Receiving container.
        target: ContainerId,
        /// Volume poured toward the receiver.
        amount: f32,
        /// Part of `amount` the receiver took; the rest spilled over its capacity.
        accepted: f32,
    },
    /// Nothing below: the liquid left the scene.
    Lost,
    /// Liquid reached a surface it could not run off, such as a level floor.
    Stuck {
        /// The surface holding the liquid.
        collider: ColliderId,
    },
    /// Liquid ran off the maximum number of surfaces and is considered absorbed.
    Absorbed {
        /// The last surface reached.
        collider: ColliderId,
    },
}

/// Full result of one routing pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteReport {
    /// Final outcome.
    pub outcome: RouteOutcome,
    /// Surfaces the liquid ran off.
    pub hops: u32,
    /// Downward probes cast, never more than `max_hops + 1`.
    pub casts: u32,
    /// Probe origins in order: the spill point, then every edge the liquid fell from.
    pub trace: SmallVec<[Vec3; 8]>,
}

/// What to route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteRequest {
    /// Spill point.
    pub origin: Vec3,
    /// Fraction of the source capacity being moved.
    pub lost_fraction: f32,
    /// Tilt-derived flow intensity, widens the splash reach.
    pub flow_scale: f32,
    /// Capacity of the source container.
    pub source_volume: f32,
    /// Collider the first probe must ignore, normally the source container's own.
    pub exclude: Option<ColliderId>,
}

/// Hop-bounded walk from a spill point to a receiver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferRouter {
    /// Surfaces liquid may run off before it is absorbed.
    pub max_hops: u32,
    /// Radius of the downward probe.
    pub probe_radius: f32,
    /// Extra reach around a receiving opening, scaled by flow.
    pub splash_tolerance: f32,
    /// How far below the surface the edge probe starts.
    pub edge_probe_drop: f32,
}

impl TransferRouter {
    /// Builds a router from splitter settings.
    #[must_use]
    pub fn from_config(config: &SplitterConfig) -> Self {
        Self {
            max_hops: config.max_hops,
            probe_radius: config.probe_radius,
            splash_tolerance: config.splash_tolerance,
            edge_probe_drop: config.edge_probe_drop,
        }
    }

    /// Routes `request` through `scene`, moving liquid into a receiver if one is reached.
    ///
    /// `hits` is scratch space reused by every probe.
    pub fn route<S>(&self, scene: &mut S, hits: &mut HitBuffer, request: &RouteRequest) -> RouteReport
    where
        S: SpillScene + ?Sized,
    {
        let mut position = request.origin;
        let mut exclude = request.exclude;
        let mut hops = 0;
        let mut casts = 0;
        let mut trace = SmallVec::new();

        let outcome = loop {
            trace.push(position);
            casts += 1;

            hits.clear();
            scene.cast_down(position, self.probe_radius, hits);
            if hits.truncated() > 0 {
                log::trace!("Downward probe dropped {} hits", hits.truncated());
            }

            let Some(hit) =
                hits.nearest_where(|hit| Some(hit.collider) != exclude && !hit.is_trigger)
            else {
                break RouteOutcome::Lost;
            };

            if let Some(outcome) = self.try_transfer(scene, &hit, request) {
                break outcome;
            }

            if hops >= self.max_hops {
                break RouteOutcome::Absorbed {
                    collider: hit.collider,
                };
            }

            let Some(edge) = self.find_edge(scene, hits, &hit) else {
                break RouteOutcome::Stuck {
                    collider: hit.collider,
                };
            };

            log::trace!("Liquid runs off {:?} at {edge}", hit.collider);
            hops += 1;
            position = edge;
            exclude = Some(hit.collider);
        };

        RouteReport {
            outcome,
            hops,
            casts,
            trace,
        }
    }

    /// Moves the liquid into the opening of the hit collider, if it has one within reach.
    fn try_transfer<S>(&self, scene: &mut S, hit: &Hit, request: &RouteRequest) -> Option<RouteOutcome>
    where
        S: SpillScene + ?Sized,
    {
        let opening = scene.opening_of(hit.collider)?;
        let reach = opening.radius + self.splash_tolerance * request.flow_scale;
        if hit.point.distance(opening.position) >= reach {
            return None;
        }

        let Some(target) = scene.container_mut(opening.container) else {
            log::debug!("Opening on {:?} has no container {:?}", hit.collider, opening.container);
            return None;
        };

        let amount = request.source_volume * request.lost_fraction;
        let before = target.fill_amount();
        target.set_fill_amount(before + amount);
        let accepted = target.fill_amount() - before;
        if accepted < amount {
            log::debug!("{:?} is full, {} overflowed", opening.container, amount - accepted);
        }
        log::debug!("Transferred {accepted} into {:?}", opening.container);

        Some(RouteOutcome::Transferred {
            target: opening.container,
            amount,
            accepted,
        })
    }

    /// Finds the edge of the hit surface the liquid would fall from.
    ///
    /// A ray is cast back up the slope from just beyond the collider's bounds,
    /// slightly below the contact, and the nearest hit on the same collider is
    /// taken as the edge.
    fn find_edge<S>(&self, scene: &S, hits: &mut HitBuffer, hit: &Hit) -> Option<Vec3>
    where
        S: SpillScene + ?Sized,
    {
        let slope = slope_direction(Vec3::Y, hit.normal);
        if slope == Vec3::ZERO {
            return None;
        }

        let reach = hit.point.distance(hit.bounds.corner_towards(slope));
        let start = hit.point + Vec3::new(0.0, -self.edge_probe_drop, 0.0) + slope * reach;

        hits.clear();
        scene.cast_ray(start, -slope, hits);
        hits
            .nearest_where(|candidate| candidate.collider == hit.collider)
            .map(|edge| edge.point)
    }
}
