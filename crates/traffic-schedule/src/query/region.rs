//! Space-time regions: a map, an optional time window, and optional planar
//! bounds.
//!
//! A region is a coarse prefilter. A trajectory matches when it is on the
//! region's map, its span overlaps the window, and, if bounds are set, some
//! arrival or leg inside the window, inflated by its footprint, may touch
//! them. Exact
//! intersection tests belong to the conflict checker.

use traffic_core::geometry::PlanarBounds;
use traffic_core::time::seconds_between;
use traffic_core::trajectory::motion;
use traffic_core::{DVec2, Segment, Time, Trajectory};

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    map: String,
    lower_time: Option<Time>,
    upper_time: Option<Time>,
    bounds: Option<PlanarBounds>,
}

impl Region {
    /// All of `map`, at any time.
    pub fn new(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            lower_time: None,
            upper_time: None,
            bounds: None,
        }
    }

    /// Ignore motion that ends before `time`.
    pub fn lower_time(mut self, time: Time) -> Self {
        self.lower_time = Some(time);
        self
    }

    /// Ignore motion that starts after `time`.
    pub fn upper_time(mut self, time: Time) -> Self {
        self.upper_time = Some(time);
        self
    }

    /// Only consider motion near `bounds`.
    pub fn bounds(mut self, bounds: PlanarBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    pub fn map(&self) -> &str {
        &self.map
    }

    pub fn time_window(&self) -> (Option<Time>, Option<Time>) {
        (self.lower_time, self.upper_time)
    }

    pub fn planar_bounds(&self) -> Option<&PlanarBounds> {
        self.bounds.as_ref()
    }

    /// Whether `trajectory` may pass through this region. Empty trajectories
    /// never do, and a window whose lower end is after its upper end matches
    /// nothing.
    pub fn overlaps(&self, trajectory: &Trajectory) -> bool {
        if trajectory.map_name() != self.map {
            return false;
        }
        let (Some(start), Some(finish)) = (trajectory.start_time(), trajectory.finish_time())
        else {
            return false;
        };
        if let (Some(lower), Some(upper)) = (self.lower_time, self.upper_time) {
            if lower > upper {
                return false;
            }
        }
        if self.lower_time.is_some_and(|lower| finish < lower)
            || self.upper_time.is_some_and(|upper| start > upper)
        {
            return false;
        }

        match &self.bounds {
            None => true,
            Some(bounds) => self.touches(trajectory, bounds),
        }
    }

    fn touches(&self, trajectory: &Trajectory, bounds: &PlanarBounds) -> bool {
        let in_window = |segment: &&Segment| {
            let t = segment.finish_time();
            self.lower_time.map_or(true, |lower| t >= lower)
                && self.upper_time.map_or(true, |upper| t <= upper)
        };
        let arrivals = trajectory.iter().filter(in_window).any(|segment| {
            bounds.touches_disc(segment.finish_position(), footprint(segment))
        });
        if arrivals {
            return true;
        }

        trajectory
            .iter()
            .zip(trajectory.iter().skip(1))
            .any(|(prev, next)| self.leg_touches(trajectory, prev, next, bounds))
    }

    /// Whether the part of the leg from `prev` to `next` inside the window
    /// may touch `bounds`. The clipped leg is itself a cubic, and its Bezier
    /// control points enclose it.
    fn leg_touches(
        &self,
        trajectory: &Trajectory,
        prev: &Segment,
        next: &Segment,
        bounds: &PlanarBounds,
    ) -> bool {
        let from = self
            .lower_time
            .map_or(prev.finish_time(), |lower| lower.max(prev.finish_time()));
        let to = self
            .upper_time
            .map_or(next.finish_time(), |upper| upper.min(next.finish_time()));
        if from > to {
            return false;
        }
        let (Some(start), Some(end)) = (
            motion::interpolate(trajectory, from),
            motion::interpolate(trajectory, to),
        ) else {
            return false;
        };

        let third = seconds_between(from, to) / 3.0;
        let controls = [
            start.position,
            start.position + start.velocity * third,
            end.position - end.velocity * third,
            end.position,
        ];
        let (min, max) = controls.iter().map(|p| p.truncate()).fold(
            (DVec2::INFINITY, DVec2::NEG_INFINITY),
            |(min, max), p| (min.min(p), max.max(p)),
        );
        bounds.touches_box(min, max, footprint(prev).max(footprint(next)))
    }
}

fn footprint(segment: &Segment) -> f64 {
    segment.profile().shape().characteristic_length()
}
