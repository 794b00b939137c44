//! Trajectory: one agent's planned motion as arrival events ordered by time.
//!
//! Segments live in a slot arena and never move while they exist. The
//! time order is a separate `BTreeMap<Time, slot>` index, so re-timing a
//! segment only touches the index and every [`SegmentKey`] stays valid.
//!
//! # Examples
//!
//! ```
//! use traffic_core::{ConvexShape, DVec3, Duration, Profile, Trajectory};
//! use chrono::Utc;
//!
//! let profile = Profile::make_strict(ConvexShape::circle(0.3).unwrap());
//! let mut trajectory = Trajectory::new("L1");
//! let t0 = Utc::now();
//!
//! let first = trajectory.insert(t0, profile.clone(), DVec3::ZERO, DVec3::ZERO).key;
//! let second = trajectory
//!     .insert(t0 + Duration::seconds(10), profile, DVec3::X, DVec3::ZERO)
//!     .key;
//!
//! trajectory.set_finish_time(first, t0 + Duration::seconds(15)).unwrap();
//! assert!(trajectory.cursor(second).unwrap() < trajectory.cursor(first).unwrap());
//! ```

pub mod cursor;
pub mod debug;
pub mod key;
pub mod motion;
pub mod record;
pub mod segment;

pub use cursor::Cursor;
pub use key::SegmentKey;
pub use record::TrajectoryRecord;
pub use segment::{Segment, SegmentMut};

use std::cmp::Ordering;
use std::collections::btree_map::{self, BTreeMap};
use std::ops::Bound::{Excluded, Unbounded};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use glam::DVec3;
use tracing::trace;

use crate::errors::{TrafficError, TrafficResult, TrajectoryError};
use crate::profile::ProfilePtr;
use crate::time::{self, Duration, Time};

static NEXT_TRAJECTORY_ID: AtomicU64 = AtomicU64::new(1);

fn next_trajectory_id() -> u64 {
    NEXT_TRAJECTORY_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Outcome of [`Trajectory::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionResult {
    /// The new segment, or the one already occupying the requested time.
    pub key: SegmentKey,
    /// False when the time was taken and nothing changed.
    pub inserted: bool,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    segment: Option<Segment>,
}

/// Time-ordered arrival events of one agent on one map.
///
/// Single writer: mutation needs `&mut self` and there is no internal locking.
#[derive(Debug)]
pub struct Trajectory {
    id: u64,
    map_name: String,
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: BTreeMap<Time, u32>,
}

impl Trajectory {
    /// An empty trajectory on `map_name`.
    pub fn new(map_name: impl Into<String>) -> Self {
        Self {
            id: next_trajectory_id(),
            map_name: map_name.into(),
            slots: Vec::new(),
            free: Vec::new(),
            order: BTreeMap::new(),
        }
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn set_map_name(&mut self, map_name: impl Into<String>) {
        self.map_name = map_name.into();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Finish time of the earliest segment.
    pub fn start_time(&self) -> Option<Time> {
        self.order.keys().next().copied()
    }

    /// Finish time of the latest segment.
    pub fn finish_time(&self) -> Option<Time> {
        self.order.keys().next_back().copied()
    }

    /// Span between the first and last arrival; zero with fewer than two segments.
    pub fn duration(&self) -> Duration {
        match (self.start_time(), self.finish_time()) {
            (Some(start), Some(finish)) => finish - start,
            _ => Duration::zero(),
        }
    }

    /// Add an arrival. If `finish_time` is already used nothing changes and
    /// the existing segment's key comes back with `inserted == false`.
    pub fn insert(
        &mut self,
        finish_time: Time,
        profile: ProfilePtr,
        position: DVec3,
        velocity: DVec3,
    ) -> InsertionResult {
        if let Some(&slot) = self.order.get(&finish_time) {
            return InsertionResult {
                key: self.key_for(slot),
                inserted: false,
            };
        }

        let segment = Segment {
            finish_time,
            finish_position: position,
            finish_velocity: velocity,
            profile,
        };
        let slot = match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize].segment = Some(segment);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    segment: Some(segment),
                });
                (self.slots.len() - 1) as u32
            }
        };
        self.order.insert(finish_time, slot);

        InsertionResult {
            key: self.key_for(slot),
            inserted: true,
        }
    }

    /// The segment finishing exactly at `time`.
    pub fn find(&self, time: Time) -> Option<SegmentKey> {
        self.order.get(&time).map(|&slot| self.key_for(slot))
    }

    /// The first segment finishing at or after `time`, i.e. the leg in
    /// progress at `time`.
    pub fn lower_bound(&self, time: Time) -> Option<SegmentKey> {
        self.order
            .range(time..)
            .next()
            .map(|(_, &slot)| self.key_for(slot))
    }

    pub fn contains(&self, key: SegmentKey) -> bool {
        self.resolve(key).is_ok()
    }

    pub fn get(&self, key: SegmentKey) -> TrafficResult<&Segment> {
        let slot = self.resolve(key)?;
        self.segment_at(slot)
            .ok_or_else(|| invalid_handle(key))
    }

    /// Mutable view of one segment.
    pub fn segment_mut(&mut self, key: SegmentKey) -> TrafficResult<SegmentMut<'_>> {
        self.resolve(key)?;
        Ok(SegmentMut {
            trajectory: self,
            key,
        })
    }

    /// Remove a segment and return its successor (`None` past the end).
    /// Only `key` is invalidated.
    pub fn erase(&mut self, key: SegmentKey) -> TrafficResult<Option<SegmentKey>> {
        let slot = self.resolve(key)?;
        let time = self.time_of(slot, key)?;
        self.release(slot, time);
        Ok(self.successor_of(time))
    }

    /// Remove every segment from `first` up to, but not including, `last`
    /// (`None` erases to the end). Returns `last`.
    pub fn erase_range(
        &mut self,
        first: SegmentKey,
        last: Option<SegmentKey>,
    ) -> TrafficResult<Option<SegmentKey>> {
        let first_time = self.time_of(self.resolve(first)?, first)?;
        let doomed: Vec<(Time, u32)> = match last {
            Some(last) => {
                let last_time = self.time_of(self.resolve(last)?, last)?;
                if last_time < first_time {
                    return Err(TrafficError::invalid_argument(
                        "last",
                        format!("{last} precedes {first}"),
                    ));
                }
                self.order
                    .range(first_time..last_time)
                    .map(|(&t, &s)| (t, s))
                    .collect()
            }
            None => self.order.range(first_time..).map(|(&t, &s)| (t, s)).collect(),
        };
        for (time, slot) in doomed {
            self.release(slot, time);
        }
        Ok(last)
    }

    pub fn set_profile(&mut self, key: SegmentKey, profile: ProfilePtr) -> TrafficResult<()> {
        self.segment_entry(key)?.profile = profile;
        Ok(())
    }

    pub fn set_finish_position(&mut self, key: SegmentKey, position: DVec3) -> TrafficResult<()> {
        self.segment_entry(key)?.finish_position = position;
        Ok(())
    }

    pub fn set_finish_velocity(&mut self, key: SegmentKey, velocity: DVec3) -> TrafficResult<()> {
        self.segment_entry(key)?.finish_velocity = velocity;
        Ok(())
    }

    /// Re-time one segment and move it to the place its new time implies.
    ///
    /// Fails with a time conflict, changing nothing, when another segment
    /// already finishes at `time`. Other segments keep their data and keys;
    /// only the order they observe shifts.
    pub fn set_finish_time(&mut self, key: SegmentKey, time: Time) -> TrafficResult<()> {
        let slot = self.resolve(key)?;
        let old = self.time_of(slot, key)?;
        if old == time {
            return Ok(());
        }
        if self.order.contains_key(&time) {
            return Err(TrajectoryError::TimeConflict { time }.into());
        }

        self.order.remove(&old);
        self.order.insert(time, slot);
        self.segment_entry(key)?.finish_time = time;
        trace!(%key, from = %old, to = %time, "segment re-timed");
        Ok(())
    }

    /// Shift the segment at `key` and every later segment by `delta`.
    ///
    /// Order and gaps inside the shifted suffix are preserved. A negative
    /// `delta` that would carry the first shifted segment onto or before its
    /// predecessor is rejected as a time conflict; overflow is rejected as an
    /// invalid argument. Either way nothing changes.
    pub fn adjust_finish_times(&mut self, key: SegmentKey, delta: Duration) -> TrafficResult<()> {
        let slot = self.resolve(key)?;
        let start = self.time_of(slot, key)?;
        if delta.is_zero() {
            return Ok(());
        }

        let shifted: Vec<(Time, u32)> = self
            .order
            .range(start..)
            .map(|(&t, &s)| time::checked_shift(t, delta).map(|t| (t, s)))
            .collect::<TrafficResult<_>>()?;

        if let Some((&previous, _)) = self.order.range(..start).next_back() {
            let new_start = shifted[0].0;
            if new_start <= previous {
                return Err(TrajectoryError::TimeConflict { time: new_start }.into());
            }
        }

        // The prefix keeps entries strictly before `start`; the suffix is
        // rebuilt at the shifted times, all of which lie past the prefix.
        drop(self.order.split_off(&start));
        for (time, slot) in shifted {
            if let Some(segment) = self.slots[slot as usize].segment.as_mut() {
                segment.finish_time = time;
            }
            self.order.insert(time, slot);
        }
        trace!(%key, %delta, "suffix re-timed");
        Ok(())
    }

    /// Segments in ascending time order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            order: self.order.values(),
            slots: &self.slots,
        }
    }

    /// Keys in ascending time order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = SegmentKey> + '_ {
        self.order.values().map(|&slot| self.key_for(slot))
    }

    /// Cursor on the earliest segment, or `end()` when empty.
    pub fn begin(&self) -> Cursor<'_> {
        match self.order.iter().next() {
            Some((&time, &slot)) => Cursor::at(self, time, slot),
            None => Cursor::end(self),
        }
    }

    /// The past-the-end placeholder.
    pub fn end(&self) -> Cursor<'_> {
        Cursor::end(self)
    }

    pub fn cursor(&self, key: SegmentKey) -> TrafficResult<Cursor<'_>> {
        let slot = self.resolve(key)?;
        let time = self.time_of(slot, key)?;
        Ok(Cursor::at(self, time, slot))
    }

    /// Compare two keys by their current position.
    pub fn compare(&self, a: SegmentKey, b: SegmentKey) -> TrafficResult<Ordering> {
        let a = self.get(a)?.finish_time;
        let b = self.get(b)?.finish_time;
        Ok(a.cmp(&b))
    }

    /// The segment after `key` in current order.
    pub fn next_key(&self, key: SegmentKey) -> TrafficResult<Option<SegmentKey>> {
        let time = self.get(key)?.finish_time;
        Ok(self.successor_of(time))
    }

    /// The segment before `key` in current order.
    pub fn prev_key(&self, key: SegmentKey) -> TrafficResult<Option<SegmentKey>> {
        let time = self.get(key)?.finish_time;
        Ok(self
            .order
            .range(..time)
            .next_back()
            .map(|(_, &slot)| self.key_for(slot)))
    }

    /// Move the segments out, leaving `self` empty on the same map.
    ///
    /// Keys issued by `self` resolve in the returned trajectory and no
    /// longer resolve in `self`.
    pub fn take(&mut self) -> Trajectory {
        let fresh = Trajectory::new(self.map_name.clone());
        std::mem::replace(self, fresh)
    }

    fn key_for(&self, slot: u32) -> SegmentKey {
        SegmentKey {
            trajectory: self.id,
            slot,
            generation: self.slots[slot as usize].generation,
        }
    }

    fn resolve(&self, key: SegmentKey) -> TrafficResult<u32> {
        let live = key.trajectory == self.id
            && self
                .slots
                .get(key.slot as usize)
                .is_some_and(|s| s.generation == key.generation && s.segment.is_some());
        if live {
            Ok(key.slot)
        } else {
            Err(invalid_handle(key))
        }
    }

    fn segment_at(&self, slot: u32) -> Option<&Segment> {
        self.slots.get(slot as usize)?.segment.as_ref()
    }

    fn segment_entry(&mut self, key: SegmentKey) -> TrafficResult<&mut Segment> {
        let slot = self.resolve(key)?;
        self.slots[slot as usize]
            .segment
            .as_mut()
            .ok_or_else(|| invalid_handle(key))
    }

    fn time_of(&self, slot: u32, key: SegmentKey) -> TrafficResult<Time> {
        self.segment_at(slot)
            .map(|s| s.finish_time)
            .ok_or_else(|| invalid_handle(key))
    }

    fn successor_of(&self, time: Time) -> Option<SegmentKey> {
        self.order
            .range((Excluded(time), Unbounded))
            .next()
            .map(|(_, &slot)| self.key_for(slot))
    }

    fn release(&mut self, slot: u32, time: Time) {
        self.order.remove(&time);
        let entry = &mut self.slots[slot as usize];
        entry.segment = None;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(slot);
    }
}

/// Deep copy of the segment sequence under a new identity.
///
/// Profiles are shared with the source: both trajectories point at the same
/// [`crate::Profile`] objects until one of them swaps a profile out.
impl Clone for Trajectory {
    fn clone(&self) -> Self {
        Self {
            id: next_trajectory_id(),
            map_name: self.map_name.clone(),
            slots: self.slots.clone(),
            free: self.free.clone(),
            order: self.order.clone(),
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Segment;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over the segments of a trajectory.
pub struct Iter<'a> {
    order: btree_map::Values<'a, Time, u32>,
    slots: &'a [Slot],
}

impl<'a> Iter<'a> {
    fn lookup(&self, slot: u32) -> Option<&'a Segment> {
        self.slots.get(slot as usize)?.segment.as_ref()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let slot = *self.order.next()?;
        self.lookup(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let slot = *self.order.next_back()?;
        self.lookup(slot)
    }
}

impl ExactSizeIterator for Iter<'_> {}

fn invalid_handle(key: SegmentKey) -> TrafficError {
    TrajectoryError::InvalidHandle {
        key: key.to_string(),
    }
    .into()
}
