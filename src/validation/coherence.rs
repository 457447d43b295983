use itertools::Itertools;
use log::debug;
use nalgebra::Point2;
use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

/// Default minimal mean displacement (px per observation) below which an
/// object is considered static noise.
pub const DEFAULT_MIN_MOVEMENT: f32 = 5.0;

/// Default jitter bound (px). Displacement variance above its square marks
/// the motion as erratic.
pub const DEFAULT_MAX_JITTER: f32 = 50.0;

const COHERENCE_WINDOW: usize = 10;
const MIN_SAMPLES: usize = 3;

/// Stateful filter that judges whether the recent motion of an identifier
/// looks like a real moving object rather than detector noise.
///
/// The filter keeps a bounded position history per identifier behind a
/// lock, so it can be shared by reference with the rest of a pipeline. It
/// is advisory: callers decide what to do with an incoherent verdict.
///
#[derive(Debug)]
pub struct MovementCoherenceFilter {
    min_movement: f32,
    max_jitter: f32,
    positions: RwLock<HashMap<u64, VecDeque<Point2<f32>>>>,
}

impl Default for MovementCoherenceFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl MovementCoherenceFilter {
    pub fn new() -> Self {
        Self::with_thresholds(DEFAULT_MIN_MOVEMENT, DEFAULT_MAX_JITTER)
    }

    /// # Parameters
    /// * `min_movement` - minimal mean displacement in px to count as real motion
    /// * `max_jitter` - maximal displacement standard deviation in px
    ///
    pub fn with_thresholds(min_movement: f32, max_jitter: f32) -> Self {
        assert!(
            min_movement >= 0.0 && max_jitter > 0.0,
            "coherence thresholds must be non-negative"
        );
        Self {
            min_movement,
            max_jitter,
            positions: RwLock::new(HashMap::default()),
        }
    }

    /// Records a new position for `id` and returns the coherence verdict.
    ///
    /// Fewer than 3 recorded samples always pass, which favors recall for
    /// objects that just entered the scene. With enough samples the motion
    /// is rejected when the displacement variance exceeds the jitter bound
    /// or when the mean displacement stays below the movement floor.
    ///
    pub fn observe(&self, id: u64, position: Point2<f32>) -> bool {
        let mut positions = self.positions.write().unwrap();
        let history = positions.entry(id).or_default();
        history.push_back(position);
        if history.len() > COHERENCE_WINDOW {
            history.pop_front();
        }
        if history.len() < MIN_SAMPLES {
            return true;
        }

        let displacements = history
            .iter()
            .tuple_windows()
            .map(|(prev, next)| (next - prev).norm())
            .collect::<Vec<_>>();
        let mean = displacements.iter().sum::<f32>() / displacements.len() as f32;
        let variance = displacements.iter().map(|d| (d - mean).powi(2)).sum::<f32>()
            / displacements.len() as f32;

        if variance > self.max_jitter * self.max_jitter {
            debug!("id {id} moves erratically: displacement variance {variance:.1}");
            return false;
        }
        if mean < self.min_movement {
            debug!("id {id} is near static: mean displacement {mean:.2}");
            return false;
        }
        true
    }

    /// Drops the stored history of a single identifier.
    ///
    pub fn forget(&self, id: u64) {
        self.positions.write().unwrap().remove(&id);
    }

    /// Keeps only the identifiers the predicate approves of. Call it after
    /// track purges to stop dead identifiers from accumulating.
    ///
    pub fn retain<F>(&self, keep: F)
    where
        F: Fn(u64) -> bool,
    {
        self.positions.write().unwrap().retain(|id, _| keep(*id));
    }
}

#[cfg(test)]
mod tests {
    use crate::validation::coherence::MovementCoherenceFilter;
    use nalgebra::Point2;

    #[test]
    fn young_histories_always_pass() {
        let filter = MovementCoherenceFilter::new();
        assert!(filter.observe(1, Point2::new(0.0, 0.0)));
        assert!(filter.observe(1, Point2::new(0.0, 0.0)));
    }

    #[test]
    fn static_object_is_rejected() {
        let filter = MovementCoherenceFilter::new();
        for _ in 0..2 {
            assert!(filter.observe(1, Point2::new(100.0, 100.0)));
        }
        assert!(!filter.observe(1, Point2::new(100.0, 100.0)));
    }

    #[test]
    fn steady_motion_is_coherent() {
        let filter = MovementCoherenceFilter::new();
        for i in 0..10 {
            let verdict = filter.observe(1, Point2::new(i as f32 * 20.0, 50.0));
            assert!(verdict, "steady motion rejected at step {i}");
        }
    }

    #[test]
    fn erratic_motion_is_rejected() {
        let filter = MovementCoherenceFilter::new();
        filter.observe(1, Point2::new(0.0, 0.0));
        filter.observe(1, Point2::new(5.0, 0.0));
        filter.observe(1, Point2::new(200.0, 0.0));
        // displacements 5, 195, 10: variance far above 50^2
        assert!(!filter.observe(1, Point2::new(210.0, 0.0)));
    }

    #[test]
    fn slow_drift_is_rejected() {
        let filter = MovementCoherenceFilter::new();
        let mut last = true;
        for i in 0..5 {
            last = filter.observe(1, Point2::new(i as f32 * 2.0, 0.0));
        }
        // mean displacement 2.0 < 5.0
        assert!(!last);
    }

    #[test]
    fn forget_resets_history() {
        let filter = MovementCoherenceFilter::new();
        for _ in 0..3 {
            filter.observe(7, Point2::new(10.0, 10.0));
        }
        filter.forget(7);
        assert!(filter.observe(7, Point2::new(10.0, 10.0)));
        assert!(filter.observe(7, Point2::new(10.0, 10.0)));
    }

    #[test]
    fn retain_drops_dead_ids() {
        let filter = MovementCoherenceFilter::new();
        for _ in 0..3 {
            filter.observe(1, Point2::new(10.0, 10.0));
            filter.observe(2, Point2::new(10.0, 10.0));
        }
        filter.retain(|id| id == 1);
        // id 1 still has a full history and stays incoherent
        assert!(!filter.observe(1, Point2::new(10.0, 10.0)));
        // id 2 was swept and starts over
        assert!(filter.observe(2, Point2::new(10.0, 10.0)));
    }

    #[test]
    fn custom_thresholds() {
        let filter = MovementCoherenceFilter::with_thresholds(0.5, 50.0);
        let mut last = true;
        for i in 0..5 {
            last = filter.observe(1, Point2::new(i as f32 * 2.0, 0.0));
        }
        // 2 px per frame clears a 0.5 px movement floor
        assert!(last);
    }
}
