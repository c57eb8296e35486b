use crate::animation::values::Interpolatable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpolationMode {
    Linear,
    Step,
}

/// The keyframe interval a track was last sampled in.
///
/// Playback moves forward in small steps, so the next lookup almost always lands in
/// the same interval or the one after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeCursor {
    pub interval: usize,
}

/// Ascending keyframe times with one value each.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<T: Interpolatable> {
    pub times: Vec<f32>,
    pub values: Vec<T>,
    pub interpolation: InterpolationMode,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Values without a matching time are never sampled.
    #[must_use]
    pub fn new(times: Vec<f32>, values: Vec<T>, interpolation: InterpolationMode) -> Self {
        Self {
            times,
            values,
            interpolation,
        }
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    fn keyframe_count(&self) -> usize {
        self.times.len().min(self.values.len())
    }

    /// Samples at `time`. Empty tracks yield `None`; times outside the keys clamp.
    #[must_use]
    pub fn sample(&self, time: f32) -> Option<T> {
        let count = self.keyframe_count();
        (count > 0).then(|| self.evaluate(self.search(time, count), time))
    }

    /// Like [`sample`](Self::sample), checking the cursor's interval and its successor
    /// before searching.
    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Option<T> {
        let count = self.keyframe_count();
        if count == 0 {
            return None;
        }
        let hint = cursor.interval.min(count - 1);
        let interval = [hint, hint + 1]
            .into_iter()
            .find(|&i| self.contains(i, time, count))
            .unwrap_or_else(|| self.search(time, count));
        cursor.interval = interval;
        Some(self.evaluate(interval, time))
    }

    /// Whether `time` falls in `[times[i], times[i + 1])`, the last interval being open-ended.
    fn contains(&self, i: usize, time: f32, count: usize) -> bool {
        if i >= count || time < self.times[i] {
            return false;
        }
        i + 1 == count || time < self.times[i + 1]
    }

    fn search(&self, time: f32, count: usize) -> usize {
        self.times[..count].partition_point(|&t| t <= time).saturating_sub(1)
    }

    fn evaluate(&self, interval: usize, time: f32) -> T {
        let last = self.keyframe_count() - 1;
        if interval >= last {
            return self.values[last];
        }
        let (start, end) = (self.times[interval], self.times[interval + 1]);
        let span = end - start;
        match self.interpolation {
            InterpolationMode::Step => self.values[interval],
            InterpolationMode::Linear => {
                let t = if span > 1e-6 { ((time - start) / span).clamp(0.0, 1.0) } else { 0.0 };
                T::mix(self.values[interval], self.values[interval + 1], t)
            }
        }
    }
}
