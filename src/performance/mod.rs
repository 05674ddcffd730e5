//! # Frame Statistics
//!
//! Tracks frame-to-frame intervals of the gallery's tick loop and derives
//! FPS and frame time figures from them.
//!
//! Timestamps come from the same injected clock as every transition, so the
//! numbers are reproducible under a manual clock.
//!
//! ## Usage
//!
//! ```
//! use gallery::performance::PerformanceMonitor;
//!
//! let mut monitor = PerformanceMonitor::new();
//! for frame in 0..10 {
//!     monitor.record_frame(frame as f64 * 20.0);
//! }
//! assert_eq!(monitor.get_metrics().fps.round(), 50.0);
//! ```

use std::collections::VecDeque;

/// Frame timing figures over the sampling window
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceMetrics {
    /// Current frames per second
    pub fps: f32,
    /// Average frame time in milliseconds
    pub frame_time_ms: f32,
    /// Minimum frame time in the current window
    pub min_frame_time_ms: f32,
    /// Maximum frame time in the current window
    pub max_frame_time_ms: f32,
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            min_frame_time_ms: f32::MAX,
            max_frame_time_ms: 0.0,
        }
    }
}

pub struct PerformanceMonitor {
    /// Ring buffer of recent frame intervals in milliseconds
    frame_times: VecDeque<f64>,
    /// Maximum number of frame times to keep for averaging
    max_samples: usize,
    last_frame_ms: Option<f64>,
    current_metrics: PerformanceMetrics,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::with_config(120) // ~2 seconds at 60fps
    }

    pub fn with_config(max_samples: usize) -> Self {
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
            last_frame_ms: None,
            current_metrics: PerformanceMetrics::default(),
        }
    }

    /// Mark the start of a tick at `now_ms`.
    ///
    /// Returns the seconds elapsed since the previous tick, zero for the first.
    pub fn record_frame(&mut self, now_ms: f64) -> f32 {
        let delta_ms = match self.last_frame_ms {
            Some(last) => (now_ms - last).max(0.0),
            None => {
                self.last_frame_ms = Some(now_ms);
                return 0.0;
            }
        };
        self.last_frame_ms = Some(now_ms);

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta_ms);
        self.update_metrics();

        (delta_ms / 1000.0) as f32
    }

    fn update_metrics(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let total: f64 = self.frame_times.iter().sum();
        let avg_frame_time_ms = (total / self.frame_times.len() as f64) as f32;

        self.current_metrics.frame_time_ms = avg_frame_time_ms;
        self.current_metrics.fps = if avg_frame_time_ms > 0.0 {
            1000.0 / avg_frame_time_ms
        } else {
            0.0
        };

        let min = self.frame_times.iter().copied().fold(f64::MAX, f64::min);
        let max = self.frame_times.iter().copied().fold(0.0, f64::max);
        self.current_metrics.min_frame_time_ms = min as f32;
        self.current_metrics.max_frame_time_ms = max as f32;
    }

    /// Get current performance metrics
    pub fn get_metrics(&self) -> &PerformanceMetrics {
        &self.current_metrics
    }

    /// Get frame time history for graphing
    pub fn get_frame_time_history(&self) -> Vec<f32> {
        self.frame_times.iter().map(|ms| *ms as f32).collect()
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}
