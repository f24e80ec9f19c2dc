//! Time-window lookup of annotated boxes
//!
//! A parameter covers the range during which an instance is visible. Inside it,
//! consecutive keyframes form windows `[t_i, t_{i+1}]`, and the box of a window is
//! the one drawn at `t_i`. All times are in microseconds.

use crate::types::{Instance, Keyframe, Parameter, Points};

/// The span between two consecutive keyframes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyframeWindow {
    pub start: f64,
    pub end: f64,
    pub start_points: Points,
    pub end_points: Option<Points>,
}

impl KeyframeWindow {
    pub fn contains(&self, timestamp: f64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// Box at `timestamp`, held from the start keyframe or interpolated towards the end one
    pub fn points_at(&self, timestamp: f64, interpolate: bool) -> Points {
        match self.end_points {
            Some(end_points) if interpolate && self.end > self.start => {
                let t = ((timestamp - self.start) / (self.end - self.start)).clamp(0.0, 1.0);
                self.start_points.lerp(&end_points, t)
            }
            _ => self.start_points,
        }
    }
}

/// Pair consecutive keyframes into windows. Keyframes without points open no window.
pub fn keyframe_windows(timestamps: &[Keyframe]) -> Vec<KeyframeWindow> {
    timestamps
        .windows(2)
        .filter_map(|pair| {
            let start_points = pair[0].points?;
            Some(KeyframeWindow {
                start: pair[0].timestamp,
                end: pair[1].timestamp,
                start_points,
                end_points: pair[1].points,
            })
        })
        .collect()
}

impl Parameter {
    pub fn contains(&self, timestamp: f64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// The box of this parameter at `timestamp`, if a window covers it.
    /// On a boundary shared by two windows the later one wins, since its keyframe sits exactly at `timestamp`.
    pub fn points_at(&self, timestamp: f64, interpolate: bool) -> Option<Points> {
        if !self.contains(timestamp) {
            return None;
        }
        keyframe_windows(&self.timestamps)
            .iter()
            .rev()
            .find(|window| window.contains(timestamp))
            .map(|window| window.points_at(timestamp, interpolate))
    }
}

/// A box visible at a given time, still carrying its class name
#[derive(Debug, Clone, PartialEq)]
pub struct TimedBox<'a> {
    pub class_name: &'a str,
    pub points: Points,
}

/// Collect every box of every bbox instance that is visible at `timestamp`
pub fn boxes_at(instances: &[Instance], timestamp: f64, interpolate: bool) -> Vec<TimedBox<'_>> {
    instances
        .iter()
        .filter(|instance| instance.meta.is_bbox())
        .flat_map(|instance| {
            instance.parameters.iter().filter_map(move |parameter| {
                parameter
                    .points_at(timestamp, interpolate)
                    .map(|points| TimedBox {
                        class_name: instance.meta.class_name.as_str(),
                        points,
                    })
            })
        })
        .collect()
}
