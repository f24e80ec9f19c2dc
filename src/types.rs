use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::split::Split;

// Extensions tried when a video is looked up by name in a local directory
pub const VIDEO_FORMATS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];

// One entry of classes/classes.json
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassEntry {
    pub name: String,
}

// Corner coordinates of a box, in pixels
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Points {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Points {
    /// Linear blend between two boxes, `t` in [0, 1]
    pub fn lerp(&self, other: &Points, t: f64) -> Points {
        Points {
            x1: self.x1 + (other.x1 - self.x1) * t,
            y1: self.y1 + (other.y1 - self.y1) * t,
            x2: self.x2 + (other.x2 - self.x2) * t,
            y2: self.y2 + (other.y2 - self.y2) * t,
        }
    }
}

// A keyframe inside a parameter: the box as drawn at `timestamp` (microseconds)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Keyframe {
    pub timestamp: f64,
    pub points: Option<Points>,
}

// A contiguous range during which an instance is visible
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Parameter {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub timestamps: Vec<Keyframe>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InstanceMeta {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub class_name: String,
}

impl InstanceMeta {
    /// Instances without a type are treated as boxes
    pub fn is_bbox(&self) -> bool {
        self.kind.as_deref().map_or(true, |kind| kind == "bbox")
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Instance {
    pub meta: InstanceMeta,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VideoMetadata {
    pub name: Option<String>,
    pub url: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

// The annotation export of a single video
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VideoAnnotation {
    pub metadata: VideoMetadata,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

// Paths of one images/labels pair
#[derive(Debug, Clone)]
pub struct SampleDirs {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

// Output directories keyed by split, or a single pair when splitting is disabled
#[derive(Debug, Clone)]
pub enum OutputDirs {
    Split(BTreeMap<Split, SampleDirs>),
    Flat(SampleDirs),
}

impl OutputDirs {
    pub fn for_split(&self, split: Option<Split>) -> Option<&SampleDirs> {
        match (self, split) {
            (OutputDirs::Split(dirs), Some(split)) => dirs.get(&split),
            (OutputDirs::Flat(dirs), None) => Some(dirs),
            _ => None,
        }
    }
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone)]
pub struct ProcessingStats {
    pub videos_processed: usize,
    pub videos_failed: usize,
    pub frames_written: usize,
    pub frames_unreadable: usize,
    pub boxes_written: usize,
    pub unknown_class_boxes: usize,
    pub frames_per_split: BTreeMap<Split, usize>,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_frame(&mut self, split: Option<Split>, boxes: usize) {
        self.frames_written += 1;
        self.boxes_written += boxes;
        if let Some(split) = split {
            *self.frames_per_split.entry(split).or_insert(0) += 1;
        }
    }

    pub fn print_summary(&self) {
        log::info!("=== Processing Summary ===");
        log::info!("Videos processed: {}", self.videos_processed);
        log::info!("Frames written: {}", self.frames_written);
        log::info!("Boxes written: {}", self.boxes_written);
        for (split, count) in &self.frames_per_split {
            log::info!("  {}: {} frames", split, count);
        }

        if self.videos_failed > 0 {
            log::warn!("Videos skipped (could not be opened): {}", self.videos_failed);
        }
        if self.frames_unreadable > 0 {
            log::warn!("Frames skipped (could not be decoded): {}", self.frames_unreadable);
        }
        if self.unknown_class_boxes > 0 {
            log::warn!(
                "Boxes skipped (class not in classes.json): {}",
                self.unknown_class_boxes
            );
        }
    }
}
