use log::warn;

use crate::classes::ClassMap;
use crate::timeline::boxes_at;
use crate::types::{Instance, Points};

/// A box in YOLO coordinates: center and extents relative to the frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

impl YoloBox {
    pub fn to_label_line(&self, class_id: usize) -> String {
        format!(
            "{} {:.6} {:.6} {:.6} {:.6}",
            class_id, self.x_center, self.y_center, self.width, self.height
        )
    }
}

/// Normalize pixel corners against the frame size. Corner order does not matter.
pub fn normalize_box(points: &Points, frame_width: u32, frame_height: u32) -> YoloBox {
    let x_min = points.x1.min(points.x2);
    let x_max = points.x1.max(points.x2);
    let y_min = points.y1.min(points.y2);
    let y_max = points.y1.max(points.y2);

    let frame_width = frame_width as f64;
    let frame_height = frame_height as f64;

    YoloBox {
        x_center: (x_min + x_max) / 2.0 / frame_width,
        y_center: (y_min + y_max) / 2.0 / frame_height,
        width: (x_max - x_min) / frame_width,
        height: (y_max - y_min) / frame_height,
    }
}

/// Label file content for one frame
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameLabels {
    pub content: String,
    pub boxes: usize,
    pub unknown_class_boxes: usize,
}

/// Build the label file of the frame at `timestamp` (microseconds)
pub fn frame_labels(
    instances: &[Instance],
    timestamp: f64,
    class_map: &ClassMap,
    frame_width: u32,
    frame_height: u32,
    interpolate: bool,
) -> FrameLabels {
    let mut labels = FrameLabels::default();

    for timed_box in boxes_at(instances, timestamp, interpolate) {
        let class_id = match class_map.index_of(timed_box.class_name) {
            Some(class_id) => class_id,
            None => {
                warn!("Class '{}' is not in the class list, skipping box", timed_box.class_name);
                labels.unknown_class_boxes += 1;
                continue;
            }
        };

        let yolo_box = normalize_box(&timed_box.points, frame_width, frame_height);
        labels.content.push_str(&yolo_box.to_label_line(class_id));
        labels.content.push('\n');
        labels.boxes += 1;
    }

    labels
}
