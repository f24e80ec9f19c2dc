//! SuperAnnotate video export to YOLO dataset converter
//!
//! This library samples frames from annotated videos at a fixed time interval and writes
//! each frame together with its normalized bounding-box labels into a YOLO dataset layout.

pub mod classes;
pub mod config;
pub mod conversion;
pub mod dataset;
pub mod io;
pub mod split;
pub mod timeline;
pub mod types;
pub mod utils;
pub mod video;

// Re-export commonly used types and functions
pub use classes::ClassMap;
pub use config::{Args, ImageFormat};
pub use conversion::{frame_labels, normalize_box, YoloBox};
pub use dataset::process_project;
pub use io::{create_data_yaml, read_annotation_files, setup_output_directories};
pub use split::{Split, SplitConfig, SplitSampler};
pub use timeline::{boxes_at, keyframe_windows};
pub use types::{Instance, OutputDirs, Points, ProcessingStats, VideoAnnotation};
