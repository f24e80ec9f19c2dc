//! Video decoding and frame export on top of OpenCV

use log::{debug, warn};
use opencv::{core, imgcodecs, prelude::*, videoio};
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::config::ImageFormat;
use crate::types::{VideoMetadata, VIDEO_FORMATS};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// A decoded frame
pub struct Frame {
    mat: core::Mat,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.mat.cols() as u32
    }

    pub fn height(&self) -> u32 {
        self.mat.rows() as u32
    }
}

/// An opened video that frames can be read from by index
pub struct VideoSource {
    capture: videoio::VideoCapture,
    fps: f64,
    frame_count: u64,
    width: u32,
    height: u32,
}

impl VideoSource {
    /// Open a local file or a stream URL
    pub fn open(location: &str) -> Result<Self, Box<dyn Error>> {
        let capture = videoio::VideoCapture::from_file(location, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(format!("Failed to open video: {}", location).into());
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let frame_count = capture.get(videoio::CAP_PROP_FRAME_COUNT)?.max(0.0) as u64;
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;
        debug!(
            "Opened {}: {}x{}, {} fps, {} frames",
            location, width, height, fps, frame_count
        );

        Ok(Self {
            capture,
            fps,
            frame_count,
            width,
            height,
        })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Seek to `index` and decode it. `None` when the seek is refused or the decoder has no data there.
    pub fn read_frame(&mut self, index: u64) -> Result<Option<Frame>, Box<dyn Error>> {
        if !self.capture.set(videoio::CAP_PROP_POS_FRAMES, index as f64)? {
            warn!("Backend refused to seek to frame {}", index);
            return Ok(None);
        }
        let mut frame = core::Mat::default();
        if !self.capture.read(&mut frame)? || frame.empty() {
            return Ok(None);
        }
        Ok(Some(Frame { mat: frame }))
    }
}

/// Frame indices spaced `interval_secs` apart, starting at the first frame
pub fn sample_frame_indices(
    frame_count: u64,
    fps: f64,
    interval_secs: f64,
) -> Result<Vec<u64>, String> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(format!("Invalid frame rate: {}", fps));
    }
    if !(interval_secs.is_finite() && interval_secs > 0.0) {
        return Err(format!("Invalid capture interval: {}", interval_secs));
    }

    // Below one frame per step every frame is taken anyway
    let step = (interval_secs * fps).max(1.0);
    let mut indices: Vec<u64> = Vec::new();
    let mut k: u64 = 0;
    loop {
        let index = (k as f64 * step).round() as u64;
        if index >= frame_count {
            break;
        }
        if indices.last() != Some(&index) {
            indices.push(index);
        }
        k += 1;
    }
    Ok(indices)
}

/// Presentation time of a frame in microseconds
pub fn frame_timestamp_us(frame_index: u64, fps: f64) -> f64 {
    frame_index as f64 / fps * MICROS_PER_SECOND
}

/// Size the box coordinates are expressed in: the annotated size when the export records it,
/// otherwise the decoded frame size
pub fn annotation_frame_size(metadata: &VideoMetadata, decoded: (u32, u32)) -> (u32, u32) {
    match (metadata.width, metadata.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => (width, height),
        _ => decoded,
    }
}

/// Where to read a video from: a matching file in `video_dir` if there is one, otherwise the URL
pub fn resolve_video_location(
    metadata: &VideoMetadata,
    video_dir: Option<&Path>,
) -> Option<String> {
    if let (Some(dir), Some(name)) = (video_dir, metadata.name.as_deref()) {
        if let Some(path) = find_local_video(dir, name) {
            return Some(path.to_string_lossy().into_owned());
        }
        debug!("No local copy of {} in {}", name, dir.display());
    }
    metadata.url.clone()
}

fn find_local_video(dir: &Path, name: &str) -> Option<PathBuf> {
    let direct = dir.join(name);
    if direct.is_file() {
        return Some(direct);
    }
    VIDEO_FORMATS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|candidate| candidate.is_file())
}

/// Encode a frame to disk in the requested format
pub fn write_frame(
    path: &Path,
    frame: &Frame,
    format: ImageFormat,
    jpeg_quality: i32,
) -> Result<(), Box<dyn Error>> {
    let params: core::Vector<i32> = match format {
        ImageFormat::Jpg => core::Vector::from_iter([imgcodecs::IMWRITE_JPEG_QUALITY, jpeg_quality]),
        ImageFormat::Png => core::Vector::new(),
    };
    let path_str = path
        .to_str()
        .ok_or_else(|| format!("Non UTF-8 output path: {}", path.display()))?;
    if !imgcodecs::imwrite(path_str, &frame.mat, &params)? {
        return Err(format!("Failed to write image: {}", path.display()).into());
    }
    Ok(())
}
