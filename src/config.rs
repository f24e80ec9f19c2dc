use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::split::{SplitConfig, DEFAULT_SPLIT};

/// Command-line arguments for converting a SuperAnnotate video export to a YOLO dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Directory of the SuperAnnotate project export (video JSON files + classes/)
    #[arg(short = 'd', long = "sa_dir")]
    pub sa_dir: String,

    /// Directory the YOLO dataset is written to
    #[arg(short = 'o', long = "output_dir", default_value = "yolo_data")]
    pub output_dir: String,

    /// Path to classes.json, defaults to <sa_dir>/classes/classes.json
    #[arg(long = "classes")]
    pub classes: Option<String>,

    /// Seconds between two sampled frames
    #[arg(long = "capture_rate", default_value_t = 30.0, value_parser = validate_capture_rate)]
    pub capture_rate: f64,

    /// Split percentages, e.g. "train=70,val=20,test=10"
    #[arg(long = "split", default_value = DEFAULT_SPLIT, value_parser = parse_split)]
    pub split: SplitConfig,

    /// Write every sample to <output_dir>/images and <output_dir>/labels without splitting
    #[arg(long = "no_split")]
    pub no_split: bool,

    /// Seed for the split assignment
    #[arg(long = "seed", default_value_t = 42)]
    pub seed: u64,

    /// Image format of the extracted frames
    #[arg(long = "image_format", value_enum, default_value = "jpg")]
    pub image_format: ImageFormat,

    /// JPEG quality of the extracted frames
    #[arg(long = "jpeg_quality", default_value_t = 95, value_parser = validate_quality)]
    pub jpeg_quality: i32,

    /// Local directory holding the videos, looked up by metadata name before falling back to the URL
    #[arg(long = "video_dir")]
    pub video_dir: Option<String>,

    /// Linearly interpolate boxes between keyframes instead of holding the previous keyframe
    #[arg(long = "interpolate")]
    pub interpolate: bool,
}

impl Args {
    pub fn classes_path(&self) -> PathBuf {
        match &self.classes {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(&self.sa_dir).join("classes").join("classes.json"),
        }
    }

    /// The split layout in effect, `None` when splitting is disabled
    pub fn splits(&self) -> Option<&SplitConfig> {
        if self.no_split {
            None
        } else {
            Some(&self.split)
        }
    }
}

// Encoding of the extracted frames
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum ImageFormat {
    Jpg,
    Png,
}

impl ImageFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

pub fn validate_capture_rate(s: &str) -> Result<f64, String> {
    match f64::from_str(s) {
        Ok(val) if val.is_finite() && val > 0.0 => Ok(val),
        _ => Err("CAPTURE_RATE must be a positive number of seconds".to_string()),
    }
}

pub fn validate_quality(s: &str) -> Result<i32, String> {
    match i32::from_str(s) {
        Ok(val) if (1..=100).contains(&val) => Ok(val),
        _ => Err("JPEG_QUALITY must be between 1 and 100".to_string()),
    }
}

pub fn parse_split(s: &str) -> Result<SplitConfig, String> {
    SplitConfig::parse(s)
}
