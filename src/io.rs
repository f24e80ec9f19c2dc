use glob::{glob, Pattern};
use log::{error, warn};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::classes::ClassMap;
use crate::split::SplitConfig;
use crate::types::{OutputDirs, SampleDirs, VideoAnnotation};
use crate::utils::{create_output_directory, read_and_parse_json};

pub const DATA_YAML: &str = "data.yaml";

fn create_sample_dirs(root: &Path) -> std::io::Result<SampleDirs> {
    Ok(SampleDirs {
        images_dir: create_output_directory(&root.join("images"))?,
        labels_dir: create_output_directory(&root.join("labels"))?,
    })
}

/// Set up `<output>/<split>/{images,labels}`, or `<output>/{images,labels}` without splits
pub fn setup_output_directories(
    output_dir: &Path,
    splits: Option<&SplitConfig>,
) -> std::io::Result<OutputDirs> {
    if output_dir.exists() {
        warn!(
            "Directory {:?} already exists, samples with the same name will be overwritten.",
            output_dir
        );
    }
    let output_dir = create_output_directory(output_dir)?;

    match splits {
        Some(splits) => {
            let mut dirs = BTreeMap::new();
            for split in splits.splits() {
                dirs.insert(split, create_sample_dirs(&output_dir.join(split.as_str()))?);
            }
            Ok(OutputDirs::Split(dirs))
        }
        None => Ok(OutputDirs::Flat(create_sample_dirs(&output_dir)?)),
    }
}

/// Read every annotation file directly inside `sa_dir`, in file name order.
/// Files that fail to parse are logged and left out.
pub fn read_annotation_files(sa_dir: &Path) -> Vec<(PathBuf, VideoAnnotation)> {
    let json_pattern = Path::new(&Pattern::escape(&sa_dir.to_string_lossy())).join("*.json");
    let json_pattern = json_pattern.to_string_lossy();
    let json_entries: Vec<PathBuf> = match glob(&json_pattern) {
        Ok(paths) => paths
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect(),
        Err(e) => {
            error!("Invalid annotation pattern {}: {}", json_pattern, e);
            return Vec::new();
        }
    };

    json_entries
        .into_par_iter()
        .filter_map(|json_path| match read_and_parse_json::<VideoAnnotation>(&json_path) {
            Ok(annotation) => Some((json_path, annotation)),
            Err(e) => {
                error!("Failed to parse JSON ({}): {}", json_path.display(), e);
                None
            }
        })
        .collect()
}

/// Write the label file of one sample, empty when nothing is visible
pub fn write_label_file(path: &Path, content: &str) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(content.as_bytes())?;
    writer.flush()
}

const YAML_RESERVED: &[&str] = &["true", "false", "yes", "no", "on", "off", "null", "~"];

/// A manifest value as a YAML scalar, double-quoted unless it reads back unchanged as a plain string
pub fn yaml_scalar(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
        && name == name.trim()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || " _-./()".contains(c))
        && name.parse::<f64>().is_err()
        && !YAML_RESERVED.contains(&name.to_ascii_lowercase().as_str());
    if plain {
        return name.to_string();
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Render the data.yaml manifest
pub fn data_yaml_content(output_dir: &Path, class_map: &ClassMap, splits: &SplitConfig) -> String {
    let mut yaml_content = String::from("names:\n");
    for name in class_map.names() {
        yaml_content.push_str(&format!("- {}\n", yaml_scalar(name)));
    }
    yaml_content.push_str(&format!("nc: {}\n", class_map.len()));

    let mut split_names: Vec<&str> = splits.splits().map(|split| split.as_str()).collect();
    split_names.sort_unstable();
    for name in split_names {
        let images_dir = output_dir.join(name).join("images");
        yaml_content.push_str(&format!(
            "{}: {}\n",
            name,
            yaml_scalar(&images_dir.to_string_lossy())
        ));
    }
    yaml_content
}

/// Create the data.yaml file for YOLO training
pub fn create_data_yaml(
    output_dir: &Path,
    class_map: &ClassMap,
    splits: &SplitConfig,
) -> std::io::Result<PathBuf> {
    let data_yaml_path = output_dir.join(DATA_YAML);
    let mut data_yaml = BufWriter::new(File::create(&data_yaml_path)?);
    data_yaml.write_all(data_yaml_content(output_dir, class_map, splits).as_bytes())?;
    data_yaml.flush()?;
    Ok(data_yaml_path)
}
