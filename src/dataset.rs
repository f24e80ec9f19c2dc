use log::{error, info, warn};
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::classes::ClassMap;
use crate::config::Args;
use crate::conversion::frame_labels;
use crate::io::{create_data_yaml, read_annotation_files, setup_output_directories, write_label_file};
use crate::split::{Split, SplitSampler};
use crate::types::{OutputDirs, ProcessingStats, VideoAnnotation};
use crate::utils::{create_progress_bar, output_stem};
use crate::video::{
    annotation_frame_size, frame_timestamp_us, resolve_video_location, sample_frame_indices,
    write_frame, VideoSource,
};

/// Main conversion pipeline: every annotated video of the project becomes sampled frames and labels
pub fn process_project(args: &Args) -> Result<ProcessingStats, Box<dyn Error>> {
    let sa_dir = PathBuf::from(&args.sa_dir);
    let output_dir = PathBuf::from(&args.output_dir);

    let classes_path = args.classes_path();
    let class_map = ClassMap::load(&classes_path)
        .map_err(|e| format!("Failed to load classes from {}: {}", classes_path.display(), e))?;
    info!("Loaded {} classes.", class_map.len());

    let splits = args.splits();
    let output_dirs = setup_output_directories(&output_dir, splits)
        .map_err(|e| format!("Failed to set up output directories: {}", e))?;
    let mut sampler = splits.map(|config| SplitSampler::new(config.clone(), args.seed));

    let annotations = read_annotation_files(&sa_dir);
    info!("Read and parsed {} annotation files.", annotations.len());

    let mut stats = ProcessingStats::new();
    let video_dir = args.video_dir.as_deref().map(Path::new);
    for (index, (json_path, annotation)) in annotations.iter().enumerate() {
        info!("Processing video {}/{}...", index + 1, annotations.len());
        let job = VideoJob {
            json_path,
            annotation,
            class_map: &class_map,
            output_dirs: &output_dirs,
            args,
            video_dir,
        };
        if let Err(e) = process_video(job, sampler.as_mut(), &mut stats) {
            error!("Failed to process {}: {}", json_path.display(), e);
            stats.videos_failed += 1;
        } else {
            stats.videos_processed += 1;
        }
    }

    if let Some(splits) = splits {
        info!("Creating data.yaml file...");
        let data_yaml_path = create_data_yaml(&output_dir, &class_map, splits)
            .map_err(|e| format!("Failed to create data.yaml: {}", e))?;
        info!("Wrote {}", data_yaml_path.display());
    }

    stats.print_summary();
    Ok(stats)
}

/// Everything needed to convert one annotation file
struct VideoJob<'a> {
    json_path: &'a Path,
    annotation: &'a VideoAnnotation,
    class_map: &'a ClassMap,
    output_dirs: &'a OutputDirs,
    args: &'a Args,
    video_dir: Option<&'a Path>,
}

fn process_video(
    job: VideoJob,
    mut sampler: Option<&mut SplitSampler>,
    stats: &mut ProcessingStats,
) -> Result<(), Box<dyn Error>> {
    let VideoJob {
        json_path,
        annotation,
        class_map,
        output_dirs,
        args,
        video_dir,
    } = job;

    let location = resolve_video_location(&annotation.metadata, video_dir)
        .ok_or("Annotation has neither a video URL nor a local video")?;
    let mut video = VideoSource::open(&location)?;
    let fps = video.fps();
    let video_size = (video.width(), video.height());
    let annotated_size = annotation_frame_size(&annotation.metadata, video_size);
    if annotated_size != video_size {
        warn!(
            "{} was annotated at {}x{} but decodes at {}x{}, labels use the annotated size",
            location, annotated_size.0, annotated_size.1, video_size.0, video_size.1
        );
    }
    let frame_indices = sample_frame_indices(video.frame_count(), fps, args.capture_rate)?;

    let stem = output_stem(json_path);
    let extension = args.image_format.extension();
    let pb = create_progress_bar(frame_indices.len() as u64, &stem);

    for frame_no in frame_indices {
        let split: Option<Split> = sampler.as_deref_mut().map(SplitSampler::pick);
        let dirs = output_dirs
            .for_split(split)
            .ok_or_else(|| format!("No output directory for split {:?}", split))?;

        let frame = match video.read_frame(frame_no)? {
            Some(frame) => frame,
            None => {
                warn!("Could not read frame {} of {}", frame_no, location);
                stats.frames_unreadable += 1;
                pb.inc(1);
                continue;
            }
        };

        let sample_name = format!("{}_{}", stem, frame_no);
        let image_path = dirs.images_dir.join(format!("{}.{}", sample_name, extension));
        write_frame(&image_path, &frame, args.image_format, args.jpeg_quality)?;

        let (frame_width, frame_height) =
            annotation_frame_size(&annotation.metadata, (frame.width(), frame.height()));
        let labels = frame_labels(
            &annotation.instances,
            frame_timestamp_us(frame_no, fps),
            class_map,
            frame_width,
            frame_height,
            args.interpolate,
        );
        let label_path = dirs.labels_dir.join(format!("{}.txt", sample_name));
        write_label_file(&label_path, &labels.content)?;

        stats.unknown_class_boxes += labels.unknown_class_boxes;
        stats.record_frame(split, labels.boxes);
        pb.inc(1);
    }

    pb.finish_with_message(format!("{} complete", stem));
    Ok(())
}
