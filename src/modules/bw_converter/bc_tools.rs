use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use super::bc_main::{
    BatchError, BatchEvent, BatchReport, ConversionResult, ConvertError, Selection,
    OUTPUT_SUFFIX, display_name,
};

/// `<output_dir>/<stem>_bw<.ext>`, keeping the extension exactly as the input spells it.
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let mut name: OsString = input.file_stem().map(OsStr::to_os_string).unwrap_or_default();
    name.push(OUTPUT_SUFFIX);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }
    output_dir.join(name)
}

pub fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (processed.min(total) * 100 / total) as u8
}

/// Decodes `input`, reduces it to 8-bit luma and writes it next to the other results.
/// An existing file at the output path is replaced.
pub fn convert_to_grayscale(input: &Path, output_dir: &Path) -> ConversionResult {
    let file = display_name(input);
    let processing = |message: String| ConvertError::Processing { file: file.clone(), message };

    let reader = ImageReader::open(input)
        .map_err(|e| processing(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| processing(e.to_string()))?;

    let img = reader.decode().map_err(|e| match e {
        ImageError::Limits(_) => processing(e.to_string()),
        _ => ConvertError::InvalidImage { file: file.clone() },
    })?;

    let luma = DynamicImage::ImageLuma8(img.to_luma8());
    let output_path = output_path_for(input, output_dir);
    let gray = encodable_gray(luma, &output_path);
    gray.save(&output_path)
        .map_err(|e| processing(e.to_string()))?;

    Ok(output_path)
}

/// The GIF encoder takes only RGB(A) frames, so luma is widened to R=G=B there.
fn encodable_gray(luma: DynamicImage, output_path: &Path) -> DynamicImage {
    match ImageFormat::from_path(output_path) {
        Ok(ImageFormat::Gif) => DynamicImage::ImageRgb8(luma.to_rgb8()),
        _ => luma,
    }
}

/// Converts every selected file in order, reporting through `emit` as it goes.
/// Individual failures are recorded in the report; only pre-flight problems return `Err`.
pub fn run_batch<F>(selection: &Selection, mut emit: F) -> Result<BatchReport, BatchError>
where
    F: FnMut(BatchEvent),
{
    let output_dir = selection.validate()?;
    let total = selection.files.len();
    log::info!("Starting grayscale batch: {} file(s) into {}", total, output_dir.display());

    let mut report = BatchReport::new(total);

    for (idx, path) in selection.files.iter().enumerate() {
        emit(BatchEvent::Processing {
            index: idx + 1,
            total,
            file_name: display_name(path),
        });

        let result = convert_to_grayscale(path, output_dir);
        match &result {
            Ok(out) => log::debug!("Wrote {}", out.display()),
            Err(e) => log::warn!("{}", e),
        }
        report.record(&result);

        emit(BatchEvent::Progress(progress_percent(idx + 1, total)));
    }

    let report = report.finish();
    log::info!(
        "Grayscale batch finished: {} succeeded, {} failed",
        report.success_count, report.error_count
    );
    emit(BatchEvent::Finished(report.clone()));
    Ok(report)
}

/// A batch running on its worker thread.
pub struct BatchTask {
    rx: Receiver<BatchEvent>,
}

#[derive(Debug, Default)]
pub struct TaskUpdate {
    pub events: Vec<BatchEvent>,
    /// The worker is gone. Set after the final event has been drained too.
    pub disconnected: bool,
}

impl BatchTask {
    pub fn poll(&self) -> TaskUpdate {
        let mut update = TaskUpdate::default();
        loop {
            match self.rx.try_recv() {
                Ok(event) => update.events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    update.disconnected = true;
                    break;
                }
            }
        }
        update
    }
}

/// Returns false when the panel has dropped its end of the channel.
fn forward_event(tx: &Sender<BatchEvent>, event: BatchEvent) -> bool {
    match tx.send(event) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("No listener for batch event {:?}", e.0);
            false
        }
    }
}

/// Checks the selection on the calling thread, then runs the batch on a worker.
/// `repaint` is invoked after every event so the UI can wake up and drain it.
pub fn spawn_batch<R>(selection: Selection, repaint: R) -> Result<BatchTask, BatchError>
where
    R: Fn() + Send + 'static,
{
    selection.validate()?;

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = run_batch(&selection, |event| {
            forward_event(&tx, event);
            repaint();
        });
        if let Err(e) = result {
            log::error!("Batch rejected after validation: {}", e);
        }
    });

    Ok(BatchTask { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::bc_main::IMAGE_EXTENSIONS;
    use image::{ColorType, RgbImage};
    use std::fs;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn write_test_image(dir: &Path, name: &str) -> PathBuf {
        let img = RgbImage::from_fn(16, 12, |x, y| {
            image::Rgb([(x * 15) as u8, (y * 20) as u8, 200])
        });
        let path = dir.join(name);
        img.save(&path).expect("failed to write test image");
        path
    }

    fn write_text_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "definitely not pixels").expect("failed to write text file");
        path
    }

    #[test]
    fn test_output_path_keeps_extension() {
        assert_eq!(
            output_path_for(Path::new("/photos/photo.jpg"), Path::new("/out")),
            PathBuf::from("/out/photo_bw.jpg")
        );
        assert_eq!(
            output_path_for(Path::new("shots/IMG_01.PNG"), Path::new("/out")),
            PathBuf::from("/out/IMG_01_bw.PNG")
        );
        assert_eq!(
            output_path_for(Path::new("archive.tar.gz"), Path::new("/out")),
            PathBuf::from("/out/archive.tar_bw.gz")
        );
        assert_eq!(
            output_path_for(Path::new("/in/noext"), Path::new("/out")),
            PathBuf::from("/out/noext_bw")
        );
    }

    #[test]
    fn test_progress_percent() {
        assert_eq!(progress_percent(0, 0), 0);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 66);
        assert_eq!(progress_percent(3, 3), 100);

        let total = 7;
        let values: Vec<u8> = (1..=total).map(|i| progress_percent(i, total)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(values[..total - 1].iter().all(|&v| v < 100));
        assert_eq!(values[total - 1], 100);
    }

    #[test]
    fn test_convert_png_to_luma() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let input = write_test_image(input_dir.path(), "photo.png");

        let out = convert_to_grayscale(&input, output_dir.path()).expect("conversion failed");

        assert_eq!(out, output_dir.path().join("photo_bw.png"));
        let written = image::open(&out).unwrap();
        assert_eq!(written.color(), ColorType::L8);
        assert_eq!((written.width(), written.height()), (16, 12));
    }

    #[test]
    fn test_convert_jpeg_to_luma_and_overwrite() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let input = write_test_image(input_dir.path(), "photo.jpg");

        let first = convert_to_grayscale(&input, output_dir.path()).unwrap();
        let second = convert_to_grayscale(&input, output_dir.path()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, output_dir.path().join("photo_bw.jpg"));
        assert_eq!(image::open(&second).unwrap().color(), ColorType::L8);
    }

    #[test]
    fn test_every_picker_extension_converts_to_gray() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();

        for ext in IMAGE_EXTENSIONS {
            let input = write_test_image(input_dir.path(), &format!("sample.{}", ext));
            let out = convert_to_grayscale(&input, output_dir.path())
                .unwrap_or_else(|e| panic!("{} failed: {}", ext, e));
            assert_eq!(out, output_dir.path().join(format!("sample_bw.{}", ext)));

            let written = image::open(&out).unwrap_or_else(|e| panic!("{} unreadable: {}", ext, e));
            if matches!(*ext, "png" | "jpg" | "jpeg" | "tiff") {
                assert_eq!(written.color(), ColorType::L8, "{} should stay single-channel", ext);
            }
            for px in written.to_rgb8().pixels() {
                let [r, g, b] = px.0;
                assert!(
                    r.abs_diff(g) <= 2 && g.abs_diff(b) <= 2,
                    "{} has a colored pixel {:?}", ext, px.0
                );
            }
        }
    }

    #[test]
    fn test_gif_rerun_overwrites() {
        let dir = tempdir().unwrap();
        let input = write_test_image(dir.path(), "anim.gif");
        let out_dir = tempdir().unwrap();

        convert_to_grayscale(&input, out_dir.path()).unwrap();
        let out = convert_to_grayscale(&input, out_dir.path()).unwrap();
        assert_eq!(out, out_dir.path().join("anim_bw.gif"));
        assert_eq!(image::open(&out).unwrap().width(), 16);
    }

    #[test]
    fn test_forward_event_survives_dropped_listener() {
        let (tx, rx) = mpsc::channel();
        assert!(forward_event(&tx, BatchEvent::Progress(10)));
        assert!(matches!(rx.try_recv(), Ok(BatchEvent::Progress(10))));

        drop(rx);
        assert!(!forward_event(&tx, BatchEvent::Progress(20)));
    }

    #[test]
    fn test_content_detection_ignores_wrong_extension() {
        let dir = tempdir().unwrap();
        let png = write_test_image(dir.path(), "real.png");
        let renamed = dir.path().join("real.jpg");
        fs::rename(&png, &renamed).unwrap();

        let result = convert_to_grayscale(&renamed, dir.path());
        assert!(result.is_ok(), "decode should follow file content: {:?}", result.err());
    }

    #[test]
    fn test_non_image_is_invalid() {
        let dir = tempdir().unwrap();
        for name in ["notes.txt", "fake.png"] {
            let input = write_text_file(dir.path(), name);
            let err = convert_to_grayscale(&input, dir.path()).unwrap_err();
            assert!(matches!(err, ConvertError::InvalidImage { .. }), "{} gave {:?}", name, err);
            assert_eq!(err.to_string(), format!("'{}' is not a valid image file.", name));
        }
    }

    #[test]
    fn test_missing_input_is_processing_error() {
        let dir = tempdir().unwrap();
        let err = convert_to_grayscale(&dir.path().join("gone.png"), dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Processing { .. }));
        assert!(err.to_string().starts_with("Error while processing 'gone.png': "));
    }

    #[test]
    fn test_unwritable_output_is_processing_error() {
        let dir = tempdir().unwrap();
        let input = write_test_image(dir.path(), "photo.png");
        let missing_dir = dir.path().join("does").join("not").join("exist");

        let err = convert_to_grayscale(&input, &missing_dir).unwrap_err();
        assert!(matches!(err, ConvertError::Processing { .. }));
    }

    #[test]
    fn test_unknown_output_extension_is_processing_error() {
        let dir = tempdir().unwrap();
        let png = write_test_image(dir.path(), "photo.png");
        let odd = dir.path().join("photo.data");
        fs::rename(&png, &odd).unwrap();
        let out_dir = tempdir().unwrap();

        let err = convert_to_grayscale(&odd, out_dir.path()).unwrap_err();
        assert!(matches!(err, ConvertError::Processing { .. }), "{:?}", err);
        assert!(!out_dir.path().join("photo_bw.data").exists());
    }

    #[test]
    fn test_run_batch_continues_past_failures() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let files = vec![
            write_test_image(input_dir.path(), "a.png"),
            write_text_file(input_dir.path(), "b.txt"),
            write_test_image(input_dir.path(), "c.jpg"),
            write_test_image(input_dir.path(), "d.bmp"),
        ];
        let selection = Selection {
            files,
            output_dir: Some(output_dir.path().to_path_buf()),
        };

        let mut events = Vec::new();
        let report = run_batch(&selection, |e| events.push(e)).unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.success_count, 3);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.success_count + report.error_count, report.total);
        assert_eq!(report.errors, vec!["'b.txt' is not a valid image file.".to_string()]);

        assert!(output_dir.path().join("a_bw.png").exists());
        assert!(output_dir.path().join("c_bw.jpg").exists());
        assert!(output_dir.path().join("d_bw.bmp").exists());
        assert!(!output_dir.path().join("b_bw.txt").exists());

        let names: Vec<String> = events.iter().filter_map(|e| match e {
            BatchEvent::Processing { file_name, .. } => Some(file_name.clone()),
            _ => None,
        }).collect();
        assert_eq!(names, vec!["a.png", "b.txt", "c.jpg", "d.bmp"]);

        let progress: Vec<u8> = events.iter().filter_map(|e| match e {
            BatchEvent::Progress(p) => Some(*p),
            _ => None,
        }).collect();
        assert_eq!(progress, vec![25, 50, 75, 100]);

        assert!(matches!(events.last(), Some(BatchEvent::Finished(r)) if r.error_count == 1));
    }

    #[test]
    fn test_run_batch_preflight_touches_nothing() {
        let dir = tempdir().unwrap();
        let input = write_test_image(dir.path(), "photo.png");

        let mut events = Vec::new();
        let no_dir = Selection { files: vec![input.clone()], output_dir: None };
        assert_eq!(run_batch(&no_dir, |e| events.push(e)).unwrap_err(), BatchError::NoOutputDirectory);

        let no_files = Selection { files: Vec::new(), output_dir: Some(dir.path().to_path_buf()) };
        assert_eq!(run_batch(&no_files, |e| events.push(e)).unwrap_err(), BatchError::NoFilesSelected);

        assert!(events.is_empty());
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert!(spawn_batch(no_dir, || {}).is_err());
    }

    #[test]
    fn test_spawn_batch_delivers_events() {
        let input_dir = tempdir().unwrap();
        let output_dir = tempdir().unwrap();
        let selection = Selection {
            files: vec![
                write_test_image(input_dir.path(), "one.png"),
                write_test_image(input_dir.path(), "two.png"),
            ],
            output_dir: Some(output_dir.path().to_path_buf()),
        };

        let task = spawn_batch(selection, || {}).unwrap();
        let deadline = Instant::now() + Duration::from_secs(30);
        let mut events = Vec::new();
        loop {
            let update = task.poll();
            events.extend(update.events);
            if update.disconnected || Instant::now() > deadline {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        match events.last() {
            Some(BatchEvent::Finished(report)) => {
                assert_eq!(report.success_count, 2);
                assert!(report.is_clean());
            }
            other => panic!("expected a final report, got {:?}", other),
        }
        assert!(output_dir.path().join("one_bw.png").exists());
        assert!(output_dir.path().join("two_bw.png").exists());
    }
}
