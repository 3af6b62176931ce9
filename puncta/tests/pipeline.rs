//! End-to-end pipeline scenarios on synthetic rasters.

use ndarray::Array3;
use puncta::{DetectError, DetectionConfig, Pipeline};

/// All-black 3-channel raster.
fn black(height: usize, width: usize) -> Array3<u8> {
    Array3::zeros((height, width, 3))
}

/// Paint a white square covering `size` pixels from `(top, left)` in every
/// channel.
fn paint_square(raster: &mut Array3<u8>, top: usize, left: usize, size: usize) {
    for y in top..top + size {
        for x in left..left + size {
            for c in 0..3 {
                raster[[y, x, c]] = 255;
            }
        }
    }
}

fn pipeline() -> Pipeline {
    Pipeline::new(DetectionConfig::default()).unwrap()
}

#[test]
fn two_squares_are_counted_after_downscale() {
    // 2000x1000 source, two 10x10 white squares well apart. The loader cap
    // scales this by 0.75 to 1500x750; square centers at (105, 105) and
    // (405, 105) land at (78.75, 78.75) and (303.75, 78.75).
    let mut raster = black(1000, 2000);
    paint_square(&mut raster, 100, 100, 10);
    paint_square(&mut raster, 100, 400, 10);

    let result = pipeline().process_raster(&raster, 5).unwrap();

    assert_eq!(result.count, 2);
    assert_eq!(result.centroids.len(), 2);

    let expected = [(78.75f64, 78.75f64), (303.75, 78.75)];
    for ((cx, cy), (ex, ey)) in result.centroids.iter().zip(expected) {
        assert!(
            (*cx as f64 - ex).abs() <= 1.0 && (*cy as f64 - ey).abs() <= 1.0,
            "centroid ({cx}, {cy}) not within 1 px of ({ex}, {ey})"
        );
    }

    // Output rasters track the downscaled source.
    assert_eq!(result.source.dim(), (750, 1500, 3));
    let composite = result.composite().unwrap();
    assert_eq!(composite.dim(), (3 * 750, 1500, 3));
}

#[test]
fn process_path_matches_in_memory_processing() {
    let mut raster = black(200, 260);
    paint_square(&mut raster, 40, 50, 9);
    paint_square(&mut raster, 120, 180, 7);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("region.png");
    puncta::image_proc::raster_to_rgb_image(&raster)
        .save(&path)
        .unwrap();

    let pipeline = pipeline();
    let from_file = pipeline.process_path(&path, 5).unwrap();
    let from_memory = pipeline.process_raster(&raster, 5).unwrap();

    assert_eq!(from_file.count, from_memory.count);
    assert_eq!(from_file.centroids, from_memory.centroids);
}

#[test]
fn pipeline_is_deterministic() {
    let mut raster = black(300, 400);
    paint_square(&mut raster, 50, 60, 8);
    paint_square(&mut raster, 200, 300, 6);
    paint_square(&mut raster, 120, 180, 4);

    let pipeline = pipeline();
    let first = pipeline.process_raster(&raster, 5).unwrap();
    let second = pipeline.process_raster(&raster, 5).unwrap();

    assert_eq!(first.count, second.count);
    assert_eq!(first.centroids, second.centroids);
}

#[test]
fn raising_min_area_never_increases_the_count() {
    let mut raster = black(300, 300);
    paint_square(&mut raster, 20, 20, 3);
    paint_square(&mut raster, 100, 100, 6);
    paint_square(&mut raster, 200, 200, 12);

    let pipeline = pipeline();
    let mut previous = usize::MAX;
    for min_area in 1..=30 {
        let count = pipeline.process_raster(&raster, min_area).unwrap().count;
        assert!(
            count <= previous,
            "count rose from {previous} to {count} at min_area {min_area}"
        );
        previous = count;
    }
}

#[test]
fn small_image_is_not_resized() {
    let mut raster = black(400, 600);
    paint_square(&mut raster, 100, 100, 10);

    let result = pipeline().process_raster(&raster, 5).unwrap();
    assert_eq!(result.source.dim(), (400, 600, 3));
    // No downscale, so the bounding-box centroid is exact.
    assert_eq!(result.centroids, vec![(105, 105)]);
}

#[test]
fn all_zero_red_channel_fails() {
    let raster = black(100, 100);
    assert!(matches!(
        pipeline().process_raster(&raster, 5),
        Err(DetectError::DegenerateChannel)
    ));
}

#[test]
fn annotation_leaves_source_raster_clean() {
    let mut raster = black(200, 200);
    paint_square(&mut raster, 90, 90, 10);

    let result = pipeline().process_raster(&raster, 5).unwrap();
    assert_eq!(result.count, 1);

    // The marker shows up in the annotated raster only.
    let (cx, cy) = result.centroids[0];
    assert_eq!(result.annotated[[cy, cx + 2, 0]], 255);
    assert_eq!(result.source, raster);

    // The masked raster keeps signal pixels and zeroes the background.
    assert_eq!(result.masked[[cy, cx, 0]], 255);
    assert_eq!(result.masked[[0, 0, 0]], 0);
}
