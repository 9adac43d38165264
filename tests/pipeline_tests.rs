use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use deepfashion2voc::conversion::{annotation_path, collect_image_files};
use deepfashion2voc::{process_dataset, read_annotation, Args, Error, ErrorKind};

fn write_image(path: &Path, width: u32, height: u32) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::new(width, height).save(path).unwrap();
}

fn write_file(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Build a small dataset tree:
/// - `CatA/a.jpg` (100x50, label 5)
/// - `CatA/b.jpg` (30x40, label 44)
/// - `CatB/c.jpg` (label 0, outside the label domain)
/// - `CatB/broken.jpg` (not an image, label 22)
/// - `CatB/extra.jpg` (no table entry)
fn build_dataset(root: &Path) {
    write_file(
        &root.join("Anno/list_category_img.txt"),
        "4\nimage_name category_label\n\
         img/CatA/a.jpg 5\n\
         img/CatA/b.jpg 44\n\
         img/CatB/c.jpg 0\n\
         img/CatB/broken.jpg 22\n",
    );
    write_file(
        &root.join("Anno/list_category_cloth.txt"),
        "3\ncategory_name category_type\nAnorak 1\nBlazer 1\nJeans 2\n",
    );
    write_file(
        &root.join("Anno/list_bbox.txt"),
        "4\nimage_name x_1 y_1 x_2 y_2\n\
         img/CatA/a.jpg 10 20 90 40\n\
         img/CatA/b.jpg 001 002 029 039\n\
         img/CatB/c.jpg 0 0 5 5\n\
         img/CatB/broken.jpg 1 1 2 2\n",
    );
    write_file(
        &root.join("Eval/list_eval_partition.txt"),
        "5\nimage_name evaluation_status\n\
         img/CatA/a.jpg train\n\
         img/CatA/b.jpg test\n\
         img/CatB/c.jpg val\n\
         img/CatB/broken.jpg test\n\
         img/CatC/missing.jpg train\n",
    );

    let image_dir = root.join("Img/img");
    write_image(&image_dir.join("CatA/a.jpg"), 100, 50);
    write_image(&image_dir.join("CatA/b.jpg"), 30, 40);
    write_image(&image_dir.join("CatB/c.jpg"), 8, 8);
    write_image(&image_dir.join("CatB/extra.jpg"), 8, 8);
    write_file(&image_dir.join("CatB/broken.jpg"), "not an image");
}

fn test_args(root: &Path) -> Args {
    Args {
        no_progress: true,
        ..Args::new(root)
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_end_to_end_conversion() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);

    let stats = process_dataset(&test_args(root)).unwrap();
    assert_eq!(stats.total_files_seen, 5);
    assert_eq!(stats.saved_annotations, 3);
    assert_eq!(stats.skipped_unlinked, 1);
    assert_eq!(stats.failed_images, 1);
    assert_eq!(stats.unknown_labels, 1);

    let annotations_dir = root.join("VOC/Annotations");
    let document = read_annotation(&annotations_dir.join("CatA_a.xml")).unwrap();
    assert_eq!(document.filename, "CatA_a.jpg");
    assert_eq!(document.folder, "DeepFashion");
    assert_eq!(document.object.label, "5");
    assert_eq!(document.object.name, "upper_body");
    assert_eq!(document.object.bndbox.xmin, "10");
    assert_eq!(document.object.bndbox.ymin, "20");
    assert_eq!(document.object.bndbox.xmax, "90");
    assert_eq!(document.object.bndbox.ymax, "40");
    assert_eq!(document.object.difficult, 0);
    assert_eq!(document.segmented, 0);
    assert_eq!(document.size.width, 100);
    assert_eq!(document.size.height, 50);
    assert_eq!(document.size.depth, 3);
    assert_eq!(document.source, "TBD");

    // Coordinates are copied string for string.
    let document = read_annotation(&annotations_dir.join("CatA_b.xml")).unwrap();
    assert_eq!(document.object.name, "full_body");
    assert_eq!(document.object.bndbox.xmin, "001");
    assert_eq!(document.object.bndbox.ymax, "039");
    assert_eq!((document.size.width, document.size.height), (30, 40));

    let document = read_annotation(&annotations_dir.join("CatB_c.xml")).unwrap();
    assert_eq!(document.object.name, "NA");

    assert!(!annotations_dir.join("CatB_broken.xml").exists());
    assert!(!annotations_dir.join("CatB_extra.xml").exists());
    assert!(!root.join("VOC/JPEGImages").exists());
}

#[test]
fn test_image_sets_partition_ids() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);

    process_dataset(&test_args(root)).unwrap();

    let test = read_lines(&root.join("VOC/ImageSets/test.txt"));
    let trainval = read_lines(&root.join("VOC/ImageSets/trainval.txt"));
    assert_eq!(test, vec!["CatA_b.jpg", "CatB_broken.jpg"]);
    assert_eq!(trainval, vec!["CatA_a.jpg", "CatB_c.jpg", "CatC_missing.jpg"]);

    let test: HashSet<_> = test.into_iter().collect();
    let trainval: HashSet<_> = trainval.into_iter().collect();
    assert!(test.is_disjoint(&trainval));
    assert_eq!(test.len() + trainval.len(), 5);
}

#[test]
fn test_copy_images_and_custom_output_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("DeepFashion");
    let output = temp_dir.path().join("out");
    build_dataset(&root);

    let args = Args {
        output_dir: Some(output.clone()),
        copy_images: true,
        ..test_args(&root)
    };
    let stats = process_dataset(&args).unwrap();

    assert_eq!(stats.saved_annotations, 3);
    assert!(output.join("Annotations/CatA_a.xml").is_file());
    assert!(output.join("JPEGImages/CatA_a.jpg").is_file());
    assert!(output.join("JPEGImages/CatB_c.jpg").is_file());
    assert!(!output.join("JPEGImages/CatB_broken.jpg").exists());
    assert!(!root.join("VOC").exists());
}

#[test]
fn test_rerun_reuses_output_directories() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);

    process_dataset(&test_args(root)).unwrap();
    let stats = process_dataset(&test_args(root)).unwrap();
    assert_eq!(stats.saved_annotations, 3);
}

#[test]
fn test_missing_table_fails_before_output() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);
    fs::remove_file(root.join("Anno/list_bbox.txt")).unwrap();

    let err = process_dataset(&test_args(root)).unwrap_err();
    assert!(matches!(err, Error::MissingInput { .. }));
    assert_eq!(err.kind(), ErrorKind::Config);
    assert!(!root.join("VOC").exists());
}

#[test]
fn test_missing_tables_reported_with_missing_image_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);
    fs::remove_dir_all(root.join("Img")).unwrap();
    fs::remove_file(root.join("Anno/list_bbox.txt")).unwrap();

    // Table loading still runs, so the missing table surfaces as well.
    let err = process_dataset(&test_args(root)).unwrap_err();
    assert!(matches!(
        err,
        Error::MissingInput {
            input: "bbox table",
            ..
        }
    ));
    assert!(!root.join("VOC").exists());
}

#[test]
fn test_missing_image_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);
    fs::remove_dir_all(root.join("Img")).unwrap();

    let err = process_dataset(&test_args(root)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_truncated_cloth_table_aborts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);
    write_file(
        &root.join("Anno/list_category_cloth.txt"),
        "3\ncategory_name category_type\nAnorak 1\nBlazer 1\n",
    );

    let err = process_dataset(&test_args(root)).unwrap_err();
    assert!(matches!(err, Error::RowCountMismatch { table: "cloth", .. }));
    assert!(!root.join("VOC").exists());
}

#[test]
fn test_unlinked_category_aborts() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_dataset(root);
    write_file(
        &root.join("Anno/list_bbox.txt"),
        "4\nimage_name x_1 y_1 x_2 y_2\n\
         img/CatA/a.jpg 10 20 90 40\n\
         img/CatA/b.jpg 001 002 029 039\n\
         img/CatB/c.jpg 0 0 5 5\n\
         img/CatZ/other.jpg 1 1 2 2\n",
    );

    let err = process_dataset(&test_args(root)).unwrap_err();
    assert!(matches!(err, Error::JoinMismatch { joined: 3, .. }));
    assert_eq!(err.kind(), ErrorKind::Integrity);
}

/// Write a one-image dataset with the given category label and bbox tokens.
fn build_single_image_dataset(root: &Path, label: &str, bbox: &str) {
    write_file(
        &root.join("Anno/list_category_img.txt"),
        &format!("1\nimage_name category_label\nimg/CatA/g.jpg {}\n", label),
    );
    write_file(
        &root.join("Anno/list_category_cloth.txt"),
        "1\ncategory_name category_type\nAnorak 1\n",
    );
    write_file(
        &root.join("Anno/list_bbox.txt"),
        &format!("1\nimage_name x_1 y_1 x_2 y_2\nimg/CatA/g.jpg {}\n", bbox),
    );
    write_file(
        &root.join("Eval/list_eval_partition.txt"),
        "1\nimage_name evaluation_status\nimg/CatA/g.jpg train\n",
    );
}

#[test]
fn test_grayscale_image_reports_three_channels() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_single_image_dataset(root, "3", "1 1 5 5");
    let image_path = root.join("Img/img/CatA/g.jpg");
    fs::create_dir_all(image_path.parent().unwrap()).unwrap();
    image::GrayImage::new(10, 6).save(&image_path).unwrap();

    let stats = process_dataset(&test_args(root)).unwrap();
    assert_eq!(stats.saved_annotations, 1);

    let document = read_annotation(&root.join("VOC/Annotations/CatA_g.xml")).unwrap();
    assert_eq!(document.size.width, 10);
    assert_eq!(document.size.height, 6);
    assert_eq!(document.size.depth, 3);
}

#[test]
fn test_rgba_image_reports_three_channels() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    build_single_image_dataset(root, "3", "1 1 5 5");
    // PNG content behind a .jpg name, detected from the file header.
    let image_path = root.join("Img/img/CatA/g.jpg");
    fs::create_dir_all(image_path.parent().unwrap()).unwrap();
    image::RgbaImage::new(7, 9)
        .save_with_format(&image_path, image::ImageFormat::Png)
        .unwrap();

    process_dataset(&test_args(root)).unwrap();

    let document = read_annotation(&root.join("VOC/Annotations/CatA_g.xml")).unwrap();
    assert_eq!((document.size.width, document.size.height), (7, 9));
    assert_eq!(document.size.depth, 3);
}

#[test]
fn test_box_outside_image_is_written_unchanged() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    // Degenerate (xmin > xmax) and larger than the 10x6 image.
    build_single_image_dataset(root, "05", "300 200 100 999");
    write_image(&root.join("Img/img/CatA/g.jpg"), 10, 6);

    let stats = process_dataset(&test_args(root)).unwrap();
    assert_eq!(stats.saved_annotations, 1);

    let xml_path = root.join("VOC/Annotations/CatA_g.xml");
    let document = read_annotation(&xml_path).unwrap();
    assert_eq!(document.object.bndbox.xmin, "300");
    assert_eq!(document.object.bndbox.ymin, "200");
    assert_eq!(document.object.bndbox.xmax, "100");
    assert_eq!(document.object.bndbox.ymax, "999");
    assert_eq!(document.object.label, "05");
    assert_eq!(document.object.name, "upper_body");

    let xml = fs::read_to_string(&xml_path).unwrap();
    assert!(xml.contains("<xmax>100</xmax>"));
    assert!(xml.contains("<xmin>300</xmin>"));
    assert!(xml.contains("<ymax>999</ymax>"));
    assert!(xml.contains("<ymin>200</ymin>"));
    assert!(xml.contains("<label>05</label>"));
}

#[test]
fn test_collect_image_files_is_sorted() {
    let temp_dir = tempfile::tempdir().unwrap();
    let image_dir = temp_dir.path();
    for name in ["Zeta/b.jpg", "Alpha/c.jpg", "Alpha/a.jpg", "Mid/x.jpg"] {
        write_file(&image_dir.join(name), "");
    }

    let files: Vec<PathBuf> = collect_image_files(image_dir)
        .into_iter()
        .map(|path| path.strip_prefix(image_dir).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        files,
        vec![
            PathBuf::from("Alpha/a.jpg"),
            PathBuf::from("Alpha/c.jpg"),
            PathBuf::from("Mid/x.jpg"),
            PathBuf::from("Zeta/b.jpg"),
        ]
    );
}

#[test]
fn test_annotation_path_replaces_extension() {
    let path = annotation_path(Path::new("/out/Annotations"), "CatA_img_00000001.jpg");
    assert_eq!(path, PathBuf::from("/out/Annotations/CatA_img_00000001.xml"));
}
