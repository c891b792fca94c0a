use ndarray::{Array2, Array3};
use neuroconn::{
    clean_connectomes, compute_mappings, read_matrix, render_connectomes, repair_parcellation, write_volume,
    AtlasCorrection, DataLayout, LabelVolume, NeuroconnError, RoiMapping,
};

use std::fs;
use std::path::Path;

const LUT: &str = "1 GM_Area_1\n2 GM_Area_2\n3 GM_Area_3\n281 GM_Area_281\n";

/// A 4x4x2 atlas: label 1 in x=0, label 2 in x=1, label 3 in x=2, label 282 (not in the LUT) in x=3.
fn demo_atlas() -> Array3<f32> {
    Array3::from_shape_fn((4, 4, 2), |(x, _, _)| match x {
        0 => 1.0,
        1 => 2.0,
        2 => 3.0,
        _ => 282.0,
    })
}

fn mask_covering(xs: &[usize], shape: (usize, usize, usize)) -> Array3<f32> {
    Array3::from_shape_fn(shape, |(x, _, _)| if xs.contains(&x) { 1.0 } else { 0.0 })
}

fn setup_templates(root: &Path, atlas: &str) {
    let templates = root.join("Templates");
    fs::create_dir_all(&templates).unwrap();
    write_volume(templates.join(format!("{}_parcellation.nii.gz", atlas)), &demo_atlas(), None).unwrap();
    fs::write(templates.join(format!("{}_LUT.txt", atlas)), LUT).unwrap();
}

#[test]
fn mappings_are_written_per_mask_and_bad_masks_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    setup_templates(dir.path(), "Juelich");

    let masks = layout.masks_dir();
    fs::create_dir_all(&masks).unwrap();
    write_volume(masks.join("A.nii.gz"), &mask_covering(&[0, 2], (4, 4, 2)), None).unwrap();
    write_volume(masks.join("B.nii"), &mask_covering(&[0], (4, 4, 3)), None).unwrap();
    write_volume(masks.join("C.nii.gz"), &mask_covering(&[1, 3], (4, 4, 2)), None).unwrap();
    write_volume(masks.join("D.nii.gz"), &mask_covering(&[1], (4, 4, 2)), None).unwrap();
    fs::write(masks.join("notes.txt"), "not a mask").unwrap();

    let report = compute_mappings(&layout, "Juelich").unwrap();
    assert_eq!(2, report.written.len());
    assert_eq!(2, report.failed.len());
    assert!(!report.is_success());

    let a = RoiMapping::from_json_file(layout.mapping("Juelich", "A")).unwrap();
    assert_eq!(vec![1, 3], a.labels());
    assert_eq!(Some("GM_Area_3"), a.get(3));
    assert_eq!(
        r#"{"1":"GM_Area_1","3":"GM_Area_3"}"#,
        fs::read_to_string(layout.mapping("Juelich", "A")).unwrap()
    );

    // B does not match the atlas grid, C overlaps label 282 which the LUT lacks.
    assert!(!layout.mapping("Juelich", "B").exists());
    assert!(!layout.mapping("Juelich", "C").exists());
    assert!(matches!(report.failed[0].1, NeuroconnError::DimensionMismatch(_, _)));
    assert!(matches!(report.failed[1].1, NeuroconnError::UnmappedLabel(282)));

    // The batch continued after the failures.
    let d = RoiMapping::from_json_file(layout.mapping("Juelich", "D")).unwrap();
    assert_eq!(vec![2], d.labels());
}

#[test]
fn mappings_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    setup_templates(dir.path(), "Juelich");
    fs::create_dir_all(layout.masks_dir()).unwrap();
    write_volume(layout.masks_dir().join("A.nii.gz"), &mask_covering(&[0, 1, 2], (4, 4, 2)), None).unwrap();

    compute_mappings(&layout, "Juelich").unwrap();
    let first = fs::read(layout.mapping("Juelich", "A")).unwrap();
    compute_mappings(&layout, "Juelich").unwrap();
    assert_eq!(first, fs::read(layout.mapping("Juelich", "A")).unwrap());
}

#[test]
fn a_missing_atlas_aborts_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    assert!(matches!(compute_mappings(&layout, "Juelich"), Err(NeuroconnError::MissingInput(_))));
}

#[test]
fn juelich_connectomes_are_cleaned() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    fs::create_dir_all(layout.old_connectomes_dir()).unwrap();

    let cc = Array2::from_shape_fn((414, 414), |(i, j)| (i * 414 + j) as f64);
    neuroconn::write_matrix(layout.old_connectomes_dir().join("Juelich_V1_weights.tsv"), &cc).unwrap();
    fs::write(layout.old_connectomes_dir().join("Juelich_V2_weights.tsv"), "1 2\n3 oops\n").unwrap();
    fs::write(layout.old_connectomes_dir().join("AAN_V1_weights.tsv"), "1\n").unwrap();

    let report = clean_connectomes(&layout, &AtlasCorrection::juelich()).unwrap();
    assert_eq!(vec![layout.connectome("V1", "Juelich")], report.written);
    assert_eq!(1, report.failed.len());
    assert!(matches!(report.failed[0].1, NeuroconnError::MalformedMatrix(1, 1, _)));

    let cleaned = read_matrix(layout.connectome("V1", "Juelich")).unwrap();
    assert_eq!((280, 280), cleaned.dim());
    for old_idx in 1..=280 {
        assert_eq!(cc[[old_idx, old_idx]], cleaned[[old_idx - 1, old_idx - 1]]);
    }
    assert_eq!(cc, read_matrix(layout.old_connectomes_dir().join("Juelich_V1_weights.tsv")).unwrap());
}

#[test]
fn heatmaps_need_one_label_per_roi() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    setup_templates(dir.path(), "Juelich");
    fs::create_dir_all(layout.connectomes_dir()).unwrap();
    neuroconn::write_matrix(layout.connectome("V1", "Juelich"), &Array2::zeros((3, 3))).unwrap();

    let out_dir = dir.path().join("plots");
    fs::create_dir_all(&out_dir).unwrap();
    fs::write(out_dir.join("V1_Juelich_connectivity.png"), "stale image").unwrap();

    let report = render_connectomes(&layout, "Juelich", &out_dir, false).unwrap();
    assert!(report.written.is_empty());
    assert!(matches!(report.failed[0].1, NeuroconnError::LabelCountMismatch(4, 3)));
    assert!(!out_dir.join("V1_Juelich_connectivity.png").exists());
}

#[test]
fn heatmaps_are_rendered_with_lut_labels() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    setup_templates(dir.path(), "Juelich");
    fs::create_dir_all(layout.connectomes_dir()).unwrap();
    let cc = Array2::from_shape_fn((4, 4), |(i, j)| (i + j) as f64);
    neuroconn::write_matrix(layout.connectome("V1", "Juelich"), &cc).unwrap();
    neuroconn::write_matrix(layout.connectome("V2", "Juelich"), &cc.mapv(|v| if v > 5.0 { f64::INFINITY } else { v })).unwrap();

    let out_dir = dir.path().join("plots");
    let report = render_connectomes(&layout, "Juelich", &out_dir, false).unwrap();
    assert!(report.is_success());
    assert_eq!(
        vec![out_dir.join("V1_Juelich_connectivity.png"), out_dir.join("V2_Juelich_connectivity.png")],
        report.written
    );
    for png in &report.written {
        assert_eq!(b"\x89PNG", &fs::read(png).unwrap()[..4]);
    }
}

#[test]
fn labeled_heatmaps_need_no_lut() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    fs::create_dir_all(layout.connectomes_dir()).unwrap();
    fs::write(
        layout.connectome("V1", "Juelich"),
        "\tGM_Area_1\tGM_Area_2\nGM_Area_1\t0\t0.5\nGM_Area_2\t0.5\t0\n",
    )
    .unwrap();

    let out_dir = dir.path().join("plots");
    let report = render_connectomes(&layout, "Juelich", &out_dir, true).unwrap();
    assert!(report.is_success());
    assert_eq!(vec![out_dir.join("V1_Juelich_connectivity.png")], report.written);
    assert!(out_dir.join("V1_Juelich_connectivity.png").is_file());
}

#[test]
fn parcellations_are_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let layout = DataLayout::new(dir.path());
    setup_templates(dir.path(), "AAN");

    let (repaired, removed) = repair_parcellation(&layout, "AAN", 281).unwrap();

    let repaired = LabelVolume::from_file(repaired).unwrap();
    assert_eq!(&[4, 4, 2], repaired.shape());
    assert_eq!(1, repaired.data[[0, 0, 0]]);
    assert_eq!(3, repaired.data[[2, 1, 1]]);
    assert_eq!(0, repaired.data[[3, 3, 1]]);

    let removed = LabelVolume::from_file(removed).unwrap();
    assert_eq!(8, removed.data.iter().filter(|v| **v == 1).count());
    assert_eq!(1, removed.data[[3, 0, 0]]);

    let original = LabelVolume::from_file(layout.parcellation("AAN").unwrap()).unwrap();
    assert_eq!(282, original.data[[3, 0, 0]]);
}
