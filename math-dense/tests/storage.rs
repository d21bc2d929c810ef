//! File-level tests for the binary storage format

use math_numerics_dense::{load_matrix, load_vector, matrix_from_fn, save_matrix, save_vector};
use ndarray::{Array1, Array2, array};
use std::fs;
use std::path::PathBuf;

fn scratch_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "math-dense-{}-{}.bin",
        name,
        std::process::id()
    ))
}

#[test]
fn test_matrix_file_roundtrip() {
    let path = scratch_path("matrix");
    let m: Array2<f64> = matrix_from_fn(4, 3, (1, 1), |i, j, _, _| (i * 10 + j) as f64 / 7.0)
        .expect("valid dimensions");

    save_matrix(&m, &path).expect("save should succeed");
    let back: Array2<f64> = load_matrix(&path).expect("load should succeed");
    fs::remove_file(&path).ok();

    assert_eq!(back, m);
}

#[test]
fn test_vector_file_roundtrip_f32() {
    let path = scratch_path("vector");
    let v = array![0.5_f32, -1.0, 1e-7];

    save_vector(&v, &path).expect("save should succeed");
    let back: Array1<f32> = load_vector(&path).expect("load should succeed");
    fs::remove_file(&path).ok();

    assert_eq!(back, v);
}

#[test]
fn test_tampered_file_rejected_before_read() {
    let path = scratch_path("tampered");
    let m = array![[1.0_f64, 2.0], [3.0, 4.0]];
    save_matrix(&m, &path).expect("save should succeed");

    let mut bytes = fs::read(&path).expect("file exists");
    // declare 2 x 4096 elements while the file still holds 2 x 2
    bytes[13..21].copy_from_slice(&4096u64.to_le_bytes());
    fs::write(&path, &bytes).expect("rewrite");

    let err = load_matrix::<f64, _>(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(err.is_corruption(), "unexpected error: {err}");
}

#[test]
fn test_short_file_rejected() {
    let path = scratch_path("short");
    fs::write(&path, b"DVEC").expect("write");

    let err = load_vector::<f64, _>(&path).unwrap_err();
    fs::remove_file(&path).ok();

    assert!(err.is_corruption());
}

#[test]
fn test_missing_file_is_io_error() {
    let path = scratch_path("does-not-exist");
    let err = load_vector::<f64, _>(&path).unwrap_err();
    assert!(!err.is_corruption());
}
