//! Integration tests for the public API.
//!
//! These tests exercise typical pipelines end to end through the prelude:
//! quantized frames widened to floats, accumulated, and finalized.

#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

mod common;

use common::{close, random_samples, two_pass};
use dense_kernels::prelude::*;

// ==================== Basic Usage Tests ====================

#[test]
fn test_prelude_import_basic() {
    let mut dst = vec![0.0_f64; 4];
    set_scalar(&mut dst, 4, 2.0);
    add_scalar(&mut dst, 4, 1.0);
    square(&mut dst, 4);
    assert_eq!(dst, vec![9.0; 4]);

    let dispatch = Dispatch::default();
    assert_eq!(dispatch.get_strategy(), ExecutionStrategy::default());
}

#[test]
fn test_crate_root_reexports() {
    let tier: dense_kernels::RoundingTier = "advanced".parse().unwrap();
    assert_eq!(tier, dense_kernels::RoundingTier::Advanced);
    assert!(dense_kernels::approx_eq(1.0, 1.0 + 1e-12, dense_kernels::EPSILON));
}

// ==================== Pipeline Tests ====================

#[test]
fn test_image_frames_to_statistics() {
    // Eight 4x4 "frames" of u8 pixels, accumulated per pixel.
    let frames: Vec<Vec<u8>> = (0..8_u8)
        .map(|k| (0..16_u8).map(|p| p.wrapping_mul(13).wrapping_add(k * 7)).collect())
        .collect();

    let dim = 16;
    let (mut mean, mut var, mut cm3, mut cm4) =
        (vec![0.0; dim], vec![0.0; dim], vec![0.0; dim], vec![0.0; dim]);
    let mut acc = MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4).unwrap();

    let mut widened = vec![0.0_f64; dim];
    let mut history = Vec::new();
    for frame in &frames {
        cast_u8_to_f64(dim, frame, &mut widened);
        acc.fold(&widened).unwrap();
        history.push(widened.clone());
    }
    let moments = acc.finalize().unwrap();
    assert_eq!(moments.count(), 8);

    for pixel in 0..dim {
        let r = two_pass(&history, pixel);
        assert!(close(moments.mean()[pixel], r.mean, 1e-12));
        assert!(close(moments.variance()[pixel], r.variance, 1e-12));
        assert!(close(moments.cm3()[pixel], r.cm3, 1e-9));
        assert!(close(moments.cm4()[pixel], r.cm4, 1e-9));
    }
}

#[test]
fn test_normalize_then_quantize_roundtrip() {
    // Scale [0, 1) data to the u8 range, quantize, widen back.
    let samples = random_samples(5, 1, 256, 0.0, 1.0);
    let mut data: Vec<f32> = samples[0].iter().map(|&v| v as f32).collect();
    scale(&mut data, 256, 255.0_f32);

    let mut bytes = vec![0_u8; 256];
    RoundingTier::Advanced.round_clamp_f32_to_u8(256, &data, &mut bytes);

    let mut back = vec![0.0_f32; 256];
    cast_u8_to_f32(256, &bytes, &mut back);
    for (orig, restored) in data.iter().zip(&back) {
        assert!((orig - restored).abs() <= 0.5);
    }
}

#[test]
fn test_standardize_with_finalized_moments() {
    let samples = random_samples(9, 50, 3, -5.0, 5.0);
    let (mut mean, mut var, mut cm3, mut cm4) = ([0.0; 3], [0.0; 3], [0.0; 3], [0.0; 3]);
    let mut acc = MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4).unwrap();
    for x in &samples {
        acc.fold(x).unwrap();
    }
    let moments = acc.finalize().unwrap();

    // z = (x - mean) / stddev, built from the elementwise kernels
    let mut stddev = moments.variance().to_vec();
    sqrt(&mut stddev, 3);
    let mut z = samples[0].clone();
    let neg_mean: Vec<f64> = moments.mean().iter().map(|m| -m).collect();
    vector_add(&mut z, 3, &neg_mean, 1.0);
    elem_div(&mut z, 3, &stddev);

    for slot in 0..3 {
        let expected = (samples[0][slot] - moments.mean()[slot]) / moments.variance()[slot].sqrt();
        assert!(close(z[slot], expected, 1e-12));
    }
}

#[test]
fn test_explicit_dispatch_pipeline() {
    let dim = 10_000;
    let dispatch = Dispatch::parallel().min_parallel_len(1024).chunk_len(1000);
    let samples = random_samples(1, 5, dim, -1.0, 1.0);

    let (mut mean, mut var, mut cm3, mut cm4) =
        (vec![0.0; dim], vec![0.0; dim], vec![0.0; dim], vec![0.0; dim]);
    let mut acc = MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4)
        .unwrap()
        .with_dispatch(dispatch);
    for x in &samples {
        acc.fold(x).unwrap();
    }
    let moments = acc.finalize().unwrap();

    let mut skew = vec![0.0; dim];
    let mut kurt = vec![0.0; dim];
    moments.skewness_into(&mut skew).unwrap();
    moments.kurtosis_into(&mut kurt).unwrap();
    assert!(skew.iter().all(|v| v.is_finite()));
    assert!(kurt.iter().all(|&v| v.is_finite() && v > 0.0));
}

// ==================== Error Handling Tests ====================

#[test]
fn test_handle_errors_gracefully() {
    let (mut mean, mut var, mut cm3) = ([0.0_f64; 2], [0.0; 2], [0.0; 2]);
    let mut cm4 = [0.0; 3];
    match MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4) {
        Err(Error::LengthMismatch {
            buffer,
            expected,
            actual,
        }) => {
            assert_eq!(buffer, "ucm4");
            assert_eq!(expected, 2);
            assert_eq!(actual, 3);
        }
        other => panic!("expected LengthMismatch, got {other:?}"),
    }

    let err = "fast".parse::<RoundingTier>().unwrap_err();
    assert!(err.to_string().contains("fast"));
}

#[test]
fn test_error_propagates_with_question_mark() {
    fn run(samples: &[[f64; 1]]) -> Result<f64> {
        let (mut mean, mut var, mut cm3, mut cm4) = ([0.0], [0.0], [0.0], [0.0]);
        let mut acc = MomentAccumulator::new(&mut mean, &mut var, &mut cm3, &mut cm4)?;
        for x in samples {
            acc.fold(x)?;
        }
        let moments = acc.finalize()?;
        Ok(moments.variance()[0])
    }

    assert!(matches!(
        run(&[[1.0], [2.0]]),
        Err(Error::InsufficientSamples { actual: 2, .. })
    ));
    let var = run(&[[1.0], [2.0], [3.0], [4.0]]).unwrap();
    assert!(close(var, 5.0 / 3.0, 1e-12));
}
