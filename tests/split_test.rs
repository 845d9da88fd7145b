use cim_golden::conv::{
    conv2d_channels, conv2d_direct, conv2d_split, dot_pixel, dot_pixel_channels, dot_pixel_split,
};
use cim_golden::generate::TensorSource;
use cim_golden::tensor::{KernelMatrix, PixelVector};
use proptest::prelude::*;

/// 576 channels split 64 + 512 reproduce the one-shot reduction.
#[test]
fn test_576_split_64_512() {
    let mut src = TensorSource::from_seed(42);
    let pixel = src.pixel_vector(576);
    let kernels = src.kernel_matrix(8, 576);

    let split = dot_pixel_split(&pixel, &kernels, 64).unwrap();
    assert_eq!(split.total, dot_pixel(&pixel, &kernels).unwrap());

    // Independent check over the full 576 channels.
    for i in 0..8 {
        let check_full: i32 = (0..576)
            .map(|j| pixel.get(j) as i32 * kernels.get(i, j) as i32)
            .sum();
        assert_eq!(split.total.values()[i], check_full);
        assert_eq!(split.low.values()[i] + split.high.values()[i], check_full);
    }
}

/// Zero-masked channels outside the active range contribute nothing: the
/// 576-wide reduction equals the reduction over the 64 active channels alone.
#[test]
fn test_masked_channels_do_not_contribute() {
    let mut src = TensorSource::from_seed(42);
    let pixel = src.sparse_pixel_vector(576, 64..128);
    let kernels = src.sparse_kernel_matrix(8, 576, 64..128);

    let full = dot_pixel(&pixel, &kernels).unwrap();
    let active = dot_pixel_channels(&pixel, &kernels, 64..128).unwrap();
    assert_eq!(full, active);

    let narrow = dot_pixel(&pixel.slice(64..128), &kernels.slice_channels(64..128)).unwrap();
    assert_eq!(full, narrow);

    let split = dot_pixel_split(&pixel, &kernels, 64).unwrap();
    assert!(split.low.values().iter().all(|&v| v == 0));
    assert_eq!(split.high, full);
}

/// Every split point of a 3D problem reconciles.
#[test]
fn test_every_split_point_3d() {
    let mut src = TensorSource::from_seed(9);
    let pixel = src.pixel_tensor(5, 5, 12);
    let kernel = src.kernel_tensor(3, 3, 12, 4);
    let total = conv2d_direct(&pixel, &kernel, 1, 1).unwrap();
    for k in 0..=12 {
        let split = conv2d_split(&pixel, &kernel, 1, 1, k).unwrap();
        assert_eq!(split.total, total);
        let low = conv2d_channels(&pixel, &kernel, 1, 1, 0..k).unwrap();
        assert_eq!(split.low, low);
    }
}

fn pixel_problem() -> impl Strategy<Value = (PixelVector, KernelMatrix, usize)> {
    (1usize..=96, 1usize..=8).prop_flat_map(|(c, kn)| {
        (
            prop::collection::vec(any::<i8>(), c),
            prop::collection::vec(any::<i8>(), kn * c),
            0..=c,
        )
            .prop_map(move |(pixel, weights, split)| {
                (
                    PixelVector::from_vec(pixel),
                    KernelMatrix::from_vec(kn, c, weights).unwrap(),
                    split,
                )
            })
    })
}

proptest! {
    /// total == low + high for every valid split point.
    #[test]
    fn split_reconciles((pixel, kernels, split) in pixel_problem()) {
        let result = dot_pixel_split(&pixel, &kernels, split).unwrap();
        let low = dot_pixel(&pixel.slice(0..split), &kernels.slice_channels(0..split)).unwrap();
        let high = dot_pixel(
            &pixel.slice(split..pixel.channels()),
            &kernels.slice_channels(split..pixel.channels()),
        )
        .unwrap();
        prop_assert_eq!(&result.low, &low);
        prop_assert_eq!(&result.high, &high);
        for i in 0..kernels.kernels() {
            prop_assert_eq!(result.total.values()[i], low.values()[i] + high.values()[i]);
        }
    }
}
