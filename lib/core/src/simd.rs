// SIMD kernels for rating vectors
// Ratings are f64 so every kernel here works on 64-bit lanes.
// Each kernel accumulates in a fixed order: the same input always yields the same bits.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

// Below these sizes the scalar path wins
#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 16;

#[cfg(target_arch = "aarch64")]
const MIN_DIM_SIZE_NEON: usize = 8;

/// Dot product of two rating vectors.
///
/// Returns 0.0 when the lengths differ; callers validate dimensions beforehand.
#[inline]
pub fn dot_product_simd(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
            && a.len() >= MIN_DIM_SIZE_AVX
        {
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") && a.len() >= MIN_DIM_SIZE_NEON {
            return unsafe { dot_product_neon(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

/// AVX2 dot product, 8 doubles per iteration across two registers
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn dot_product_avx2(a: &[f64], b: &[f64]) -> f64 {
    let dim = a.len();
    let mut i = 0;

    let mut sum1 = _mm256_setzero_pd();
    let mut sum2 = _mm256_setzero_pd();

    while i + 7 < dim {
        let va1 = _mm256_loadu_pd(a.as_ptr().add(i));
        let vb1 = _mm256_loadu_pd(b.as_ptr().add(i));
        let va2 = _mm256_loadu_pd(a.as_ptr().add(i + 4));
        let vb2 = _mm256_loadu_pd(b.as_ptr().add(i + 4));

        sum1 = _mm256_fmadd_pd(va1, vb1, sum1);
        sum2 = _mm256_fmadd_pd(va2, vb2, sum2);

        i += 8;
    }

    let combined = _mm256_add_pd(sum1, sum2);

    // 4 lanes -> 2 -> 1
    let high = _mm256_extractf128_pd(combined, 1);
    let low = _mm256_castpd256_pd128(combined);
    let pair = _mm_add_pd(high, low);
    let single = _mm_add_sd(pair, _mm_unpackhi_pd(pair, pair));

    let mut dot = _mm_cvtsd_f64(single);

    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }

    dot
}

/// NEON dot product for ARM, 4 doubles per iteration across two registers
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn dot_product_neon(a: &[f64], b: &[f64]) -> f64 {
    let dim = a.len();
    let mut i = 0;

    let mut sum1 = vdupq_n_f64(0.0);
    let mut sum2 = vdupq_n_f64(0.0);

    while i + 3 < dim {
        let va1 = vld1q_f64(a.as_ptr().add(i));
        let vb1 = vld1q_f64(b.as_ptr().add(i));
        let va2 = vld1q_f64(a.as_ptr().add(i + 2));
        let vb2 = vld1q_f64(b.as_ptr().add(i + 2));

        sum1 = vfmaq_f64(sum1, va1, vb1);
        sum2 = vfmaq_f64(sum2, va2, vb2);

        i += 4;
    }

    let mut dot = vaddvq_f64(vaddq_f64(sum1, sum2));

    while i < dim {
        dot += a[i] * b[i];
        i += 1;
    }

    dot
}

/// Scalar fallback with two accumulators
#[inline]
fn dot_product_scalar(a: &[f64], b: &[f64]) -> f64 {
    let mut dot0 = 0.0f64;
    let mut dot1 = 0.0f64;

    let chunks = a.chunks_exact(4);
    let remainder = chunks.remainder();
    let b_chunks = b.chunks_exact(4);

    for (a_chunk, b_chunk) in chunks.zip(b_chunks) {
        dot0 += a_chunk[0] * b_chunk[0] + a_chunk[1] * b_chunk[1];
        dot1 += a_chunk[2] * b_chunk[2] + a_chunk[3] * b_chunk[3];
    }

    for i in (a.len() - remainder.len())..a.len() {
        dot0 += a[i] * b[i];
    }

    dot0 + dot1
}

/// Squared Euclidean norm
#[inline]
pub fn norm_squared_simd(v: &[f64]) -> f64 {
    dot_product_simd(v, v)
}

/// Euclidean norm
#[inline]
pub fn norm_simd(v: &[f64]) -> f64 {
    norm_squared_simd(v).sqrt()
}
