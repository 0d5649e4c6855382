/// Downsamples a normalized spectrum to exactly `bar_count` bars
///
/// Partitions the spectrum into consecutive, non-overlapping chunks of
/// `ceil(len / bar_count)` bins and keeps the maximum value of each chunk.
/// Max-hold preserves transient peaks that averaging would smear into the
/// noise floor.
///
/// # Parameters
/// * `spectrum` - Normalized amplitudes in [0.0, 1.0], one per FFT bin
/// * `bar_count` - Number of bars to produce
///
/// # Returns
/// Vector of exactly `bar_count` values. When the input has fewer chunks
/// than bars (short input, or ceiling rounding exhausting the bins early)
/// the trailing bars are padded with 0.0; surplus chunks are dropped.
///
/// Deterministic, pure, O(len), allocates nothing beyond the output buffer.
pub fn reduce(spectrum: &[f32], bar_count: usize) -> Vec<f32> {
    let mut bars = vec![0.0_f32; bar_count];
    if spectrum.is_empty() || bar_count == 0 {
        return bars;
    }

    let size = chunk_size(spectrum.len(), bar_count);
    // zip stops at bar_count chunks, so surplus chunks fall off the end
    for (bar, bins) in bars.iter_mut().zip(spectrum.chunks(size)) {
        *bar = bins.iter().copied().fold(0.0, f32::max);
    }
    bars
}

/// Number of bins aggregated into one bar: `ceil(len / bar_count)`, min 1
fn chunk_size(len: usize, bar_count: usize) -> usize {
    ((len + bar_count - 1) / bar_count).max(1)
}
