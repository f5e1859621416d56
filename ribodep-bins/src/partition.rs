use crate::errors::BinError;

///
/// Split `items` into exactly `worker_count` contiguous chunks.
///
/// The nominal chunk size is `total / worker_count` rounded half to even. Chunk
/// bounds are clamped to the input and the last chunk takes whatever remains,
/// so some chunks may be empty and the last one may be larger than the rest.
/// Concatenating the chunks reproduces the input.
///
pub fn partition_for_workers<T>(
    items: Vec<T>,
    worker_count: usize,
) -> Result<Vec<Vec<T>>, BinError> {
    if worker_count == 0 {
        return Err(BinError::InvalidConfig(
            "worker count must be positive".to_string(),
        ));
    }

    let total = items.len();
    let chunk = (total as f64 / worker_count as f64).round_ties_even() as usize;

    let mut sizes = Vec::with_capacity(worker_count);
    let mut pos = 0usize;
    for i in 0..worker_count {
        let start = pos.min(total);
        let end = if i == worker_count - 1 {
            total
        } else {
            pos.saturating_add(chunk).min(total)
        };
        sizes.push(end - start);
        pos = pos.saturating_add(chunk);
    }

    let mut iter = items.into_iter();
    let chunks = sizes
        .into_iter()
        .map(|size| iter.by_ref().take(size).collect())
        .collect();

    Ok(chunks)
}
