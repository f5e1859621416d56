use std::sync::mpsc;

use log::debug;
use rayon::ThreadPoolBuilder;

use crate::errors::DispatchError;

///
/// Run `f` over every chunk on a fixed-size worker pool and return the results
/// in submission order.
///
/// Each worker sends `(chunk index, result)` back over a channel; the results are
/// reassembled by index once every worker has finished. If any worker fails, the
/// error of the lowest failing chunk is returned and all results are dropped.
///
/// # Arguments
///
/// - chunks: work items, one per task
/// - worker_count: number of pool threads
/// - f: worker body, called with the chunk index and the chunk
///
pub fn dispatch_ordered<T, R, E, F>(
    chunks: Vec<T>,
    worker_count: usize,
    f: F,
) -> Result<Vec<R>, DispatchError<E>>
where
    T: Send,
    R: Send,
    E: Send,
    F: Fn(usize, T) -> Result<R, E> + Sync,
{
    if worker_count == 0 {
        return Err(DispatchError::InvalidConfig(
            "worker count must be positive".to_string(),
        ));
    }

    let pool = ThreadPoolBuilder::new().num_threads(worker_count).build()?;

    let n_chunks = chunks.len();
    let (tx, rx) = mpsc::channel::<(usize, Result<R, E>)>();

    pool.scope(|s| {
        for (idx, chunk) in chunks.into_iter().enumerate() {
            let tx = tx.clone();
            let f = &f;
            s.spawn(move |_| {
                let _ = tx.send((idx, f(idx, chunk)));
            });
        }
    });
    drop(tx);

    let mut slots: Vec<Option<Result<R, E>>> = (0..n_chunks).map(|_| None).collect();
    for (idx, result) in rx {
        slots[idx] = Some(result);
    }

    let mut results = Vec::with_capacity(n_chunks);
    for (chunk, slot) in slots.into_iter().enumerate() {
        match slot {
            Some(Ok(r)) => results.push(r),
            Some(Err(source)) => return Err(DispatchError::Worker { chunk, source }),
            None => {
                return Err(DispatchError::MissingResult(chunk));
            }
        }
    }

    debug!("Collected {} chunk results from {} workers", n_chunks, worker_count);

    Ok(results)
}
