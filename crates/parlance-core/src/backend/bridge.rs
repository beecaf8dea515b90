//! Blocking-iterator to async-stream bridge.
//!
//! Some backend clients are synchronous: they expose generation as a
//! blocking iterator over HTTP response lines. Driving such an iterator on
//! a reactor thread would stall every other connection, so the whole
//! iteration runs inside `tokio::task::spawn_blocking` and items cross back
//! into the async domain through a bounded `tokio::sync::mpsc` channel.
//!
//! The bounded channel gives backpressure (a fast backend cannot buffer an
//! unbounded reply in memory) and cancellation: when the receiving stream
//! is dropped -- caller disconnected -- `blocking_send` fails and the
//! worker stops pulling from the backend.

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Run a blocking iterator on the blocking thread pool and expose its items
/// as an async stream.
///
/// `make_iter` is called on the worker thread; a construction failure (e.g.
/// the HTTP request itself failed) becomes the stream's only item. The
/// stream ends when the iterator is exhausted or the worker observes a
/// closed channel.
pub fn blocking_stream<T, E, F, I>(capacity: usize, make_iter: F) -> ReceiverStream<Result<T, E>>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce() -> Result<I, E> + Send + 'static,
    I: Iterator<Item = Result<T, E>> + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);

    tokio::task::spawn_blocking(move || {
        let iter = match make_iter() {
            Ok(iter) => iter,
            Err(e) => {
                let _ = tx.blocking_send(Err(e));
                return;
            }
        };

        for item in iter {
            if tx.blocking_send(item).is_err() {
                // Receiver dropped: stop pulling from the backend.
                break;
            }
        }
    });

    ReceiverStream::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_yields_items_in_order_then_ends() {
        let stream = blocking_stream::<_, &str, _, _>(4, || {
            Ok(vec!["a", "b", "c"].into_iter().map(Ok))
        });

        let items: Vec<_> = stream.collect().await;
        let texts: Vec<_> = items.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_construction_failure_is_the_only_item() {
        let mut stream = blocking_stream::<String, _, _, _>(4, || {
            Err::<std::vec::IntoIter<Result<String, &str>>, _>("connect refused")
        });

        let first = stream.next().await.unwrap();
        assert_eq!(first.unwrap_err(), "connect refused");
        assert!(stream.next().await.is_none(), "stream must end after the error");
    }

    #[tokio::test]
    async fn test_mid_iteration_error_passes_through() {
        let mut stream = blocking_stream::<_, &str, _, _>(4, || {
            Ok(vec![Ok("a"), Err("torn")].into_iter())
        });

        assert_eq!(stream.next().await.unwrap().unwrap(), "a");
        assert_eq!(stream.next().await.unwrap().unwrap_err(), "torn");
        assert!(stream.next().await.is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_dropping_receiver_stops_the_worker() {
        let pulls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&pulls);
        let capacity = 2;

        let mut stream = blocking_stream::<usize, &str, _, _>(capacity, move || {
            Ok(std::iter::repeat_with(move || {
                Ok(counter.fetch_add(1, Ordering::SeqCst))
            }))
        });

        assert!(stream.next().await.is_some());
        drop(stream);

        // Give the worker time to observe the closed channel.
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        // One item consumed, at most `capacity` buffered, plus the send
        // that failed. An unbounded pull loop would blow far past this.
        let total = pulls.load(Ordering::SeqCst);
        assert!(
            total <= capacity + 2,
            "worker kept pulling after receiver drop: {total} pulls"
        );
    }
}
