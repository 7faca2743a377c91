use crate::domain::resources::ResourceSet;
use axum::body::Bytes;
use futures::Stream;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const CHUNK_SIZE: usize = 64 * 1024;

/// Stream `file` as a response body and release `resources` once it is done.
///
/// The release runs when the last chunk has been handed to the transport,
/// after a read error, or when the transport drops the body early (client
/// gone). The handler returning has no effect on it.
pub fn stream_artifact(
    file: File,
    resources: ResourceSet,
) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
    futures::stream::unfold(Some((file, resources)), |state| async move {
        let (mut file, mut resources) = state?;
        let mut buf = vec![0u8; CHUNK_SIZE];

        match file.read(&mut buf).await {
            Ok(0) => {
                drop(file);
                resources.release().await;
                tracing::debug!("Response delivered, temporary artifacts released");
                None
            }
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(Bytes::from(buf)), Some((file, resources))))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read synthesized audio");
                drop(file);
                resources.release().await;
                Some((Err(e), None))
            }
        }
    })
}
