use anyhow::Context;

/// Run an async operation from the synchronous render loop.
///
/// Reuses the ambient tokio runtime when there is one, otherwise spins up a small runtime
/// for this call. The caller blocks until the future resolves.
pub fn block_on<F, T, E>(fut: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
    E: From<anyhow::Error>,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => handle.block_on(fut),
        Err(_) => {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to create tokio runtime")?;
            rt.block_on(fut)
        }
    }
}
