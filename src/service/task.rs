use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Ties pending operations to the lifetime of the command running them.
#[derive(Clone, Debug, Default)]
pub struct Task {
    token: CancellationToken,
}

impl Task {
    pub fn new(token: CancellationToken) -> Self {
        Self { token }
    }

    /// A task cancelled with its parent, that can be cancelled on its own.
    pub fn child(&self) -> Self {
        Self::new(self.token.child_token())
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs the future until it completes or the task is cancelled, in which
    /// case the future is dropped before producing anything.
    pub async fn run<F, T, E>(&self, future: F) -> Result<T, crate::Error>
    where
        F: Future<Output = Result<T, E>>,
        crate::Error: From<E>,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => {
                tracing::debug!("operation cancelled");
                Err(crate::Error::Cancelled)
            }
            res = future => res.map_err(crate::Error::from),
        }
    }

    /// Cancels the task once the process receives Ctrl+C or SIGTERM.
    pub fn cancel_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_signal() => token.cancel(),
                _ = token.cancelled() => {},
            }
        })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {err:?}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install signal handler: {err:?}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, cancelling pending operations");
}
