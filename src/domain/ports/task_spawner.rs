use futures::future::BoxFuture;

/// Runs fire-and-forget work (notifications, cleanup) off the request path.
/// Abstracted so tests can observe spawned work.
pub trait TaskSpawner: Send + Sync {
    fn spawn(&self, future: BoxFuture<'static, ()>);
}
