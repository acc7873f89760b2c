// ── Reactive current-user stream ──
//
// Subscription type for consuming current-user changes from a
// `UserService`.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use login_api::User;

/// A subscription to the current logged-in user.
///
/// Provides both point-in-time access and reactive change notification
/// via [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct UserStream {
    current: Option<Arc<User>>,
    receiver: watch::Receiver<Option<Arc<User>>>,
}

impl UserStream {
    pub(crate) fn new(mut receiver: watch::Receiver<Option<Arc<User>>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The user captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> Option<&Arc<User>> {
        self.current.as_ref()
    }

    /// The latest user (may have changed since creation).
    pub fn latest(&self) -> Option<Arc<User>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new value.
    ///
    /// The outer `None` means the service has been dropped; the inner
    /// `None` means the user logged out.
    pub async fn changed(&mut self) -> Option<Option<Arc<User>>> {
        self.receiver.changed().await.ok()?;
        let user = self.receiver.borrow_and_update().clone();
        self.current.clone_from(&user);
        Some(user)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    ///
    /// The stream yields the value at conversion time first, then every
    /// subsequent change.
    pub fn into_stream(self) -> UserWatchStream {
        UserWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
pub struct UserWatchStream {
    inner: WatchStream<Option<Arc<User>>>,
}

impl Stream for UserWatchStream {
    type Item = Option<Arc<User>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
