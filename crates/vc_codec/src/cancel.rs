use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::CodecError;

// -----------------------------------------------------------------------------
// CancelSignal

/// Cooperative cancellation for [`Serializer::deserialize`](crate::Serializer::deserialize).
///
/// Clones share one flag. The decoder checks it at the start of the call,
/// before each container element and before each field of a field bag. Once
/// observed, the decode stops with [`CodecError::Cancelled`] and no value.
///
/// # Examples
///
/// ```
/// use vc_codec::CancelSignal;
///
/// let signal = CancelSignal::new();
/// let observer = signal.clone();
///
/// assert!(!observer.is_cancelled());
/// signal.cancel();
/// assert!(observer.is_cancelled());
///
/// // `never` can not be cancelled and does not allocate.
/// let never = CancelSignal::never();
/// never.cancel();
/// assert!(!never.is_cancelled());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CancelSignal(Option<Arc<AtomicBool>>);

impl CancelSignal {
    /// Creates a signal that has not been cancelled.
    #[inline]
    pub fn new() -> Self {
        Self(Some(Arc::new(AtomicBool::new(false))))
    }

    /// Creates a signal that is never cancelled.
    #[inline]
    pub const fn never() -> Self {
        Self(None)
    }

    /// Requests cancellation. Has no effect on [`CancelSignal::never`].
    #[inline]
    pub fn cancel(&self) {
        if let Some(flag) = &self.0 {
            flag.store(true, Ordering::Release);
        }
    }

    /// Returns `true` once [`cancel`](Self::cancel) was called on any clone.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        match &self.0 {
            Some(flag) => flag.load(Ordering::Acquire),
            None => false,
        }
    }

    /// Returns [`CodecError::Cancelled`] if cancellation was requested.
    #[inline]
    pub fn check(&self) -> Result<(), CodecError> {
        if self.is_cancelled() {
            log::debug!("decode observed cancellation");
            Err(CodecError::Cancelled)
        } else {
            Ok(())
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::CancelSignal;

    #[test]
    fn is_sync_send() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}

        is_send::<CancelSignal>();
        is_sync::<CancelSignal>();
    }

    #[test]
    fn check_reports_cancelled() {
        let signal = CancelSignal::new();
        assert!(signal.check().is_ok());
        signal.cancel();
        assert!(signal.check().unwrap_err().is_cancelled());
    }

    #[test]
    fn cancel_is_visible_across_threads() {
        let signal = CancelSignal::new();
        let remote = signal.clone();
        std::thread::spawn(move || remote.cancel()).join().unwrap();
        assert!(signal.is_cancelled());
    }
}
