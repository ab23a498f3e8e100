use std::sync::atomic::{AtomicBool, Ordering};

use crate::error_handling::types::FlowError;

/// Token proving its holder is the only flow touching the image store.
///
/// Released on drop, including when the flow bails out early.
pub struct FlowGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> FlowGuard<'a> {
    pub fn try_acquire(flag: &'a AtomicBool) -> Result<Self, FlowError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| FlowError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
