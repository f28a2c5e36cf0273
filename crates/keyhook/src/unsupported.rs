//! Fallback for platforms without a system-wide keyboard hook binding.

use crossbeam_channel::Sender;
use tracing::debug;

use crate::{Error, Interceptor, Result};

pub(crate) struct SysControl;

impl SysControl {
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) fn stop(&self) {}
}

pub(crate) fn run_hook_loop(
    interceptor: Interceptor,
    ready: &Sender<Result<()>>,
    _ctrl: &SysControl,
) -> Result<()> {
    debug!(?interceptor, "keyhook_unsupported_platform");
    let _ignored = ready.send(Err(Error::Unsupported));
    Ok(())
}
