//! Per-query context.

use crate::callback::UserPtr;
use crate::config::FilterConfig;

/// State of one query, passed alongside the packets to every filter call.
#[derive(Debug, Clone, Copy)]
pub struct IntersectContext {
    /// Forwarded to callbacks as `context_user_ptr`.
    pub user: UserPtr,
    /// Check that callbacks leave lanes outside their mask alone.
    pub verify_lane_isolation: bool,
}

impl IntersectContext {
    /// A context carrying `user` with diagnostics off.
    pub fn new(user: UserPtr) -> Self {
        Self {
            user,
            verify_lane_isolation: false,
        }
    }

    /// A context carrying `user` with diagnostics taken from `config`.
    pub fn with_config(user: UserPtr, config: &FilterConfig) -> Self {
        Self {
            user,
            verify_lane_isolation: config.verify_lane_isolation,
        }
    }
}

/// No user pointer, diagnostics as in [`FilterConfig::default`].
impl Default for IntersectContext {
    fn default() -> Self {
        Self::with_config(UserPtr::null(), &FilterConfig::default())
    }
}
