//! Status listener interface
//!
//! The UI collaborator registers a listener to receive every status change.

use conveyorjog_core::SessionStatus;
use uuid::Uuid;

/// Handle for a registered status listener.
///
/// Uniquely identifies a listener subscription. Can be used to unsubscribe
/// from status updates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatusListenerHandle(pub String);

impl StatusListenerHandle {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

/// Receives human-readable session status
pub trait StatusListener: Send + Sync {
    /// Called after every status change
    fn on_status_changed(&self, status: &SessionStatus);
}
