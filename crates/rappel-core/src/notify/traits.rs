//! Platform notification seam.

use super::{NotificationRequest, Permissions, ScheduledNotification};
use crate::error::NotifyError;

/// The OS notification service as seen by the scheduler.
///
/// Scheduling is fire-and-forget: the platform persists scheduled
/// notifications itself and re-fires them on its own clock. There is
/// no per-notification cancellation here because the core never tracks
/// individual ids; `cancel_all` is the only cancellation primitive.
#[allow(async_fn_in_trait)]
pub trait Notifier: Send + Sync {
    /// Current permission state. Checks only, never prompts.
    async fn permissions(&self) -> Permissions;

    /// Prompt the user for permission if it can still be asked.
    async fn request_permissions(&self) -> Result<Permissions, NotifyError>;

    /// Register one notification, returning its platform-assigned id.
    async fn schedule(&self, request: NotificationRequest) -> Result<String, NotifyError>;

    /// Drop every scheduled notification owned by the app.
    async fn cancel_all(&self) -> Result<(), NotifyError>;

    /// Everything currently scheduled, per the platform's own store.
    async fn scheduled(&self) -> Result<Vec<ScheduledNotification>, NotifyError>;
}
