//! In-process notifier.
//!
//! Records scheduling calls instead of talking to an OS service.
//! Backs the scheduler tests and the CLI's schedule preview.

use std::sync::{Arc, Mutex};

use super::traits::Notifier;
use super::{NotificationRequest, Permissions, ScheduledNotification};
use crate::error::NotifyError;

struct Inner {
    permissions: Permissions,
    scheduled: Vec<ScheduledNotification>,
}

/// Cloneable recording notifier with a settable permission state.
#[derive(Clone)]
pub struct MemoryNotifier {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryNotifier {
    /// Notifier with permission already granted.
    pub fn new() -> Self {
        Self::with_permissions(Permissions::granted())
    }

    /// Notifier with an explicit permission state.
    pub fn with_permissions(permissions: Permissions) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                permissions,
                scheduled: Vec::new(),
            })),
        }
    }

    /// Replace the permission state.
    pub fn set_permissions(&self, permissions: Permissions) {
        self.lock().permissions = permissions;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for MemoryNotifier {
    async fn permissions(&self) -> Permissions {
        self.lock().permissions.clone()
    }

    async fn request_permissions(&self) -> Result<Permissions, NotifyError> {
        let mut inner = self.lock();
        if !inner.permissions.granted && inner.permissions.can_ask_again {
            inner.permissions = Permissions::granted();
        }
        Ok(inner.permissions.clone())
    }

    async fn schedule(&self, request: NotificationRequest) -> Result<String, NotifyError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.lock().scheduled.push(ScheduledNotification {
            id: id.clone(),
            content: request.content,
            trigger: request.trigger,
        });
        Ok(id)
    }

    async fn cancel_all(&self) -> Result<(), NotifyError> {
        self.lock().scheduled.clear();
        Ok(())
    }

    async fn scheduled(&self) -> Result<Vec<ScheduledNotification>, NotifyError> {
        Ok(self.lock().scheduled.clone())
    }
}
