//! Reminder scheduler.
//!
//! Translates [`NotificationSettings`] into a concrete set of
//! platform-scheduled notifications with resolved display content.
//! Scheduling is full-replace: every call first cancels everything,
//! then registers the new set; there is no incremental diffing.

use tracing::debug;

use super::messages;
use super::traits::Notifier;
use super::{NotificationContent, NotificationKind, NotificationRequest, Trigger};
use crate::content::{ContentProvider, Feed};
use crate::error::NotifyError;
use crate::storage::{ContentStore, NotificationSettings};

const PRAYER_TITLE: &str = "\u{1F64F} Temps de prière";
const DECEASED_TITLE: &str = "\u{1F54A}\u{FE0F} Prière pour les défunts";
const DECEASED_BODY: &str = "Prenez un moment pour prier pour les âmes des défunts.";
const MORNING_TITLE: &str = "\u{1F305} Bonjour !";
const MORNING_BODY: &str =
    "Commencez votre journée avec une prière pour maintenir votre streak !";
const EVENING_TITLE: &str = "\u{1F319} Bonsoir !";
const EVENING_BODY: &str =
    "N'oubliez pas de terminer votre journée en beauté. Maintenez votre streak !";
const TEST_TITLE: &str = "\u{1F514} Notification de test";
const TEST_BODY: &str = "Votre système de notifications fonctionne parfaitement !";
const TEST_DECEASED_BODY: &str =
    "Ceci est une notification de test pour la prière du défunt.";

/// Hour of the fixed morning streak nudge.
const MORNING_NUDGE_HOUR: u8 = 8;
/// Hour of the fixed evening streak nudge.
const EVENING_NUDGE_HOUR: u8 = 21;

/// Schedules reminder notifications against a [`Notifier`].
///
/// Content is resolved once per (day, slot) pair at schedule time and
/// frozen into the notification body; it is not re-rolled at delivery.
pub struct ReminderScheduler<N, S> {
    notifier: N,
    content: ContentProvider<S>,
}

impl<N: Notifier, S: ContentStore> ReminderScheduler<N, S> {
    pub fn new(notifier: N, content: ContentProvider<S>) -> Self {
        Self { notifier, content }
    }

    /// Replace the app's scheduled notifications per `settings`.
    ///
    /// Cancels everything first, in every case. When reminders are
    /// disabled that cancellation is the whole operation. Fails with
    /// [`NotifyError::PermissionDenied`] when the platform has not
    /// granted permission; permission is checked, never requested.
    pub async fn schedule_reminders(
        &self,
        settings: &NotificationSettings,
    ) -> Result<(), NotifyError> {
        self.notifier.cancel_all().await?;
        if !settings.enable_reminders {
            debug!("reminders disabled, schedule cleared");
            return Ok(());
        }
        self.ensure_permission().await?;

        let mut scheduled = self.schedule_prayer_reminders(settings).await?;
        if settings.enable_deceased_reminder {
            scheduled += self.schedule_deceased_reminders(settings).await?;
        }
        scheduled += self.schedule_streak_nudges(settings).await?;

        debug!(count = scheduled, "reminder schedule registered");
        Ok(())
    }

    /// Drop every scheduled notification. Global, all-or-nothing.
    pub async fn cancel_all_reminders(&self) -> Result<(), NotifyError> {
        self.notifier.cancel_all().await
    }

    /// Everything currently scheduled, per the platform store.
    pub async fn scheduled_reminders(
        &self,
    ) -> Result<Vec<super::ScheduledNotification>, NotifyError> {
        self.notifier.scheduled().await
    }

    /// Fire a one-shot test notification about a second from now.
    pub async fn send_test_notification(&self) -> Result<(), NotifyError> {
        self.ensure_permission().await?;
        self.notifier
            .schedule(NotificationRequest {
                content: NotificationContent {
                    title: TEST_TITLE.to_string(),
                    body: TEST_BODY.to_string(),
                    kind: NotificationKind::Test,
                    feed: None,
                    sound: true,
                },
                trigger: Trigger::AfterSeconds { seconds: 1 },
            })
            .await?;
        Ok(())
    }

    /// Fire a one-shot deceased-prayer test notification.
    pub async fn send_test_deceased_prayer_notification(&self) -> Result<(), NotifyError> {
        self.ensure_permission().await?;
        self.notifier
            .schedule(NotificationRequest {
                content: NotificationContent {
                    title: DECEASED_TITLE.to_string(),
                    body: TEST_DECEASED_BODY.to_string(),
                    kind: NotificationKind::DeceasedPrayer,
                    feed: None,
                    sound: true,
                },
                trigger: Trigger::AfterSeconds { seconds: 1 },
            })
            .await?;
        Ok(())
    }

    async fn ensure_permission(&self) -> Result<(), NotifyError> {
        if self.notifier.permissions().await.granted {
            Ok(())
        } else {
            Err(NotifyError::PermissionDenied)
        }
    }

    /// One weekly notification per (enabled day, slot) pair, slots
    /// evenly spaced over the configured window.
    async fn schedule_prayer_reminders(
        &self,
        settings: &NotificationSettings,
    ) -> Result<u32, NotifyError> {
        let (start_hour, start_minute) = parse_time_or(&settings.start_time, 9, 0);
        let (end_hour, end_minute) = parse_time_or(&settings.end_time, 22, 0);
        let slots = compute_slots(
            start_hour * 60 + start_minute,
            end_hour * 60 + end_minute,
            settings.daily_count,
        );

        let feed = Feed::from_label(&settings.selected_feed);
        let mut scheduled = 0;
        for &(hour, minute) in &slots {
            for (day, enabled) in settings.selected_days.iter().enumerate() {
                if !enabled {
                    continue;
                }
                // Resolved per (day, slot): each notification gets its
                // own draw, frozen now.
                let body = match self.content.resolve_body(feed).await {
                    Some(body) => body,
                    None => messages::fallback_body(feed),
                };
                self.notifier
                    .schedule(NotificationRequest {
                        content: NotificationContent {
                            title: PRAYER_TITLE.to_string(),
                            body,
                            kind: NotificationKind::PrayerReminder,
                            feed: Some(feed),
                            sound: settings.sound,
                        },
                        trigger: Trigger::Weekly {
                            weekday: trigger_weekday(day),
                            hour,
                            minute,
                        },
                    })
                    .await?;
                scheduled += 1;
            }
        }
        Ok(scheduled)
    }

    /// One extra weekly notification per enabled day at the window's
    /// start time. Outside the daily-count fan-out by contract.
    async fn schedule_deceased_reminders(
        &self,
        settings: &NotificationSettings,
    ) -> Result<u32, NotifyError> {
        let (hour, minute) = parse_time_or(&settings.start_time, 9, 0);
        let mut scheduled = 0;
        for (day, enabled) in settings.selected_days.iter().enumerate() {
            if !enabled {
                continue;
            }
            self.notifier
                .schedule(NotificationRequest {
                    content: NotificationContent {
                        title: DECEASED_TITLE.to_string(),
                        body: DECEASED_BODY.to_string(),
                        kind: NotificationKind::DeceasedPrayer,
                        feed: None,
                        sound: settings.sound,
                    },
                    trigger: Trigger::Weekly {
                        weekday: trigger_weekday(day),
                        hour: hour as u8,
                        minute: minute as u8,
                    },
                })
                .await?;
            scheduled += 1;
        }
        Ok(scheduled)
    }

    /// Fixed daily nudges at 08:00 and 21:00; they fire every day
    /// regardless of the selected days.
    async fn schedule_streak_nudges(
        &self,
        settings: &NotificationSettings,
    ) -> Result<u32, NotifyError> {
        let mut scheduled = 0;
        if settings.morning_reminder {
            self.notifier
                .schedule(NotificationRequest {
                    content: NotificationContent {
                        title: MORNING_TITLE.to_string(),
                        body: MORNING_BODY.to_string(),
                        kind: NotificationKind::MorningStreak,
                        feed: None,
                        sound: settings.sound,
                    },
                    trigger: Trigger::Daily {
                        hour: MORNING_NUDGE_HOUR,
                        minute: 0,
                    },
                })
                .await?;
            scheduled += 1;
        }
        if settings.evening_reminder {
            self.notifier
                .schedule(NotificationRequest {
                    content: NotificationContent {
                        title: EVENING_TITLE.to_string(),
                        body: EVENING_BODY.to_string(),
                        kind: NotificationKind::EveningStreak,
                        feed: None,
                        sound: settings.sound,
                    },
                    trigger: Trigger::Daily {
                        hour: EVENING_NUDGE_HOUR,
                        minute: 0,
                    },
                })
                .await?;
            scheduled += 1;
        }
        Ok(scheduled)
    }
}

/// Forgiving "HH:MM" parse: each component falls back to its default
/// when missing or malformed. Strict validation happens earlier, in
/// [`NotificationSettings::validate`].
pub fn parse_time_or(value: &str, default_hour: u32, default_minute: u32) -> (u32, u32) {
    let (hour, minute) = value.split_once(':').unwrap_or((value, ""));
    (
        hour.trim().parse().unwrap_or(default_hour),
        minute.trim().parse().unwrap_or(default_minute),
    )
}

/// Evenly spaced `(hour, minute)` slots over `[start, end]` minutes
/// since midnight.
///
/// Spacing is `floor((end - start) / max(1, count - 1))`, so slot 0 is
/// always the window start and `count == 1` pins the single slot
/// there. The window is assumed validated (`end >= start`).
pub fn compute_slots(start_minutes: u32, end_minutes: u32, count: u32) -> Vec<(u8, u8)> {
    let span = end_minutes.saturating_sub(start_minutes);
    let interval = span / count.saturating_sub(1).max(1);
    (0..count)
        .map(|i| {
            let minutes = start_minutes + i * interval;
            ((minutes / 60) as u8, (minutes % 60) as u8)
        })
        .collect()
}

/// Map a selected-days index (0 = Sunday .. 6 = Saturday) to the ISO
/// weekday code used by weekly triggers (Monday = 1 .. Sunday = 7).
pub fn trigger_weekday(day_index: usize) -> u8 {
    if day_index == 0 {
        7
    } else {
        day_index as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{MemoryNotifier, Permissions, ScheduledNotification};
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn scheduler(
        notifier: MemoryNotifier,
        store: MemoryStore,
    ) -> ReminderScheduler<MemoryNotifier, MemoryStore> {
        ReminderScheduler::new(notifier, ContentProvider::new(store))
    }

    fn prayer_reminders(all: &[ScheduledNotification]) -> Vec<&ScheduledNotification> {
        all.iter()
            .filter(|n| n.content.kind == NotificationKind::PrayerReminder)
            .collect()
    }

    #[test]
    fn test_parse_time_or_defaults() {
        assert_eq!(parse_time_or("09:30", 9, 0), (9, 30));
        assert_eq!(parse_time_or("garbage", 9, 0), (9, 0));
        assert_eq!(parse_time_or("12", 9, 0), (12, 0));
        assert_eq!(parse_time_or("", 22, 0), (22, 0));
    }

    #[test]
    fn test_slots_evenly_spaced() {
        // 09:00..21:00 with 3 slots: every 6 hours.
        assert_eq!(
            compute_slots(9 * 60, 21 * 60, 3),
            vec![(9, 0), (15, 0), (21, 0)]
        );
    }

    #[test]
    fn test_single_slot_pins_to_start() {
        assert_eq!(compute_slots(9 * 60, 22 * 60, 1), vec![(9, 0)]);
    }

    #[test]
    fn test_weekday_mapping() {
        assert_eq!(trigger_weekday(0), 7); // Sunday
        for d in 1..=6 {
            assert_eq!(trigger_weekday(d), d as u8);
        }
    }

    proptest! {
        #[test]
        fn prop_slot_count_and_bounds(
            start in 0u32..1200,
            span in 0u32..240,
            count in 1u32..=10,
        ) {
            let end = start + span;
            let slots = compute_slots(start, end, count);
            prop_assert_eq!(slots.len(), count as usize);

            let minutes: Vec<u32> = slots
                .iter()
                .map(|&(h, m)| h as u32 * 60 + m as u32)
                .collect();
            prop_assert_eq!(minutes[0], start);
            prop_assert!(minutes.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(*minutes.last().unwrap() <= end);
        }
    }

    #[tokio::test]
    async fn test_disabled_settings_clear_schedule() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        scheduler
            .schedule_reminders(&NotificationSettings::default())
            .await
            .unwrap();
        assert!(!notifier.scheduled().await.unwrap().is_empty());

        let disabled = NotificationSettings {
            enable_reminders: false,
            ..Default::default()
        };
        scheduler.schedule_reminders(&disabled).await.unwrap();
        assert!(notifier.scheduled().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_permission_denied_fails_and_schedules_nothing() {
        let notifier = MemoryNotifier::with_permissions(Permissions::denied());
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        let err = scheduler
            .schedule_reminders(&NotificationSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NotifyError::PermissionDenied));
        assert!(notifier.scheduled().await.unwrap().is_empty());

        let err = scheduler.send_test_notification().await.unwrap_err();
        assert!(matches!(err, NotifyError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_weekday_fan_out_three_slots_weekdays() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        let settings = NotificationSettings {
            daily_count: 3,
            start_time: "09:00".to_string(),
            end_time: "21:00".to_string(),
            selected_days: [false, true, true, true, true, true, false],
            morning_reminder: false,
            evening_reminder: false,
            ..Default::default()
        };
        scheduler.schedule_reminders(&settings).await.unwrap();

        let all = notifier.scheduled().await.unwrap();
        let prayers = prayer_reminders(&all);
        assert_eq!(prayers.len(), 15); // 3 slots x Monday..Friday
        assert_eq!(all.len(), 15);

        let mut seen: Vec<(u8, u8, u8)> = prayers
            .iter()
            .map(|n| match n.trigger {
                Trigger::Weekly {
                    weekday,
                    hour,
                    minute,
                } => (weekday, hour, minute),
                _ => panic!("prayer reminders are weekly"),
            })
            .collect();
        seen.sort_unstable();

        let mut expected = Vec::new();
        for weekday in 1..=5u8 {
            for hour in [9u8, 15, 21] {
                expected.push((weekday, hour, 0u8));
            }
        }
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_sunday_maps_to_weekday_seven() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        let settings = NotificationSettings {
            daily_count: 1,
            selected_days: [true, false, false, false, false, false, false],
            morning_reminder: false,
            evening_reminder: false,
            ..Default::default()
        };
        scheduler.schedule_reminders(&settings).await.unwrap();

        let all = notifier.scheduled().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(matches!(
            all[0].trigger,
            Trigger::Weekly {
                weekday: 7,
                hour: 9,
                minute: 0
            }
        ));
    }

    #[tokio::test]
    async fn test_deceased_stream_adds_one_per_day_at_start_time() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        let settings = NotificationSettings {
            daily_count: 3,
            start_time: "09:00".to_string(),
            end_time: "21:00".to_string(),
            selected_days: [false, true, true, true, true, true, false],
            enable_deceased_reminder: true,
            morning_reminder: false,
            evening_reminder: false,
            ..Default::default()
        };
        scheduler.schedule_reminders(&settings).await.unwrap();

        let all = notifier.scheduled().await.unwrap();
        let deceased: Vec<_> = all
            .iter()
            .filter(|n| n.content.kind == NotificationKind::DeceasedPrayer)
            .collect();
        assert_eq!(deceased.len(), 5);
        for n in deceased {
            // Always the window start, never part of the fan-out.
            assert!(matches!(
                n.trigger,
                Trigger::Weekly {
                    hour: 9,
                    minute: 0,
                    ..
                }
            ));
        }
        assert_eq!(prayer_reminders(&all).len(), 15);
    }

    #[tokio::test]
    async fn test_streak_nudges_are_daily_and_fixed() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        let settings = NotificationSettings {
            daily_count: 1,
            selected_days: [false; 7],
            ..Default::default()
        };
        scheduler.schedule_reminders(&settings).await.unwrap();

        let all = notifier.scheduled().await.unwrap();
        let triggers: Vec<_> = all.iter().map(|n| n.trigger).collect();
        assert_eq!(all.len(), 2);
        assert!(triggers.contains(&Trigger::Daily { hour: 8, minute: 0 }));
        assert!(triggers.contains(&Trigger::Daily {
            hour: 21,
            minute: 0
        }));
    }

    #[tokio::test]
    async fn test_empty_content_store_falls_back_to_message_bank() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        let settings = NotificationSettings {
            daily_count: 2,
            selected_days: [false, true, false, false, false, false, false],
            selected_feed: "Paix mentale".to_string(),
            morning_reminder: false,
            evening_reminder: false,
            ..Default::default()
        };
        scheduler.schedule_reminders(&settings).await.unwrap();

        let all = notifier.scheduled().await.unwrap();
        assert_eq!(all.len(), 2);
        for n in &all {
            assert!(!n.content.body.is_empty());
            assert!(messages::bank(Feed::Verse).contains(&n.content.body.as_str()));
            assert_eq!(n.content.feed, Some(Feed::Verse));
        }
    }

    #[tokio::test]
    async fn test_reschedule_replaces_previous_set() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        let settings = NotificationSettings::default();
        scheduler.schedule_reminders(&settings).await.unwrap();
        let first = notifier.scheduled().await.unwrap().len();

        scheduler.schedule_reminders(&settings).await.unwrap();
        let second = notifier.scheduled().await.unwrap().len();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_test_notifications_are_one_shot() {
        let notifier = MemoryNotifier::new();
        let scheduler = scheduler(notifier.clone(), MemoryStore::new());

        scheduler.send_test_notification().await.unwrap();
        scheduler
            .send_test_deceased_prayer_notification()
            .await
            .unwrap();

        let all = notifier.scheduled().await.unwrap();
        assert_eq!(all.len(), 2);
        for n in &all {
            assert_eq!(n.trigger, Trigger::AfterSeconds { seconds: 1 });
        }
    }
}
