//! Fan-out coordinators: one per domain, each owning the mapping from a
//! committed domain event to the topic keys and payloads to broadcast.
//!
//! Coordinators never query anything — member lists, counterpart ids and
//! record fields all arrive inside the event, resolved by the CRUD layer at
//! commit time. The only live input is `subscriber_count` on the
//! coordinator's own registries.

pub mod attendance;
pub mod board;
pub mod door;
pub mod group_chat;
pub mod meeting;
pub mod presence;
pub mod private_chat;
pub mod schedule;
pub mod seat;

use std::sync::Arc;

use crate::realtime::TopicRegistry;

/// Every coordinator plus the registries they share. Built once at startup
/// and stored in `AppState`.
pub struct FanoutHub {
    pub private_chat: private_chat::PrivateChatCoordinator,
    pub group_chat: group_chat::GroupChatCoordinator,
    /// Per-user unread-total feed, fed by both chat domains.
    pub totals: Arc<TopicRegistry<String>>,
    pub presence: presence::PresenceCoordinator,
    pub attendance: attendance::AttendanceCoordinator,
    pub schedule: schedule::ScheduleCoordinator,
    pub board: board::BoardCoordinator,
    pub door: door::DoorCoordinator,
    pub seats: seat::SeatCoordinator,
    pub meetings: meeting::MeetingCoordinator,
}

impl FanoutHub {
    pub fn new() -> Self {
        let totals = Arc::new(TopicRegistry::new("unread_totals"));
        Self {
            private_chat: private_chat::PrivateChatCoordinator::new(totals.clone()),
            group_chat: group_chat::GroupChatCoordinator::new(totals.clone()),
            totals,
            presence: presence::PresenceCoordinator::new(),
            attendance: attendance::AttendanceCoordinator::new(),
            schedule: schedule::ScheduleCoordinator::new(),
            board: board::BoardCoordinator::new(),
            door: door::DoorCoordinator::new(),
            seats: seat::SeatCoordinator::new(),
            meetings: meeting::MeetingCoordinator::new(),
        }
    }
}

impl Default for FanoutHub {
    fn default() -> Self {
        Self::new()
    }
}
