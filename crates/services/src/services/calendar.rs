//! Availability calendar assembly.
//!
//! A musician's calendar is the merge of three overlapping sources: explicit
//! availability rows, approved leave requests, and (for the owner only)
//! pending leave requests. Approved leave always wins for its date; pending
//! leave may shadow a plain availability row but never an approved entry.
//! Rejected and cancelled requests are never shown on the calendar.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use db::models::{
    availability::MusicianAvailability,
    leave_request::{LeaveRequest, LeaveStatus},
};
use serde::Serialize;
use sqlx::SqlitePool;
use ts_rs::TS;
use uuid::Uuid;

/// One day on the merged calendar.
#[derive(Debug, Clone, Serialize, TS)]
pub struct CalendarEntry {
    pub is_available: bool,
    pub notes: Option<String>,
    /// Set when the entry comes from a pending leave request.
    pub is_pending: bool,
    /// Set when the entry comes from an approved leave request.
    pub is_approved: bool,
    pub leave_request_id: Option<Uuid>,
}

#[derive(Debug, Serialize, TS)]
pub struct AvailabilityCalendar {
    pub entries: BTreeMap<NaiveDate, CalendarEntry>,
    pub pending: Vec<LeaveRequest>,
    pub is_own: bool,
}

/// Build the merged calendar for a musician as seen by a given viewer.
pub async fn build_calendar(
    pool: &SqlitePool,
    musician_id: Uuid,
    is_own: bool,
) -> Result<AvailabilityCalendar, sqlx::Error> {
    let mut entries: BTreeMap<NaiveDate, CalendarEntry> = BTreeMap::new();

    for record in MusicianAvailability::find_for_musician(pool, musician_id).await? {
        entries.insert(
            record.date,
            CalendarEntry {
                is_available: record.is_available,
                notes: record.notes,
                is_pending: false,
                is_approved: false,
                leave_request_id: None,
            },
        );
    }

    // Approved leave overwrites whatever the availability row said.
    for leave in
        LeaveRequest::find_by_musician_and_status(pool, musician_id, LeaveStatus::Approved).await?
    {
        entries.insert(
            leave.date,
            CalendarEntry {
                is_available: false,
                notes: Some(leave.reason),
                is_pending: false,
                is_approved: true,
                leave_request_id: Some(leave.id),
            },
        );
    }

    let mut pending = Vec::new();
    if is_own {
        pending =
            LeaveRequest::find_by_musician_and_status(pool, musician_id, LeaveStatus::Pending)
                .await?;
        for leave in &pending {
            // Pending never displaces an approved entry for the same date.
            if entries.get(&leave.date).is_some_and(|e| e.is_approved) {
                continue;
            }
            entries.insert(
                leave.date,
                CalendarEntry {
                    is_available: false,
                    notes: Some(leave.reason.clone()),
                    is_pending: true,
                    is_approved: false,
                    leave_request_id: Some(leave.id),
                },
            );
        }
    }

    Ok(AvailabilityCalendar {
        entries,
        pending,
        is_own,
    })
}
