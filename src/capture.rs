// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Capture session: tracks the data window while the user requests their
//! archive and turns the result into an [`ArchiveSubmission`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::models::ArchiveSubmission;

#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    started_at: Option<DateTime<Utc>>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume a session whose start was recorded elsewhere.
    pub fn with_start(started_at: Option<DateTime<Utc>>) -> Self {
        Self { started_at }
    }

    /// Record the window start as now.
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Build the submission with the window ending now.
    pub fn finish(
        &self,
        headers: BTreeMap<String, String>,
        file_url: impl Into<String>,
        raw_cookie: impl Into<String>,
    ) -> ArchiveSubmission {
        self.finish_at(headers, file_url, raw_cookie, Utc::now())
    }

    /// Build the submission with an explicit window end.
    ///
    /// A session that never recorded its start uses the current time instead;
    /// the real start is unrecoverable at this point.
    pub fn finish_at(
        &self,
        headers: BTreeMap<String, String>,
        file_url: impl Into<String>,
        raw_cookie: impl Into<String>,
        ended_at: DateTime<Utc>,
    ) -> ArchiveSubmission {
        let started_at = match self.started_at {
            Some(started_at) => started_at,
            None => {
                let now = Utc::now();
                warn!(
                    fallback = %now,
                    "Archive window start was never recorded, using current time"
                );
                now
            }
        };

        ArchiveSubmission {
            headers,
            file_url: file_url.into(),
            raw_cookie: raw_cookie.into(),
            started_at: Some(started_at),
            ended_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn recorded_start_is_kept() {
        let start = Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        let end = start + Duration::minutes(20);
        let session = CaptureSession::with_start(Some(start));

        let submission = session.finish_at(BTreeMap::new(), "https://files/a.zip", "c=1", end);

        assert_eq!(submission.started_at, Some(start));
        assert_eq!(submission.ended_at, end);
    }

    #[test]
    fn missing_start_falls_back_to_current_time() {
        let end = Utc.with_ymd_and_hms(2026, 2, 1, 9, 20, 0).unwrap();
        let before = Utc::now();

        let submission =
            CaptureSession::new().finish_at(BTreeMap::new(), "https://files/a.zip", "c=1", end);

        let started = submission.started_at.unwrap();
        assert!(started >= before);
        assert!(started <= Utc::now());
        assert_eq!(submission.ended_at, end);
    }

    #[test]
    fn start_records_now() {
        let before = Utc::now();
        let mut session = CaptureSession::new();
        session.start();

        let started = session.started_at().unwrap();
        assert!(started >= before);

        let submission = session.finish(BTreeMap::new(), "https://files/a.zip", "c=1");
        assert!(submission.ended_at >= started);
    }
}
