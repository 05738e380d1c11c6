#[cfg(test)]
mod tests {
    use crate::error::LeaveError;
    use crate::model::application::LeaveApplication;
    use crate::model::leave::{Decision, LeaveRecord, LeaveStatus, LeaveType, StatusUpdate};
    use crate::repository::LeaveRepository;
    use crate::service::dto::SubmissionPayload;
    use crate::service::leave_service::{locate, LeaveService};
    use anyhow::Result;
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use std::cell::RefCell;

    struct MockLeaveRepo {
        records: Vec<LeaveRecord>,
        submitted: RefCell<Vec<SubmissionPayload>>,
        updates: RefCell<Vec<StatusUpdate>>,
    }

    impl MockLeaveRepo {
        fn with(records: Vec<LeaveRecord>) -> Self {
            Self {
                records,
                submitted: RefCell::new(Vec::new()),
                updates: RefCell::new(Vec::new()),
            }
        }
    }

    impl LeaveRepository for &MockLeaveRepo {
        fn list(&self) -> Result<Vec<LeaveRecord>> {
            Ok(self.records.clone())
        }
        fn submit(&self, submission: &SubmissionPayload) -> Result<()> {
            self.submitted.borrow_mut().push(submission.clone());
            Ok(())
        }
        fn update_status(&self, update: &StatusUpdate) -> Result<()> {
            self.updates.borrow_mut().push(update.clone());
            Ok(())
        }
    }

    fn record(row: usize, prn: &str, hour: u32, status: LeaveStatus) -> LeaveRecord {
        LeaveRecord {
            row,
            prn: prn.to_string(),
            timestamp: Some(Utc.with_ymd_and_hms(2025, 1, 6, hour, 0, 0).unwrap()),
            status,
            ..Default::default()
        }
    }

    fn application(from: NaiveDate, to: NaiveDate) -> LeaveApplication {
        LeaveApplication {
            academic_year: "2025-2026".to_string(),
            semester: "Semester 2".to_string(),
            prn: "122B1001".to_string(),
            full_name: "Asha Patil".to_string(),
            division: "A".to_string(),
            branch: "Computer".to_string(),
            email: "asha@college.edu".to_string(),
            contact: "9876543210".to_string(),
            class_teacher: "Prof. Dinesh Kute".to_string(),
            associate_teacher: None,
            leave_type: LeaveType::Medical,
            from_date: Some(from),
            to_date: Some(to),
            reason: "Fever".to_string(),
        }
    }

    #[test]
    fn test_submit_sends_pending_payload_with_summary() {
        let repo = MockLeaveRepo::with(Vec::new());
        let service = LeaveService::new(&repo);
        let now = Utc::now();
        // A week ahead stays in the future in every time zone.
        let from = (now + Duration::days(7)).date_naive();
        let to = from + Duration::days(13);

        let summary = service.submit(&application(from, to), now).unwrap();
        assert_eq!(summary.total_days, 14);
        assert_eq!(summary.working_days, 10);

        let submitted = repo.submitted.borrow();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].status, "Pending");
        assert_eq!(submitted[0].total_days, 14);
        assert_eq!(submitted[0].working_days, 10);
        assert_eq!(submitted[0].leave_type, "Medical");
    }

    #[test]
    fn test_submit_refuses_invalid_application() {
        let repo = MockLeaveRepo::with(Vec::new());
        let service = LeaveService::new(&repo);
        let now = Utc::now();
        let from = (now + Duration::days(7)).date_naive();

        let backwards = application(from, from - Duration::days(1));
        let err = service.submit(&backwards, now).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeaveError>(),
            Some(LeaveError::InvalidRange { .. })
        ));

        let past = application(from - Duration::days(30), from);
        assert!(service.submit(&past, now).is_err());

        assert!(repo.submitted.borrow().is_empty());
    }

    #[test]
    fn test_review_updates_the_located_row() {
        let repo = MockLeaveRepo::with(vec![
            record(2, "A1", 9, LeaveStatus::Approved),
            record(3, "B2", 10, LeaveStatus::Pending),
        ]);
        let service = LeaveService::new(&repo);

        let update = service
            .review("b2", None, Decision::Reject, " Need a certificate ")
            .unwrap();
        assert_eq!(update.row, 3);
        assert_eq!(update.status, LeaveStatus::Rejected);
        assert_eq!(update.remark, "Need a certificate");
        assert_eq!(repo.updates.borrow().as_slice(), &[update]);
    }

    #[test]
    fn test_review_refuses_reviewed_record() {
        let repo = MockLeaveRepo::with(vec![record(2, "A1", 9, LeaveStatus::Approved)]);
        let service = LeaveService::new(&repo);

        let err = service.review("A1", None, Decision::Reject, "").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LeaveError>(),
            Some(LeaveError::AlreadyReviewed { .. })
        ));
        assert!(repo.updates.borrow().is_empty());
    }

    #[test]
    fn test_review_unknown_prn() {
        let repo = MockLeaveRepo::with(vec![record(2, "A1", 9, LeaveStatus::Pending)]);
        let service = LeaveService::new(&repo);

        let err = service.review("Z9", None, Decision::Approve, "").unwrap_err();
        assert_eq!(
            err.downcast_ref::<LeaveError>(),
            Some(&LeaveError::NotFound("Z9".to_string()))
        );
    }

    #[test]
    fn test_locate_by_timestamp_and_pending() {
        let records = vec![
            record(2, "A1", 9, LeaveStatus::Approved),
            record(3, "A1", 10, LeaveStatus::Pending),
            record(4, "A1", 11, LeaveStatus::Pending),
        ];

        // Two pending requests from the same student need a timestamp.
        assert_eq!(
            locate(&records, "A1", None),
            Err(LeaveError::Ambiguous {
                prn: "A1".to_string(),
                count: 2
            })
        );

        let at = Utc.with_ymd_and_hms(2025, 1, 6, 11, 0, 0).unwrap();
        assert_eq!(locate(&records, "A1", Some(at)).unwrap().row, 4);

        let missing = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
        assert!(locate(&records, "A1", Some(missing)).is_err());

        // With one pending request left, the PRN alone is enough.
        assert_eq!(locate(&records[..2], "A1", None).unwrap().row, 3);
    }

    #[test]
    fn test_locate_all_reviewed_reports_newest() {
        let records = vec![
            record(2, "A1", 9, LeaveStatus::Approved),
            record(3, "A1", 10, LeaveStatus::Rejected),
        ];
        let found = locate(&records, "A1", None).unwrap();
        assert_eq!(found.row, 3);
        assert!(!found.is_pending());
    }
}
