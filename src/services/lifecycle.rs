//! Submission lifecycle resolution shared by the quiz and assignment
//! submission services. Pure: callers pass the prior persisted state and get
//! back the state to store.

use time::PrimitiveDateTime;

use crate::db::types::SubmissionStatus;

pub(crate) struct Prior {
    pub(crate) status: SubmissionStatus,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) reviewed_at: Option<PrimitiveDateTime>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
}

pub(crate) struct Resolution {
    pub(crate) status: SubmissionStatus,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) reviewed_at: Option<PrimitiveDateTime>,
    pub(crate) graded_at: Option<PrimitiveDateTime>,
}

/// Clamp the requested status against the prior one and derive the lifecycle
/// timestamps. The status never moves backwards, each timestamp is set exactly
/// once, and `graded_at` only attaches once the work has been submitted.
pub(crate) fn resolve(
    prior: Option<&Prior>,
    requested: SubmissionStatus,
    grade_attached: bool,
    now: PrimitiveDateTime,
) -> Resolution {
    let prior_status = prior.map_or(SubmissionStatus::Draft, |p| p.status);
    let status =
        if requested.rank() >= prior_status.rank() { requested } else { prior_status };

    let submitted_at = prior
        .and_then(|p| p.submitted_at)
        .or_else(|| (status.rank() >= SubmissionStatus::Submitted.rank()).then_some(now));
    let reviewed_at = prior
        .and_then(|p| p.reviewed_at)
        .or_else(|| (status == SubmissionStatus::Reviewed).then_some(now));
    let graded_at = prior.and_then(|p| p.graded_at).or_else(|| {
        (grade_attached && status.rank() >= SubmissionStatus::Submitted.rank()).then_some(now)
    });

    Resolution { status, submitted_at, reviewed_at, graded_at }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn prior(status: SubmissionStatus) -> Prior {
        Prior { status, submitted_at: None, reviewed_at: None, graded_at: None }
    }

    #[test]
    fn status_never_moves_backwards() {
        let now = primitive_now_utc();
        let p = prior(SubmissionStatus::Submitted);
        let res = resolve(Some(&p), SubmissionStatus::Draft, false, now);
        assert_eq!(res.status, SubmissionStatus::Submitted);
    }

    #[test]
    fn repeated_save_at_same_status_is_idempotent() {
        let now = primitive_now_utc();
        let p = prior(SubmissionStatus::ToReview);
        let res = resolve(Some(&p), SubmissionStatus::ToReview, false, now);
        assert_eq!(res.status, SubmissionStatus::ToReview);
    }

    #[test]
    fn submitted_at_is_set_once_and_kept() {
        let now = primitive_now_utc();
        let first = resolve(None, SubmissionStatus::Submitted, false, now);
        let stamp = first.submitted_at.expect("submitted_at set");

        let later = primitive_now_utc();
        let p = Prior {
            status: first.status,
            submitted_at: first.submitted_at,
            reviewed_at: None,
            graded_at: None,
        };
        let second = resolve(Some(&p), SubmissionStatus::Submitted, false, later);
        assert_eq!(second.submitted_at, Some(stamp));
    }

    #[test]
    fn draft_has_no_timestamps() {
        let now = primitive_now_utc();
        let res = resolve(None, SubmissionStatus::Draft, false, now);
        assert_eq!(res.status, SubmissionStatus::Draft);
        assert!(res.submitted_at.is_none());
        assert!(res.reviewed_at.is_none());
        assert!(res.graded_at.is_none());
    }

    #[test]
    fn reviewed_sets_review_and_grade_stamps() {
        let now = primitive_now_utc();
        let p = Prior {
            status: SubmissionStatus::ToReview,
            submitted_at: Some(now),
            reviewed_at: None,
            graded_at: None,
        };
        let res = resolve(Some(&p), SubmissionStatus::Reviewed, true, now);
        assert_eq!(res.status, SubmissionStatus::Reviewed);
        assert!(res.reviewed_at.is_some());
        assert!(res.graded_at.is_some());
    }

    #[test]
    fn grade_does_not_attach_to_a_draft() {
        let now = primitive_now_utc();
        let res = resolve(None, SubmissionStatus::Draft, true, now);
        assert!(res.graded_at.is_none());
    }
}
