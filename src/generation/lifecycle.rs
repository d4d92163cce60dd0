use crate::models::contracts::{Model, Status};

/// Position of a status in the forward-only generation lifecycle.
///
/// `pending` and `queued` are both pre-dispatch states; `completed` and `failed`
/// share the terminal rank.
fn rank(status: Status) -> u8 {
    match status {
        Status::Pending => 0,
        Status::Queued => 1,
        Status::Processing => 2,
        Status::Completed | Status::Failed => 3,
    }
}

pub fn is_terminal(status: Status) -> bool {
    matches!(status, Status::Completed | Status::Failed)
}

/// Outcome of checking a requested status change against the current row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The change moves the contract forward and must be written.
    Apply,
    /// The row already holds exactly the requested state; nothing to do.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("cannot move contract from {from} back to {to}")]
    Backwards { from: Status, to: Status },
    #[error("contract is already {0} and cannot change")]
    Terminal(Status),
    #[error("a completed contract requires a non-empty pdf_url")]
    MissingPdfUrl,
}

/// The state a contract should move to, with the fields that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetState {
    pub status: Status,
    pub pdf_url: Option<String>,
    pub error_message: Option<String>,
}

pub const DEFAULT_FAILURE_MESSAGE: &str = "Contract generation failed";

impl TargetState {
    pub fn queued() -> Self {
        Self {
            status: Status::Queued,
            pdf_url: None,
            error_message: None,
        }
    }

    pub fn processing() -> Self {
        Self {
            status: Status::Processing,
            pdf_url: None,
            error_message: None,
        }
    }

    pub fn completed(pdf_url: impl Into<String>) -> Self {
        Self {
            status: Status::Completed,
            pdf_url: Some(pdf_url.into()),
            error_message: None,
        }
    }

    /// A failed state always carries a message; blank input falls back to a default.
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };
        Self {
            status: Status::Failed,
            pdf_url: None,
            error_message: Some(message),
        }
    }

    /// Build a target from the loosely-typed callback fields.
    ///
    /// A missing status with a usable `pdf_url` means completion. `completed`
    /// without a URL is rejected so the row never reaches that state empty-handed.
    pub fn from_callback(
        status: Option<Status>,
        pdf_url: Option<&str>,
        error_message: Option<&str>,
    ) -> Result<Self, TransitionError> {
        let pdf_url = pdf_url.map(str::trim).filter(|u| !u.is_empty());

        match (status, pdf_url) {
            (Some(Status::Completed), Some(url)) | (None, Some(url)) => Ok(Self::completed(url)),
            (Some(Status::Completed), None) | (None, None) => Err(TransitionError::MissingPdfUrl),
            (Some(Status::Failed), _) => Ok(Self::failed(error_message.unwrap_or_default())),
            (Some(Status::Processing), _) => Ok(Self::processing()),
            (Some(Status::Queued), _) => Ok(Self::queued()),
            (Some(Status::Pending), _) => Ok(Self {
                status: Status::Pending,
                pdf_url: None,
                error_message: None,
            }),
        }
    }
}

/// Decide whether `target` may be applied to `current`.
///
/// Replaying the state a contract already holds is accepted as a no-op, which
/// makes repeated callbacks from the automation service harmless.
pub fn check_transition(current: &Model, target: &TargetState) -> Result<Transition, TransitionError> {
    if current.status == target.status
        && current.pdf_url == target.pdf_url
        && (target.status != Status::Failed || current.error_message == target.error_message)
    {
        return Ok(Transition::Unchanged);
    }

    if is_terminal(current.status) {
        return Err(TransitionError::Terminal(current.status));
    }

    if rank(target.status) <= rank(current.status) {
        return Err(TransitionError::Backwards {
            from: current.status,
            to: target.status,
        });
    }

    Ok(Transition::Apply)
}

/// `completed` ⇔ has a pdf_url, `failed` ⇒ has an error message.
pub fn is_consistent(contract: &Model) -> bool {
    let has_pdf = contract
        .pdf_url
        .as_deref()
        .is_some_and(|u| !u.trim().is_empty());
    let has_error = contract
        .error_message
        .as_deref()
        .is_some_and(|m| !m.trim().is_empty());

    match contract.status {
        Status::Completed => has_pdf,
        Status::Failed => has_error && !has_pdf,
        _ => !has_pdf,
    }
}
