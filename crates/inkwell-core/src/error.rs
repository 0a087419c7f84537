use std::fmt;

use thiserror::Error;

use crate::types::PostType;

#[derive(Debug, Error)]
pub enum InkwellError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("User {user_id} is not authorized to publish")]
    AuthorizationDenied { user_id: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl InkwellError {
    /// Short error code string used in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            InkwellError::Config(_) => "CONFIG_ERROR",
            InkwellError::SignatureInvalid => "SIGNATURE_INVALID",
            InkwellError::AuthorizationDenied { .. } => "AUTHORIZATION_DENIED",
            InkwellError::Extraction(_) => "EXTRACTION_ERROR",
            InkwellError::Validation(_) => "VALIDATION_ERROR",
            InkwellError::Publish(_) => "PUBLISH_ERROR",
            InkwellError::Unknown(_) => "UNKNOWN_ERROR",
        }
    }
}

pub type Result<T> = std::result::Result<T, InkwellError>;

/// A single problem found while pulling fields out of an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// The field was not present (or blank) in the payload.
    Missing { field: String },
    /// The field was present but its value is not acceptable.
    Invalid { field: String, reason: String },
    /// An attachment option carried an ID that `resolved.attachments` does
    /// not contain.
    UnresolvedAttachment { field: String, id: String },
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing { field } => write!(f, "`{field}` is missing"),
            FieldProblem::Invalid { field, reason } => write!(f, "`{field}` is invalid: {reason}"),
            FieldProblem::UnresolvedAttachment { field, id } => write!(
                f,
                "`{field}` references attachment {id}, which Discord did not include in the payload"
            ),
        }
    }
}

/// Extraction failed; every problem found is listed, not just the first.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct ExtractionError {
    pub problems: Vec<FieldProblem>,
}

impl ExtractionError {
    pub fn single(problem: FieldProblem) -> Self {
        Self {
            problems: vec![problem],
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Could not read the submission: ")?;
        join(f, &self.problems)
    }
}

/// A schema-required header field is absent for this post type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub struct ValidationError {
    pub post_type: PostType,
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "A {} post requires: {}",
            self.post_type,
            self.missing.join(", ")
        )
    }
}

/// The hosting-platform step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    CreateBranch,
    CommitFile,
    OpenPullRequest,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStep::CreateBranch => write!(f, "branch creation"),
            PublishStep::CommitFile => write!(f, "file commit"),
            PublishStep::OpenPullRequest => write!(f, "pull request creation"),
        }
    }
}

/// What happened to the working branch after a failed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchState {
    /// No branch was created.
    NotCreated,
    /// The branch was created and then deleted again.
    Deleted,
    /// Deleting the branch failed; it needs manual cleanup.
    Orphaned,
    /// The branch and its commit were kept on purpose.
    Preserved,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{step} failed: {message}")]
pub struct PublishError {
    pub step: PublishStep,
    pub message: String,
    pub branch: Option<String>,
    pub branch_state: BranchState,
}

fn join(f: &mut fmt::Formatter<'_>, problems: &[FieldProblem]) -> fmt::Result {
    for (i, problem) in problems.iter().enumerate() {
        if i > 0 {
            write!(f, "; ")?;
        }
        write!(f, "{problem}")?;
    }
    Ok(())
}
