#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOperation {
    Add,
    Remove,
}

impl MembershipOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipOperation::Add => "add",
            MembershipOperation::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MembershipChangeRequest<'a> {
    pub group_identifier: &'a str,
    pub subject_ids: &'a [String],
    /// Only honoured for adds, and only on the first chunk.
    pub replace_existing: bool,
}

impl<'a> MembershipChangeRequest<'a> {
    pub fn new(group_identifier: &'a str, subject_ids: &'a [String]) -> Self {
        Self {
            group_identifier,
            subject_ids,
            replace_existing: false,
        }
    }

    pub fn replacing(mut self, replace_existing: bool) -> Self {
        self.replace_existing = replace_existing;
        self
    }
}

/// Outcome reported by the service for a single HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub success: bool,
    pub result_code: String,
    pub result_message: Option<String>,
}

/// Tag for one chunk send, inspected by the batch driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    Success,
    ServiceFailure { result_code: String },
}

impl From<OperationResult> for ChunkOutcome {
    fn from(result: OperationResult) -> Self {
        if result.success {
            ChunkOutcome::Success
        } else {
            ChunkOutcome::ServiceFailure {
                result_code: result.result_code,
            }
        }
    }
}
