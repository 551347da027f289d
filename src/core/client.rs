use crate::adapters::http::ReqwestTransport;
use crate::config::GrouperConfig;
use crate::core::batcher::{BatchState, Batcher};
use crate::core::requester::RetryingRequester;
use crate::domain::model::{
    ChunkOutcome, MembershipChangeRequest, MembershipOperation, OperationResult,
};
use crate::domain::ports::{HttpMethod, HttpTransport};
use crate::domain::wire::{
    AddMemberRequest, AddMemberResponse, DeleteMemberRequest, DeleteMemberResponse,
    GetMembersResponse, ResultMetadata, SUCCESS_RESULT_CODE,
};
use crate::utils::error::{GrouperError, Result};
use crate::utils::validation::Validate;

/// `{urlencoded group}/members`, relative to the groups endpoint.
pub fn members_path(group_identifier: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(group_identifier.as_bytes()).collect();
    format!("{}/members", encoded)
}

/// Adds, removes and lists group members, splitting large mutations into
/// paced chunks. Chunks are sent one after another; the first failure stops
/// the operation and nothing is rolled back.
pub struct BatchedMembershipClient<T: HttpTransport> {
    requester: RetryingRequester<T>,
    batcher: Batcher,
}

impl BatchedMembershipClient<ReqwestTransport> {
    pub fn from_config(config: &GrouperConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(transport, config))
    }
}

impl<T: HttpTransport> BatchedMembershipClient<T> {
    pub fn new(transport: T, config: &GrouperConfig) -> Self {
        Self {
            requester: RetryingRequester::new(transport, config.timeout, config.max_attempts),
            batcher: Batcher::new(config.max_changes_per_query, config.sleep_between_changes),
        }
    }

    pub fn transport(&self) -> &T {
        self.requester.transport()
    }

    /// Adds subjects to a group. With `replace_existing`, the first chunk
    /// replaces the current membership and later chunks append to it.
    pub async fn add_users_to_group(
        &self,
        subject_ids: &[String],
        group_identifier: &str,
        replace_existing: bool,
    ) -> Result<bool> {
        let request = MembershipChangeRequest::new(group_identifier, subject_ids)
            .replacing(replace_existing);
        self.apply(MembershipOperation::Add, &request).await
    }

    pub async fn remove_users_from_group(
        &self,
        subject_ids: &[String],
        group_identifier: &str,
    ) -> Result<bool> {
        let request = MembershipChangeRequest::new(group_identifier, subject_ids);
        self.apply(MembershipOperation::Remove, &request).await
    }

    /// Runs a membership change chunk by chunk. Returns `Ok(true)` once every
    /// chunk has been accepted.
    pub async fn apply(
        &self,
        operation: MembershipOperation,
        request: &MembershipChangeRequest<'_>,
    ) -> Result<bool> {
        let path = members_path(request.group_identifier);
        let plan = self.batcher.plan(request.subject_ids);
        let total_chunks = plan.len();

        let mut state = BatchState::Pending { total_chunks };
        tracing::debug!(
            "{} {} subject(s) on '{}': {:?}",
            operation.as_str(),
            request.subject_ids.len(),
            request.group_identifier,
            state
        );

        for (index, chunk) in plan.chunks().iter().enumerate() {
            if index > 0 {
                self.batcher.pause().await;
            }

            state = BatchState::Sending {
                chunk: index + 1,
                total_chunks,
            };
            tracing::debug!("{} '{}': {:?} ({} ids)", operation.as_str(), request.group_identifier, state, chunk.len());

            // Replace semantics only establish the baseline; later chunks append.
            let replace_all_existing = request.replace_existing && index == 0;

            match self.send_chunk(operation, &path, chunk, replace_all_existing).await? {
                ChunkOutcome::Success => {}
                ChunkOutcome::ServiceFailure { result_code } => {
                    state = BatchState::Aborted {
                        chunk: index + 1,
                        result_code: result_code.clone(),
                    };
                    tracing::error!(
                        "{} on '{}' aborted: {:?}",
                        operation.as_str(),
                        request.group_identifier,
                        state
                    );
                    return Err(GrouperError::group_operation(result_code));
                }
            }
        }

        state = BatchState::Completed {
            chunks: total_chunks,
        };
        tracing::info!(
            "✅ {} of {} subject(s) on '{}' done: {:?}",
            operation.as_str(),
            request.subject_ids.len(),
            request.group_identifier,
            state
        );
        Ok(true)
    }

    async fn send_chunk(
        &self,
        operation: MembershipOperation,
        path: &str,
        chunk: &[String],
        replace_all_existing: bool,
    ) -> Result<ChunkOutcome> {
        let (method, encoded) = match operation {
            MembershipOperation::Add => (
                HttpMethod::Post,
                serde_json::to_string(&AddMemberRequest::new(chunk, replace_all_existing)),
            ),
            MembershipOperation::Remove => (
                HttpMethod::Put,
                serde_json::to_string(&DeleteMemberRequest::new(chunk)),
            ),
        };
        let body = encoded.map_err(GrouperError::request_encoding)?;

        let value = self.requester.request(path, method, Some(body)).await?;

        let metadata: ResultMetadata = match operation {
            MembershipOperation::Add => {
                serde_json::from_value::<AddMemberResponse>(value)?.results.result_metadata
            }
            MembershipOperation::Remove => {
                serde_json::from_value::<DeleteMemberResponse>(value)?.results.result_metadata
            }
        };

        let result = OperationResult::from(metadata);
        if let Some(message) = &result.result_message {
            tracing::debug!("Grouper said {}: {}", result.result_code, message);
        }
        Ok(result.into())
    }

    /// Lists member subject ids in the order the service returns them.
    pub async fn get_members(&self, group_identifier: &str) -> Result<Vec<String>> {
        let path = members_path(group_identifier);
        let value = self.requester.request(&path, HttpMethod::Get, None).await?;

        let response: GetMembersResponse = serde_json::from_value(value)?;
        let result = response.result;

        if result.result_metadata.result_code != SUCCESS_RESULT_CODE {
            tracing::error!(
                "Listing members of '{}' failed: {}",
                group_identifier,
                result.result_metadata.result_code
            );
            return Err(GrouperError::group_operation(result.result_metadata.result_code));
        }

        let members: Vec<String> = result
            .ws_subjects
            .unwrap_or_default()
            .into_iter()
            .map(|subject| subject.id)
            .collect();

        tracing::debug!("'{}' has {} member(s)", group_identifier, members.len());
        Ok(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_path_encodes_group_name() {
        assert_eq!(members_path("app:staff"), "app%3Astaff/members");
        assert_eq!(members_path("a b/c"), "a+b%2Fc/members");
        assert_eq!(members_path("plain"), "plain/members");
    }
}
