//! JSON payloads exchanged with the Grouper REST endpoints.
//!
//! Boolean flags travel as `"T"`/`"F"` strings on the wire and are plain
//! `bool`s everywhere else.

use crate::domain::model::OperationResult;
use serde::{Deserialize, Serialize};

/// Result code the members listing must report to be accepted.
pub const SUCCESS_RESULT_CODE: &str = "SUCCESS";

mod tf_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "T" } else { "F" })
    }

    // Anything other than "T" (including a missing flag) is false.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref() == Some("T"))
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SubjectLookup<'a> {
    #[serde(rename = "subjectId")]
    pub subject_id: &'a str,
}

fn lookups(subject_ids: &[String]) -> Vec<SubjectLookup<'_>> {
    subject_ids
        .iter()
        .map(|id| SubjectLookup { subject_id: id })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct AddMemberRequest<'a> {
    #[serde(rename = "WsRestAddMemberRequest")]
    pub request: AddMemberBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberBody<'a> {
    #[serde(serialize_with = "tf_flag::serialize")]
    pub replace_all_existing: bool,
    pub subject_lookups: Vec<SubjectLookup<'a>>,
}

impl<'a> AddMemberRequest<'a> {
    pub fn new(subject_ids: &'a [String], replace_all_existing: bool) -> Self {
        Self {
            request: AddMemberBody {
                replace_all_existing,
                subject_lookups: lookups(subject_ids),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteMemberRequest<'a> {
    #[serde(rename = "WsRestDeleteMemberRequest")]
    pub request: DeleteMemberBody<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMemberBody<'a> {
    pub subject_lookups: Vec<SubjectLookup<'a>>,
}

impl<'a> DeleteMemberRequest<'a> {
    pub fn new(subject_ids: &'a [String]) -> Self {
        Self {
            request: DeleteMemberBody {
                subject_lookups: lookups(subject_ids),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    #[serde(default, deserialize_with = "tf_flag::deserialize")]
    pub success: bool,
    #[serde(default)]
    pub result_code: String,
    #[serde(default)]
    pub result_message: Option<String>,
}

impl From<ResultMetadata> for OperationResult {
    fn from(metadata: ResultMetadata) -> Self {
        OperationResult {
            success: metadata.success,
            result_code: metadata.result_code,
            result_message: metadata.result_message,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResults {
    pub result_metadata: ResultMetadata,
}

#[derive(Debug, Deserialize)]
pub struct AddMemberResponse {
    #[serde(rename = "WsAddMemberResults")]
    pub results: MutationResults,
}

#[derive(Debug, Deserialize)]
pub struct DeleteMemberResponse {
    #[serde(rename = "WsDeleteMemberResults")]
    pub results: MutationResults,
}

#[derive(Debug, Deserialize)]
pub struct WsSubject {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMembersResult {
    pub result_metadata: ResultMetadata,
    #[serde(default)]
    pub ws_subjects: Option<Vec<WsSubject>>,
}

#[derive(Debug, Deserialize)]
pub struct GetMembersResponse {
    #[serde(rename = "WsGetMembersLiteResult")]
    pub result: GetMembersResult,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_request_encodes_replace_flag_as_t_or_f() {
        let subjects = ids(&["alice", "bob"]);

        let replacing = serde_json::to_value(AddMemberRequest::new(&subjects, true)).unwrap();
        assert_eq!(
            replacing,
            json!({
                "WsRestAddMemberRequest": {
                    "replaceAllExisting": "T",
                    "subjectLookups": [{"subjectId": "alice"}, {"subjectId": "bob"}]
                }
            })
        );

        let appending = serde_json::to_value(AddMemberRequest::new(&subjects, false)).unwrap();
        assert_eq!(
            appending["WsRestAddMemberRequest"]["replaceAllExisting"],
            json!("F")
        );
    }

    #[test]
    fn test_delete_request_shape() {
        let subjects = ids(&["carol"]);
        let value = serde_json::to_value(DeleteMemberRequest::new(&subjects)).unwrap();
        assert_eq!(
            value,
            json!({"WsRestDeleteMemberRequest": {"subjectLookups": [{"subjectId": "carol"}]}})
        );
    }

    #[test]
    fn test_result_metadata_decodes_flag() {
        let response: AddMemberResponse = serde_json::from_value(json!({
            "WsAddMemberResults": {
                "resultMetadata": {"success": "T", "resultCode": "SUCCESS", "resultMessage": "ok"}
            }
        }))
        .unwrap();
        let result = OperationResult::from(response.results.result_metadata);
        assert!(result.success);
        assert_eq!(result.result_code, "SUCCESS");
        assert_eq!(result.result_message.as_deref(), Some("ok"));
    }

    #[test]
    fn test_missing_success_flag_is_false() {
        let response: GetMembersResponse = serde_json::from_value(json!({
            "WsGetMembersLiteResult": {
                "resultMetadata": {"resultCode": "GROUP_NOT_FOUND"}
            }
        }))
        .unwrap();
        assert!(!response.result.result_metadata.success);
        assert!(response.result.ws_subjects.is_none());
    }

    #[test]
    fn test_missing_results_wrapper_is_a_parse_error() {
        let parsed = serde_json::from_value::<DeleteMemberResponse>(json!({"unexpected": {}}));
        assert!(parsed.is_err());
    }
}
