//! store::github
//!
//! GitHub content store using the repository contents REST API.
//!
//! # Design
//!
//! This module implements the `ContentStore` trait for GitHub. One
//! repository path maps to one endpoint,
//! `/repos/{owner}/{repo}/contents/{path}`, driven with GET (read/list),
//! PUT (create/update) and DELETE. Every mutation creates a commit on the
//! configured branch.
//!
//! # Optimistic concurrency
//!
//! GitHub rejects an update or delete that does not carry the current blob
//! sha. Both mutating operations therefore start with a discovery read:
//! `put` uses it to decide create-vs-update, `delete` to obtain the sha the
//! endpoint requires. The read is a precondition, not a lock; a stale sha
//! surfaces as [`StoreError::Api`] with GitHub's conflict status.
//!
//! # Content encoding
//!
//! File bodies travel base64-encoded. GitHub inserts line breaks into the
//! encoded text; they are stripped before decoding.
//!
//! # Rate limiting
//!
//! GitHub has rate limits. Exceeding them surfaces as a plain
//! [`StoreError::Api`]; this implementation does not retry (the caller's
//! responsibility, if any).

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{
    CommitInfo, CommitResult, ContentStore, Document, Entry, EntryKind, StoreError,
};
use crate::config::Config;
use crate::paths::{file_name, to_logical_path, to_repo_path};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "gitshelf";

/// GitHub content store.
///
/// Holds the HTTP client and the repository coordinates; all per-document
/// state lives in the backing store.
pub struct GitHubStore {
    /// HTTP client for making requests
    client: Client,
    /// API credential
    token: String,
    /// Repository owner (user or organization)
    owner: String,
    /// Repository name
    repo: String,
    /// Branch for reads and commits
    branch: String,
    /// Base directory prefix inside the repository
    base_dir: String,
    /// API base URL (configurable for GitHub Enterprise)
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for GitHubStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStore")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("base_dir", &self.base_dir)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl GitHubStore {
    /// Create a store from the service configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            token: config.github_token.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            branch: config.branch.clone(),
            base_dir: config.base_dir.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, StoreError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.token)).map_err(|_| {
            StoreError::Credential("token contains characters not valid in a header".into())
        })?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }

    /// Build the contents-API URL for a repository path.
    fn contents_url(&self, repo_path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base, self.owner, self.repo, repo_path
        )
    }

    /// Map a non-success response into a `StoreError`.
    ///
    /// 404 means the object is absent; everything else carries the backing
    /// store's status and message through unchanged.
    async fn error_from_response(
        &self,
        response: Response,
        logical_path: &str,
    ) -> StoreError {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return StoreError::NotFound(logical_path.to_string());
        }
        let message = match response.json::<GitHubErrorResponse>().await {
            Ok(err) => err.message,
            Err(_) => "unknown error".to_string(),
        };
        StoreError::Api {
            status: status.as_u16(),
            message,
        }
    }

    /// Fetch the contents object (file or directory listing) at a
    /// repository path on the configured branch.
    async fn fetch_contents(
        &self,
        repo_path: &str,
        logical_path: &str,
    ) -> Result<ContentsPayload, StoreError> {
        let url = self.contents_url(repo_path);
        debug!(path = %repo_path, "fetching contents");

        let response = self
            .client
            .get(&url)
            .query(&[("ref", self.branch.as_str())])
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.error_from_response(response, logical_path).await);
        }
        response.json().await.map_err(|e| StoreError::Api {
            status: status.as_u16(),
            message: format!("failed to parse response: {}", e),
        })
    }

    /// Discover the current sha for a repository path, distinguishing
    /// "absent" from real failures.
    ///
    /// Returns `Ok(None)` when the document does not exist, `Ok(Some(doc))`
    /// when it does, and propagates every other error so mutations never
    /// proceed blind.
    async fn discover(&self, logical_path: &str) -> Result<Option<Document>, StoreError> {
        match self.get(logical_path).await {
            Ok(doc) => Ok(Some(doc)),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ContentStore for GitHubStore {
    async fn get(&self, logical_path: &str) -> Result<Document, StoreError> {
        let repo_path = to_repo_path(&self.base_dir, logical_path);
        let logical = to_logical_path(&self.base_dir, &repo_path);

        match self.fetch_contents(&repo_path, &logical).await? {
            ContentsPayload::Many(_) => Err(StoreError::NotAFile(logical)),
            ContentsPayload::One(raw) => {
                let encoded = raw
                    .content
                    .ok_or_else(|| StoreError::NotAFile(logical.clone()))?;
                let content = decode_content(&encoded)?;
                Ok(Document {
                    path: logical,
                    repo_path,
                    name: raw.name,
                    sha: raw.sha,
                    content,
                })
            }
        }
    }

    async fn put(
        &self,
        logical_path: &str,
        content: &str,
        message: Option<&str>,
    ) -> Result<CommitResult, StoreError> {
        let repo_path = to_repo_path(&self.base_dir, logical_path);
        let logical = to_logical_path(&self.base_dir, &repo_path);

        // Create-vs-update is decided by the discovery read; any failure
        // other than absence aborts before the write.
        let existing_sha = self.discover(&logical).await?.map(|doc| doc.sha);

        let default_message = match existing_sha {
            Some(_) => format!("Update {}", repo_path),
            None => format!("Create {}", repo_path),
        };
        let message = message.unwrap_or(&default_message);

        let encoded = BASE64.encode(content.as_bytes());
        let body = PutContentBody {
            message,
            content: &encoded,
            branch: &self.branch,
            sha: existing_sha.as_deref(),
        };

        let url = self.contents_url(&repo_path);
        debug!(path = %repo_path, update = existing_sha.is_some(), "writing contents");

        let response = self
            .client
            .put(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.error_from_response(response, &logical).await);
        }
        let written: MutationResponse = response.json().await.map_err(|e| StoreError::Api {
            status: status.as_u16(),
            message: format!("failed to parse response: {}", e),
        })?;

        let name = written
            .content
            .as_ref()
            .map(|c| c.name.clone())
            .unwrap_or_else(|| file_name(&repo_path).to_string());
        Ok(CommitResult {
            path: logical,
            name,
            content_sha: written.content.map(|c| c.sha),
            commit: CommitInfo {
                sha: written.commit.sha,
                message: written.commit.message.unwrap_or_else(|| message.to_string()),
            },
        })
    }

    async fn delete(
        &self,
        logical_path: &str,
        message: Option<&str>,
    ) -> Result<CommitResult, StoreError> {
        let repo_path = to_repo_path(&self.base_dir, logical_path);
        let logical = to_logical_path(&self.base_dir, &repo_path);

        // The endpoint requires the current sha; an absent document fails
        // here and no delete call is issued.
        let doc = self.get(&logical).await?;

        let default_message = format!("Delete {}", repo_path);
        let message = message.unwrap_or(&default_message);

        let body = DeleteContentBody {
            message,
            sha: &doc.sha,
            branch: &self.branch,
        };

        let url = self.contents_url(&repo_path);
        debug!(path = %repo_path, "deleting contents");

        let response = self
            .client
            .delete(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.error_from_response(response, &logical).await);
        }
        let deleted: MutationResponse = response.json().await.map_err(|e| StoreError::Api {
            status: status.as_u16(),
            message: format!("failed to parse response: {}", e),
        })?;

        Ok(CommitResult {
            path: logical,
            name: doc.name,
            content_sha: None,
            commit: CommitInfo {
                sha: deleted.commit.sha,
                message: deleted.commit.message.unwrap_or_else(|| message.to_string()),
            },
        })
    }

    async fn list(&self, logical_dir: &str) -> Result<Vec<Entry>, StoreError> {
        let repo_path = to_repo_path(&self.base_dir, logical_dir);
        let logical = to_logical_path(&self.base_dir, &repo_path);

        // A file path answers with a single object instead of an array;
        // normalize it into a one-element listing.
        let raws = match self.fetch_contents(&repo_path, &logical).await? {
            ContentsPayload::Many(entries) => entries,
            ContentsPayload::One(single) => vec![single],
        };

        Ok(raws
            .into_iter()
            .map(|raw| {
                let logical = to_logical_path(&self.base_dir, &raw.path);
                let kind = if raw.kind == "dir" {
                    EntryKind::Dir
                } else {
                    EntryKind::File
                };
                let path = match kind {
                    EntryKind::Dir => format!("{}/", logical),
                    EntryKind::File => logical,
                };
                Entry {
                    name: raw.name,
                    path,
                    kind,
                }
            })
            .collect())
    }
}

/// Strip transport line breaks and decode base64 content into text.
fn decode_content(encoded: &str) -> Result<String, StoreError> {
    let compact: String = encoded.split_whitespace().collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::Encoding(format!("invalid base64: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Encoding(format!("invalid utf-8: {}", e)))
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating or updating a file.
#[derive(Serialize)]
struct PutContentBody<'a> {
    message: &'a str,
    content: &'a str,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Request body for deleting a file.
#[derive(Serialize)]
struct DeleteContentBody<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

/// GitHub error response format.
#[derive(Deserialize)]
struct GitHubErrorResponse {
    message: String,
}

/// Contents endpoint payload: an array for a directory, a single object
/// for a file.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContentsPayload {
    Many(Vec<RawContent>),
    One(RawContent),
}

/// One contents object as GitHub reports it.
#[derive(Deserialize)]
struct RawContent {
    name: String,
    path: String,
    sha: String,
    #[serde(rename = "type")]
    kind: String,
    /// Base64 text for file objects fetched directly; absent in listings.
    #[serde(default)]
    content: Option<String>,
}

/// Response to a PUT or DELETE of a contents path.
#[derive(Deserialize)]
struct MutationResponse {
    /// New content metadata; null after a delete.
    content: Option<WrittenContent>,
    commit: RawCommit,
}

/// Subset of the content object echoed back on writes.
#[derive(Deserialize)]
struct WrittenContent {
    name: String,
    sha: String,
}

/// Commit object echoed back on mutations.
#[derive(Deserialize)]
struct RawCommit {
    sha: String,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GitHubStore {
        let config = Config::new(
            "octocat",
            "wiki",
            "main",
            Some("docs"),
            "ghp_test",
            None,
            "https://api.github.com",
        );
        GitHubStore::new(&config)
    }

    mod urls {
        use super::*;

        #[test]
        fn contents_url_format() {
            let store = store();
            assert_eq!(
                store.contents_url("docs/a/b.md"),
                "https://api.github.com/repos/octocat/wiki/contents/docs/a/b.md"
            );
        }

        #[test]
        fn api_base_trailing_slash_is_stripped() {
            let config = Config::new(
                "o",
                "r",
                "main",
                Some("docs"),
                "t",
                None,
                "https://github.example.com/api/v3/",
            );
            let store = GitHubStore::new(&config);
            assert_eq!(
                store.contents_url("docs/x.md"),
                "https://github.example.com/api/v3/repos/o/r/contents/docs/x.md"
            );
        }
    }

    mod encoding {
        use super::*;

        #[test]
        fn decode_plain_base64() {
            assert_eq!(decode_content("SGVsbG8gd29ybGQ=").unwrap(), "Hello world");
        }

        #[test]
        fn decode_strips_embedded_line_breaks() {
            // GitHub wraps encoded bodies across lines
            assert_eq!(decode_content("SGVsbG8g\nd29ybGQ=\n").unwrap(), "Hello world");
        }

        #[test]
        fn multi_byte_round_trip() {
            let text = "héllo 🌍 漢字";
            let encoded = BASE64.encode(text.as_bytes());
            assert_eq!(decode_content(&encoded).unwrap(), text);
        }

        #[test]
        fn invalid_base64_is_an_encoding_error() {
            let err = decode_content("!!not base64!!").unwrap_err();
            assert!(matches!(err, StoreError::Encoding(_)));
        }

        #[test]
        fn invalid_utf8_is_an_encoding_error() {
            let encoded = BASE64.encode([0xff, 0xfe, 0xfd]);
            let err = decode_content(&encoded).unwrap_err();
            assert!(matches!(err, StoreError::Encoding(_)));
        }
    }

    mod payload_parsing {
        use super::*;

        #[test]
        fn single_object_parses_as_one() {
            let json = r#"{"name":"a.md","path":"docs/a.md","sha":"abc","type":"file","content":"SGk="}"#;
            let payload: ContentsPayload = serde_json::from_str(json).unwrap();
            assert!(matches!(payload, ContentsPayload::One(_)));
        }

        #[test]
        fn array_parses_as_many() {
            let json = r#"[{"name":"a.md","path":"docs/a.md","sha":"abc","type":"file"}]"#;
            let payload: ContentsPayload = serde_json::from_str(json).unwrap();
            match payload {
                ContentsPayload::Many(entries) => assert_eq!(entries.len(), 1),
                ContentsPayload::One(_) => panic!("expected array payload"),
            }
        }

        #[test]
        fn put_body_omits_sha_when_creating() {
            let body = PutContentBody {
                message: "Create docs/a.md",
                content: "SGk=",
                branch: "main",
                sha: None,
            };
            let json = serde_json::to_value(&body).unwrap();
            assert!(json.get("sha").is_none());
        }

        #[test]
        fn put_body_includes_sha_when_updating() {
            let body = PutContentBody {
                message: "Update docs/a.md",
                content: "SGk=",
                branch: "main",
                sha: Some("abc123"),
            };
            let json = serde_json::to_value(&body).unwrap();
            assert_eq!(json["sha"], "abc123");
        }
    }

    #[test]
    fn debug_redacts_token() {
        let output = format!("{:?}", store());
        assert!(!output.contains("ghp_test"), "{output}");
        assert!(output.contains("octocat"));
    }
}
