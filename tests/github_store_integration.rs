//! Integration tests for the GitHub content store.
//!
//! These tests run the real `GitHubStore` against a wiremock server that
//! plays the contents API, verifying the read-before-write protocol, the
//! transport encoding, and the error taxonomy at the store boundary.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gitshelf::config::Config;
use gitshelf::store::github::GitHubStore;
use gitshelf::store::{ContentStore, EntryKind, StoreError};

fn store_for(server: &MockServer) -> GitHubStore {
    let config = Config::new(
        "octocat",
        "wiki",
        "main",
        Some("docs"),
        "ghp_test",
        None,
        server.uri(),
    );
    GitHubStore::new(&config)
}

/// Body of the request at `index`, parsed as JSON.
async fn request_body(server: &MockServer, index: usize) -> Value {
    let requests = server
        .received_requests()
        .await
        .expect("request recording enabled");
    serde_json::from_slice(&requests[index].body).expect("request body is JSON")
}

mod get {
    use super::*;

    #[tokio::test]
    async fn decodes_content_with_embedded_line_breaks() {
        let server = MockServer::start().await;
        let text = "Hello 🌍\n漢字 everywhere";
        let mut encoded = BASE64.encode(text.as_bytes());
        encoded.insert(8, '\n'); // GitHub wraps encoded bodies
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/guide/intro.md"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "intro.md",
                "path": "docs/guide/intro.md",
                "sha": "abc123",
                "type": "file",
                "content": encoded,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let doc = store_for(&server).get("guide/intro.md").await.unwrap();
        assert_eq!(doc.content, text);
        assert_eq!(doc.path, "guide/intro.md");
        assert_eq!(doc.repo_path, "docs/guide/intro.md");
        assert_eq!(doc.name, "intro.md");
        assert_eq!(doc.sha, "abc123");
    }

    #[tokio::test]
    async fn absent_document_is_not_found_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/missing.md"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;

        let err = store_for(&server).get("missing.md").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(path) if path == "missing.md"));
    }

    #[tokio::test]
    async fn server_failure_carries_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(
                ResponseTemplate::new(502).set_body_json(json!({"message": "upstream sad"})),
            )
            .mount(&server)
            .await;

        let err = store_for(&server).get("a.md").await.unwrap_err();
        match err {
            StoreError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream sad");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn directory_target_is_not_a_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/guide"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "intro.md", "path": "docs/guide/intro.md", "sha": "abc", "type": "file"}
            ])))
            .mount(&server)
            .await;

        let err = store_for(&server).get("guide").await.unwrap_err();
        assert!(matches!(err, StoreError::NotAFile(path) if path == "guide"));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        // Nothing listens on this port
        let config = Config::new(
            "octocat",
            "wiki",
            "main",
            Some("docs"),
            "ghp_test",
            None,
            "http://127.0.0.1:9",
        );
        let err = GitHubStore::new(&config).get("a.md").await.unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
    }
}

mod put {
    use super::*;

    #[tokio::test]
    async fn create_omits_sha_and_generates_create_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/new.md"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octocat/wiki/contents/docs/new.md"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "content": {"name": "new.md", "path": "docs/new.md", "sha": "newsha"},
                "commit": {"sha": "commitsha", "message": "Create docs/new.md"},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = store_for(&server).put("new.md", "hello", None).await.unwrap();
        assert_eq!(result.path, "new.md");
        assert_eq!(result.name, "new.md");
        assert_eq!(result.content_sha.as_deref(), Some("newsha"));
        assert_eq!(result.commit.sha, "commitsha");
        assert_eq!(result.commit.message, "Create docs/new.md");

        // Second recorded request is the write
        let body = request_body(&server, 1).await;
        assert!(body.get("sha").is_none(), "create must not carry a sha");
        assert_eq!(body["branch"], "main");
        assert_eq!(body["message"], "Create docs/new.md");
        assert_eq!(body["content"], BASE64.encode(b"hello"));
    }

    #[tokio::test]
    async fn update_carries_discovered_sha_and_update_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "a.md",
                "path": "docs/a.md",
                "sha": "oldsha",
                "type": "file",
                "content": BASE64.encode(b"old"),
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": {"name": "a.md", "path": "docs/a.md", "sha": "newsha"},
                "commit": {"sha": "commitsha", "message": "Update docs/a.md"},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = store_for(&server).put("a.md", "new", None).await.unwrap();
        assert_eq!(result.content_sha.as_deref(), Some("newsha"));

        let body = request_body(&server, 1).await;
        assert_eq!(body["sha"], "oldsha");
        assert_eq!(body["message"], "Update docs/a.md");
    }

    #[tokio::test]
    async fn caller_message_wins_over_default() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "content": {"name": "a.md", "path": "docs/a.md", "sha": "s"},
                "commit": {"sha": "c", "message": "custom words"},
            })))
            .mount(&server)
            .await;

        store_for(&server)
            .put("a.md", "x", Some("custom words"))
            .await
            .unwrap();

        let body = request_body(&server, 1).await;
        assert_eq!(body["message"], "custom words");
    }

    #[tokio::test]
    async fn discovery_failure_aborts_without_writing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = store_for(&server).put("a.md", "x", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn stale_sha_conflict_surfaces_as_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "a.md",
                "path": "docs/a.md",
                "sha": "stale",
                "type": "file",
                "content": BASE64.encode(b"old"),
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(409).set_body_json(
                json!({"message": "docs/a.md does not match stale"}),
            ))
            .mount(&server)
            .await;

        let err = store_for(&server).put("a.md", "x", None).await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 409, .. }));
    }
}

mod delete {
    use super::*;

    #[tokio::test]
    async fn carries_discovered_sha() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "a.md",
                "path": "docs/a.md",
                "sha": "sha-file",
                "type": "file",
                "content": BASE64.encode(b"bye"),
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": null,
                "commit": {"sha": "commitsha", "message": "Delete docs/a.md"},
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = store_for(&server).delete("a.md", None).await.unwrap();
        assert_eq!(result.path, "a.md");
        assert!(result.content_sha.is_none());
        assert_eq!(result.commit.sha, "commitsha");

        let body = request_body(&server, 1).await;
        assert_eq!(body["sha"], "sha-file");
        assert_eq!(body["branch"], "main");
        assert_eq!(body["message"], "Delete docs/a.md");
    }

    #[tokio::test]
    async fn absent_document_issues_no_delete_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = store_for(&server).delete("a.md", None).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(path) if path == "a.md"));
    }
}

mod list {
    use super::*;

    #[tokio::test]
    async fn directory_entries_come_back_in_logical_form() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs"))
            .and(query_param("ref", "main"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "a.md", "path": "docs/a.md", "sha": "s1", "type": "file"},
                {"name": "guide", "path": "docs/guide", "sha": "s2", "type": "dir"},
            ])))
            .mount(&server)
            .await;

        let entries = store_for(&server).list("").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.md");
        assert_eq!(entries[0].path, "a.md");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "guide");
        assert_eq!(entries[1].path, "guide/");
        assert_eq!(entries[1].kind, EntryKind::Dir);
    }

    #[tokio::test]
    async fn single_file_answer_becomes_one_element_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/ftl"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "ftl",
                "path": "docs/ftl",
                "sha": "s1",
                "type": "file",
            })))
            .mount(&server)
            .await;

        let entries = store_for(&server).list("ftl").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].path, "ftl");
        assert_eq!(entries[0].kind, EntryKind::File);
    }

    #[tokio::test]
    async fn absent_directory_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/nope"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})),
            )
            .mount(&server)
            .await;

        let err = store_for(&server).list("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}

mod headers {
    use super::*;
    use wiremock::matchers::header;

    #[tokio::test]
    async fn requests_carry_auth_accept_and_client_identity() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/octocat/wiki/contents/docs/a.md"))
            .and(header("authorization", "Bearer ghp_test"))
            .and(header("accept", "application/vnd.github+json"))
            .and(header("user-agent", "gitshelf"))
            .and(header("x-github-api-version", "2022-11-28"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "a.md",
                "path": "docs/a.md",
                "sha": "s",
                "type": "file",
                "content": BASE64.encode(b"hi"),
            })))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server).get("a.md").await.unwrap();
    }
}
