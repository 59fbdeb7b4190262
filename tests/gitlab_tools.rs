mod common;

use common::{get_mock, payload, server_for, server_with_timeout};
use mockito::Matcher;
use serde_json::json;
use std::io::Write;
use std::time::Duration;

#[tokio::test]
async fn project_search_reports_pagination() {
    let mut gitlab = mockito::Server::new_async().await;
    let search = get_mock(
        &mut gitlab,
        "/api/v4/projects/9/search?scope=issues&search=login+bug&page=1&per_page=100",
    )
    .with_header("x-page", "1")
    .with_header("x-per-page", "100")
    .with_header("x-total-pages", "3")
    .with_header("x-total", "250")
    .with_header("x-next-page", "2")
    .with_body(json!([{"id": 1, "iid": 3, "title": "login fails"}]).to_string())
    .create_async()
    .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call(
            "search",
            json!({"projectId": 9, "scope": "issues", "search": "login bug"}),
        )
        .await
        .expect("call accepted");
    let value = payload(&result);

    search.assert_async().await;
    assert_eq!(value["items"][0]["title"], "login fails");
    assert_eq!(
        value["pagination"],
        json!({
            "current_page": 1,
            "per_page": 100,
            "total_pages": 3,
            "total_items": 250,
            "next_page": 2
        })
    );
}

#[tokio::test]
async fn last_page_has_no_next_page() {
    let mut gitlab = mockito::Server::new_async().await;
    let search = get_mock(&mut gitlab, "/api/v4/search?scope=projects&search=infra&page=3&per_page=100")
        .with_header("x-page", "3")
        .with_header("x-total-pages", "3")
        .with_header("x-next-page", "")
        .with_body("[]")
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call("search", json!({"scope": "projects", "search": "infra", "page": 3}))
        .await
        .expect("call accepted");
    let value = payload(&result);

    search.assert_async().await;
    assert!(value["pagination"].get("next_page").is_none());
    assert_eq!(value["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn list_projects_without_headers_has_empty_pagination() {
    let mut gitlab = mockito::Server::new_async().await;
    let projects = get_mock(&mut gitlab, "/api/v4/projects?page=1&per_page=100")
        .with_body(
            json!([
                {"id": 5, "name": "infra", "web_url": "https://gl/infra", "path_with_namespace": "ops/infra", "star_count": 4},
                "not-a-project"
            ])
            .to_string(),
        )
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call("list_projects", json!({}))
        .await
        .expect("call accepted");
    let value = payload(&result);

    projects.assert_async().await;
    assert_eq!(value["pagination"], json!({}));
    let items = value["items"].as_array().expect("items");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["path_with_namespace"], "ops/infra");
    assert!(items[0].get("star_count").is_none());
}

#[tokio::test]
async fn todos_pass_filters_and_the_access_token() {
    let mut gitlab = mockito::Server::new_async().await;
    let todos = get_mock(&mut gitlab, "/api/v4/todos?state=pending&page=1&per_page=100")
        .match_header("accept", "application/json")
        .with_body(json!([{"id": 1, "action_name": "assigned", "target": {"iid": 4}}]).to_string())
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call("get_todos", json!({"state": "pending"}))
        .await
        .expect("call accepted");
    let value = payload(&result);

    todos.assert_async().await;
    assert_eq!(value["items"][0]["target"]["iid"], 4);
}

#[tokio::test]
async fn namespaced_project_path_is_encoded_as_one_segment() {
    let target = "/api/v4/projects/group%2Fsub%20group%2Fproj/issues/12";
    let mut gitlab = mockito::Server::new_async().await;
    let issue = get_mock(&mut gitlab, target)
        .with_body(json!({"iid": 12, "title": "t"}).to_string())
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    server
        .handle_tools_call("get_issue", json!({"projectId": "group/sub group/proj", "issueIid": 12}))
        .await
        .expect("call accepted");

    issue.assert_async().await;
    let segment = target
        .trim_start_matches("/api/v4/projects/")
        .split('/')
        .next()
        .expect("segment");
    let decoded = percent_encoding::percent_decode_str(segment)
        .decode_utf8()
        .expect("utf8");
    assert_eq!(decoded, "group/sub group/proj");
}

#[tokio::test]
async fn dot_segment_identifiers_never_reach_the_network() {
    let mut gitlab = mockito::Server::new_async().await;
    let anything = gitlab
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let calls = [
        ("get_issue", json!({"projectId": "..", "issueIid": 7})),
        ("get_issue_notes", json!({"projectId": ".", "issueIid": 7})),
        ("get_wiki_page", json!({"projectId": 3, "slug": ".."})),
        ("get_wiki_page", json!({"projectId": 3, "slug": "."})),
        ("list_wiki_pages", json!({"projectId": ".."})),
        ("search", json!({"projectId": "..", "scope": "issues", "search": "x"})),
    ];
    for (tool, args) in calls {
        let err = server
            .handle_tools_call(tool, args)
            .await
            .expect_err("dot segment rejected");
        assert_eq!(err.code.as_i32(), -32602, "{}", tool);
    }

    anything.assert_async().await;
}

#[tokio::test]
async fn get_issue_is_returned_raw_and_stable() {
    let issue = json!({
        "iid": 12,
        "title": "Crash on save",
        "author": {"username": "dana", "id": 7},
        "time_stats": {"time_estimate": 0}
    });
    let mut gitlab = mockito::Server::new_async().await;
    let mock = get_mock(&mut gitlab, "/api/v4/projects/42/issues/12")
        .with_body(issue.to_string())
        .expect(2)
        .create_async()
        .await;
    let server = server_for(&gitlab.url());
    let args = json!({"projectId": 42, "issueIid": 12});

    let first = server
        .handle_tools_call("get_issue", args.clone())
        .await
        .expect("call accepted");
    let second = server
        .handle_tools_call("get_issue", args)
        .await
        .expect("call accepted");

    mock.assert_async().await;
    assert_eq!(first.text(), second.text());
    assert_eq!(payload(&first), issue);
}

#[tokio::test]
async fn issue_lists_are_shaped() {
    let mut gitlab = mockito::Server::new_async().await;
    let issues = get_mock(&mut gitlab, "/api/v4/projects/42/issues?state=opened&page=1&per_page=100")
        .with_header("x-total", "1")
        .with_body(
            json!([{
                "id": 100,
                "iid": 1,
                "title": "Flaky test",
                "author": {"username": "ravi", "id": 3},
                "assignees": [{"username": "li"}, {"username": "mo"}],
                "description": "long text"
            }])
            .to_string(),
        )
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call("get_issues", json!({"project_id": 42, "state": "opened"}))
        .await
        .expect("call accepted");
    let value = payload(&result);

    issues.assert_async().await;
    let issue = &value["items"][0];
    assert_eq!(issue["author"], "ravi");
    assert_eq!(issue["assignees"], json!(["li", "mo"]));
    assert!(issue.get("description").is_none());
    assert_eq!(value["pagination"], json!({"total_items": 1}));
}

#[tokio::test]
async fn issue_notes_are_shaped() {
    let mut gitlab = mockito::Server::new_async().await;
    let notes = get_mock(&mut gitlab, "/api/v4/projects/ops%2Finfra/issues/4/notes?page=2&per_page=100")
        .with_body(
            json!([{"id": 1, "body": "looks good", "author": {"username": "kim"}, "noteable_type": "Issue"}])
                .to_string(),
        )
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call("get_issue_notes", json!({"projectId": "ops/infra", "issueIid": 4, "page": 2}))
        .await
        .expect("call accepted");
    let value = payload(&result);

    notes.assert_async().await;
    assert_eq!(value["items"][0]["body"], "looks good");
    assert!(value["items"][0].get("noteable_type").is_none());
}

#[tokio::test]
async fn wiki_tools_pass_payloads_through() {
    let page = json!({"slug": "dev/setup", "title": "Setup", "content": "# Setup", "format": "markdown"});
    let mut gitlab = mockito::Server::new_async().await;
    let single = get_mock(&mut gitlab, "/api/v4/projects/3/wikis/dev%2Fsetup?render_html=true")
        .with_body(page.to_string())
        .create_async()
        .await;
    let listing = get_mock(&mut gitlab, "/api/v4/projects/3/wikis?with_content=false&page=1&per_page=100")
        .with_body(json!([{"slug": "home", "title": "Home"}]).to_string())
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call(
            "get_wiki_page",
            json!({"projectId": 3, "slug": "dev/setup", "render_html": true}),
        )
        .await
        .expect("call accepted");
    assert_eq!(payload(&result), page);

    let result = server
        .handle_tools_call("list_wiki_pages", json!({"projectId": 3, "with_content": false}))
        .await
        .expect("call accepted");
    assert_eq!(payload(&result)["items"], json!([{"slug": "home", "title": "Home"}]));

    single.assert_async().await;
    listing.assert_async().await;
}

#[tokio::test]
async fn unauthorized_is_reported_the_same_way_by_every_tool() {
    let mut gitlab = mockito::Server::new_async().await;
    let rejected = gitlab
        .mock("GET", Matcher::Any)
        .with_status(401)
        .with_body(json!({"message": "401 Unauthorized"}).to_string())
        .expect(8)
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let calls = [
        ("list_projects", json!({})),
        ("get_issues", json!({})),
        ("get_issue_notes", json!({"projectId": 1, "issueIid": 1})),
        ("search", json!({"scope": "issues", "search": "x"})),
        ("get_issue", json!({"projectId": 1, "issueIid": 1})),
        ("get_todos", json!({})),
        ("get_wiki_page", json!({"projectId": 1, "slug": "home"})),
        ("list_wiki_pages", json!({"projectId": 1})),
    ];
    for (tool, args) in calls {
        let result = server
            .handle_tools_call(tool, args)
            .await
            .unwrap_or_else(|err| panic!("{} rejected: {}", tool, err.message));
        assert!(result.is_error, "{} should fail", tool);
        assert_eq!(result.text(), "Unauthorized: check access token", "{}", tool);
    }

    rejected.assert_async().await;
}

#[tokio::test]
async fn missing_issue_is_not_found() {
    let mut gitlab = mockito::Server::new_async().await;
    let _missing = get_mock(&mut gitlab, "/api/v4/projects/42/issues/99999")
        .with_status(404)
        .with_body(json!({"message": "404 Issue Not Found"}).to_string())
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let result = server
        .handle_tools_call("get_issue", json!({"projectId": 42, "issueIid": 99999}))
        .await
        .expect("call accepted");

    assert!(result.is_error);
    assert_eq!(result.text(), "Not found: the requested resource does not exist");
}

#[tokio::test]
async fn forbidden_and_server_errors_keep_their_categories() {
    let mut gitlab = mockito::Server::new_async().await;
    let _forbidden = get_mock(&mut gitlab, "/api/v4/todos?state=pending&page=1&per_page=100")
        .with_status(403)
        .with_body(json!({"message": "403 Forbidden"}).to_string())
        .create_async()
        .await;
    let _broken = get_mock(&mut gitlab, "/api/v4/todos?state=done&page=1&per_page=100")
        .with_status(500)
        .with_body(json!({"message": "database is on fire"}).to_string())
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let forbidden = server
        .handle_tools_call("get_todos", json!({"state": "pending"}))
        .await
        .expect("call accepted");
    assert!(forbidden.is_error);
    assert_eq!(forbidden.text(), "Forbidden: insufficient permission for this resource");

    let remote = server
        .handle_tools_call("get_todos", json!({"state": "done"}))
        .await
        .expect("call accepted");
    assert!(remote.is_error);
    assert_eq!(remote.text(), "Remote API error: database is on fire");
}

#[tokio::test]
async fn slow_gitlab_hits_the_request_timeout() {
    let mut gitlab = mockito::Server::new_async().await;
    let _slow = get_mock(&mut gitlab, "/api/v4/projects/42/issues/1")
        .with_chunked_body(|writer| {
            std::thread::sleep(Duration::from_millis(1_000));
            writer.write_all(b"{}")
        })
        .create_async()
        .await;
    let server = server_with_timeout(&gitlab.url(), 100);

    let result = server
        .handle_tools_call("get_issue", json!({"projectId": 42, "issueIid": 1}))
        .await
        .expect("call accepted");

    assert!(result.is_error);
    assert_eq!(
        result.text(),
        "An unexpected error occurred: request to GitLab timed out"
    );
}

#[tokio::test]
async fn unreachable_host_is_an_unexpected_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let server = server_for(&format!("http://{}", addr));

    let result = server
        .handle_tools_call("list_projects", json!({}))
        .await
        .expect("call accepted");

    assert!(result.is_error);
    assert!(
        result.text().starts_with("An unexpected error occurred: "),
        "got {}",
        result.text()
    );
}

#[tokio::test]
async fn invalid_arguments_are_rejected_before_any_request() {
    let mut gitlab = mockito::Server::new_async().await;
    let anything = gitlab
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let server = server_for(&gitlab.url());

    let err = server
        .handle_tools_call("get_issue", json!({"projectId": "9", "issueIid": "twelve"}))
        .await
        .expect_err("rejected");
    assert_eq!(err.code.as_i32(), -32602);

    let err = server
        .handle_tools_call("search", json!({"scope": "issues", "search": "   "}))
        .await
        .expect_err("rejected");
    assert_eq!(err.code.as_i32(), -32602);

    let err = server
        .handle_tools_call("list_projects", json!({"page": 0}))
        .await
        .expect_err("rejected");
    assert_eq!(err.code.as_i32(), -32602);

    anything.assert_async().await;
}
