use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use quiz_solver::models::AnswerValue;
use quiz_solver::services::{AttachmentFetcher, PageNavigator, SubmissionDispatcher};
use quiz_solver::workflow::SolveCtx;

#[tokio::test]
async fn test_submitter_posts_payload_and_records_json_response() {
    let server = MockServer::start().await;
    // 载荷固定为 {email, secret, url, answer}，身份缺省时透传 null
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_partial_json(json!({
            "email": null,
            "secret": null,
            "url": "https://quiz.example/q/1",
            "answer": 42
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"correct": true})))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = SolveCtx::with_timeout("https://quiz.example/q/1", Duration::from_secs(160));
    let submitter = SubmissionDispatcher::new(Duration::from_secs(5));
    let answer = AnswerValue::Integer(42);

    let response = submitter
        .submit(&format!("{}/submit", server.uri()), &ctx, Some(&answer))
        .await
        .expect("提交应该成功");

    assert_eq!(response["correct"], true);
}

#[tokio::test]
async fn test_submitter_keeps_non_json_body_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let ctx = SolveCtx::with_timeout("https://quiz.example/q/1", Duration::from_secs(160));
    let submitter = SubmissionDispatcher::new(Duration::from_secs(5));

    let response = submitter
        .submit(&format!("{}/submit", server.uri()), &ctx, None)
        .await
        .expect("提交应该成功");

    assert_eq!(response["status_code"], 200);
    assert_eq!(response["text"], "OK");
}

#[tokio::test]
async fn test_submitter_transport_error_is_reported() {
    // 端口 1 没有监听者，连接必然失败
    let ctx = SolveCtx::with_timeout("https://quiz.example/q/1", Duration::from_secs(160));
    let submitter = SubmissionDispatcher::new(Duration::from_secs(5));

    let result = submitter.submit("http://127.0.0.1:1/submit", &ctx, None).await;

    let err = result.expect_err("无监听者时提交应该失败");
    assert!(err.message().contains("提交请求失败"), "实际错误: {}", err);
}

#[tokio::test]
async fn test_fetcher_reports_http_status_on_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.csv"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = AttachmentFetcher::new(Duration::from_secs(5));
    let result = fetcher.fetch(&format!("{}/missing.csv", server.uri())).await;

    let err = result.expect_err("404 应该是硬失败");
    assert!(err.message().contains("404"), "实际错误: {}", err);
}

#[tokio::test]
async fn test_fetcher_returns_bytes_and_filename_hint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data.csv"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"a,b\n1,2\n3,4\n".to_vec(), "text/csv"),
        )
        .mount(&server)
        .await;

    let fetcher = AttachmentFetcher::new(Duration::from_secs(5));
    let (bytes, hint) = fetcher
        .fetch(&format!("{}/data.csv", server.uri()))
        .await
        .expect("下载应该成功");

    assert_eq!(bytes, b"a,b\n1,2\n3,4\n");
    assert_eq!(hint, "data.csv");
}

#[tokio::test]
#[ignore] // 默认忽略，需要本机 Chrome：cargo test -- --ignored
async fn test_navigate_finds_literal_submit_url() {
    use quiz_solver::browser::launch_headless_browser;
    use quiz_solver::infrastructure::JsExecutor;

    let _ = tracing_subscriber::fmt::try_init();

    let server = MockServer::start().await;
    let html =
        "<html><body>POST your answer to https://quiz.example/submit/abc123 when done.</body></html>";
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&server)
        .await;

    let (mut browser, page, handler_task) = launch_headless_browser(None)
        .await
        .expect("启动浏览器失败");
    let executor = JsExecutor::new(page);

    let navigator = PageNavigator::new(Duration::from_secs(30));
    let snapshot = navigator.navigate(&executor, &server.uri()).await;

    println!("正文: {}", snapshot.body_text);
    assert_eq!(
        snapshot.submit_url_guess.as_deref(),
        Some("https://quiz.example/submit/abc123")
    );

    let _ = browser.close().await;
    handler_task.abort();
    let _ = handler_task.await;
}

#[tokio::test]
#[ignore]
async fn test_navigate_captures_post_load_rendering() {
    use quiz_solver::browser::launch_headless_browser;
    use quiz_solver::infrastructure::JsExecutor;

    let _ = tracing_subscriber::fmt::try_init();

    let server = MockServer::start().await;
    // 正文在 load 之后才由脚本写入，抓取必须等到渲染窗口结束
    let html = "<html><body><div id=\"q\">loading</div><script>\
                setTimeout(() => { document.getElementById('q').textContent = 'answer is 7'; }, 200);\
                </script></body></html>";
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&server)
        .await;

    let (mut browser, page, handler_task) = launch_headless_browser(None)
        .await
        .expect("启动浏览器失败");
    let executor = JsExecutor::new(page);

    let navigator = PageNavigator::new(Duration::from_secs(30));
    let snapshot = navigator.navigate(&executor, &server.uri()).await;

    assert!(
        snapshot.body_text.contains("answer is 7"),
        "实际正文: {}",
        snapshot.body_text
    );

    let _ = browser.close().await;
    handler_task.abort();
    let _ = handler_task.await;
}

#[tokio::test]
#[ignore]
async fn test_form_action_fallback_resolves_relative_action() {
    use quiz_solver::browser::launch_headless_browser;
    use quiz_solver::infrastructure::JsExecutor;

    let _ = tracing_subscriber::fmt::try_init();

    let server = MockServer::start().await;
    let html = "<html><body><form action=\"/go\"><input name=\"answer\"/></form></body></html>";
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&server)
        .await;

    let (mut browser, page, handler_task) = launch_headless_browser(None)
        .await
        .expect("启动浏览器失败");
    let executor = JsExecutor::new(page);

    let navigator = PageNavigator::new(Duration::from_secs(30));
    let _ = navigator.navigate(&executor, &server.uri()).await;

    let fallback = navigator.form_action_fallback(&executor, &server.uri()).await;
    assert_eq!(fallback, Some(format!("{}/go", server.uri())));

    let _ = browser.close().await;
    handler_task.abort();
    let _ = handler_task.await;
}
