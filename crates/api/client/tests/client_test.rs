//! Request pipeline tests against a mock Admin API and token endpoint.

use mockito::{Matcher, Server};
use serde_json::json;

use salla_client::{ApiError, SallaClient, DEFAULT_USER_AGENT};
use salla_core::{CreateProductRequest, ListOptions};
use salla_oauth::{OAuthConfig, OAuthEndpoints, Token};

fn client(server: &Server, token: Option<Token>) -> SallaClient {
    let config = OAuthConfig::new("client_id", "client_secret").endpoints(OAuthEndpoints {
        authorization_url: format!("{}/oauth2/auth", server.url()),
        token_url: format!("{}/oauth2/token", server.url()),
    });
    let mut builder = SallaClient::builder(config).base_url(server.url());
    if let Some(token) = token {
        builder = builder.token(token);
    }
    builder.build().unwrap()
}

fn fresh_token() -> Token {
    Token::expiring_in("valid-access", "refresh", 3600)
}

#[tokio::test]
async fn test_list_products_sends_credentials_and_paging() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/products")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "2".into()),
            Matcher::UrlEncoded("per_page".into(), "10".into()),
        ]))
        .match_header("authorization", "Bearer valid-access")
        .match_header("accept", "application/json")
        .match_header("user-agent", DEFAULT_USER_AGENT)
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "code": 200,
                "data": [{"id": 1, "name": "Shirt"}, {"id": 2, "name": "Hat"}],
                "pagination": {"current_page": 2, "last_page": 3, "per_page": 10, "total": 25}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = client(&server, Some(fresh_token()))
        .products()
        .list(Some(ListOptions::new().page(2).per_page(10)))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[1].name, "Hat");
    assert!(page.has_next_page());
    assert_eq!(page.pagination.and_then(|p| p.next_page()), Some(3));
}

#[tokio::test]
async fn test_bearer_header_omitted_without_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/orders/7")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"success": true, "code": 200, "data": {"id": 7, "reference_id": "R-7"}}"#)
        .create_async()
        .await;

    let order = client(&server, None).orders().get(7).await.unwrap();

    mock.assert_async().await;
    assert_eq!(order.reference_id, "R-7");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_before_request() {
    let mut server = Server::new_async().await;
    let refresh = server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::UrlEncoded(
            "refresh_token".into(),
            "old-refresh".into(),
        ))
        .with_status(200)
        .with_body(
            r#"{"access_token": "new-access", "refresh_token": "new-refresh", "expires_in": 3600}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let api = server
        .mock("GET", "/customers/3")
        .match_header("authorization", "Bearer new-access")
        .with_status(200)
        .with_body(r#"{"data": {"id": 3, "first_name": "Sara"}}"#)
        .expect(2)
        .create_async()
        .await;

    let client = client(&server, Some(Token::expiring_in("old-access", "old-refresh", -10)));
    client.customers().get(3).await.unwrap();
    client.customers().get(3).await.unwrap();

    refresh.assert_async().await;
    api.assert_async().await;
    let token = client.token().await.unwrap();
    assert_eq!(token.access_token, "new-access");
    assert_eq!(token.refresh_token, "new-refresh");
}

#[tokio::test]
async fn test_failed_refresh_falls_back_to_cached_token() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/oauth2/token")
        .with_status(500)
        .with_body("unavailable")
        .create_async()
        .await;
    let api = server
        .mock("GET", "/brands/4")
        .match_header("authorization", "Bearer stale-access")
        .with_status(200)
        .with_body(r#"{"data": {"id": 4, "name": "Acme"}}"#)
        .create_async()
        .await;

    let client = client(&server, Some(Token::expiring_in("stale-access", "refresh", 60)));
    let brand = client.brands().get(4).await.unwrap();

    api.assert_async().await;
    assert_eq!(brand.name, "Acme");
    assert_eq!(client.token().await.unwrap().access_token, "stale-access");
}

#[tokio::test]
async fn test_remote_error_is_classified() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/products/sku/MISSING")
        .with_status(404)
        .with_body(r#"{"success": false, "code": 404, "message": "Product not found"}"#)
        .create_async()
        .await;

    let err = client(&server, Some(fresh_token()))
        .products()
        .get_by_sku("MISSING")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(!err.is_rate_limited());
    assert_eq!(err.remote().map(|e| e.message.as_str()), Some("Product not found"));
}

#[tokio::test]
async fn test_sku_is_encoded_as_one_path_segment() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/products/sku/A%2FB%3Fc%23d")
        .with_status(200)
        .with_body(r#"{"success": true, "code": 200, "data": {"id": 7, "name": "Odd", "sku": "A/B?c#d"}}"#)
        .create_async()
        .await;

    let product = client(&server, Some(fresh_token()))
        .products()
        .get_by_sku("A/B?c#d")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(product.id, 7);
    assert_eq!(product.sku, "A/B?c#d");
}

#[tokio::test]
async fn test_rate_limit_with_plain_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/categories")
        .with_status(429)
        .with_body("Too Many Requests")
        .create_async()
        .await;

    let err = client(&server, Some(fresh_token()))
        .categories()
        .list(None)
        .await
        .unwrap_err();

    assert!(err.is_rate_limited());
    assert_eq!(err.remote().unwrap().message, "Too Many Requests");
}

#[tokio::test]
async fn test_create_product_sends_json_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/products")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "name": "Shirt",
            "price": 49.5,
            "quantity": 3
        })))
        .with_status(201)
        .with_body(r#"{"success": true, "code": 201, "data": {"id": 99, "name": "Shirt", "price": 49.5}}"#)
        .create_async()
        .await;

    let product = client(&server, Some(fresh_token()))
        .products()
        .create(&CreateProductRequest::new("Shirt", 49.5, 3))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(product.id, 99);
}

#[tokio::test]
async fn test_change_status_and_delete() {
    let mut server = Server::new_async().await;
    let status = server
        .mock("POST", "/products/5/status")
        .match_body(Matcher::Json(json!({"status": "hidden"})))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/products/5")
        .with_status(204)
        .create_async()
        .await;

    let client = client(&server, Some(fresh_token()));
    client.products().change_status(5, "hidden").await.unwrap();
    client.products().delete(5).await.unwrap();

    status.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_undecodable_success_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/orders/reservations")
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;

    let err = client(&server, Some(fresh_token()))
        .orders()
        .list_reservations(None)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Decode(_)));
}
