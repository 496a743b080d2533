use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use dd_core::credentials::{PhoneNumber, Pin};
use dd_core::identity::UserId;
use dd_core::ports::{AdminDirectoryPort, AuthGatewayPort, GatewayError, RewardServicePort};
use dd_core::security::SecretString;
use dd_infra::{ApiClientConfig, RewardApiClient};

fn client(base_url: String) -> RewardApiClient {
    RewardApiClient::new(ApiClientConfig {
        base_url,
        api_key: SecretString::from("anon-key"),
        timeout: Duration::from_secs(5),
    })
    .expect("client")
}

fn phone() -> PhoneNumber {
    PhoneNumber::parse("+14155550123").unwrap()
}

#[tokio::test]
async fn login_posts_credentials_with_bearer_key() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/auth/login")
        .match_header("authorization", "Bearer anon-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "phone": "+14155550123",
            "password": "hunter2"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"message":"PIN required"}"#)
        .create_async()
        .await;

    client(server.url())
        .login(&phone(), &SecretString::from("hunter2"))
        .await
        .expect("login");

    mock.assert_async().await;
}

#[tokio::test]
async fn login_refused_with_success_false_keeps_service_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(200)
        .with_body(r#"{"success":false,"error":"Invalid phone number or password"}"#)
        .create_async()
        .await;

    let err = client(server.url())
        .login(&phone(), &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Rejected {
            status: Some(200),
            message: "Invalid phone number or password".to_string(),
        }
    );
}

#[tokio::test]
async fn http_error_without_body_uses_status_text() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/login")
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let err = client(server.url())
        .login(&phone(), &SecretString::from("hunter2"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        GatewayError::Rejected {
            status: Some(502),
            message: "HTTP error! status: 502".to_string(),
        }
    );
}

#[tokio::test]
async fn http_error_prefers_body_error() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/verify-pin")
        .with_status(401)
        .with_body(r#"{"error":"Invalid PIN code"}"#)
        .create_async()
        .await;

    let err = client(server.url())
        .verify_pin(&phone(), &Pin::parse("000000").unwrap())
        .await
        .unwrap_err();

    assert_eq!(err.user_message("fallback"), "Invalid PIN code");
}

#[tokio::test]
async fn verify_pin_returns_identity() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/auth/verify-pin")
        .match_body(Matcher::Json(json!({
            "phone": "+14155550123",
            "pin": "123456"
        })))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "user": {
                    "id": "user-42",
                    "phone": "+14155550123",
                    "name": "Ada",
                    "createdAt": "2023-11-02T08:00:00Z",
                    "lastLogin": "2024-03-10T09:30:00Z"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let identity = client(server.url())
        .verify_pin(&phone(), &Pin::parse("123456").unwrap())
        .await
        .expect("verify");

    assert_eq!(identity.id, UserId::from("user-42"));
    assert_eq!(identity.name.as_deref(), Some("Ada"));
    assert_eq!(identity.last_login.as_deref(), Some("2024-03-10T09:30:00Z"));
}

#[tokio::test]
async fn stats_path_segment_is_percent_encoded() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/user/stats/%2B14155550123")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "stats": {
                    "totalRewards": 12,
                    "lastRewardClaim": "2024-03-09",
                    "joinDate": "2023-11-02T08:00:00Z",
                    "lastLogin": "2024-03-10T09:30:00Z"
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let stats = client(server.url())
        .get_user_stats("+14155550123")
        .await
        .expect("stats");

    mock.assert_async().await;
    assert_eq!(stats.total_rewards, 12);
    assert_eq!(
        stats.last_reward_claim,
        Some("2024-03-09".parse().unwrap())
    );
}

#[tokio::test]
async fn collect_reward_reads_receipt_and_keeps_base_path() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/functions/v1/rewards/collect")
        .match_body(Matcher::Json(json!({ "phone": "+14155550123" })))
        .with_status(200)
        .with_body(r#"{"success":true,"totalRewards":13,"lastClaimed":"2024-03-10T00:00:05.123Z"}"#)
        .create_async()
        .await;

    let receipt = client(format!("{}/functions/v1/", server.url()))
        .collect_reward("+14155550123")
        .await
        .expect("collect");

    assert_eq!(receipt.total_rewards, 13);
    assert_eq!(receipt.last_claimed, Some("2024-03-10".parse().unwrap()));
}

#[tokio::test]
async fn committed_claim_with_unreadable_date_still_returns_receipt() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/rewards/collect")
        .with_status(200)
        .with_body(r#"{"success":true,"totalRewards":5,"lastClaimed":"2024-03-10 09:15:00+00"}"#)
        .create_async()
        .await;

    let receipt = client(server.url())
        .collect_reward("+14155550123")
        .await
        .expect("collect");

    assert_eq!(receipt.total_rewards, 5);
    assert_eq!(receipt.last_claimed, None);
}

#[tokio::test]
async fn malformed_success_payload_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/user/stats/%2B14155550123")
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create_async()
        .await;

    let err = client(server.url())
        .get_user_stats("+14155550123")
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidResponse(_)));
}

#[tokio::test]
async fn admin_listing_ignores_secret_fields() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/admin/users")
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "users": [{
                    "id": "user-42",
                    "phone": "+14155550123",
                    "name": "Ada",
                    "password": "hunter2",
                    "pinCode": "123456",
                    "createdAt": "2023-11-02T08:00:00Z",
                    "lastLogin": "2024-03-10T09:30:00Z",
                    "totalRewards": 12,
                    "isActive": true,
                    "lastRewardClaim": "2024-03-09",
                    "hasPinSet": true
                }],
                "totalUsers": 1,
                "activeUsers": 1,
                "totalRewards": 12
            })
            .to_string(),
        )
        .create_async()
        .await;

    let directory = client(server.url()).list_users().await.expect("users");

    assert_eq!(directory.total_users, 1);
    assert_eq!(directory.users[0].total_rewards, 12);
    assert!(directory.users[0].has_pin_set);
    let serialized = serde_json::to_string(&directory).unwrap();
    assert!(!serialized.contains("hunter2"));
    assert!(!serialized.contains("pinCode"));
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let err = client("http://127.0.0.1:9".to_string())
        .list_users()
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
}
