use crate::constants::{BCRYPT_COST, TOKEN_ISSUED, USER_REGISTERED, USER_SAVED};
use crate::core::errors::StoreError;
use crate::core::models::user::{NewUser, Role};
use crate::tests::{create_test_service, new_user, register};

#[tokio::test]
async fn test_register_hashes_password() {
    let service = create_test_service();
    for password in ["abcd", "pass1234", "twenty-chars-long!!!"] {
        let account = format!("user{}", password.len());
        let user = service.register_user(new_user(&account, password)).await.unwrap();

        assert_ne!(user.password, password);
        assert!(service.verify_password(password, &user.password).unwrap());
        let parts: bcrypt::HashParts = user.password.parse().unwrap();
        assert_eq!(parts.get_cost(), BCRYPT_COST);
        assert!(user.password.starts_with("$2b$10$"));

        let stored = service.get_user(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.password, user.password);
        assert_eq!(stored.role, Role::User);
    }
}

#[tokio::test]
async fn test_register_rejects_bad_password_length() {
    let service = create_test_service();
    for password in ["", "abc", "this-password-is-21ch"] {
        let result = service.register_user(new_user("dave2024", password)).await;
        let err = result.unwrap_err();
        let fields = err.field_errors().expect("validation error");
        assert!(fields.has_field("password"), "no password error for {:?}", password);
    }
    assert!(service.list_users().await.unwrap().is_empty());
    assert!(service.get_app_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_same_password_hashes_differently() {
    let service = create_test_service();
    let first = service.register_user(new_user("erin0001", "samepass")).await.unwrap();
    let second = service.register_user(new_user("erin0002", "samepass")).await.unwrap();

    assert_ne!(first.password, second.password);
    assert!(service.verify_password("samepass", &first.password).unwrap());
    assert!(service.verify_password("samepass", &second.password).unwrap());
}

#[tokio::test]
async fn test_schema_and_password_errors_are_aggregated() {
    let service = create_test_service();
    let result = service
        .register_user(NewUser {
            account: "x!".to_string(),
            email: "nope".to_string(),
            password: "ab".to_string(),
            role: None,
        })
        .await;

    let err = result.unwrap_err();
    let fields = err.field_errors().unwrap();
    assert_eq!(fields.len(), 3);
    assert!(fields.has_field("account"));
    assert!(fields.has_field("email"));
    assert!(fields.has_field("password"));
}

#[tokio::test]
async fn test_duplicate_account_and_email_rejected() {
    let service = create_test_service();
    register(&service, "frank01").await;

    let mut same_account = new_user("frank01", "pass1234");
    same_account.email = "other@example.com".to_string();
    let result = service.register_user(same_account).await;
    assert!(matches!(result, Err(StoreError::Duplicate { ref field, .. }) if field == "account"));

    let mut same_email = new_user("frank02", "pass1234");
    same_email.email = "frank01@example.com".to_string();
    let result = service.register_user(same_email).await;
    assert!(matches!(result, Err(StoreError::Duplicate { ref field, .. }) if field == "email"));
}

#[tokio::test]
async fn test_tokens_bounded_to_three_newest() {
    let service = create_test_service();
    let user = register(&service, "grace01").await;

    for token in ["t1", "t2", "t3"] {
        service.push_token(&user.id, token.to_string()).await.unwrap();
    }
    let user = service.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(user.tokens, vec!["t1", "t2", "t3"]);

    let user = service.push_token(&user.id, "t4".to_string()).await.unwrap();
    assert_eq!(user.tokens, vec!["t2", "t3", "t4"]);

    let stored = service.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.tokens, vec!["t2", "t3", "t4"]);
}

#[tokio::test]
async fn test_role_update_keeps_hash_and_tokens() {
    let service = create_test_service();
    let user = register(&service, "heidi01").await;
    service.push_token(&user.id, "t1".to_string()).await.unwrap();
    let before = service.get_user(&user.id).await.unwrap().unwrap();

    let after = service.set_role(&user.id, Role::Admin).await.unwrap();
    assert_eq!(after.role, Role::Admin);
    assert_eq!(after.password, before.password);
    assert_eq!(after.tokens, before.tokens);
    assert_eq!(after.created_at, before.created_at);
    assert!(service.verify_password("pass1234", &after.password).unwrap());
}

#[tokio::test]
async fn test_unchanged_save_is_noop() {
    let service = create_test_service();
    let user = register(&service, "ivan0001").await;

    let saved = service.save_user(user.clone()).await.unwrap();
    assert_eq!(saved.password, user.password);
    assert_eq!(saved.updated_at, user.updated_at);

    let actions: Vec<String> = service
        .get_app_logs()
        .await
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(actions, vec![USER_REGISTERED]);
}

#[tokio::test]
async fn test_change_password_rehashes() {
    let service = create_test_service();
    let user = register(&service, "judy0001").await;

    let updated = service.change_password(&user.id, "newpass99").await.unwrap();
    assert_ne!(updated.password, user.password);
    assert!(service.verify_password("newpass99", &updated.password).unwrap());
    assert!(!service.verify_password("pass1234", &updated.password).unwrap());
}

#[tokio::test]
async fn test_failed_password_change_commits_nothing() {
    let service = create_test_service();
    let user = register(&service, "kate0001").await;

    let result = service.change_password(&user.id, "no").await;
    assert!(matches!(result, Err(StoreError::Validation(_))));

    let stored = service.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.password, user.password);
    assert!(service.verify_password("pass1234", &stored.password).unwrap());
}

#[tokio::test]
async fn test_sign_in_issues_bounded_tokens() {
    let service = create_test_service();
    let user = register(&service, "liam0001").await;

    let mut issued = Vec::new();
    for _ in 0..4 {
        issued.push(service.sign_in("liam0001", "pass1234").await.unwrap());
    }

    let stored = service.get_user(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.tokens, issued[1..].to_vec());

    let claims = service.tokens().decode(&issued[3]).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.role, "user");

    let issued_logs = service
        .get_app_logs()
        .await
        .unwrap()
        .into_iter()
        .filter(|log| log.action == TOKEN_ISSUED)
        .count();
    assert_eq!(issued_logs, 4);
}

#[tokio::test]
async fn test_sign_in_rejects_bad_credentials() {
    let service = create_test_service();
    register(&service, "mia00001").await;

    let wrong_password = service.sign_in("mia00001", "wrongpass").await;
    assert!(matches!(wrong_password, Err(StoreError::InvalidCredentials)));

    let unknown = service.sign_in("nobody00", "pass1234").await;
    assert!(matches!(unknown, Err(StoreError::InvalidCredentials)));
}

#[tokio::test]
async fn test_sign_out_removes_token() {
    let service = create_test_service();
    let user = register(&service, "noah0001").await;
    let first = service.sign_in("noah0001", "pass1234").await.unwrap();
    let second = service.sign_in("noah0001", "pass1234").await.unwrap();

    let user = service.sign_out(&user.id, &first).await.unwrap();
    assert_eq!(user.tokens, vec![second.clone()]);

    // unknown token is a no-op
    let user = service.sign_out(&user.id, "not-a-token").await.unwrap();
    assert_eq!(user.tokens, vec![second]);
}

#[tokio::test]
async fn test_audit_log_never_holds_password() {
    let service = create_test_service();
    let user = register(&service, "olga0001").await;
    service.change_password(&user.id, "hidden77").await.unwrap();

    let logs = service.get_app_logs().await.unwrap();
    assert_eq!(logs[1].action, USER_SAVED);
    assert_eq!(logs[1].details["modified"], serde_json::json!(["password"]));
    for log in logs {
        let details = log.details.to_string();
        assert!(!details.contains("pass1234"));
        assert!(!details.contains("hidden77"));
        assert!(!details.contains("$2"));
    }
}

#[tokio::test]
async fn test_missing_user_operations() {
    let service = create_test_service();
    let result = service.set_role("missing", Role::Admin).await;
    assert!(matches!(result, Err(StoreError::UserNotFound(ref id)) if id == "missing"));
    assert!(service.get_user("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_service_from_config() {
    use crate::config::CONFIG;
    use crate::core::services::StoreService;
    use crate::infrastructure::{logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage};

    let service = StoreService::from_config(InMemoryStorage::new(), InMemoryLogging::new());
    let user = register(&service, "wendy001").await;
    let token = service.sign_in("wendy001", "pass1234").await.unwrap();

    let claims = service.tokens().decode(&token).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!((claims.exp - claims.iat) as u64, CONFIG.token_ttl_secs);
}

#[tokio::test]
async fn test_astral_password_counts_utf16_units() {
    let service = create_test_service();

    // 20 emoji are 40 UTF-16 units and 80 bytes
    let result = service.register_user(new_user("xena0001", &"😀".repeat(20))).await;
    let err = result.unwrap_err();
    assert!(err.field_errors().unwrap().has_field("password"));
    assert!(service.list_users().await.unwrap().is_empty());

    // 10 emoji are 20 units and 40 bytes, well inside bcrypt's input
    let password = "😀".repeat(10);
    let user = service.register_user(new_user("xena0001", &password)).await.unwrap();
    assert!(service.verify_password(&password, &user.password).unwrap());
    let near_miss = "😀".repeat(9) + "ab";
    assert!(!service.verify_password(&near_miss, &user.password).unwrap());
}

#[tokio::test]
async fn test_user_logs_follow_the_actor() {
    let service = create_test_service();
    let yara = register(&service, "yara0001").await;
    let zane = register(&service, "zane0001").await;
    service.sign_in("yara0001", "pass1234").await.unwrap();

    let actions: Vec<String> = service
        .get_user_logs(&yara.id)
        .await
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(actions, vec![USER_REGISTERED, USER_SAVED, TOKEN_ISSUED]);
    assert_eq!(service.get_user_logs(&zane.id).await.unwrap().len(), 1);
}
