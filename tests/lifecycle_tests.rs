//! Lifecycle tests against a mock MySQL connection.
//!
//! The mock records every statement it receives, so each test asserts the
//! exact SQL issued, including the cases where nothing may be sent.

use mysql_user_controller::db::Provider;
use mysql_user_controller::domain::{
    AuthPlugin, ChangeSet, EntityIdentifier, ServerVersion, UserResource, UserSpec,
};
use mysql_user_controller::services::{SeaOrmUserService, UserError, UserLifecycle};
use sea_orm::{
    DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, MockExecResult, Transaction, Value,
};
use std::collections::BTreeMap;

fn exec_ok(count: usize) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results((0..count).map(|_| MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }))
        .into_connection()
}

fn exec_err(message: &str) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_errors([DbErr::Custom(message.to_string())])
        .into_connection()
}

fn statement(sql: &str) -> Transaction {
    Transaction::from_sql_and_values(DatabaseBackend::MySql, sql, Vec::<Value>::new())
}

fn read_statement(name: &str) -> Transaction {
    Transaction::from_sql_and_values(
        DatabaseBackend::MySql,
        "SELECT USER FROM mysql.user WHERE USER = ?",
        [Value::from(name)],
    )
}

fn password_changed() -> ChangeSet {
    ChangeSet {
        plaintext_password: true,
        ..ChangeSet::default()
    }
}

#[tokio::test]
async fn create_sets_identifier_that_decodes_back() {
    let db = exec_ok(1);
    let service = SeaOrmUserService::new();
    let mut resource = UserResource::new(
        UserSpec::new("alice")
            .with_host("10.0.0.%")
            .with_plaintext_password("s3cret"),
    );

    let id = service.create(&mut resource, &db).await.unwrap();

    assert_eq!(id.to_string(), "alice@10.0.0.%");
    assert_eq!(resource.id(), Some(&id));
    assert_eq!(
        EntityIdentifier::decode(&id.to_string()).unwrap(),
        ("alice".to_string(), "10.0.0.%".to_string())
    );
    assert_eq!(
        db.into_transaction_log(),
        [statement("CREATE USER 'alice'@'10.0.0.%' IDENTIFIED BY 's3cret'")]
    );
}

#[tokio::test]
async fn create_uses_legacy_password_when_plaintext_absent() {
    let db = exec_ok(1);
    let mut resource = UserResource::new(UserSpec::new("bob").with_legacy_password("old"));

    SeaOrmUserService::new()
        .create(&mut resource, &db)
        .await
        .unwrap();

    assert_eq!(
        db.into_transaction_log(),
        [statement("CREATE USER 'bob'@'localhost' IDENTIFIED BY 'old'")]
    );
}

#[tokio::test]
async fn create_iam_on_localhost_issues_nothing() {
    let db = exec_ok(1);
    let mut resource = UserResource::new(
        UserSpec::new("iam").with_auth_plugin(AuthPlugin::AwsAuthentication),
    );

    let err = SeaOrmUserService::new()
        .create(&mut resource, &db)
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::Validation(_)));
    assert!(resource.id().is_none());
    assert!(db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn create_with_plugin_never_sends_password() {
    let db = exec_ok(2);
    let service = SeaOrmUserService::new();

    let mut iam = UserResource::new(
        UserSpec::new("iam")
            .with_host("%")
            .with_plaintext_password("ignored")
            .with_auth_plugin(AuthPlugin::AwsAuthentication),
    );
    service.create(&mut iam, &db).await.unwrap();

    let mut locked = UserResource::new(
        UserSpec::new("locked")
            .with_legacy_password("ignored")
            .with_auth_plugin(AuthPlugin::NoLogin),
    );
    service.create(&mut locked, &db).await.unwrap();

    assert_eq!(
        db.into_transaction_log(),
        [
            statement("CREATE USER 'iam'@'%' IDENTIFIED WITH AWSAuthenticationPlugin as 'RDS'"),
            statement("CREATE USER 'locked'@'localhost' IDENTIFIED WITH mysql_no_login"),
        ]
    );
}

#[tokio::test]
async fn create_failure_surfaces_error_and_keeps_identifier_empty() {
    let db = exec_err("Operation CREATE USER failed for 'alice'@'localhost'");
    let mut resource = UserResource::new(UserSpec::new("alice").with_plaintext_password("pw"));

    let err = SeaOrmUserService::new()
        .create(&mut resource, &db)
        .await
        .unwrap_err();

    match err {
        UserError::Execution(DbErr::Custom(message)) => {
            assert_eq!(message, "Operation CREATE USER failed for 'alice'@'localhost'");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(resource.id().is_none());
}

#[tokio::test]
async fn update_is_noop_for_plugin_managed_user() {
    let provider = Provider::new(exec_ok(1), ServerVersion::new(8, 0, 36));
    let resource = UserResource::existing(
        UserSpec::new("iam")
            .with_host("%")
            .with_plaintext_password("new")
            .with_auth_plugin(AuthPlugin::AwsAuthentication),
        EntityIdentifier::new("iam", "%"),
    )
    .with_changes(password_changed());

    SeaOrmUserService::new()
        .update(&resource, &provider)
        .await
        .unwrap();

    assert!(provider.conn.into_transaction_log().is_empty());
}

#[tokio::test]
async fn update_is_noop_when_nothing_changed() {
    let provider = Provider::new(exec_ok(1), ServerVersion::new(8, 0, 36));
    let resource = UserResource::existing(
        UserSpec::new("alice").with_plaintext_password("same"),
        EntityIdentifier::new("alice", "localhost"),
    );

    SeaOrmUserService::new()
        .update(&resource, &provider)
        .await
        .unwrap();

    assert!(provider.conn.into_transaction_log().is_empty());
}

#[tokio::test]
async fn update_uses_set_password_before_5_7_6() {
    let provider = Provider::new(exec_ok(1), ServerVersion::new(5, 7, 5));
    let resource = UserResource::existing(
        UserSpec::new("alice").with_plaintext_password("new"),
        EntityIdentifier::new("alice", "localhost"),
    )
    .with_changes(password_changed());

    SeaOrmUserService::new()
        .update(&resource, &provider)
        .await
        .unwrap();

    assert_eq!(
        provider.conn.into_transaction_log(),
        [statement("SET PASSWORD FOR 'alice'@'localhost' = PASSWORD('new')")]
    );
}

#[tokio::test]
async fn update_uses_alter_user_from_5_7_6() {
    for version in [ServerVersion::new(5, 7, 6), ServerVersion::new(8, 0, 36)] {
        let provider = Provider::new(exec_ok(1), version);
        let resource = UserResource::existing(
            UserSpec::new("alice").with_plaintext_password("new"),
            EntityIdentifier::new("alice", "localhost"),
        )
        .with_changes(password_changed());

        SeaOrmUserService::new()
            .update(&resource, &provider)
            .await
            .unwrap();

        assert_eq!(
            provider.conn.into_transaction_log(),
            [statement("ALTER USER 'alice'@'localhost' IDENTIFIED BY 'new'")]
        );
    }
}

#[tokio::test]
async fn update_falls_back_to_changed_legacy_password() {
    let provider = Provider::new(exec_ok(1), ServerVersion::new(8, 0, 36));
    let resource = UserResource::existing(
        UserSpec::new("alice")
            .with_plaintext_password("unchanged")
            .with_legacy_password("rotated"),
        EntityIdentifier::new("alice", "localhost"),
    )
    .with_changes(ChangeSet {
        legacy_password: true,
        ..ChangeSet::default()
    });

    SeaOrmUserService::new()
        .update(&resource, &provider)
        .await
        .unwrap();

    assert_eq!(
        provider.conn.into_transaction_log(),
        [statement("ALTER USER 'alice'@'localhost' IDENTIFIED BY 'rotated'")]
    );
}

#[tokio::test]
async fn update_with_changed_digest_from_state() {
    let prior = UserResource::existing(
        UserSpec::new("alice").with_plaintext_password("one"),
        EntityIdentifier::new("alice", "localhost"),
    )
    .persisted();
    let desired = UserSpec::new("alice").with_plaintext_password("two");
    let changes = ChangeSet::between(&prior, &desired);

    let provider = Provider::new(exec_ok(1), ServerVersion::new(8, 0, 36));
    let resource =
        UserResource::existing(desired, EntityIdentifier::new("alice", "localhost"))
            .with_changes(changes);

    SeaOrmUserService::new()
        .update(&resource, &provider)
        .await
        .unwrap();

    assert_eq!(
        provider.conn.into_transaction_log(),
        [statement("ALTER USER 'alice'@'localhost' IDENTIFIED BY 'two'")]
    );
}

#[tokio::test]
async fn read_clears_identifier_when_absent() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();
    let mut resource = UserResource::existing(
        UserSpec::new("ghost"),
        EntityIdentifier::new("ghost", "localhost"),
    );

    SeaOrmUserService::new()
        .read(&mut resource, &db)
        .await
        .unwrap();

    assert!(resource.id().is_none());
    assert_eq!(db.into_transaction_log(), [read_statement("ghost")]);
}

#[tokio::test]
async fn read_keeps_identifier_when_rows_exist() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_results([[
            BTreeMap::from([("USER", Value::from("alice"))]),
            BTreeMap::from([("USER", Value::from("alice"))]),
        ]])
        .into_connection();
    let id = EntityIdentifier::new("alice", "%");
    let mut resource = UserResource::existing(UserSpec::new("alice").with_host("%"), id.clone());

    SeaOrmUserService::new()
        .read(&mut resource, &db)
        .await
        .unwrap();

    assert_eq!(resource.id(), Some(&id));
}

#[tokio::test]
async fn read_surfaces_query_errors() {
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_query_errors([DbErr::Custom("connection reset".to_string())])
        .into_connection();
    let id = EntityIdentifier::new("alice", "localhost");
    let mut resource = UserResource::existing(UserSpec::new("alice"), id.clone());

    let err = SeaOrmUserService::new()
        .read(&mut resource, &db)
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::Execution(_)));
    assert_eq!(resource.id(), Some(&id));
}

#[tokio::test]
async fn delete_clears_identifier_on_success() {
    let db = exec_ok(1);
    let mut resource = UserResource::existing(
        UserSpec::new("alice").with_host("%"),
        EntityIdentifier::new("alice", "%"),
    );

    SeaOrmUserService::new()
        .delete(&mut resource, &db)
        .await
        .unwrap();

    assert!(resource.id().is_none());
    assert_eq!(db.into_transaction_log(), [statement("DROP USER 'alice'@'%'")]);
}

#[tokio::test]
async fn delete_failure_leaves_identifier() {
    let db = exec_err("Operation DROP USER failed for 'alice'@'localhost'");
    let id = EntityIdentifier::new("alice", "localhost");
    let mut resource = UserResource::existing(UserSpec::new("alice"), id.clone());

    let err = SeaOrmUserService::new()
        .delete(&mut resource, &db)
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::Execution(_)));
    assert_eq!(resource.id(), Some(&id));
}

#[tokio::test]
async fn delete_twice_fails_without_corrupting_state() {
    // The server refuses to drop an account that is already gone.
    let db = MockDatabase::new(DatabaseBackend::MySql)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .append_exec_errors([DbErr::Custom(
            "Operation DROP USER failed for 'alice'@'localhost'".to_string(),
        )])
        .into_connection();
    let service = SeaOrmUserService::new();
    let mut resource = UserResource::existing(
        UserSpec::new("alice"),
        EntityIdentifier::new("alice", "localhost"),
    );

    service.delete(&mut resource, &db).await.unwrap();
    assert!(resource.id().is_none());

    let err = service.delete(&mut resource, &db).await.unwrap_err();
    assert!(matches!(err, UserError::Execution(_)));
    assert!(resource.id().is_none());

    assert_eq!(
        db.into_transaction_log(),
        [
            statement("DROP USER 'alice'@'localhost'"),
            statement("DROP USER 'alice'@'localhost'"),
        ]
    );
}

#[test]
fn import_populates_name_and_host() {
    let imported = SeaOrmUserService::new()
        .import("alice@10.0.0.1", UserResource::new(UserSpec::new("")))
        .unwrap();

    assert_eq!(imported.spec.name, "alice");
    assert_eq!(imported.spec.host, "10.0.0.1");
    assert_eq!(
        imported.id(),
        Some(&EntityIdentifier::new("alice", "10.0.0.1"))
    );
}

#[test]
fn import_passes_changed_plaintext_password_through() {
    let pending = UserResource::new(UserSpec::new("").with_plaintext_password("incoming"))
        .with_changes(password_changed());

    let imported = SeaOrmUserService::new()
        .import("alice@%", pending)
        .unwrap();

    assert_eq!(imported.spec.plaintext_password.as_deref(), Some("incoming"));
    assert!(imported.changes.plaintext_password);
}

#[test]
fn import_rejects_identifier_without_host() {
    let err = SeaOrmUserService::new()
        .import("alice", UserResource::new(UserSpec::new("")))
        .unwrap_err();

    assert!(matches!(err, UserError::Format(_)));
    assert!(err.to_string().contains("Must be in format USER@HOST"));
}
