//! Admin command conformance tests
//!
//! Drives the public `ShardAdmin` API against a recording runner and checks
//! the exact documents that would reach the `admin` database.

use mongodb::bson::{doc, Document};
use shard_admin::error::BoxError;
use shard_admin::{AdminError, CommandRunner, ShardAdmin};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted runner: replies to each command name with a fixed outcome.
struct ScriptedRunner {
    sent: Mutex<Vec<Document>>,
    enable_calls: AtomicUsize,
    shard_calls: AtomicUsize,
    enable_error: Option<&'static str>,
    shard_error: Option<&'static str>,
}

impl ScriptedRunner {
    fn new(enable_error: Option<&'static str>, shard_error: Option<&'static str>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            enable_calls: AtomicUsize::new(0),
            shard_calls: AtomicUsize::new(0),
            enable_error,
            shard_error,
        }
    }

    fn sent(&self) -> Vec<Document> {
        self.sent.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run_admin_command(
        &self,
        command: Document,
    ) -> impl Future<Output = Result<Document, BoxError>> + Send {
        let outcome = if command.contains_key("enableSharding") {
            self.enable_calls.fetch_add(1, Ordering::SeqCst);
            self.enable_error
        } else if command.contains_key("shardCollection") {
            self.shard_calls.fetch_add(1, Ordering::SeqCst);
            self.shard_error
        } else {
            Some("no such command")
        };
        self.sent.lock().unwrap().push(command);

        async move {
            match outcome {
                Some(message) => Err(message.into()),
                None => Ok(doc! { "ok": 1.0 }),
            }
        }
    }
}

#[tokio::test]
async fn enable_sharding_document_for_testdb() {
    let runner = ScriptedRunner::new(None, None);

    ShardAdmin::new(&runner).enable_sharding("testdb").await.unwrap();

    assert_eq!(runner.sent(), vec![doc! { "enableSharding": "testdb" }]);
}

#[tokio::test]
async fn shard_collection_document_for_testdb_users_email() {
    let runner = ScriptedRunner::new(None, None);

    ShardAdmin::new(&runner)
        .shard_collection("testdb", "users", "email")
        .await
        .unwrap();

    let sent = runner.sent();
    assert_eq!(
        sent,
        vec![doc! { "shardCollection": "testdb.users", "key": { "email": 1_i32 } }]
    );
    assert_eq!(sent[0].get_document("key").unwrap().get_i32("email").unwrap(), 1);
}

#[tokio::test]
async fn enable_failure_skips_collection_sharding() {
    let runner = ScriptedRunner::new(Some("not authorized on admin"), None);

    let err = ShardAdmin::new(&runner)
        .shard_users_by_email("testdb")
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::EnableShardingFailed { ref database, .. } if database == "testdb"));
    assert_eq!(runner.enable_calls.load(Ordering::SeqCst), 1);
    assert_eq!(runner.shard_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn collection_failure_is_reported_and_not_compensated() {
    let runner = ScriptedRunner::new(None, Some("collection already sharded"));

    let err = ShardAdmin::new(&runner)
        .shard_users_by_email("testdb")
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "failed to shard collection 'testdb.users'");
    assert_eq!(runner.enable_calls.load(Ordering::SeqCst), 1);
    assert_eq!(runner.shard_calls.load(Ordering::SeqCst), 1);
    // Only the two forward commands; nothing undoes enableSharding
    assert_eq!(runner.sent().len(), 2);
}

#[tokio::test]
async fn server_error_message_is_preserved() {
    let runner = ScriptedRunner::new(Some("sharding already enabled for database testdb"), None);

    let err = ShardAdmin::new(&runner)
        .enable_sharding("testdb")
        .await
        .unwrap_err();

    let source = std::error::Error::source(&err).expect("server error should be the source");
    assert_eq!(source.to_string(), "sharding already enabled for database testdb");
}
