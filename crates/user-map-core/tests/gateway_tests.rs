//! Remote data gateway against an in-memory contract.

mod common;

use std::time::Duration;

use common::{MockChain, CONTRACT, ME};
use user_map_core::{KvError, RemoteGateway};
use user_map_types::{AddressKey, RetryPolicy};

#[tokio::test]
async fn test_get_users_without_query_client_makes_no_calls() {
    let chain = MockChain::new();
    let gateway = RemoteGateway::new(CONTRACT).with_signing_client(chain.clone());

    let err = gateway.get_users().await.unwrap_err();
    assert!(matches!(err, KvError::GatewayPrecondition { .. }));
    assert!(err.to_string().contains("query client"));
    assert_eq!(chain.query_calls(), 0);
    assert_eq!(chain.execute_calls(), 0);
}

#[tokio::test]
async fn test_execute_without_signer_is_not_retried() {
    let chain = MockChain::new();
    let gateway = RemoteGateway::new(CONTRACT).with_query_client(chain.clone());

    let err = gateway
        .execute_update(&AddressKey::new(ME), CONTRACT, "{}")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("signing client"));
    assert_eq!(chain.execute_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_value_by_user_is_retried() {
    let chain = MockChain::new().with_record(ME, "{\"v\":1}");
    chain.fail_next_queries(2);
    let gateway: RemoteGateway = RemoteGateway::new(CONTRACT)
        .with_query_client(chain.clone())
        .with_retry_policy(RetryPolicy::new(3, 50));

    let start = tokio::time::Instant::now();
    let value = gateway.get_value_by_user(&AddressKey::new(ME)).await.unwrap();
    assert_eq!(value.as_deref(), Some("{\"v\":1}"));
    assert_eq!(chain.query_calls(), 3);
    assert!(start.elapsed() >= Duration::from_millis(150));
}

#[tokio::test]
async fn test_list_queries_are_not_retried() {
    let chain = MockChain::new().with_record(ME, "{}");
    chain.fail_next_queries(1);
    let gateway = RemoteGateway::new(CONTRACT).with_query_client(chain.clone());

    let err = gateway.get_map().await.unwrap_err();
    assert!(err.is_transient());
    assert_eq!(chain.query_calls(), 1);

    let entries = gateway.get_map().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].address.as_str(), ME);
}

#[tokio::test]
async fn test_wrong_contract_surfaces_error() {
    let chain = MockChain::new();
    let gateway = RemoteGateway::new("xion1elsewhere").with_query_client(chain.clone());
    let err = gateway.get_users().await.unwrap_err();
    assert!(err.to_string().contains("no such contract"));
}

#[tokio::test]
async fn test_balance_in_base_units() {
    let chain = MockChain::new().with_balance(ME, 42);
    let gateway = RemoteGateway::new(CONTRACT).with_query_client(chain.clone());
    assert_eq!(gateway.get_balance(&AddressKey::new(ME), "uxion").await.unwrap(), 42);
    assert_eq!(
        gateway
            .get_balance(&AddressKey::new("xion1nobody"), "uxion")
            .await
            .unwrap(),
        0
    );
}
