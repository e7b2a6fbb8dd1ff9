//! Pipeline lifecycle integration tests.
//!
//! These tests drive the sale poller over the mock transport:
//! - Attestation gating of each cycle
//! - Change detection across cycles
//! - Field extraction failures
//! - Threshold rule and the book-then-notify chain
//! - Session accounting across every failure path

use std::sync::Arc;
use std::time::Duration;

use salebridge_core::{
    load_config_from_str,
    testing::{fixtures, MockFailure, MockTransport},
    BookingOutcome, Config, CycleOutcome, MissingField, NotificationOutcome, ReadMode,
    RejectionReason, SalePoller, TripOutcome,
};

const ATTESTATION_PATH: &str = "/api/system-info";
const SALES_PATH: &str = "/api/vendas";
const BOOKING_PATH: &str = "/api/viagens";
const MESSAGE_PATH: &str = "/send-message";

/// Test helper wiring a poller to a mock transport.
struct TestHarness {
    poller: SalePoller,
    transport: Arc<MockTransport>,
}

impl TestHarness {
    async fn new() -> Self {
        Self::with_config(Config::default()).await
    }

    async fn with_config(config: Config) -> Self {
        let transport = Arc::new(MockTransport::new());
        transport
            .set_response(ATTESTATION_PATH, fixtures::attestation_accepted())
            .await;
        transport
            .set_response(
                BOOKING_PATH,
                fixtures::http_response("201 CREATED", r#"{"message": "Viagem criada"}"#),
            )
            .await;
        transport
            .set_response(
                MESSAGE_PATH,
                fixtures::http_response("200 OK", r#"{"status": "sent"}"#),
            )
            .await;

        let poller = SalePoller::from_config(transport.clone(), &config);
        Self { poller, transport }
    }

    async fn set_sales(&self, records: &[String]) {
        self.transport
            .set_response(SALES_PATH, fixtures::sales_response(records))
            .await;
    }

    async fn paths(&self) -> Vec<String> {
        self.transport
            .recorded_exchanges()
            .await
            .into_iter()
            .map(|e| e.endpoint.path)
            .collect()
    }

    fn assert_sessions_balanced(&self) {
        assert_sessions_balanced(&self.transport);
    }
}

fn assert_sessions_balanced(transport: &MockTransport) {
    let stats = transport.stats();
    assert_eq!(stats.opened(), stats.closed());
    assert_eq!(stats.open_sessions(), 0);
}

/// The newest record as isolated from a sales response: the record itself
/// plus whatever closing brackets follow it.
fn is_last_record(poller: &SalePoller, record: &str) -> bool {
    poller
        .last_record()
        .is_some_and(|last| last.starts_with(record.as_bytes()))
}

/// A sales response whose single record carries raw, possibly non-UTF-8,
/// address bytes.
fn sales_response_with_address(address: &[u8]) -> Vec<u8> {
    let mut response =
        b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n"
            .to_vec();
    response.extend_from_slice(b"{\"vendas\": [{\"Endereco\": \"");
    response.extend_from_slice(address);
    response.extend_from_slice(b"\", \"Telefone\": \"5599999999\", \"Total\": 200.00}]}");
    response
}

#[tokio::test]
async fn test_new_sale_above_threshold_books_and_notifies() {
    let harness = TestHarness::new().await;
    harness
        .set_sales(&[
            fixtures::sale_json(80.0, "Rua Velha, 1", "5500000000"),
            fixtures::sale_json(200.0, "Rua X, 10", "5599999999"),
        ])
        .await;
    let mut poller = harness.poller;

    let outcome = poller.poll_once().await;

    match outcome {
        CycleOutcome::Processed(TripOutcome::Scheduled {
            booking,
            outcome,
            notification,
        }) => {
            assert_eq!(booking.destination, "Rua X, 10");
            assert_eq!(booking.customer_phone, "5599999999");
            assert_eq!(booking.amount, 200.0);
            assert!(matches!(outcome, BookingOutcome::Submitted { .. }));
            assert!(matches!(notification, NotificationOutcome::Delivered { .. }));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let paths: Vec<String> = harness
        .transport
        .recorded_exchanges()
        .await
        .into_iter()
        .map(|e| e.endpoint.path)
        .collect();
    assert_eq!(
        paths,
        vec![ATTESTATION_PATH, SALES_PATH, BOOKING_PATH, MESSAGE_PATH]
    );

    let booking = &harness.transport.exchanges_with(BOOKING_PATH).await[0];
    let body = booking.json_body().unwrap();
    assert_eq!(body["local_destino"], "Rua X, 10");
    assert_eq!(body["telefone_cliente"], "5599999999");
    assert_eq!(body["valor"], 200.0);
    assert_eq!(body["local_origem"], "Loja Centro - Ijui/RS");

    let message = &harness.transport.exchanges_with(MESSAGE_PATH).await[0];
    let body = message.json_body().unwrap();
    assert_eq!(body["numero_telefone"], "5599999999");
    assert!(body["mensagem"].as_str().unwrap().starts_with("Sua viagem"));

    let stats = harness.transport.stats();
    assert_eq!(stats.opened(), 4);
    assert_eq!(stats.closed(), 4);
}

#[tokio::test]
async fn test_same_record_is_processed_once() {
    let harness = TestHarness::new().await;
    harness
        .set_sales(&[fixtures::sale_json(200.0, "Rua X, 10", "5599999999")])
        .await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    assert!(poller.poll_once().await.is_new_record());
    assert_eq!(poller.poll_once().await, CycleOutcome::AlreadyShown);
    assert_eq!(poller.poll_once().await, CycleOutcome::AlreadyShown);

    assert_eq!(harness.transport.exchanges_with(BOOKING_PATH).await.len(), 1);
    assert_eq!(harness.transport.exchanges_with(MESSAGE_PATH).await.len(), 1);
    assert_eq!(harness.transport.exchanges_with(SALES_PATH).await.len(), 3);
    harness.assert_sessions_balanced();
}

#[tokio::test]
async fn test_records_differing_in_invalid_utf8_are_distinct() {
    let harness = TestHarness::new().await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    harness
        .transport
        .set_response(SALES_PATH, sales_response_with_address(b"Rua \xff\xfe"))
        .await;
    assert!(matches!(
        poller.poll_once().await,
        CycleOutcome::Processed(TripOutcome::Scheduled { .. })
    ));

    harness
        .transport
        .set_response(SALES_PATH, sales_response_with_address(b"Rua \xff\xfd"))
        .await;
    assert!(matches!(
        poller.poll_once().await,
        CycleOutcome::Processed(TripOutcome::Scheduled { .. })
    ));
    let last = poller.last_record().unwrap();
    assert!(last.starts_with(b"{\"Endereco\": \"Rua \xff\xfd\""));

    // The exact same bytes again are recognised.
    assert_eq!(poller.poll_once().await, CycleOutcome::AlreadyShown);
    assert_eq!(harness.transport.exchanges_with(BOOKING_PATH).await.len(), 2);
    assert_eq!(harness.transport.exchanges_with(MESSAGE_PATH).await.len(), 2);
}

#[tokio::test]
async fn test_new_record_after_shown_one_is_processed() {
    let harness = TestHarness::new().await;
    let first = fixtures::sale_json(200.0, "Rua X, 10", "5599999999");
    let second = fixtures::sale_json(320.5, "Av. Brasil, 55", "5588888888");
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    harness.set_sales(&[first.clone()]).await;
    assert!(poller.poll_once().await.is_new_record());

    harness.set_sales(&[first, second.clone()]).await;
    assert!(poller.poll_once().await.is_new_record());
    assert!(is_last_record(&poller, &second));

    let bookings = harness.transport.exchanges_with(BOOKING_PATH).await;
    assert_eq!(bookings.len(), 2);
    assert_eq!(bookings[1].json_body().unwrap()["local_destino"], "Av. Brasil, 55");
}

#[tokio::test]
async fn test_below_threshold_sends_nothing() {
    let harness = TestHarness::new().await;
    harness
        .set_sales(&[fixtures::sale_json(150.0, "Rua X, 10", "5599999999")])
        .await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    assert_eq!(
        poller.poll_once().await,
        CycleOutcome::Processed(TripOutcome::BelowThreshold { total: 150.0 })
    );
    assert_eq!(harness.paths().await, vec![ATTESTATION_PATH, SALES_PATH]);
}

#[tokio::test]
async fn test_missing_field_rejects_record() {
    let harness = TestHarness::new().await;
    let record = r#"{"Endereco": "Rua X, 10", "Total": 300.00}"#.to_string();
    harness.set_sales(&[record.clone()]).await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    assert_eq!(
        poller.poll_once().await,
        CycleOutcome::Rejected(MissingField::Phone)
    );
    // The rejected record is remembered; it is not re-examined.
    assert!(is_last_record(&poller, &record));
    assert_eq!(poller.poll_once().await, CycleOutcome::AlreadyShown);
    assert!(harness.transport.exchanges_with(BOOKING_PATH).await.is_empty());
}

#[tokio::test]
async fn test_non_numeric_total_is_missing() {
    let harness = TestHarness::new().await;
    harness
        .set_sales(&[r#"{"Endereco": "Rua X", "Telefone": "55", "Total": "abc"}"#.to_string()])
        .await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    assert_eq!(
        poller.poll_once().await,
        CycleOutcome::Rejected(MissingField::Total)
    );
}

#[tokio::test]
async fn test_rejected_attestation_skips_cycle() {
    let harness = TestHarness::new().await;
    harness
        .set_sales(&[fixtures::sale_json(200.0, "Rua X, 10", "5599999999")])
        .await;
    harness
        .transport
        .push_response(
            ATTESTATION_PATH,
            fixtures::http_response("400 BAD REQUEST", r#"{"error": "Invalid system information"}"#),
        )
        .await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    assert_eq!(
        poller.poll_once().await,
        CycleOutcome::AttestationRejected(RejectionReason::MarkerMissing)
    );
    assert_eq!(harness.paths().await, vec![ATTESTATION_PATH]);
    assert!(poller.last_record().is_none());

    // Next cycle is accepted and sees the record as new.
    assert!(poller.poll_once().await.is_new_record());
}

#[tokio::test]
async fn test_attestation_read_is_bounded() {
    let harness = TestHarness::new().await;
    harness.set_sales(&[]).await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    poller.poll_once().await;

    let attestation = &harness.transport.exchanges_with(ATTESTATION_PATH).await[0];
    assert_eq!(attestation.mode, ReadMode::Bounded(999));
    let body = attestation.json_body().unwrap();
    assert_eq!(body["hostname"], "GCA");
    assert_eq!(body["num_cpus"], 4);

    let sales = &harness.transport.exchanges_with(SALES_PATH).await[0];
    assert_eq!(sales.mode, ReadMode::UntilClose);
}

#[tokio::test]
async fn test_booking_failure_still_notifies() {
    let harness = TestHarness::new().await;
    harness
        .set_sales(&[fixtures::sale_json(200.0, "Rua X, 10", "5599999999")])
        .await;
    harness
        .transport
        .set_failure(BOOKING_PATH, MockFailure::Connect)
        .await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    match poller.poll_once().await {
        CycleOutcome::Processed(TripOutcome::Scheduled {
            outcome,
            notification,
            ..
        }) => {
            assert!(matches!(outcome, BookingOutcome::Failed(_)));
            assert!(matches!(notification, NotificationOutcome::Delivered { .. }));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(
        harness.paths().await,
        vec![ATTESTATION_PATH, SALES_PATH, BOOKING_PATH, MESSAGE_PATH]
    );
    harness.assert_sessions_balanced();
}

#[tokio::test]
async fn test_fetch_failure_keeps_last_record() {
    let harness = TestHarness::new().await;
    let record = fixtures::sale_json(90.0, "Rua X, 10", "5599999999");
    harness.set_sales(&[record.clone()]).await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    assert!(poller.poll_once().await.is_new_record());

    harness
        .transport
        .set_failure(SALES_PATH, MockFailure::ReadInterrupted)
        .await;
    assert!(matches!(
        poller.poll_once().await,
        CycleOutcome::FetchFailed(_)
    ));
    assert!(is_last_record(&poller, &record));

    harness.transport.clear_failure(SALES_PATH).await;
    assert_eq!(poller.poll_once().await, CycleOutcome::AlreadyShown);
    harness.assert_sessions_balanced();
}

#[tokio::test]
async fn test_sessions_released_on_every_failure_path() {
    let harness = TestHarness::new().await;
    harness
        .set_sales(&[fixtures::sale_json(500.0, "Rua X, 10", "5599999999")])
        .await;
    harness
        .transport
        .set_failure(BOOKING_PATH, MockFailure::Handshake)
        .await;
    harness
        .transport
        .set_failure(MESSAGE_PATH, MockFailure::ReadInterrupted)
        .await;
    let mut poller = SalePoller::from_config(harness.transport.clone(), &Config::default());

    poller.poll_once().await;

    let stats = harness.transport.stats();
    assert_eq!(stats.opened(), 4);
    harness.assert_sessions_balanced();
}

#[tokio::test]
async fn test_configured_threshold_and_paths() {
    let config = load_config_from_str(
        r#"
[services.sales]
latest_sale_path = "/api/vendas"

[trip]
threshold = 50.0
origin = "Deposito Norte"
"#,
    )
    .unwrap();
    let harness = TestHarness::with_config(config).await;
    harness
        .set_sales(&[fixtures::sale_json(60.0, "Rua X, 10", "5599999999")])
        .await;
    let mut poller = harness.poller;

    assert!(matches!(
        poller.poll_once().await,
        CycleOutcome::Processed(TripOutcome::Scheduled { .. })
    ));
    let booking = &harness.transport.exchanges_with(BOOKING_PATH).await[0];
    assert_eq!(booking.json_body().unwrap()["local_origem"], "Deposito Norte");
}

#[tokio::test]
async fn test_run_loop_polls_until_shutdown() {
    let mut config = Config::default();
    config.poller.interval_ms = 10;
    let harness = TestHarness::with_config(config).await;
    harness
        .set_sales(&[fixtures::sale_json(200.0, "Rua X, 10", "5599999999")])
        .await;

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(harness.poller.run(async {
        let _ = stop_rx.await;
    }));

    tokio::time::sleep(Duration::from_millis(100)).await;
    stop_tx.send(()).unwrap();
    handle.await.unwrap();

    // Several cycles ran, but the record was booked once.
    let transport = harness.transport;
    assert!(transport.exchanges_with(SALES_PATH).await.len() > 1);
    assert_eq!(transport.exchanges_with(BOOKING_PATH).await.len(), 1);
    assert_sessions_balanced(&transport);
}
