use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use thermal_simulator::{
    ManualScheduler, PrintSimulator, ScriptedOutcomes, SimulatorSettings, Verdict,
};
use thermal_store::{Money, NewReceipt, PrintJobStatus, PrintStore};

fn origin() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn coffee_order(order_number: &str) -> NewReceipt {
    NewReceipt {
        store_name: "Square Coffee Shop".into(),
        order_number: order_number.into(),
        customer: "John Doe".into(),
        subtotal: "8.50".parse::<Money>().unwrap(),
        tax: "0.68".parse::<Money>().unwrap(),
        total: "9.18".parse::<Money>().unwrap(),
        items: concat!(
            r#"[{"name":"Cappuccino (L)","price":4.5},"#,
            r#"{"name":"Blueberry Muffin","price":3.25},"#,
            r#"{"name":"Extra Shot","price":0.75}]"#,
        )
        .into(),
    }
}

#[tokio::test]
async fn jobs_resolve_in_due_order_with_simulated_timestamps() {
    let scheduler = Arc::new(ManualScheduler::starting_at(origin()));
    let outcomes = Arc::new(ScriptedOutcomes::new([Verdict::Success, Verdict::Failure]));
    let simulator = PrintSimulator::new(
        PrintStore::with_clock(scheduler.clone()),
        scheduler.clone(),
        outcomes,
        SimulatorSettings::default(),
    );
    let store = simulator.store().clone();

    let first = store.create_receipt(coffee_order("#12345")).await;
    let second = store.create_receipt(coffee_order("#12346")).await;
    assert_eq!(first.date, origin());

    let ok_job = simulator.start_print(first.id).await.unwrap();
    let bad_job = simulator.start_print(second.id).await.unwrap();
    let test_job = simulator.start_test_print().await;
    assert_eq!(store.list_pending().await.len(), 3);

    // Test print finishes first thanks to its shorter delay.
    assert_eq!(scheduler.advance(Duration::from_secs(1)).await, 1);
    let pending: Vec<_> = store.list_pending().await.into_iter().map(|job| job.id).collect();
    assert_eq!(pending, vec![ok_job.id, bad_job.id]);
    let test_job = store.get_job(test_job.id).await.unwrap();
    assert_eq!(test_job.status, PrintJobStatus::Completed);
    assert_eq!(test_job.completed_at, Some(origin() + TimeDelta::seconds(1)));

    assert_eq!(scheduler.advance(Duration::from_secs(1)).await, 2);
    assert!(store.list_pending().await.is_empty());

    let ok_job = store.get_job(ok_job.id).await.unwrap();
    assert_eq!(ok_job.status, PrintJobStatus::Completed);
    assert_eq!(ok_job.completed_at, Some(origin() + TimeDelta::seconds(2)));
    assert!(store.get_receipt(first.id).await.unwrap().printed);

    let bad_job = store.get_job(bad_job.id).await.unwrap();
    assert_eq!(bad_job.status, PrintJobStatus::Failed);
    assert_eq!(bad_job.error_message.as_deref(), Some("Printer connection failed"));
    assert!(!store.get_receipt(second.id).await.unwrap().printed);
}

#[tokio::test]
async fn pending_job_serializes_without_completion_fields() {
    let scheduler = Arc::new(ManualScheduler::starting_at(origin()));
    let simulator = PrintSimulator::new(
        PrintStore::with_clock(scheduler.clone()),
        scheduler.clone(),
        Arc::new(ScriptedOutcomes::default()),
        SimulatorSettings::default(),
    );

    let job = simulator.start_test_print().await;
    let value = serde_json::to_value(&job).unwrap();
    assert_eq!(value["status"], "pending");
    assert!(value["receiptId"].is_null());
    assert!(value.get("completedAt").map_or(true, |v| v.is_null()));

    scheduler.advance(Duration::from_secs(1)).await;
    let job = simulator.store().get_job(job.id).await.unwrap();
    let value = serde_json::to_value(&job).unwrap();
    assert_eq!(value["status"], "completed");
    assert!(value["completedAt"].is_string());
}

#[tokio::test]
async fn repeated_prints_of_one_receipt_create_independent_jobs() {
    let scheduler = Arc::new(ManualScheduler::new());
    let simulator = PrintSimulator::new(
        PrintStore::with_clock(scheduler.clone()),
        scheduler.clone(),
        Arc::new(ScriptedOutcomes::new([Verdict::Failure, Verdict::Success])),
        SimulatorSettings {
            print_delay: Duration::from_millis(50),
            ..SimulatorSettings::default()
        },
    );
    let receipt = simulator.store().create_receipt(coffee_order("#1")).await;

    let first = simulator.start_print(receipt.id).await.unwrap();
    scheduler.advance(Duration::from_millis(50)).await;
    assert!(!simulator.store().get_receipt(receipt.id).await.unwrap().printed);

    let second = simulator.start_print(receipt.id).await.unwrap();
    assert_ne!(first.id, second.id);
    scheduler.advance(Duration::from_millis(50)).await;

    let store = simulator.store();
    assert_eq!(store.get_job(first.id).await.unwrap().status, PrintJobStatus::Failed);
    assert_eq!(store.get_job(second.id).await.unwrap().status, PrintJobStatus::Completed);
    assert!(store.get_receipt(receipt.id).await.unwrap().printed);
}
