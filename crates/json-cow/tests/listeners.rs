use std::sync::{Arc, Mutex};

use json_cow::{query, ChangeKind, ChangeRecord, ChangeSource, Value};
use serde_json::json;

#[test]
fn listeners_receive_one_record_per_write() {
    let q = query(json!({"address": {"city": "NYC"}, "items": [1, 2]})).expect("query");
    let records: Arc<Mutex<Vec<ChangeRecord>>> = Arc::new(Mutex::new(Vec::new()));
    let records_clone = Arc::clone(&records);
    q.subscribe(move |changes| {
        records_clone.lock().unwrap().extend_from_slice(changes);
    });

    q.descend("address").descend("city").set("LA").expect("set");
    q.descend("items").set_item(0, 10).expect("set_item");
    q.descend("address").update(|draft| draft.set("zip", "1")).expect("update");
    q.set(json!({"fresh": true})).expect("root set");

    let records = records.lock().unwrap();
    let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["address.city", "items", "address", ""]);
    for record in records.iter() {
        assert_eq!(record.source, ChangeSource::Set);
        assert_eq!(record.kind, ChangeKind::Update);
    }
    assert_eq!(records[3].value, Value::from(json!({"fresh": true})));
}

#[test]
fn listeners_fire_in_subscription_order() {
    let q = query(json!({"n": 0})).expect("query");
    let order = Arc::new(Mutex::new(Vec::new()));
    for id in 0..3 {
        let order_clone = Arc::clone(&order);
        q.subscribe(move |_| order_clone.lock().unwrap().push(id));
    }
    q.descend("n").set(1).expect("set");
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
}

#[test]
fn subscriptions_are_shared_by_derived_queries() {
    let q = query(json!({"a": {"b": 1}})).expect("query");
    let count = Arc::new(Mutex::new(0usize));
    let count_clone = Arc::clone(&count);
    let sub = q.descend("a").subscribe(move |_| {
        *count_clone.lock().unwrap() += 1;
    });

    q.descend("other").set(1).expect("set");
    assert_eq!(*count.lock().unwrap(), 1);

    assert!(sub.unsubscribe());
    q.descend("other").set(2).expect("set");
    assert_eq!(*count.lock().unwrap(), 1);
    assert_eq!(q.root().listener_count(), 0);
}

#[test]
fn listener_sees_new_root_and_can_write() {
    let q = query(json!({"count": 0, "log": []})).expect("query");
    let writer = q.clone();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_clone = Arc::clone(&seen);
    q.subscribe(move |changes| {
        let current = writer.descend("count").get();
        seen_clone.lock().unwrap().push(current.clone());
        if changes[0].path == "count" {
            writer
                .descend("log")
                .set_item(0, current)
                .expect("nested write from listener");
        }
    });

    q.descend("count").set(5).expect("set");

    assert_eq!(
        *seen.lock().unwrap(),
        vec![Value::from(5), Value::from(5)]
    );
    assert_eq!(q.descend_path("log.0").get(), Value::from(5));
}
