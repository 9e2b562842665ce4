use chrono::{TimeZone, Utc};
use enroute_core::{
    Activity, ActivityInput, BookingInput, Catalog, EventBus, KeyValueStore, MemoryKeyValueStore,
    PayoutInput, PayoutStatus, Persistence, RecordKind, RecordStore,
};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

const DEMO_NAMES: [&str; 3] = [
    "Old Delhi Food Walk",
    "Goa Kayaking Sunset",
    "Hampi Heritage Cycle Tour",
];

fn counter(store_subscribe: impl FnOnce(Box<dyn Fn()>)) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    store_subscribe(Box::new(move || handle.set(handle.get() + 1)));
    count
}

#[test]
fn empty_activities_store_is_seeded_and_seed_is_persisted() {
    let backend = Rc::new(MemoryKeyValueStore::new());
    let catalog = Catalog::new(Persistence::from_shared(backend.clone()), EventBus::new());

    let first = catalog.activities().list();
    let names: Vec<_> = first.iter().map(|activity| activity.name.as_str()).collect();
    assert_eq!(names, DEMO_NAMES);
    assert!(backend.get_item("lap_activities").unwrap().is_some());

    catalog
        .activities()
        .add(&ActivityInput::named("Jaipur Heritage Walk").with_price(800));

    let second = catalog.activities().list();
    assert_eq!(second.len(), 4);
    assert_eq!(&second[..3], &first[..]);
    assert_eq!(second[3].name, "Jaipur Heritage Walk");
}

#[test]
fn malformed_activities_content_is_treated_as_empty_and_reseeded() {
    let backend = Rc::new(MemoryKeyValueStore::new());
    backend.set_item("lap_activities", "{broken").unwrap();
    let store: RecordStore<Activity> =
        RecordStore::new(Persistence::from_shared(backend.clone()), EventBus::new());

    assert_eq!(store.list().len(), 3);
    let raw = backend.get_item("lap_activities").unwrap().unwrap();
    assert!(raw.starts_with('['));
}

#[test]
fn adding_same_name_and_price_twice_keeps_one_record() {
    let catalog = Catalog::in_memory();
    let changes = counter(|handler| {
        let _sub = catalog.activities().subscribe(handler);
    });

    let input = ActivityInput::named("Sunrise Yoga").with_price(600);
    let first = catalog.activities().add(&input);
    let retry = catalog.activities().add(&input);

    let matching: Vec<_> = catalog
        .activities()
        .list()
        .into_iter()
        .filter(|activity| activity.name == "Sunrise Yoga")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].id, first.id);
    assert_eq!(retry.name, "Sunrise Yoga");
    assert_eq!(changes.get(), 1);
}

#[test]
fn adding_an_existing_id_is_a_no_op() {
    let catalog = Catalog::in_memory();
    let before = catalog.activities().list();

    let returned = catalog
        .activities()
        .add(&ActivityInput::named("Renamed").with_id("ex_1").with_price(1));

    assert_eq!(returned.id, "ex_1");
    assert_eq!(catalog.activities().list(), before);
}

#[test]
fn clear_empties_store_and_notifies_once() {
    let catalog = Catalog::in_memory();
    catalog
        .bookings()
        .add(&BookingInput::for_activity("ex_1", "Old Delhi Food Walk"));

    let changes = counter(|handler| {
        let _sub = catalog.bookings().subscribe(handler);
    });
    catalog.bookings().clear();

    assert!(catalog.bookings().list().is_empty());
    assert_eq!(changes.get(), 1);
}

#[test]
fn cleared_activities_store_stays_empty() {
    let catalog = Catalog::in_memory();
    assert_eq!(catalog.activities().list().len(), 3);

    catalog.activities().clear();

    assert!(catalog.activities().list().is_empty());
}

#[test]
fn bookings_and_payouts_start_empty_and_prepend() {
    let catalog = Catalog::in_memory();
    assert!(catalog.bookings().list().is_empty());
    assert!(catalog.payouts().list().is_empty());

    let older = catalog
        .bookings()
        .add(&BookingInput::default().with_customer("K. Singh"));
    let newer = catalog
        .bookings()
        .add(&BookingInput::default().with_customer("P. Gupta"));
    let ids: Vec<_> = catalog
        .bookings()
        .list()
        .into_iter()
        .map(|booking| booking.id)
        .collect();
    assert_eq!(ids, vec![newer.id, older.id]);

    catalog.payouts().add(&PayoutInput::of_amount(2500));
    catalog.payouts().add(&PayoutInput::of_amount(3000));
    let amounts: Vec<_> = catalog
        .payouts()
        .list()
        .into_iter()
        .map(|payout| payout.amount)
        .collect();
    assert_eq!(amounts, vec![3000.0, 2500.0]);
}

#[test]
fn change_events_use_kind_names() {
    let catalog = Catalog::in_memory();
    let seen = Rc::new(Cell::new(0));
    let handle = Rc::clone(&seen);
    let _sub = catalog
        .bus()
        .subscribe(RecordKind::Payouts.change_event(), move || {
            handle.set(handle.get() + 1)
        });

    catalog.payouts().add(&PayoutInput::of_amount(10));
    catalog.bookings().add(&BookingInput::default());

    assert_eq!(RecordKind::Payouts.change_event(), "payouts:changed");
    assert_eq!(seen.get(), 1);
}

#[test]
fn write_failures_do_not_surface_from_store_operations() {
    let catalog = Catalog::new(
        Persistence::new(MemoryKeyValueStore::with_quota(8)),
        EventBus::new(),
    );

    let activities = catalog.activities().list();
    assert_eq!(activities.len(), 3);

    let booking = catalog.bookings().add(&BookingInput::default());
    assert!(!booking.id.is_empty());
    assert!(catalog.bookings().list().is_empty());
}

#[test]
fn categories_and_get_read_from_the_store() {
    let catalog = Catalog::in_memory();
    catalog
        .activities()
        .add(&ActivityInput::named("Street Art Tour").with_category("Food").with_price(300));

    assert_eq!(
        catalog.activities().categories(),
        vec!["Food", "Sightseeing", "Water Sports"]
    );
    assert_eq!(
        catalog.activities().get("ex_2").map(|activity| activity.name),
        Some("Goa Kayaking Sunset".to_string())
    );
    assert!(catalog.activities().get("missing").is_none());
}

fn catalog_with_stored(key: &str, value: serde_json::Value) -> (Rc<MemoryKeyValueStore>, Catalog) {
    let backend = Rc::new(MemoryKeyValueStore::new());
    backend.set_item(key, &value.to_string()).unwrap();
    let catalog = Catalog::new(Persistence::from_shared(backend.clone()), EventBus::new());
    (backend, catalog)
}

#[test]
fn loosely_shaped_activities_are_kept_instead_of_reseeded() {
    let (backend, catalog) = catalog_with_stored(
        "lap_activities",
        json!([
            {"id": "u1", "name": "User Tour", "category": "Food", "price": 900, "rating": 4},
            {"id": "u2", "name": "Legacy Tour", "price": "500", "rating": null},
            {"id": 7, "name": "Numbered Tour", "price": 300}
        ]),
    );

    let activities = catalog.activities().list();

    let ids: Vec<_> = activities.iter().map(|activity| activity.id.as_str()).collect();
    assert_eq!(ids, vec!["u1", "u2", "7"]);
    assert_eq!(activities[0].rating, 4.0);
    assert_eq!(activities[1].price, 500.0);
    assert_eq!(activities[1].rating, 0.0);
    assert!(!activities[1].image_url.is_empty());

    let raw = backend.get_item("lap_activities").unwrap().unwrap();
    assert!(!raw.contains("ex_1"));
    assert_eq!(catalog.activities().list(), activities);
}

#[test]
fn legacy_bookings_survive_list_and_add() {
    let (_backend, catalog) = catalog_with_stored(
        "lap_bookings",
        json!([
            {
                "id": "b1",
                "activityId": "ex_1",
                "activityName": "Old Delhi Food Walk",
                "customerName": "A. Sharma",
                "quantity": 2,
                "amount": 2400,
                "date": "2025-09-05T12:00:00.000Z"
            },
            {"id": "b2", "activity": "Goa Kayaking Sunset", "date": "2025-09-06", "time": "10:30"}
        ]),
    );

    let before = catalog.bookings().list();
    assert_eq!(before.len(), 2);
    assert_eq!(before[0].id, "b1");
    assert_eq!(before[0].quantity, 2);
    assert_eq!(before[1].activity_name, "Goa Kayaking Sunset");
    assert_eq!(before[1].customer_name, "Customer");
    assert_eq!(
        before[1].date,
        Utc.with_ymd_and_hms(2025, 9, 6, 10, 30, 0).unwrap()
    );

    let added = catalog.bookings().add(&BookingInput::default());

    let ids: Vec<_> = catalog
        .bookings()
        .list()
        .into_iter()
        .map(|booking| booking.id)
        .collect();
    assert_eq!(ids, vec![added.id, "b1".to_string(), "b2".to_string()]);
}

#[test]
fn unreadable_payout_elements_are_dropped_alone() {
    let (_backend, catalog) = catalog_with_stored(
        "lap_payouts",
        json!([
            {"id": "p1", "amount": 100, "status": "paid", "date": "2025-09-01T12:00:00.000Z"},
            {"id": "p2", "amount": "250", "status": "PENDING", "date": "2025-09-02"},
            42
        ]),
    );

    let payouts = catalog.payouts().list();

    assert_eq!(payouts.len(), 2);
    assert_eq!(payouts[0].status, PayoutStatus::Paid);
    assert_eq!(payouts[1].id, "p2");
    assert_eq!(payouts[1].amount, 250.0);
    assert_eq!(payouts[1].status, PayoutStatus::Pending);
}

#[test]
fn non_array_content_counts_as_absent() {
    let (_backend, catalog) = catalog_with_stored("lap_activities", json!({"id": "u1"}));

    assert_eq!(catalog.activities().list().len(), 3);
}
