use std::sync::{Arc, Barrier};
use std::thread;

use formbind::{metadata, prepare, read_form, Form, FormInput};

#[derive(Debug, Default, Form)]
struct Order {
    #[form(label = "Item", required, len = "1 40")]
    item_name: String,
    #[form(label = "Quantity", num = "1 99")]
    quantity: u32,
    #[form(name = "coupon_code", regex = "^([A-Z0-9]{4,8})?$")]
    coupon: String,
}

#[test]
fn concurrent_resolution_is_stable() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                metadata::<Order>().unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = &results[0];
    for other in &results[1..] {
        assert_eq!(first.len(), other.len());
        for (a, b) in first.iter().zip(other) {
            assert_eq!(**a, **b);
        }
    }
    assert_eq!(first[2].name, "coupon_code");
    assert_eq!(*first, metadata::<Order>().unwrap());
}

#[test]
fn concurrent_reads_are_independent() {
    prepare::<Order>().unwrap();
    let handles: Vec<_> = (1..=16u32)
        .map(|n| {
            thread::spawn(move || {
                let input = FormInput::from_urlencoded(&format!("item_name=pen&quantity={n}"));
                let mut order = Order::default();
                read_form(&input, &mut order).map(|_| order.quantity)
            })
        })
        .collect();
    for (n, handle) in (1..=16u32).zip(handles) {
        assert_eq!(handle.join().unwrap(), Ok(n));
    }
}
