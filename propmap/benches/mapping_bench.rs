use std::collections::HashMap;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use propmap::{Marshaller, Properties, PropertyObject, Unmarshaller};

#[derive(Debug, Default, PropertyObject)]
struct Customer {
    #[property]
    name: String,
    #[property]
    phone: i64,
    #[property(name = "tel.mobile")]
    mobile: String,
}

fn customers(n: usize) -> HashMap<String, Customer> {
    (0..n)
        .map(|i| {
            (
                format!("c{i}"),
                Customer {
                    name: format!("Customer {i}"),
                    phone: i as i64,
                    mobile: format!("555-{i:04}"),
                },
            )
        })
        .collect()
}

fn bench_marshal(c: &mut Criterion) {
    let objects = customers(1_000);
    let marshaller = Marshaller::new(Vec::<u8>::new());
    c.bench_function("to_records 1k", |b| {
        b.iter(|| marshaller.to_records(black_box(&objects)).unwrap())
    });
}

fn bench_unmarshal(c: &mut Criterion) {
    let marshaller = Marshaller::new(Vec::<u8>::new());
    let records: Properties = marshaller.to_records(&customers(1_000)).unwrap();
    let unmarshaller = Unmarshaller::from_properties(records);
    c.bench_function("unmarshal 1k", |b| {
        b.iter(|| unmarshaller.unmarshal::<Customer>().unwrap())
    });
}

fn bench_codec(c: &mut Criterion) {
    let marshaller = Marshaller::new(Vec::<u8>::new());
    let records = marshaller.to_records(&customers(1_000)).unwrap();
    let text = records.to_text(Some("bench"), &propmap::StoreOptions::without_timestamp());
    c.bench_function("parse 3k records", |b| {
        b.iter(|| Properties::parse(black_box(&text)).unwrap())
    });
}

criterion_group!(benches, bench_marshal, bench_unmarshal, bench_codec);
criterion_main!(benches);
