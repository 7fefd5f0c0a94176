// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{Criterion, criterion_group, criterion_main};
use kflake::Snowflake;

fn bench_new(c: &mut Criterion) {
    c.bench_function("bench_new_node", |b| {
        b.iter(|| Snowflake::builder().worker_id(&|| Ok(1)).finalize());
    });
}

fn bench_next_id(c: &mut Criterion) {
    let sf = Snowflake::builder()
        .worker_id(&|| Ok(1))
        .finalize()
        .expect("Could not create Snowflake");
    c.bench_function("bench_next_id", |b| {
        b.iter(|| sf.next_id());
    });
}

fn bench_next_id_range(c: &mut Criterion) {
    let sf = Snowflake::builder()
        .worker_id(&|| Ok(1))
        .finalize()
        .expect("Could not create Snowflake");
    c.bench_function("bench_next_id_range", |b| {
        b.iter(|| sf.next_id_range());
    });
}

criterion_group!(kflake_perf, bench_new, bench_next_id, bench_next_id_range);
criterion_main!(kflake_perf);
