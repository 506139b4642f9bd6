//! Benchmarks for tooltip creation, lookup and the show/hide cycle.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use poptip::{Callbacks, Document, DomEvent, EventKind, Rect, SettingsInput, Timing, Tooltips};

fn document_with_buttons(n: usize) -> Document {
    let mut doc = Document::new();
    for i in 0..n {
        let button = doc.create_element("button");
        doc.add_class(button, "tip");
        doc.set_attribute(button, "title", &format!("Tooltip {i}"));
        doc.set_rect(button, Rect::new((i % 20) as f32 * 60.0, (i / 20) as f32 * 30.0 + 100.0, 50.0, 20.0));
        doc.append_child(doc.body(), button);
    }
    doc
}

fn instant() -> SettingsInput {
    SettingsInput {
        duration: Some(Timing::Single(0)),
        ..SettingsInput::default()
    }
}

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");
    for n in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter_with_setup(
                || Tooltips::new(document_with_buttons(n)),
                |mut tips| {
                    let id = tips.create(".tip", instant(), Callbacks::new());
                    black_box(id.ok())
                },
            );
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut tips = Tooltips::new(document_with_buttons(500));
    let Ok(id) = tips.create(".tip", instant(), Callbacks::new()) else {
        return;
    };
    let Some(last) = tips.instance(id).and_then(|i| i.poppers().last().copied()) else {
        return;
    };
    c.bench_function("registry_by_popper_last", |b| {
        b.iter(|| black_box(tips.registry().by_popper(black_box(last)).map(|r| r.id)));
    });
}

fn bench_show_hide(c: &mut Criterion) {
    let mut tips = Tooltips::new(document_with_buttons(100));
    let Ok(id) = tips.create(".tip", instant(), Callbacks::new()) else {
        return;
    };
    let Some(popper) = tips.instance(id).map(|i| i.poppers()[50]) else {
        return;
    };
    let Some(reference) = tips.reference_of(popper) else {
        return;
    };
    c.bench_function("hover_cycle", |b| {
        b.iter(|| {
            tips.dispatch(&DomEvent::new(EventKind::MouseEnter, reference));
            tips.tick();
            tips.dispatch(&DomEvent::new(EventKind::MouseLeave, reference));
            black_box(tips.is_visible(popper))
        });
    });
}

criterion_group!(benches, bench_create, bench_lookup, bench_show_hide);
criterion_main!(benches);
