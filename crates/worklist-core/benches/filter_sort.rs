use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use worklist_core::filter::FilterState;
use worklist_core::model::item::{Assignee, RawWorkItem, WorkItem};
use worklist_core::sort::{self, MissingDays, SortColumn, SortOrder, SortState};
use worklist_core::view::render::render;
use worklist_core::view::{ViewPreset, WorklistView};

const SIZES: [usize; 3] = [100, 1_000, 10_000];
const DEPARTMENTS: [&str; 4] = ["Sales", "Ops", "Field Service", "Support"];

fn synthetic_items(count: usize, today: NaiveDate) -> Vec<WorkItem> {
    let raws = (0..count)
        .map(|i| {
            let offset = (i as i64 * 7919) % 90 - 30;
            RawWorkItem {
                id: format!("CRM-OPP-{i:06}"),
                title: Some(format!("Opportunity {}", i % 97)),
                party: (i % 5 != 0).then(|| format!("Customer {}", i % 41)),
                closing_date: (i % 11 != 0).then(|| today + chrono::Duration::days(offset)),
                status: Some("Open".to_string()),
                assignees: vec![Assignee {
                    employee: Some(format!("Employee {}", i % 23)),
                    user: None,
                    department: Some(DEPARTMENTS[i % DEPARTMENTS.len()].to_string()),
                }],
                ..RawWorkItem::default()
            }
        })
        .collect();
    WorkItem::from_raw_batch(raws, today)
}

fn bench_filter_sort(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap_or_default();
    let mut group = c.benchmark_group("worklist.filter_sort");

    for size in SIZES {
        let items = synthetic_items(size, today);
        group.throughput(Throughput::Elements(size as u64));

        let filter = FilterState {
            department: Some("Sales".to_string()),
            search: "customer 1".to_string(),
            hide_overdue: true,
            ..FilterState::default()
        };
        group.bench_with_input(BenchmarkId::new("filter", size), &items, |b, items| {
            b.iter(|| black_box(filter.apply(items).len()));
        });

        let state = SortState::new(SortColumn::DaysRemaining, SortOrder::Desc);
        group.bench_with_input(BenchmarkId::new("sort", size), &items, |b, items| {
            b.iter(|| {
                let mut rows: Vec<&WorkItem> = items.iter().collect();
                sort::sort(&mut rows, state, MissingDays::Last);
                black_box(rows.first().map(|i| i.id.len()))
            });
        });

        let mut view = WorklistView::new(ViewPreset::Team.config());
        view.replace_items(items.clone());
        group.bench_with_input(BenchmarkId::new("render", size), &view, |b, view| {
            b.iter(|| black_box(render(view).rows.len()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_filter_sort);
criterion_main!(benches);
