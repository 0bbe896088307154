//! Benchmark: quick vs authoritative hit tests over wide and deep trees.
//!
//! Run with: `cargo bench -p touchmouse-core --bench hit_test_bench`
//!
//! A quick hit test runs on every touch-down before any gesture processing,
//! so its cost bounds the latency of latency-critical toggles.

use std::collections::HashMap;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use touchmouse_core::{
    ChildKind, HitMode, HitTester, ItemTag, Point, Rect, Region, RegionAccessError, RegionId,
    RegionSet, RegionSource,
};

/// Owned tree node shaped like a host interface panel.
struct Panel {
    bounds: Rect,
    hidden: bool,
    tag: Option<ItemTag>,
    children: Vec<Panel>,
}

impl Region for Panel {
    fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point)
    }
    fn is_self_hidden(&self) -> bool {
        self.hidden
    }
    fn is_effectively_hidden(&self) -> bool {
        self.hidden
    }
    fn tag(&self) -> Option<ItemTag> {
        self.tag
    }
    fn children(&self, kind: ChildKind) -> Result<Vec<&dyn Region>, RegionAccessError> {
        match kind {
            ChildKind::Dynamic => Ok(self.children.iter().map(|c| c as &dyn Region).collect()),
            ChildKind::Nested | ChildKind::Static => Ok(Vec::new()),
        }
    }
}

struct Surface(HashMap<RegionId, Panel>);

impl RegionSource for Surface {
    fn region(&self, id: RegionId) -> Option<&dyn Region> {
        self.0.get(&id).map(|p| p as &dyn Region)
    }
}

/// A 28-slot inventory grid (4 x 7).
fn grid() -> Panel {
    let children = (0..28)
        .map(|i| Panel {
            bounds: Rect::new((i % 4) * 42, (i / 4) * 36, 42, 36),
            hidden: false,
            tag: Some(ItemTag(i)),
            children: Vec::new(),
        })
        .collect();
    Panel {
        bounds: Rect::new(0, 0, 168, 252),
        hidden: false,
        tag: None,
        children,
    }
}

/// A chain of `depth` wrappers with the hit at the bottom.
fn chain(depth: usize) -> Panel {
    let mut node = Panel {
        bounds: Rect::new(500, 500, 10, 10),
        hidden: false,
        tag: None,
        children: Vec::new(),
    };
    for _ in 0..depth {
        node = Panel {
            bounds: Rect::new(0, 0, 1, 1),
            hidden: false,
            tag: None,
            children: vec![node],
        };
    }
    node
}

fn bench_hit_modes(c: &mut Criterion) {
    let surface = Surface(HashMap::from([(RegionId(1), grid())]));
    let tester = HitTester::new(&surface);
    let set = RegionSet::new("grid", [RegionId(1)]);

    let mut group = c.benchmark_group("grid_hit");
    for (label, point) in [("hit", Point::new(100, 200)), ("miss", Point::new(900, 900))] {
        group.bench_with_input(BenchmarkId::new("quick", label), &point, |b, &p| {
            b.iter(|| black_box(tester.contains(black_box(p), &set, HitMode::Quick)));
        });
        group.bench_with_input(BenchmarkId::new("authoritative", label), &point, |b, &p| {
            b.iter(|| black_box(tester.contains(black_box(p), &set, HitMode::Authoritative)));
        });
    }
    group.bench_function("find_item_under", |b| {
        b.iter(|| black_box(tester.find_item_under(black_box(Point::new(100, 200)), &set)));
    });
    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_tree");
    for depth in [8usize, 64, 256] {
        let surface = Surface(HashMap::from([(RegionId(1), chain(depth))]));
        let set = RegionSet::new("chain", [RegionId(1)]);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            let tester = HitTester::new(&surface);
            b.iter(|| black_box(tester.contains(Point::new(505, 505), &set, HitMode::Quick)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hit_modes, bench_depth);
criterion_main!(benches);
