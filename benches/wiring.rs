use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wireup::{BoxError, Dependency, Injector, Wired, WiringSession};

#[derive(Default)]
struct Leaf;

impl Wired for Leaf {
    fn wire(_: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Leaf)
    }
}

struct Mid {
    _leaf: Dependency<Leaf>,
}

impl Wired for Mid {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Mid {
            _leaf: Dependency::new(wiring)?,
        })
    }
}

struct Root {
    _left: Dependency<Mid>,
    _leaf: Dependency<Leaf>,
}

impl Wired for Root {
    fn wire(wiring: &mut WiringSession<'_>) -> Result<Self, BoxError> {
        Ok(Root {
            _left: Dependency::new(wiring)?,
            _leaf: Dependency::new(wiring)?,
        })
    }
}

fn bench_get_bean_hit(c: &mut Criterion) {
    let injector = Injector::context("bench-get-bean");
    injector.make_beans::<Root>().unwrap();

    c.bench_function("get_bean_hit", |b| {
        b.iter(|| {
            let leaf = injector.get_bean::<Leaf>().unwrap();
            black_box(leaf);
        })
    });

    injector.remove();
}

fn bench_make_beans_graph(c: &mut Criterion) {
    let mut run = 0u64;
    c.bench_function("make_beans_graph", |b| {
        b.iter(|| {
            run += 1;
            let name = format!("bench-wire-{run}");
            let injector = Injector::context(&name);
            injector.make_beans::<Root>().unwrap();
            black_box(injector.get_bean::<Root>().unwrap());
            injector.remove();
        })
    });
}

fn bench_memoized_make_beans(c: &mut Criterion) {
    let injector = Injector::context("bench-memoized");
    injector.make_beans::<Root>().unwrap();

    c.bench_function("make_beans_memoized_root", |b| {
        b.iter(|| {
            injector.make_beans::<Root>().unwrap();
        })
    });

    injector.remove();
}

criterion_group!(
    benches,
    bench_get_bean_hit,
    bench_make_beans_graph,
    bench_memoized_make_beans
);
criterion_main!(benches);
