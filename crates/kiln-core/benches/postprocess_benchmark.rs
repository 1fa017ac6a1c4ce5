use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kiln_core::ast::SignOp;
use kiln_core::{postprocess_batch, postprocess_tree, Location, Node, PostprocessConfig};

/// One function body exercising every default rule
fn function_tree(index: usize, statements: usize) -> Node {
    let loc = Location::new(format!("bench{index}.php"), 1);
    let mut stmts = Vec::with_capacity(statements);
    for i in 0..statements {
        let stmt = match i % 6 {
            0 => Node::call("intval", vec![Node::var("_GET", loc.clone())], loc.clone()),
            1 => Node::unary(SignOp::Minus, Node::int(i.to_string(), loc.clone()), loc.clone()),
            2 => Node::assign(
                Node::list(
                    vec![Node::var("a", loc.clone()), Node::var("b", loc.clone())],
                    loc.clone(),
                ),
                Node::var("pair", loc.clone()),
                loc.clone(),
            ),
            3 => Node::call(
                "call_user_func_array",
                vec![Node::string("handler", loc.clone()), Node::var("args", loc.clone())],
                loc.clone(),
            ),
            4 => Node::member_access(
                Node::var("obj", loc.clone()),
                Node::name("field", loc.clone()),
                loc.clone(),
            ),
            _ => Node::member_access(
                Node::var("obj", loc.clone()),
                Node::call("method", vec![Node::var("x", loc.clone())], loc.clone()),
                loc.clone(),
            ),
        };
        stmts.push(Node::expr_stmt(stmt));
    }
    Node::function(
        format!("f{index}"),
        vec![],
        Node::block(stmts, loc.clone()),
        loc,
    )
}

fn bench_single_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_tree");
    let config = PostprocessConfig::default();

    for statements in [12, 120, 1200].iter() {
        let tree = function_tree(0, *statements);
        group.bench_with_input(BenchmarkId::new("statements", statements), &tree, |b, tree| {
            b.iter(|| postprocess_tree(black_box(tree.clone()), &config))
        });
    }

    group.finish();
}

fn bench_stats_overhead(c: &mut Criterion) {
    let mut group = c.benchmark_group("stats_overhead");
    let tree = function_tree(0, 600);

    group.bench_function("with_stats", |b| {
        let config = PostprocessConfig::default();
        b.iter(|| postprocess_tree(black_box(tree.clone()), &config))
    });

    group.bench_function("without_stats", |b| {
        let config = PostprocessConfig::default().collect_stats(false);
        b.iter(|| postprocess_tree(black_box(tree.clone()), &config))
    });

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let trees: Vec<Node> = (0..64).map(|i| function_tree(i, 60)).collect();

    for jobs in [1, 2, 4, 8].iter() {
        let config = PostprocessConfig::default().jobs(*jobs);
        group.bench_with_input(BenchmarkId::new("jobs", jobs), &trees, |b, trees| {
            b.iter(|| postprocess_batch(black_box(trees.clone()), &config))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_tree, bench_stats_overhead, bench_batch);
criterion_main!(benches);
