use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use trycatch_regions::{
    process_try_catch_regions, Block, Cfg, EdgeKind, ExceptionHandler, Method, ProcessOptions,
    RegionKind, RegionTree, TryBlockId, TryCatchBlock, TryCatchProcessor,
};

/// `count` consecutive try-blocks, each guarding one block with its own handler
///
/// Layout per try-block `k`: `guard_k -> next_k`, `guard_k -> handler_k` on
/// exception, `handler_k -> next_k`. All blocks sit in one flat sequence.
fn chained_tries(count: usize) -> Method {
    let mut cfg = Cfg::new();
    let mut tree = RegionTree::new(RegionKind::Sequence);
    let root = tree.root();
    let mut try_blocks = Vec::with_capacity(count);

    let mut offset = 0u32;
    let mut block = |cfg: &mut Cfg, guard: Option<usize>| {
        offset += 4;
        match guard {
            Some(tb) => cfg.add_block(Block::guarded(offset, TryBlockId(tb))),
            None => cfg.add_block(Block::new(offset)),
        }
    };

    let mut prev = block(&mut cfg, None);
    tree.push_block(root, prev);
    for k in 0..count {
        let guard = block(&mut cfg, Some(k));
        let handler = block(&mut cfg, None);
        let next = block(&mut cfg, None);
        cfg.add_edge(prev, guard, EdgeKind::Fall);
        cfg.add_edge(guard, next, EdgeKind::Uncond);
        cfg.add_edge(guard, handler, EdgeKind::Exception);
        cfg.add_edge(handler, next, EdgeKind::Fall);
        for node in [guard, handler, next] {
            tree.push_block(root, node);
        }
        try_blocks.push(TryCatchBlock::new(
            TryBlockId(k),
            vec![ExceptionHandler::new(None, handler)],
        ));
        prev = next;
    }

    Method::new(format!("Chain{}.run", count), cfg, try_blocks, tree)
}

fn trycatch_benchmark(c: &mut Criterion) {
    let options = ProcessOptions::default();

    for count in [16, 128] {
        let method = chained_tries(count);
        c.bench_function(&format!("process_chain_{}", count), |b| {
            b.iter_batched(
                || method.clone(),
                |mut method| black_box(process_try_catch_regions(&mut method, &options)),
                BatchSize::SmallInput,
            );
        });
    }

    let methods: Vec<Method> = (0..64).map(|_| chained_tries(32)).collect();
    let processor = TryCatchProcessor::new(options.clone());
    c.bench_function("process_all_64_methods", |b| {
        b.iter_batched(
            || methods.clone(),
            |mut methods| black_box(processor.process_all(&mut methods)),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, trycatch_benchmark);
criterion_main!(benches);
