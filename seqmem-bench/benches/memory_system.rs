//! SEQMEM Benchmark Suite
//!
//! Hot paths measured at a realistic size (256 cells, 64-wide features):
//!   dial_tic_256 ...................... one allocation + edge
//!   recognize_or_memorize_256x64 ...... déjà-vu projection + decision
//!   match_scores_256x64 ............... (T·D) ⊙ (f·V)
//!   replay_128_steps .................. forward walk along a recording
//!   forget_trail_chain_128 ............ backward erase of a whole chain

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use seqmem_core::{CellDial, Features, SequentialMemory};

const CELLS: usize = 256;
const DIM: usize = 64;

fn make_inputs(count: usize, seed: u64) -> Vec<Features> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| Features::random_unit(DIM, &mut rng))
        .collect()
}

/// A memory holding one recording of `len` random vectors; returns its start.
fn make_recording(len: usize) -> (SequentialMemory, usize) {
    let mut memory =
        SequentialMemory::new(CellDial::new(CELLS).expect("dial"), DIM).expect("memory");
    let inputs = make_inputs(len, 7);
    let start = memory.seed();
    memory.memorize(&inputs[0], start).expect("memorize");
    for f in &inputs[1..] {
        memory.record(f).expect("record");
    }
    (memory, start)
}

/// Benchmark: one dial tic on a warm dial.
fn bench_tic(c: &mut Criterion) {
    let mut dial = CellDial::new(CELLS).expect("dial");
    for _ in 0..CELLS {
        dial.advance();
    }

    c.bench_function("dial_tic_256", |b| {
        b.iter(|| black_box(dial.advance()));
    });
}

/// Benchmark: recognition against a half-full memory.
fn bench_recognize(c: &mut Criterion) {
    let (mut memory, _) = make_recording(CELLS / 2);
    let queries = make_inputs(32, 11);
    let mut i = 0;

    c.bench_function("recognize_or_memorize_256x64", |b| {
        b.iter(|| {
            let r = memory
                .recognize_or_memorize(black_box(&queries[i % queries.len()]))
                .expect("recognize");
            i += 1;
            black_box(r);
        });
    });
}

/// Benchmark: joint temporal and content ranking.
fn bench_match_scores(c: &mut Criterion) {
    let (memory, _) = make_recording(CELLS / 2);
    let query = make_inputs(1, 13).remove(0);

    c.bench_function("match_scores_256x64", |b| {
        b.iter(|| black_box(memory.match_scores(black_box(&query)).expect("scores")));
    });
}

/// Benchmark: replaying a 128-step recording.
fn bench_replay(c: &mut Criterion) {
    let (mut memory, start) = make_recording(129);

    c.bench_function("replay_128_steps", |b| {
        b.iter(|| {
            let steps = memory.replay(black_box(start), 128).expect("replay").count();
            black_box(steps);
        });
    });
}

/// Benchmark: erasing a 128-cell chain from its last cell.
fn bench_forget_trail(c: &mut Criterion) {
    c.bench_function("forget_trail_chain_128", |b| {
        b.iter_batched(
            || {
                let (mut memory, _) = make_recording(128);
                let last = memory.tic();
                (memory, last)
            },
            |(mut memory, last)| black_box(memory.forget_trail(last).expect("forget")),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_tic,
    bench_recognize,
    bench_match_scores,
    bench_replay,
    bench_forget_trail,
);
criterion_main!(benches);
