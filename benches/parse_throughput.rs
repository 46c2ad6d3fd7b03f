// Benchmark for VQL parse throughput

use rayon::prelude::*;
use std::time::{Duration, Instant};
use vql::{Parser, ParserConfig, StatementParser};

const ITERATIONS: usize = 20_000;

const STATEMENTS: &[(&str, &str)] = &[
    ("wildcard", "SELECT * FROM HEXAD entity-42"),
    (
        "projection",
        "SELECT GRAPH, VECTOR.embedding, TEMPORAL FROM HEXAD h1",
    ),
    (
        "full query",
        "SELECT SEMANTIC, AVG(VECTOR.score), DOCUMENT.title FROM FEDERATION /universities/* WITH DRIFT strict \
         WHERE VECTOR.score > 0.8 GROUP BY DOCUMENT.title HAVING AVG(VECTOR.score) > 0.9 \
         PROOF PROVENANCE (citationChain) AND ACCESS (openAccess) ORDER BY DOCUMENT.title DESC LIMIT 20 OFFSET 40",
    ),
    (
        "insert",
        "INSERT HEXAD WITH DOCUMENT(title=Foo, year=2024), VECTOR(embedding=[0.1, 0.2]) PROOF TYPE_SCHEMA (schemaV1)",
    ),
    (
        "update",
        "UPDATE HEXAD entity-3 SET title='Hello, world', score=0.75 PROOF AUDIT (editors)",
    ),
    ("error", "SELECT * FROM BOGUS x"),
];

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn main() {
    println!("=== VQL Parse Throughput Benchmark ===\n");

    let parser = Parser::new(ParserConfig::default());

    // Test 1: Per-statement sequential throughput
    println!("Test 1: Sequential parses ({} iterations each)", ITERATIONS);
    let mut total = Duration::ZERO;
    for (label, statement) in STATEMENTS {
        let start = Instant::now();
        for _ in 0..ITERATIONS {
            let _ = std::hint::black_box(parser.parse_statement(std::hint::black_box(statement)));
        }
        let elapsed = start.elapsed();
        total += elapsed;
        println!(
            "  {:<12} {:>10.2} ms  ({:.2} µs/parse)",
            label,
            millis(elapsed),
            elapsed.as_secs_f64() * 1_000_000.0 / ITERATIONS as f64
        );
    }

    // Test 2: The same workload spread across the rayon pool
    println!("\nTest 2: Parallel parses (shared parser)");
    let start = Instant::now();
    let parsed: usize = (0..ITERATIONS)
        .into_par_iter()
        .map(|_| {
            STATEMENTS
                .iter()
                .filter(|(_, statement)| parser.parse_statement(statement).is_ok())
                .count()
        })
        .sum();
    let parallel = start.elapsed();
    println!("  {} successful parses in {:.2} ms", parsed, millis(parallel));

    println!("\n=== Summary ===");
    println!("Sequential total: {:.2} ms", millis(total));
    println!("Parallel total:   {:.2} ms", millis(parallel));
}
