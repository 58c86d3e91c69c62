//! Benchmarks for page assembly over a many-file catalog
//!
//! Run with: cargo bench --bench paging

use std::fs::File;
use std::io::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flatpage::index::scan_directory;
use flatpage::paging::{PageRequest, Pager};
use flatpage::Dataset;
use tempfile::TempDir;

const ROWS_PER_FILE: usize = 200;

/// Build a directory of `files` protein tables with deterministic rows.
fn build_dataset(files: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    for g in 0..files {
        let mut f = File::create(dir.path().join(format!("GCF_{g:06}.tsv"))).unwrap();
        writeln!(f, "protein_id\tgenome_id\tcontig_id\tstart\tend\tstrand\tphase\tproduct\tcog_category\tdescription\tpreferred_name\tgos\tec\tkegg_ko").unwrap();
        for i in 0..ROWS_PER_FILE {
            writeln!(
                f,
                "G{g}_P{i:04}\tGCF_{g:06}\tcontig_1\t{}\t{}\t+\t0\thypothetical protein\tS\t-\t-\t-\t-\t-",
                i * 100 + 1,
                i * 100 + 90,
            )
            .unwrap();
        }
    }
    dir
}

/// Page assembly cost for a mid-dataset page across catalog sizes
fn bench_page_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_assembly");
    group.sample_size(20);

    for files in [10usize, 50].iter() {
        let dir = build_dataset(*files);
        let (catalog, _) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
        let pager = Pager::new(&catalog, Dataset::Proteins);

        // A page from the middle of the keyspace: span arithmetic has to
        // walk half the catalog before reading anything.
        let middle = (*files as u64 * ROWS_PER_FILE as u64) / (2 * 50);
        let request = PageRequest::new(middle.max(1), 50);

        group.bench_with_input(BenchmarkId::from_parameter(files), files, |b, _| {
            b.iter(|| pager.page(black_box(&request)).unwrap())
        });
    }

    group.finish();
}

/// Filtered paging: search narrows the catalog before span arithmetic
fn bench_filtered_page(c: &mut Criterion) {
    let dir = build_dataset(50);
    let (catalog, _) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
    let pager = Pager::new(&catalog, Dataset::Proteins);
    let request = PageRequest::new(1, 50).with_search("genome_id", "GCF_00002");

    c.bench_function("filtered_page", |b| {
        b.iter(|| pager.page(black_box(&request)).unwrap())
    });
}

criterion_group!(benches, bench_page_assembly, bench_filtered_page);
criterion_main!(benches);
