//! Integration tests for the offline indexing job

use std::fs::{self, File};
use std::io::Write;

use flatpage::formats;
use flatpage::index::{rebuild, scan_directory, Catalog};
use flatpage::Dataset;
use tempfile::TempDir;

const PROTEIN_HEADER: &str = "protein_id\tgenome_id\tcontig_id\tstart\tend\tstrand\tphase\tproduct\tcog_category\tdescription\tpreferred_name\tgos\tec\tkegg_ko";

fn write_protein_file(dir: &TempDir, genome: &str, rows: usize) {
    let mut f = File::create(dir.path().join(format!("{genome}.tsv"))).unwrap();
    writeln!(f, "{PROTEIN_HEADER}").unwrap();
    for i in 0..rows {
        writeln!(
            f,
            "{genome}_P{i:04}\t{genome}\tcontig_1\t{}\t{}\t+\t0\tp\t-\t-\t-\t-\t-\t-",
            i * 10 + 1,
            i * 10 + 9,
        )
        .unwrap();
    }
}

#[test]
fn test_scan_counts_and_orders_by_key() {
    let dir = TempDir::new().unwrap();
    write_protein_file(&dir, "GCF_000456.2", 3);
    write_protein_file(&dir, "GCF_000123.1", 5);

    let (catalog, report) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.skipped, 0);

    let keys: Vec<_> = catalog.entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["GCF_000123.1", "GCF_000456.2"]);
    assert_eq!(catalog.get("GCF_000123.1").unwrap().row_count, 5);
    assert_eq!(catalog.get("GCF_000456.2").unwrap().row_count, 3);
}

#[test]
fn test_scan_ignores_non_flat_files() {
    let dir = TempDir::new().unwrap();
    write_protein_file(&dir, "a", 2);
    fs::write(dir.path().join("README.md"), "notes\n").unwrap();
    fs::write(dir.path().join("import.log"), "done\n").unwrap();

    let (catalog, report) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(report.indexed, 1);
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_unreadable_file_is_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    write_protein_file(&dir, "a", 2);
    write_protein_file(&dir, "c", 4);
    // Invalid UTF-8 makes the line reader fail on this file.
    fs::write(dir.path().join("b.tsv"), [0xff, 0xfe, 0xff, b'\n']).unwrap();

    let (catalog, report) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
    assert_eq!(report.indexed, 2);
    assert_eq!(report.skipped, 1);
    assert!(catalog.get("b").is_none());
    assert_eq!(catalog.get("a").unwrap().row_count, 2);
    assert_eq!(catalog.get("c").unwrap().row_count, 4);
}

#[test]
fn test_duplicate_keys_rejected() {
    let dir = TempDir::new().unwrap();
    write_protein_file(&dir, "a", 2);
    // a.tsv.gz would catalogue under the same key as a.tsv.
    let gz = File::create(dir.path().join("a.tsv.gz")).unwrap();
    let mut encoder = flate2::write::GzEncoder::new(gz, flate2::Compression::fast());
    writeln!(encoder, "{PROTEIN_HEADER}").unwrap();
    encoder.finish().unwrap();

    assert!(scan_directory(dir.path(), Dataset::Proteins).is_err());
}

#[test]
fn test_rebuild_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_protein_file(&dir, "a", 5);
    write_protein_file(&dir, "b", 3);
    let catalog_path = dir.path().join("catalog.idx");

    rebuild(dir.path(), Dataset::Proteins, &catalog_path).unwrap();
    let first = fs::read_to_string(&catalog_path).unwrap();

    rebuild(dir.path(), Dataset::Proteins, &catalog_path).unwrap();
    let second = fs::read_to_string(&catalog_path).unwrap();

    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_rebuild_fully_replaces_previous_catalog() {
    let dir = TempDir::new().unwrap();
    write_protein_file(&dir, "a", 5);
    write_protein_file(&dir, "b", 3);
    let catalog_path = dir.path().join("catalog.idx");

    rebuild(dir.path(), Dataset::Proteins, &catalog_path).unwrap();
    assert!(Catalog::from_path(&catalog_path).unwrap().get("a").is_some());

    // Genome a disappears from the dataset; a rebuild must drop it.
    fs::remove_file(dir.path().join("a.tsv")).unwrap();
    write_protein_file(&dir, "d", 7);
    rebuild(dir.path(), Dataset::Proteins, &catalog_path).unwrap();

    let catalog = Catalog::from_path(&catalog_path).unwrap();
    assert!(catalog.get("a").is_none());
    assert_eq!(catalog.get("d").unwrap().row_count, 7);
    assert_eq!(catalog.len(), 2);

    // No staging leftovers.
    assert!(!dir.path().join("catalog.idx.tmp").exists());
}

#[test]
fn test_rebuild_loads_back_through_catalog() {
    let dir = TempDir::new().unwrap();
    write_protein_file(&dir, "x", 1);
    write_protein_file(&dir, "y", 9);
    let catalog_path = dir.path().join("catalog.idx");

    let report = rebuild(dir.path(), Dataset::Proteins, &catalog_path).unwrap();
    assert_eq!(report.indexed, 2);

    let catalog = Catalog::from_path(&catalog_path).unwrap();
    let (scanned, _) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
    assert_eq!(catalog.entries(), scanned.entries());
}

#[test]
fn test_tmh_index_counts_logical_rows() {
    let dir = TempDir::new().unwrap();
    let header = "genome_id\tcontig_id\tprotein_id\tlength\tpredicted_tmh_count\texp_aa\tfirst60\tsource\ttopology\tstart\tend";

    // 4 physical lines, 2 logical rows.
    let mut f = File::create(dir.path().join("g.tsv")).unwrap();
    writeln!(f, "{header}").unwrap();
    for line in [
        "g\tc1\tP1\t240\t2\t44.1\t21.8\tTMHMM2.0\toutside\t1\t9",
        "g\tc1\tP1\t240\t2\t44.1\t21.8\tTMHMM2.0\tTMhelix\t10\t32",
        "g\tc1\tP2\t88\t1\t20.3\t20.3\tTMHMM2.0\tTMhelix\t5\t27",
        "g\tc1\tP2\t88\t1\t20.3\t20.3\tTMHMM2.0\toutside\t28\t88",
    ] {
        writeln!(f, "{line}").unwrap();
    }

    let (catalog, _) = scan_directory(dir.path(), Dataset::Tmhs).unwrap();
    let indexed = catalog.get("g").unwrap().row_count;
    assert_eq!(indexed, 2);

    // The indexed count is exactly what the parser yields.
    let parsed = formats::read_rows(Dataset::Tmhs, dir.path().join("g.tsv")).unwrap();
    assert_eq!(parsed.len() as u64, indexed);
}

#[test]
fn test_empty_directory_yields_empty_catalog() {
    let dir = TempDir::new().unwrap();
    let (catalog, report) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
    assert!(catalog.is_empty());
    assert_eq!(report.indexed, 0);
    assert_eq!(report.skipped, 0);
}

#[test]
fn test_file_with_only_header_counts_zero_rows() {
    let dir = TempDir::new().unwrap();
    let mut f = File::create(dir.path().join("empty.tsv")).unwrap();
    writeln!(f, "{PROTEIN_HEADER}").unwrap();

    let (catalog, _) = scan_directory(dir.path(), Dataset::Proteins).unwrap();
    assert_eq!(catalog.get("empty").unwrap().row_count, 0);
}
