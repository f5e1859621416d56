use std::fs;
use std::io::Write;
use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::*;
use tempfile::TempDir;

use ribodep_sim::{MockConfig, MockSimulator};

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[fixture]
fn workdir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let genome = format!(
        ">chr1 assembled\n{}\n{}\n>chrUn\nACGT\n",
        "A".repeat(100),
        "C".repeat(100)
    );
    write(dir.path(), "genome.fa", &genome);
    write(dir.path(), "rRNA.bed", "1\t101\t160\n");
    write(dir.path(), "snps.tsv", "1\t110\tC\tG\t1.0\n");
    dir
}

fn config(dir: &Path, add_snp: bool) -> MockConfig {
    let body = format!(
        "genome = {:?}\nn = 2\nrrna_interval = {:?}\nsnp_db = {:?}\nadd_snp = {}\noutput = {:?}\nseed = 11\n",
        dir.join("genome.fa"),
        dir.join("rRNA.bed"),
        dir.join("snps.tsv"),
        add_snp,
        dir.join("mock.fa"),
    );
    let path = write(dir, "mock.toml", &body);
    MockConfig::from_file(&path).unwrap()
}

fn sequences(fasta: &str) -> Vec<&str> {
    fasta.lines().filter(|l| !l.starts_with('>')).collect()
}

#[rstest]
fn test_reads_come_from_the_window(workdir: TempDir) {
    let mut sim = MockSimulator::new(config(workdir.path(), false)).unwrap();
    let written = sim.run().unwrap();
    assert_eq!(written, 2);

    let out = fs::read_to_string(workdir.path().join("mock.fa")).unwrap();
    let expected = "C".repeat(60);
    assert_eq!(sequences(&out), vec![expected.as_str(), expected.as_str()]);
    assert!(
        out.lines()
            .filter(|l| l.starts_with('>'))
            .all(|l| l.starts_with(">1_100_160_"))
    );
}

#[rstest]
fn test_fixed_snp_is_carried(workdir: TempDir) {
    let mut sim = MockSimulator::new(config(workdir.path(), true)).unwrap();
    let mut out = Vec::new();
    sim.simulate(&mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    // SNP at 110 lands at offset 9 of the window starting at 100
    let expected = format!("{}G{}", "C".repeat(9), "C".repeat(50));
    assert!(sequences(&out).iter().all(|s| *s == expected));
}

#[rstest]
fn test_seeded_runs_are_identical(workdir: TempDir) {
    let mut a = Vec::new();
    MockSimulator::new(config(workdir.path(), true))
        .unwrap()
        .simulate(&mut a)
        .unwrap();
    let mut b = Vec::new();
    MockSimulator::new(config(workdir.path(), true))
        .unwrap()
        .simulate(&mut b)
        .unwrap();
    assert_eq!(a, b);
}
