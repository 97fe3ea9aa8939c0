use gapstop::{
    BatchError, BatchOptions, ErrorPolicy, OutputNaming, looks_like_fasta, output_path_for,
    process_file, run_batch, transform,
};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::tempdir;

const A: &str = ">a1\nATG-CC-TAA\n>a2\nAC\nGT\n";
const A_CLEAN: &str = ">a1\nATGCC\n>a2\nACGT\n";
const B: &str = "\n>b\nTT--\nTGA\n";
const B_CLEAN: &str = ">b\nTT\n";

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p
}

#[test]
fn output_naming() {
    let input = Path::new("data/run1/genes.fa");
    let mut opts = BatchOptions::default();
    assert_eq!(output_path_for(input, &opts), PathBuf::from("data/run1/genes.fa"));

    opts.naming = OutputNaming::Suffixed;
    assert_eq!(
        output_path_for(input, &opts),
        PathBuf::from("data/run1/genes_output.fasta")
    );

    opts.output_dir = Some(PathBuf::from("clean"));
    assert_eq!(
        output_path_for(input, &opts),
        PathBuf::from("clean/genes_output.fasta")
    );

    opts.naming = OutputNaming::SameName;
    assert_eq!(output_path_for(input, &opts), PathBuf::from("clean/genes.fa"));

    let dotted = Path::new("in/aln.v2.fasta");
    opts.naming = OutputNaming::Suffixed;
    assert_eq!(
        output_path_for(dotted, &opts),
        PathBuf::from("clean/aln.v2_output.fasta")
    );
}

#[test]
fn sniff_fasta_restores_position() {
    let mut c = Cursor::new(b"\n  \n>x\nAC\n".to_vec());
    assert!(looks_like_fasta(&mut c).unwrap());
    assert_eq!(c.position(), 0);

    assert!(!looks_like_fasta(Cursor::new(b"ACGT\n>x\n".to_vec())).unwrap());
    assert!(!looks_like_fasta(Cursor::new(Vec::new())).unwrap());
}

#[test]
fn process_file_to_path() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "a.fasta", A);
    let out = dir.path().join("a.clean.fasta");

    let summary = process_file(&input, Some(&out)).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(summary.gaps_removed, 2);
    assert_eq!(summary.stop_codons_trimmed, 1);
    assert_eq!(fs::read_to_string(&out).unwrap(), A_CLEAN);
    assert_eq!(fs::read_to_string(&input).unwrap(), A);
}

#[test]
fn process_file_to_stdout() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "a.fasta", A);

    let summary = process_file(&input, None).unwrap();
    assert_eq!(summary.records, 2);
    assert_eq!(summary.stop_codons_trimmed, 1);
    // no file is produced next to the input
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(fs::read_to_string(&input).unwrap(), A);
}

#[test]
fn output_takes_input_permissions() {
    let dir = tempdir().unwrap();
    let input = write(dir.path(), "ro.fasta", A);
    let mut perms = fs::metadata(&input).unwrap().permissions();
    perms.set_readonly(true);
    fs::set_permissions(&input, perms).unwrap();

    let out = dir.path().join("ro.clean.fasta");
    process_file(&input, Some(&out)).unwrap();
    assert!(fs::metadata(&out).unwrap().permissions().readonly());
    assert_eq!(fs::read_to_string(&out).unwrap(), A_CLEAN);
}

#[test]
fn process_missing_file_fails_without_output() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("never.fasta");
    let err = process_file(&dir.path().join("nope.fasta"), Some(&out)).unwrap_err();
    assert!(matches!(err, BatchError::Open { .. }));
    assert!(!out.exists());
}

#[test]
fn batch_in_place() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a.fasta", A);
    let b = write(dir.path(), "b.fa", B);
    let notes = write(dir.path(), "notes.txt", "not a fasta file\n>late header\n");
    fs::create_dir(dir.path().join("sub")).unwrap();
    write(&dir.path().join("sub"), "c.fasta", A);

    let report = run_batch(dir.path(), &BatchOptions::default()).unwrap();
    assert!(report.is_success());
    assert_eq!(report.processed.len(), 2);
    assert_eq!(report.processed[0].input, a);
    assert_eq!(report.processed[0].output, a);
    assert_eq!(report.totals().records, 3);

    assert_eq!(fs::read_to_string(&a).unwrap(), A_CLEAN);
    assert_eq!(fs::read_to_string(&b).unwrap(), B_CLEAN);
    assert_eq!(
        fs::read_to_string(&notes).unwrap(),
        "not a fasta file\n>late header\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("sub/c.fasta")).unwrap(),
        A
    );
}

#[test]
fn batch_prefix_into_output_dir_parallel() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    for i in 0..12 {
        write(&input, &format!("s{i:02}.fas"), if i % 2 == 0 { A } else { B });
    }
    let out = dir.path().join("out/nested");

    let opts = BatchOptions {
        naming: OutputNaming::Suffixed,
        output_dir: Some(out.clone()),
        threads: 4,
        error_policy: ErrorPolicy::Return,
    };
    let report = run_batch(&input, &opts).unwrap();
    assert_eq!(report.processed.len(), 12);

    for i in 0..12 {
        let got = fs::read_to_string(out.join(format!("s{i:02}_output.fasta"))).unwrap();
        assert_eq!(got, if i % 2 == 0 { A_CLEAN } else { B_CLEAN });
        // inputs untouched
        let orig = fs::read_to_string(input.join(format!("s{i:02}.fas"))).unwrap();
        assert_eq!(orig, if i % 2 == 0 { A } else { B });
    }
}

#[test]
fn batch_rejects_plain_file() {
    let dir = tempdir().unwrap();
    let f = write(dir.path(), "a.fasta", A);
    let err = run_batch(&f, &BatchOptions::default()).unwrap_err();
    assert!(matches!(err, BatchError::NotADirectory { .. }));
}

#[cfg(unix)]
#[test]
fn batch_skip_policy_records_failures() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    write(&input, "a.fasta", A);
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    // a directory where the output file should go makes the rename fail
    fs::create_dir(out.join("a.fasta")).unwrap();
    fs::write(out.join("a.fasta/keep"), "x").unwrap();
    write(&input, "b.fasta", B);

    let opts = BatchOptions {
        output_dir: Some(out.clone()),
        ..BatchOptions::default()
    };
    let report = run_batch(&input, &opts).unwrap();
    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, input.join("a.fasta"));
    assert!(matches!(report.failed[0].1, BatchError::Persist { .. }));
    assert_eq!(fs::read_to_string(out.join("b.fasta")).unwrap(), B_CLEAN);

    let strict = BatchOptions {
        error_policy: ErrorPolicy::Return,
        ..opts
    };
    assert!(run_batch(&input, &strict).is_err());

    // permissions follow the input
    let mode = fs::metadata(input.join("b.fasta")).unwrap().permissions().mode();
    let out_mode = fs::metadata(out.join("b.fasta")).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, out_mode & 0o777);
}

#[cfg(unix)]
#[test]
fn strict_policy_returns_first_failure_in_order() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in");
    fs::create_dir(&input).unwrap();
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();
    for name in ["a.fasta", "b.fasta", "c.fasta", "d.fasta"] {
        write(&input, name, A);
    }
    // outputs blocked by non-empty directories for b, c and d
    for name in ["b.fasta", "c.fasta", "d.fasta"] {
        fs::create_dir(out.join(name)).unwrap();
        fs::write(out.join(name).join("keep"), "x").unwrap();
    }

    let opts = BatchOptions {
        output_dir: Some(out.clone()),
        threads: 4,
        error_policy: ErrorPolicy::Return,
        ..BatchOptions::default()
    };
    for _ in 0..5 {
        match run_batch(&input, &opts).unwrap_err() {
            BatchError::Persist { path, .. } => assert_eq!(path, out.join("b.fasta")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn concurrent_transforms_match_sequential() {
    let inputs: Vec<String> = (0..8)
        .map(|i| {
            let mut s = String::new();
            for j in 0..200 {
                let tail = ["TAA", "TGA", "TAG", "CCC"][(i + j) % 4];
                s.push_str(&format!(">r{i}_{j}\nAC-G{}\nT-{tail}\n", "-".repeat(j % 3)));
            }
            s
        })
        .collect();

    let sequential: Vec<Vec<u8>> = inputs
        .iter()
        .map(|s| {
            let mut out = Vec::new();
            transform(s.as_bytes(), &mut out).unwrap();
            out
        })
        .collect();

    let parallel: Vec<Vec<u8>> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|s| {
                scope.spawn(move || {
                    let mut out = Vec::new();
                    transform(s.as_bytes(), &mut out).unwrap();
                    out
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, parallel);
}
