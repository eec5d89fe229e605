//! End-to-end generation over files: CSV in, merkle.json out.

use std::fs;
use std::path::Path;

use merkle_airdrop::{
    generate, generate_artifact, hash_sorted_pair, read_records, verify_proof, AirdropError,
    Artifact, Claim, Columns, EncodingError,
};

const HOLDERS: &str = "\
\"HolderAddress\",\"Balance\",\"PendingBalanceUpdate\"
\"0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\",\"100\",\"No\"
\"0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb\",\"200\",\"No\"
\"0xcccccccccccccccccccccccccccccccccccccccc\",\"1,000,000\",\"No\"
";

fn write_csv(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("tokenholders.csv");
    fs::write(&path, contents).unwrap();
    path
}

fn build(csv: &Path, out: &Path) -> merkle_airdrop::Result<Artifact> {
    let records = read_records(csv, &Columns::default())?;
    let artifact = generate_artifact(&records)?;
    artifact.save(out)?;
    Ok(artifact)
}

#[test]
fn test_csv_to_json_and_back() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), HOLDERS);
    let out = dir.path().join("merkle.json");

    let artifact = build(&csv, &out).unwrap();
    let loaded = Artifact::load(&out).unwrap();
    assert_eq!(loaded, artifact);
    assert_eq!(loaded.len(), 3);

    let key = format!("0x{}", "aa".repeat(20));
    let entry = &loaded.claims[&key];
    assert_eq!(entry.id, 0);
    assert_eq!(entry.amount, "100");

    let entry = &loaded.claims[&format!("0x{}", "cc".repeat(20))];
    assert_eq!(entry.id, 2);
    assert_eq!(entry.amount, "1000000");

    let root = loaded.root().unwrap();
    assert!(loaded.check_all_against(&root).unwrap().iter().all(|c| c.valid));
}

#[test]
fn test_three_claims_tree_shape() {
    let l0 = Claim::new(0, [0xaa; 20], 100u32).leaf().unwrap();
    let l1 = Claim::new(1, [0xbb; 20], 200u32).leaf().unwrap();
    let l2 = Claim::new(2, [0xcc; 20], 300u32).leaf().unwrap();

    let airdrop = generate(vec![
        Claim::new(0, [0xaa; 20], 100u32),
        Claim::new(1, [0xbb; 20], 200u32),
        Claim::new(2, [0xcc; 20], 300u32),
    ])
    .unwrap();

    let h01 = hash_sorted_pair(&l0, &l1);
    assert_eq!(airdrop.root(), hash_sorted_pair(&h01, &l2));
    assert_eq!(airdrop.proofs[0].proof, vec![l1, l2]);
    assert_eq!(airdrop.proofs[1].proof, vec![l0, l2]);
    assert_eq!(airdrop.proofs[2].proof, vec![h01]);
    for entry in &airdrop.proofs {
        assert!(verify_proof(&entry.leaf, &entry.proof, &airdrop.root()));
    }
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), HOLDERS);
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    build(&csv, &first).unwrap();
    build(&csv, &second).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_bad_row_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        "HolderAddress,Balance\n\
         0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa,100\n\
         0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb,12.5\n",
    );
    let out = dir.path().join("merkle.json");

    let err = build(&csv, &out).unwrap_err();
    assert!(matches!(
        err,
        AirdropError::Encoding {
            id: 1,
            source: EncodingError::InvalidAmount { .. }
        }
    ));
    assert!(!out.exists());
}

#[test]
fn test_duplicate_holder_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(
        dir.path(),
        "HolderAddress,Balance\n\
         0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa,100\n\
         0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA,200\n",
    );
    let out = dir.path().join("merkle.json");

    assert!(matches!(
        build(&csv, &out),
        Err(AirdropError::DuplicateClaim {
            first_id: 0,
            second_id: 1,
            ..
        })
    ));
    assert!(!out.exists());
}

#[test]
fn test_header_only_csv_is_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), "HolderAddress,Balance\n");
    let out = dir.path().join("merkle.json");
    assert!(matches!(build(&csv, &out), Err(AirdropError::EmptyInput)));
    assert!(!out.exists());
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("merkle.json");

    let good = write_csv(dir.path(), HOLDERS);
    build(&good, &out).unwrap();
    let before = fs::read(&out).unwrap();

    let bad = write_csv(dir.path(), "HolderAddress,Balance\n0x1234,5\n");
    assert!(build(&bad, &out).is_err());
    assert_eq!(fs::read(&out).unwrap(), before);
}

#[test]
fn test_standalone_verify_of_hand_built_claim() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_csv(dir.path(), HOLDERS);
    let out = dir.path().join("merkle.json");
    build(&csv, &out).unwrap();

    // A verifier holding only the published root and an independently
    // reconstructed claim.
    let artifact = Artifact::load(&out).unwrap();
    let root = artifact.root().unwrap();
    let entry = &artifact.claims[&format!("0x{}", "bb".repeat(20))];
    let proof: Vec<_> = entry
        .proof
        .iter()
        .map(|h| merkle_airdrop::parse_hash(h).unwrap())
        .collect();

    let claim = Claim::parse(1, "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB", "200").unwrap();
    assert!(verify_proof(&claim.leaf().unwrap(), &proof, &root));

    let wrong = Claim::parse(1, "0xBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB", "201").unwrap();
    assert!(!verify_proof(&wrong.leaf().unwrap(), &proof, &root));
}
