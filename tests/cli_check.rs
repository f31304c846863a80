#[cfg(test)]
mod test {
    use assert_cmd::Command;
    use predicates::str::contains;
    use rstest::rstest;
    use std::fs;
    use std::path::PathBuf;

    const P5: &str = "p tdp 5 4\n1 2\n2 3\n3 4\n4 5\n";

    fn write_instance(dir: &tempfile::TempDir) -> PathBuf {
        let graph = dir.path().join("g.gr");
        fs::write(&graph, P5).unwrap();
        graph
    }

    #[rstest]
    fn accepts_solver_output() {
        let dir = tempfile::tempdir().unwrap();
        let graph = write_instance(&dir);
        let decomp = dir.path().join("g.tree");

        Command::cargo_bin("sapling")
            .unwrap()
            .arg("solve")
            .arg("--budget")
            .arg("0.2")
            .arg("--out")
            .arg(&decomp)
            .arg(&graph)
            .assert()
            .success();

        Command::cargo_bin("sapling")
            .unwrap()
            .arg("check")
            .arg(&graph)
            .arg(&decomp)
            .assert()
            .success()
            .stdout(contains("valid decomposition of depth 3"));
    }

    #[rstest]
    fn rejects_a_corrupted_decomposition() {
        let dir = tempfile::tempdir().unwrap();
        let graph = write_instance(&dir);
        let decomp = dir.path().join("g.tree");
        // star at vertex 1 misses edge (2, 3) among others
        fs::write(&decomp, "2\n0\n1\n1\n1\n1\n").unwrap();

        Command::cargo_bin("sapling")
            .unwrap()
            .arg("check")
            .arg(&graph)
            .arg(&decomp)
            .assert()
            .failure()
            .stderr(contains("invalid decomposition"));
    }

    #[rstest]
    fn rejects_a_missing_graph() {
        Command::cargo_bin("sapling")
            .unwrap()
            .arg("check")
            .arg("missing.gr")
            .arg("missing.tree")
            .assert()
            .failure()
            .stderr(contains("IO error"));
    }
}
