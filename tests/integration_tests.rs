use assert_cmd::Command;
use predicates::str::{contains, diff};

fn lmc() -> Command {
    let mut cmd = Command::cargo_bin("lmc").unwrap();
    cmd.env_remove("LMC_TRACE");
    cmd
}

#[test]
fn runs_without_arguments() {
    lmc().assert().success();
}

#[test]
fn adds_two_inputs() {
    lmc()
        .arg("run")
        .arg("tests/files/add.lmc")
        .arg("--minimal")
        .write_stdin("3\n4\n")
        .assert()
        .success()
        .stdout(diff("7\n"));
}

#[test]
fn inputs_may_share_a_line() {
    lmc()
        .arg("run")
        .arg("tests/files/add.lmc")
        .arg("--minimal")
        .write_stdin("600 450")
        .assert()
        .success()
        .stdout(diff("50\n"));
}

#[test]
fn shorthand_path_runs_with_status() {
    lmc()
        .arg("tests/files/countdown.lmc")
        .assert()
        .success()
        .stdout(contains("3\n2\n1\n0\n"))
        .stdout(contains("Halted"))
        .stdout(contains("after 14 cycles"));
}

#[test]
fn multiplies_with_b_register() {
    lmc()
        .args(["run", "tests/files/multiply.lmc", "--minimal"])
        .write_stdin("12\n11\n")
        .assert()
        .success()
        .stdout(diff("132\n"));
}

#[test]
fn division_by_zero_fails() {
    lmc()
        .args(["run", "tests/files/divide.lmc", "--minimal"])
        .write_stdin("9\n0\n")
        .assert()
        .failure()
        .stdout(diff(""))
        .stderr(contains("run::division_by_zero"));
}

#[test]
fn divides() {
    lmc()
        .args(["run", "tests/files/divide.lmc", "--minimal"])
        .write_stdin("100\n7\n")
        .assert()
        .success()
        .stdout(diff("14\n"));
}

#[test]
fn input_out_of_range_fails() {
    lmc()
        .args(["run", "tests/files/add.lmc", "--minimal"])
        .write_stdin("1000\n")
        .assert()
        .failure()
        .stderr(contains("run::io_value_range"))
        .stderr(contains("1000"));
}

#[test]
fn missing_input_fails() {
    lmc()
        .args(["run", "tests/files/add.lmc", "--minimal"])
        .write_stdin("5\n")
        .assert()
        .failure()
        .stderr(contains("run::channel"));
}

#[test]
fn start_address() {
    lmc()
        .args(["run", "tests/files/start.lmc", "--minimal", "--start", "50"])
        .assert()
        .success()
        .stdout(diff("42\n"));

    lmc()
        .args(["run", "tests/files/start.lmc", "--start", "1000"])
        .assert()
        .failure();
}

#[test]
fn cycle_limit() {
    lmc()
        .args(["run", "tests/files/loop.lmc", "--minimal", "--max-cycles", "100"])
        .assert()
        .failure()
        .stderr(contains("run::cycle_limit"));
}

#[test]
fn traces_cycles() {
    lmc()
        .args(["run", "tests/files/add.lmc", "--minimal", "--trace"])
        .write_stdin("3\n4\n")
        .assert()
        .success()
        .stdout(diff("7\n"))
        .stderr(contains("000  901  INP     A 003  B 000  -P-"))
        .stderr(contains("005  000  HLT     A 007  B 000  -P-"));
}

#[test]
fn trace_from_environment() {
    lmc()
        .args(["run", "tests/files/countdown.lmc", "--minimal"])
        .env("LMC_TRACE", "1")
        .assert()
        .success()
        .stderr(contains("003  801  BRP 01  A 999  B 000  ---"));
}

#[test]
fn check_reports_load_errors() {
    lmc()
        .args(["check", "tests/files/countdown.lmc"])
        .assert()
        .success()
        .stdout(contains("7 cells loaded"));

    lmc()
        .args(["check", "tests/files/bad.lmc"])
        .assert()
        .failure()
        .stderr(contains("load::bad_number"));
}
