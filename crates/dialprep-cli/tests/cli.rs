use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Output;
use tempfile::TempDir;

fn run_raw(config_home: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("dialprep")
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(config_home: &Path, args: &[&str]) -> String {
    let output = run_raw(config_home, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(config_home: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_raw(config_home, &full);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn write_contacts(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("lista.csv");
    fs::write(
        &path,
        "Nome;Telefone;CPF\n\
         Ana Silva;11999998888;111\n\
         Bruno;11999998888;222\n\
         Carla;(21) 9999-8888;333\n\
         Davi;abc;444\n",
    )
    .expect("write input");
    path
}

#[test]
fn prepare_writes_dialer_file_next_to_input() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());

    let stdout = run_cmd(temp.path(), &["prepare", input.to_str().expect("path")]);
    assert!(stdout.contains("4 in, 2 out, 1 rejected, 1 duplicates removed"), "{stdout}");

    let output = temp.path().join("lista_DISCADOR.csv");
    let bytes = fs::read(&output).expect("read output");
    assert!(bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
    let text = String::from_utf8(bytes[3..].to_vec()).expect("utf8 output");
    let lines: Vec<&str> = text.lines().collect();

    let header: Vec<&str> = lines[0].split(';').collect();
    assert_eq!(header.len(), 34);
    assert_eq!(&header[..6], &["ID", "ID_CLIENTE", "NOME", "CPF", "DDD1", "TELEFONE1"]);

    assert_eq!(lines.len(), 3);
    let first: Vec<&str> = lines[1].split(';').collect();
    assert_eq!(first.len(), 34);
    assert_eq!(&first[..6], &["10", "10", "Ana", "111", "11", "999998888"]);
    let second: Vec<&str> = lines[2].split(';').collect();
    assert_eq!(&second[..6], &["11", "11", "Carla", "333", "21", "999998888"]);
}

#[test]
fn prepare_json_reports_stats_and_rejections() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());
    let out = temp.path().join("saida.csv");

    let report = run_cmd_json(
        temp.path(),
        &[
            "prepare",
            input.to_str().expect("path"),
            "--out",
            out.to_str().expect("path"),
        ],
    );
    assert_eq!(report["columns"]["phone_column"], "Telefone");
    assert_eq!(report["columns"]["name_column"], "Nome");
    assert_eq!(report["stats"]["total_in"], 4);
    assert_eq!(report["stats"]["total_out"], 2);
    assert_eq!(report["stats"]["rejected"], 1);
    assert_eq!(report["stats"]["duplicates_removed"], 1);
    assert_eq!(report["stats"]["rejections"]["no_digits"], 1);
    assert!(out.exists());
}

#[test]
fn prepare_without_phone_column_exits_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("sem_fone.csv");
    fs::write(&input, "Nome;Cidade\nAna;Recife\n").expect("write input");

    let output = run_raw(temp.path(), &["prepare", input.to_str().expect("path")]);
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("phone"), "{stderr}");
    assert!(!temp.path().join("sem_fone_DISCADOR.csv").exists());
}

#[test]
fn prepare_rejects_conflicting_dedupe_flags() {
    let temp = TempDir::new().expect("temp dir");
    let input = write_contacts(temp.path());

    let output = run_raw(
        temp.path(),
        &[
            "prepare",
            input.to_str().expect("path"),
            "--dedupe",
            "none",
            "--reference-column",
            "CPF",
        ],
    );
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn check_prints_normalized_number() {
    let temp = TempDir::new().expect("temp dir");
    let stdout = run_cmd(temp.path(), &["check", "55(11)98765-4321.0"]);
    assert_eq!(stdout.trim(), "11 987654321");

    let stdout = run_cmd(temp.path(), &["check", "9999-8888", "--area-code", "021"]);
    assert_eq!(stdout.trim(), "21 999998888");
}

#[test]
fn check_reports_rejection_reason() {
    let temp = TempDir::new().expect("temp dir");
    let output = run_raw(temp.path(), &["--json", "check", "1133334444"]);
    assert_eq!(output.status.code(), Some(3));
    let report: Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(report["valid"], false);
    assert_eq!(report["rejection"], "landline_prefix");

    let stdout = run_cmd(temp.path(), &["check", "1133334444", "--keep-landlines"]);
    assert_eq!(stdout.trim(), "11 933334444");
}

#[test]
fn columns_lists_detected_roles() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("base.csv");
    fs::write(&input, "NOME CLIENTE,DDD,CELULAR,CIDADE\nAna,11,999998888,Recife\n")
        .expect("write input");

    let report = run_cmd_json(temp.path(), &["columns", input.to_str().expect("path")]);
    assert_eq!(report["rows"], 1);
    let roles: Vec<(String, Value)> = report["columns"]
        .as_array()
        .expect("array")
        .iter()
        .map(|item| (item["name"].as_str().expect("name").to_string(), item["role"].clone()))
        .collect();
    assert_eq!(roles[0], ("NOME CLIENTE".to_string(), Value::from("name")));
    assert_eq!(roles[1], ("DDD".to_string(), Value::from("area_code")));
    assert_eq!(roles[2], ("CELULAR".to_string(), Value::from("phone")));
    assert_eq!(roles[3], ("CIDADE".to_string(), Value::Null));
}

#[test]
fn dedupe_keeps_first_row_per_reference_value() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("base.csv");
    fs::write(&input, "Nome;CPF\nAna;1\nBia;1\nCaio;2\n").expect("write input");

    let report = run_cmd_json(
        temp.path(),
        &["dedupe", input.to_str().expect("path"), "--column", "CPF"],
    );
    assert_eq!(report["total_before"], 3);
    assert_eq!(report["total_after"], 2);
    assert_eq!(report["removed"], 1);

    let written = fs::read(temp.path().join("base_HIGIENIZADO.csv")).expect("read output");
    assert_eq!(
        String::from_utf8(written).expect("ascii output"),
        "Nome;CPF\nAna;1\nCaio;2\n"
    );
}

#[test]
fn dedupe_unknown_column_exits_not_found() {
    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("base.csv");
    fs::write(&input, "Nome;CPF\nAna;1\n").expect("write input");

    let output = run_raw(
        temp.path(),
        &["dedupe", input.to_str().expect("path"), "--column", "EMAIL"],
    );
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn config_file_changes_defaults() {
    let temp = TempDir::new().expect("temp dir");
    let config_dir = temp.path().join("dialprep");
    fs::create_dir_all(&config_dir).expect("config dir");
    fs::write(
        config_dir.join("config.toml"),
        "[output]\ndedupe = \"none\"\nfirst_id = 100\n",
    )
    .expect("write config");
    let input = write_contacts(temp.path());

    let report = run_cmd_json(temp.path(), &["prepare", input.to_str().expect("path")]);
    assert_eq!(report["stats"]["total_out"], 3);
    assert_eq!(report["preview"][0]["ID"], "100");
}

#[cfg(feature = "xlsx")]
#[test]
fn dedupe_writes_workbook_input_back_as_workbook() {
    use dialprep_core::{CellValue, RawTable};
    use dialprep_table::write::write_table;
    use dialprep_table::{read_path, resolve_encoding, ReadOptions, TableFormat};

    let temp = TempDir::new().expect("temp dir");
    let input = temp.path().join("lista.xlsx");
    let table = RawTable::new(
        vec!["Nome".to_string(), "CPF".to_string()],
        vec![
            vec![CellValue::from("Ana"), CellValue::from("111")],
            vec![CellValue::from("Bia"), CellValue::from("111")],
            vec![CellValue::from("Caio"), CellValue::from("222")],
        ],
    );
    let utf8 = resolve_encoding("utf-8").expect("encoding");
    let workbook = write_table(&table, TableFormat::Workbook, utf8).expect("build workbook");
    fs::write(&input, workbook.bytes).expect("write input");

    let report = run_cmd_json(
        temp.path(),
        &["dedupe", input.to_str().expect("path"), "--column", "CPF"],
    );
    assert_eq!(report["removed"], 1);
    let output = temp.path().join("lista_HIGIENIZADO.xlsx");
    assert_eq!(report["output"], output.display().to_string());
    assert!(!temp.path().join("lista_HIGIENIZADO.csv").exists());

    let written = read_path(&output, &ReadOptions::default()).expect("read output");
    assert_eq!(written.report.format, TableFormat::Workbook);
    assert_eq!(written.table.column_names(), ["Nome", "CPF"]);
    let names: Vec<String> = written
        .table
        .rows()
        .iter()
        .map(|row| row.get(0).to_string())
        .collect();
    assert_eq!(names, vec!["Ana", "Caio"]);
}
