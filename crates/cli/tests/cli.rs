use assert_cmd::Command;

fn cli() -> Command {
    Command::cargo_bin("bookshelf-cli").unwrap()
}

#[test]
fn openapi_prints_book_routes() {
    let output = cli().arg("openapi").assert().success().get_output().stdout.clone();
    let document: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(document["openapi"], "3.1.0");
    assert!(document["paths"]["/books"]["post"].is_object());
    assert!(document["paths"]["/books/{id}"]["delete"].is_object());
    assert!(document["paths"]["/search"]["get"].is_object());
}

#[test]
fn config_honours_port_variable() {
    let output = cli()
        .arg("config")
        .env("PORT", "4321")
        .env("BOOKSHELF_ENV", "local")
        .env("BOOKSHELF_CONFIG_DIR", std::env::temp_dir().join("bookshelf-cli-no-config"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let settings: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(settings["server"]["port"], 4321);
    assert_eq!(settings["environment"], "local");
}

#[test]
fn unknown_environment_fails() {
    cli()
        .arg("config")
        .env("BOOKSHELF_ENV", "qa")
        .assert()
        .failure();
}

#[test]
fn missing_subcommand_fails() {
    cli().assert().failure();
}
