use relir::catalog::InMemoryCatalog;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn blogging_catalog() -> InMemoryCatalog {
    init_logging();
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/blogging.yaml");
    InMemoryCatalog::from_yaml_file(path).expect("blogging fixture should load")
}
