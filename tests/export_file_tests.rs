//! `export_to_file` writes into the working directory, so it gets its own
//! test binary and process.

use royalbit_tabula::{record, ExcelExporter, ExcelImporter, ExcelOptions};
use tempfile::TempDir;

record! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct City {
        pub name: String => "City",
        pub population: u64 => "Population",
    }
}

#[test]
fn test_export_to_file_uses_sheet_name() {
    let dir = TempDir::new().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let cities = vec![City {
        name: "Oslo".to_string(),
        population: 709_000,
    }];
    let options = ExcelOptions::new("cities", "Cities");
    let path = ExcelExporter::new(options.clone())
        .export_to_file(&cities)
        .unwrap();

    assert_eq!(path, std::path::PathBuf::from("cities.xlsx"));
    assert!(dir.path().join("cities.xlsx").exists());

    let mut back: Vec<City> = Vec::new();
    ExcelImporter::new(options)
        .import_path(&path, &mut back)
        .unwrap();
    assert_eq!(back, cities);
}
