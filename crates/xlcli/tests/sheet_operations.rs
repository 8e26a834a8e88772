//! Sheet management: info, listing, create, delete, rename, copy

mod common;

use common::{sheet_names, write_workbook, Fixture};
use pretty_assertions::assert_eq;
use xlcli::{Error, SheetInfo};

#[test]
fn test_read_file_info() {
    let fx = Fixture::new(&[("One", &[&["x"]]), ("Two", &[])]);
    let info = fx.service.read_file_info(&fx.path).unwrap();

    assert_eq!(info.name, "book.xlsx");
    assert_eq!(info.sheet_count, 2);
    assert_eq!(info.size, std::fs::metadata(&fx.path).unwrap().len());
    assert!(info.size > 0);
}

#[test]
fn test_list_sheets_with_dimensions() {
    let fx = Fixture::new(&[
        ("Data", &[&["a", "b", "c"], &["d", "e", "f"]]),
        ("Empty", &[]),
    ]);
    let sheets = fx.service.list_sheets(&fx.path).unwrap();

    assert_eq!(
        sheets,
        vec![
            SheetInfo {
                name: "Data".into(),
                rows: 2,
                columns: 3,
            },
            SheetInfo {
                name: "Empty".into(),
                rows: 0,
                columns: 0,
            },
        ]
    );
}

#[test]
fn test_create_sheet() {
    let fx = Fixture::new(&[("Sheet1", &[])]);
    fx.service.create_sheet(&fx.path, "Report").unwrap();
    assert_eq!(fx.sheet_names(), vec!["Sheet1", "Report"]);
}

#[test]
fn test_create_existing_sheet_conflicts() {
    let fx = Fixture::new(&[("Sheet1", &[])]);

    let err = fx.service.create_sheet(&fx.path, "Sheet1").unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(err.to_string(), "Sheet 'Sheet1' already exists.");

    // Names collide regardless of case
    assert!(matches!(
        fx.service.create_sheet(&fx.path, "SHEET1"),
        Err(Error::Conflict(_))
    ));
    assert_eq!(fx.sheet_names(), vec!["Sheet1"]);
}

#[test]
fn test_create_sheet_rejects_invalid_names() {
    let fx = Fixture::new(&[("Sheet1", &[])]);
    let too_long = "x".repeat(32);
    for name in ["", "a/b", "what?", too_long.as_str()] {
        assert!(
            matches!(fx.service.create_sheet(&fx.path, name), Err(Error::InvalidArgument(_))),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn test_delete_sheet() {
    let fx = Fixture::new(&[("One", &[]), ("Two", &[])]);
    fx.service.delete_sheet(&fx.path, "One").unwrap();
    assert_eq!(fx.sheet_names(), vec!["Two"]);
}

#[test]
fn test_delete_last_sheet_is_rejected() {
    let fx = Fixture::new(&[("Only", &[&["keep"]])]);

    let err = fx.service.delete_sheet(&fx.path, "Only").unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
    assert_eq!(
        err.to_string(),
        "Cannot delete the last worksheet in the workbook."
    );

    // The check comes before the name lookup
    assert!(matches!(
        fx.service.delete_sheet(&fx.path, "Missing"),
        Err(Error::InvalidOperation(_))
    ));
    assert_eq!(fx.read("Only", "A1"), "keep");
}

#[test]
fn test_delete_missing_sheet() {
    let fx = Fixture::new(&[("One", &[]), ("Two", &[])]);
    assert!(matches!(
        fx.service.delete_sheet(&fx.path, "Three"),
        Err(Error::SheetNotFound(_))
    ));
}

#[test]
fn test_rename_keeps_position_and_data() {
    let fx = Fixture::new(&[("One", &[]), ("Two", &[&["v"]]), ("Three", &[])]);
    fx.service.rename_sheet(&fx.path, "Two", "Second").unwrap();

    assert_eq!(fx.sheet_names(), vec!["One", "Second", "Three"]);
    assert_eq!(fx.read("Second", "A1"), "v");
}

#[test]
fn test_rename_errors() {
    let fx = Fixture::new(&[("One", &[]), ("Two", &[])]);

    assert!(matches!(
        fx.service.rename_sheet(&fx.path, "Missing", "New"),
        Err(Error::SheetNotFound(_))
    ));
    assert!(matches!(
        fx.service.rename_sheet(&fx.path, "One", "Two"),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        fx.service.rename_sheet(&fx.path, "Two", "Two"),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        fx.service.rename_sheet(&fx.path, "Two", "bad:name"),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(fx.sheet_names(), vec!["One", "Two"]);
}

#[test]
fn test_copy_sheet_into_new_file() {
    let fx = Fixture::new(&[("Data", &[&["Name", "Age"], &["Alice", "30"]]), ("Other", &[])]);
    let target = fx.file("copy.xlsx");

    let name = fx.service.copy_sheet(&fx.path, "Data", &target, None).unwrap();
    assert_eq!(name, "Data");
    assert_eq!(sheet_names(&target), vec!["Data"]);
    assert_eq!(fx.service.read_cell(&target, "Data", "A2").unwrap(), "Alice");
}

#[test]
fn test_copy_sheet_with_new_name_into_existing_file() {
    let fx = Fixture::new(&[("Data", &[&["1"]])]);
    let target = fx.file("target.xlsx");
    write_workbook(&target, &[("Existing", &[])]);

    fx.service.insert_formula(&fx.path, "Data", "B1", "A1*2").unwrap();
    let name = fx
        .service
        .copy_sheet(&fx.path, "Data", &target, Some("Copied"))
        .unwrap();

    assert_eq!(name, "Copied");
    assert_eq!(sheet_names(&target), vec!["Existing", "Copied"]);
    assert_eq!(fx.service.read_cell(&target, "Copied", "B1").unwrap(), "=A1*2");
    assert_eq!(fx.service.get_cell_value(&target, "Copied", "B1").unwrap(), "2");
}

#[test]
fn test_copy_sheet_within_same_file() {
    let fx = Fixture::new(&[("Data", &[&["Name", "Age"], &["Alice", "30"]])]);
    fx.service.insert_formula(&fx.path, "Data", "C2", "B2+1").unwrap();

    let name = fx
        .service
        .copy_sheet(&fx.path, "Data", &fx.path, Some("Backup"))
        .unwrap();

    assert_eq!(name, "Backup");
    assert_eq!(fx.sheet_names(), vec!["Data", "Backup"]);
    assert_eq!(fx.read("Backup", "A2"), "Alice");
    assert_eq!(fx.read("Backup", "C2"), "=B2+1");
    assert_eq!(fx.read("Data", "A2"), "Alice");

    // Without a new name the copy collides with its source
    assert!(matches!(
        fx.service.copy_sheet(&fx.path, "Data", &fx.path, None),
        Err(Error::Conflict(_))
    ));
    assert_eq!(fx.sheet_names(), vec!["Data", "Backup"]);
}

#[test]
fn test_copy_sheet_empty_new_name_keeps_source_name() {
    let fx = Fixture::new(&[("Data", &[])]);
    let target = fx.file("target.xlsx");
    let name = fx.service.copy_sheet(&fx.path, "Data", &target, Some("")).unwrap();
    assert_eq!(name, "Data");
}

#[test]
fn test_copy_sheet_conflict_and_missing_source() {
    let fx = Fixture::new(&[("Data", &[])]);
    let target = fx.file("target.xlsx");
    write_workbook(&target, &[("Data", &[])]);

    assert!(matches!(
        fx.service.copy_sheet(&fx.path, "Data", &target, None),
        Err(Error::Conflict(_))
    ));
    assert!(matches!(
        fx.service.copy_sheet(&fx.path, "Nope", &target, None),
        Err(Error::SheetNotFound(_))
    ));
    assert!(matches!(
        fx.service.copy_sheet(fx.file("none.xlsx"), "Data", &target, None),
        Err(Error::NotFound { .. })
    ));
    assert_eq!(sheet_names(&target), vec!["Data"]);
}
