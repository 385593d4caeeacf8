//! Spreadsheet export of patient records
//!
//! Builds the workbook entirely in memory and hands back the bytes, so
//! concurrent exports never contend on a shared file path.

use rust_xlsxwriter::{Format, Workbook};

pub use rust_xlsxwriter::XlsxError;

/// Column layout matching the historical export: header text and width.
const COLUMNS: &[(&str, f64)] = &[
    ("Name", 20.0),
    ("Email", 25.0),
    ("Phone", 15.0),
    ("Age", 5.0),
    ("Sex", 10.0),
    ("Medical Concern", 30.0),
    ("Completed", 10.0),
];

/// One spreadsheet row. Medical concerns arrive pre-joined so this
/// module stays ignorant of the domain types.
#[derive(Debug, Clone)]
pub struct UserRow {
    pub name: String,
    pub email: String,
    pub phno: String,
    pub age: String,
    pub sex: String,
    pub medical_concern: String,
    pub is_completed: bool,
}

/// Render all users into an XLSX workbook and return its bytes.
pub fn users_workbook(rows: &[UserRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet().set_name("user")?;

    let bold = Format::new().set_bold();
    for (col, (header, width)) in COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.set_column_width(col, *width)?;
        sheet.write_with_format(0, col, *header, &bold)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write(r, 0, &row.name)?;
        sheet.write(r, 1, &row.email)?;
        sheet.write(r, 2, &row.phno)?;
        sheet.write(r, 3, &row.age)?;
        sheet.write(r, 4, &row.sex)?;
        sheet.write(r, 5, &row.medical_concern)?;
        sheet.write_boolean(r, 6, row.is_completed)?;
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> UserRow {
        UserRow {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phno: "0123456789".to_string(),
            age: "36".to_string(),
            sex: "Female".to_string(),
            medical_concern: "migraine, insomnia".to_string(),
            is_completed: false,
        }
    }

    #[test]
    fn workbook_is_valid_zip() {
        let bytes = users_workbook(&[row()]).unwrap();
        // XLSX is a ZIP container
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn empty_export_still_has_header() {
        let bytes = users_workbook(&[]).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn grows_with_rows() {
        let one = users_workbook(&[row()]).unwrap();
        let many = users_workbook(&vec![row(); 200]).unwrap();
        assert!(many.len() > one.len());
    }
}
