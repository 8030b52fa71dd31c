//! Spreadsheet parsing adapters.

mod calamine_workbook_reader;

pub use calamine_workbook_reader::CalamineWorkbookReader;
