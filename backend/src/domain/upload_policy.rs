//! File-type and count checks applied to uploads before any processing.

/// Extensions accepted for stock workbooks.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm"];

/// Extensions accepted for illustrative images.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Largest number of images accepted in one upload.
pub const MAX_IMAGES_PER_UPLOAD: usize = 10;

/// Lower-cased extension of `file_name`, if it has one.
fn extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.trim().rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then(|| ext.to_lowercase())
}

fn has_extension(file_name: &str, allowed: &[&str]) -> bool {
    extension(file_name).is_some_and(|ext| allowed.contains(&ext.as_str()))
}

/// Whether `file_name` names a spreadsheet the ingestion pipeline accepts.
///
/// # Examples
/// ```
/// use inventory_backend::domain::is_workbook_file;
///
/// assert!(is_workbook_file("Inventario.XLSX"));
/// assert!(!is_workbook_file("notas.txt"));
/// ```
#[must_use]
pub fn is_workbook_file(file_name: &str) -> bool {
    has_extension(file_name, WORKBOOK_EXTENSIONS)
}

/// Whether `file_name` names an image format the asset host accepts.
#[must_use]
pub fn is_image_file(file_name: &str) -> bool {
    has_extension(file_name, IMAGE_EXTENSIONS)
}
