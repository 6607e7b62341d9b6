use crate::models::{GeneratedControl, OutputFormat};

/// One render-target decision for the whole document, made after fanout:
/// any spreadsheet block makes the target excel.
pub fn select_output_format(controls: &[GeneratedControl]) -> OutputFormat {
    if controls.iter().any(|control| control.is_excel_spreadsheet) {
        OutputFormat::Excel
    } else {
        OutputFormat::Word
    }
}
