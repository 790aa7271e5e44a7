//! HTML writer options

/// Options for writing HTML
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlWriteOptions {
    /// Sheet to render; `None` renders every sheet
    pub sheet_index: Option<usize>,
    /// Put styles in `style` attributes instead of a `<style>` block
    pub use_inline_css: bool,
    /// Emit a list of links to each table when rendering several sheets
    pub generate_sheet_navigation_block: bool,
    /// Render cached formula results instead of formula text
    pub pre_calculate_formulas: bool,
}

impl Default for HtmlWriteOptions {
    fn default() -> Self {
        Self {
            sheet_index: Some(0),
            use_inline_css: false,
            generate_sheet_navigation_block: true,
            pre_calculate_formulas: true,
        }
    }
}
