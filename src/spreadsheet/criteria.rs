use crate::error::RegionError;
use crate::spreadsheet::SheetSource;
use glob::Pattern;

/// Criteria for selecting sheets and analysis steps.
#[derive(Clone, Debug)]
pub struct Criteria {
    /// Sheet name patterns for filtering which sheets to process.
    pub sheet_name_patterns: Option<Vec<Pattern>>,

    /// Maximum number of sheets to analyse.
    pub sheet_limit: Option<usize>,

    /// Refine table regions into rectangles after clustering (default: true).
    pub refine: bool,
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria {
            sheet_name_patterns: None,
            sheet_limit: None,
            refine: true,
        }
    }
}

impl Criteria {
    /// Restricts analysis to sheets whose name matches any of the glob patterns.
    pub fn with_sheet_names(mut self, patterns: &[&str]) -> Result<Self, RegionError> {
        let patterns = patterns
            .iter()
            .map(|pattern| Pattern::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        self.sheet_name_patterns = Some(patterns);
        Ok(self)
    }

    /// Checks if a sheet name matches the criteria patterns.
    /// Returns true if no patterns are specified or if name matches any pattern.
    pub fn accept(&self, sheet_name: &str) -> bool {
        if let Some(patterns) = &self.sheet_name_patterns {
            patterns.iter().any(|pattern| pattern.matches(sheet_name))
        } else {
            true
        }
    }

    /// Keeps accepted sheets in workbook order, up to the sheet limit.
    pub fn select<'a>(&self, sheets: Vec<&'a dyn SheetSource>) -> Vec<&'a dyn SheetSource> {
        sheets
            .into_iter()
            .filter(|sheet| self.accept(&sheet.name()))
            .take(self.sheet_limit.unwrap_or(usize::MAX))
            .collect()
    }
}
