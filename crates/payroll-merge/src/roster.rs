use crate::grid::CellValue;

/// Where the provider workbook keeps its per-employee identity cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterLayout {
    /// Written into `company_id_col` of every appended row.
    pub company_id: CellValue,
    pub company_id_col: usize,
    pub first_name_col: usize,
    pub last_name_col: usize,
}

impl Default for RosterLayout {
    fn default() -> Self {
        RosterLayout {
            company_id: CellValue::Number(28.0),
            company_id_col: 0,
            first_name_col: 2,
            last_name_col: 4,
        }
    }
}
