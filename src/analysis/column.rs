use crate::analysis::datatype::DataType;
use crate::spreadsheet::cell::Cell;
use crate::spreadsheet::range::Area;
use crate::spreadsheet::reference::index_to_col;
use serde::Serialize;
use std::collections::BTreeMap;

/// A header column of a table region.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInfo {
    /// Column name (the header cell's value)
    pub name: String,
    /// Column letter (e.g., "A", "AB")
    pub reference: String,
    /// Common type of the values below the header
    #[serde(rename = "type")]
    pub data_type: DataType,
}

/// Summarizes the types of a column's values into one type.
/// Falls back to String if types are inconsistent or empty.
pub fn summarize<I>(types: I) -> DataType
where
    I: IntoIterator<Item = DataType>,
{
    let mut types = types.into_iter();
    match types.next() {
        Some(first) if types.all(|kind| kind == first) => first,
        _ => DataType::String,
    }
}

/// Derives header columns from the cells of a region.
///
/// Every non-blank cell on the first row of `area` names a column; the column type is
/// summarized from the non-blank cells below it within the region.
pub fn header_columns(cells: &[Cell], area: &Area) -> Vec<ColumnInfo> {
    let mut headers = BTreeMap::<usize, &Cell>::new();
    let mut types = BTreeMap::<usize, Vec<DataType>>::new();
    for cell in cells.iter().filter(|cell| !cell.is_blank() && area.contains(cell.row, cell.col)) {
        if cell.row == area.first_row {
            headers.insert(cell.col, cell);
        } else {
            types.entry(cell.col).or_default().push(cell.data_type());
        }
    }

    headers
        .into_iter()
        .map(|(col, header)| ColumnInfo {
            name: header.value.trim().to_owned(),
            reference: index_to_col(col),
            data_type: summarize(types.remove(&col).unwrap_or_default()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::cell::CellType;

    #[test]
    fn summarize_types() {
        assert_eq!(summarize(Vec::<DataType>::new()), DataType::String);
        assert_eq!(summarize(vec![DataType::Number, DataType::Number]), DataType::Number);
        assert_eq!(summarize(vec![DataType::Date]), DataType::Date);
        assert_eq!(summarize(vec![DataType::Number, DataType::Boolean]), DataType::String);
    }

    #[test]
    fn header_columns_from_first_row() {
        let cells = vec![
            Cell::new(1, 2, CellType::String, "Region"),
            Cell::new(1, 3, CellType::String, " Q1 "),
            Cell::new(1, 4, CellType::String, "Launch"),
            Cell::new(2, 2, CellType::String, "North"),
            Cell::new(2, 3, CellType::Numeric, "10"),
            Cell::new(2, 4, CellType::String, "2024-01-02"),
            Cell::new(3, 2, CellType::String, "South"),
            Cell::new(3, 3, CellType::Numeric, "12.5"),
            Cell::new(3, 4, CellType::String, "TBD"),
        ];
        let columns = header_columns(&cells, &Area::try_from("C2:E4").unwrap());
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0].name, "Region");
        assert_eq!(columns[0].reference, "C");
        assert_eq!(columns[0].data_type, DataType::String);
        assert_eq!(columns[1].name, "Q1");
        assert_eq!(columns[1].data_type, DataType::Number);
        assert_eq!(columns[2].data_type, DataType::String);
    }

    #[test]
    fn header_without_values_is_string() {
        let cells = vec![Cell::new(0, 0, CellType::String, "Total")];
        let columns = header_columns(&cells, &Area::cell(0, 0));
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].data_type, DataType::String);
    }
}
