use crate::error::RiverError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tiberius::{ColumnData, FromSql, Row};

/// The only query the endpoint runs.
pub const RIVER_QUERY: &str = "SELECT TOP 5 river_id, zone_type FROM dbo.river ORDER BY river_id";

pub const RIVER_ID_COLUMN: &str = "river_id";
pub const ZONE_TYPE_COLUMN: &str = "zone_type";

/// One row of `dbo.river` as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiverRecord {
    pub river_id: Option<String>,
    pub zone_type: Option<String>,
}

impl RiverRecord {
    #[cfg(test)]
    pub fn new(river_id: impl Into<String>, zone_type: impl Into<String>) -> Self {
        Self {
            river_id: Some(river_id.into()),
            zone_type: Some(zone_type.into()),
        }
    }

    pub fn from_row(row: &Row) -> Result<Self, RiverError> {
        Self::from_cells(row.cells().map(|(col, data)| (col.name(), data)))
    }

    /// Maps named cells to a record. Columns are matched by name, so their
    /// position in the result set does not matter.
    pub fn from_cells<'a, I>(cells: I) -> Result<Self, RiverError>
    where
        I: IntoIterator<Item = (&'a str, &'a ColumnData<'static>)>,
    {
        let mut river_id = None;
        let mut zone_type = None;
        for (name, data) in cells {
            if name.eq_ignore_ascii_case(RIVER_ID_COLUMN) {
                river_id = Some(column_to_string(name, data)?);
            } else if name.eq_ignore_ascii_case(ZONE_TYPE_COLUMN) {
                zone_type = Some(column_to_string(name, data)?);
            }
        }
        Ok(RiverRecord {
            river_id: Some(river_id.ok_or_else(|| missing_column(RIVER_ID_COLUMN))?),
            zone_type: Some(zone_type.ok_or_else(|| missing_column(ZONE_TYPE_COLUMN))?),
        })
    }
}

fn missing_column(name: &str) -> RiverError {
    RiverError::DataAccess(format!("column '{}' missing from result set", name))
}

/// Converts a cell to its string form. SQL `NULL` of any type yields an
/// empty string, so clients never see JSON `null`.
///
/// Integers and floats use their decimal `Display` form, `bit` becomes
/// `True`/`False`, GUIDs are lowercase hyphenated and `decimal`/`numeric`
/// keep the column scale. Dates and times use ISO 8601 order
/// (`2024-01-02 03:04:05`). Binary and xml values are rejected.
pub fn column_to_string(column: &str, data: &ColumnData<'static>) -> Result<String, RiverError> {
    let s = match data {
        ColumnData::U8(v) => v.map(|v| v.to_string()),
        ColumnData::I16(v) => v.map(|v| v.to_string()),
        ColumnData::I32(v) => v.map(|v| v.to_string()),
        ColumnData::I64(v) => v.map(|v| v.to_string()),
        ColumnData::F32(v) => v.map(|v| v.to_string()),
        ColumnData::F64(v) => v.map(|v| v.to_string()),
        ColumnData::Bit(v) => v.map(|b| if b { "True" } else { "False" }.to_string()),
        ColumnData::String(v) => v.as_ref().map(|s| s.to_string()),
        ColumnData::Guid(v) => v.map(|g| g.to_string()),
        ColumnData::Numeric(v) => v.map(|n| n.to_string()),
        ColumnData::Date(_) => NaiveDate::from_sql(data)?.map(|d| d.to_string()),
        ColumnData::Time(_) => NaiveTime::from_sql(data)?.map(|t| t.to_string()),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(data)?.map(|dt| dt.to_string())
        }
        ColumnData::DateTimeOffset(_) => {
            DateTime::<FixedOffset>::from_sql(data)?.map(|dt| dt.to_string())
        }
        ColumnData::Binary(None) | ColumnData::Xml(None) => None,
        _ => {
            return Err(RiverError::DataAccess(format!(
                "unsupported column type for '{}'",
                column
            )))
        }
    };
    Ok(s.unwrap_or_default())
}
