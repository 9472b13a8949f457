//! Category label decoding
//!
//! A categories field encodes every label of a message in one string:
//!
//! ```text
//! related-1;request-0;offer-1
//! ```
//!
//! Each `;`-separated label is a name followed by a one-character separator and a
//! single digit. [`CategorySchema`] derives the ordered label names from a reference
//! encoding, and [`CategoryExpander`] swaps the raw field for one integer column
//! per label.

use crate::error::{EtlError, Result};
use crate::etl::Transformer;
use crate::table::{Cell, Row, Table};

/// Column holding the encoded labels
pub const CATEGORIES_COLUMN: &str = "categories";

/// Separator between labels in an encoding
pub const LABEL_SEPARATOR: char = ';';

/// Ordered label names shared by every encoding in a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySchema {
    names: Vec<String>,
}

/// Split a label into its name and value character
///
/// The last two characters are the separator and the value; everything
/// before them is the name.
fn split_label(label: &str) -> Option<(&str, char)> {
    let mut chars = label.char_indices().rev();
    let (_, value) = chars.next()?;
    let (name_end, _) = chars.next()?;
    Some((&label[..name_end], value))
}

impl CategorySchema {
    /// Derive label names from a reference encoding, in order of appearance
    ///
    /// # Example
    /// ```
    /// use disaster_etl::transform::CategorySchema;
    ///
    /// let schema = CategorySchema::derive("related-1;request-0;offer-1").unwrap();
    /// assert_eq!(schema.names(), &["related", "request", "offer"]);
    /// ```
    pub fn derive(reference: &str) -> Result<Self> {
        let names = reference
            .split(LABEL_SEPARATOR)
            .map(|label| {
                split_label(label)
                    .map(|(name, _)| name.to_string())
                    .ok_or_else(|| EtlError::Schema {
                        message: format!("label `{}` is too short to name a category", label),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { names })
    }

    /// Derive the schema from the first row of `table` with an encoding in `column`
    ///
    /// Only NULL cells (rows padded by a left join) are skipped; an empty
    /// encoding on the reference row is an error. Returns the schema and the
    /// index of the reference row.
    pub fn from_table(table: &Table, column: &str) -> Result<(Self, usize)> {
        let index = table.column_index(column).ok_or_else(|| EtlError::Shape {
            message: format!("table has no `{}` column", column),
        })?;

        let (row, reference) = table
            .rows()
            .iter()
            .enumerate()
            .find_map(|(i, row)| row[index].as_text().map(|text| (i, text)))
            .ok_or_else(|| EtlError::Schema {
                message: match table.is_empty() {
                    true => "table has no rows".to_string(),
                    false => format!("no row has a `{}` value", column),
                },
            })?;

        if reference.is_empty() {
            return Err(EtlError::decode(row, "empty encoding"));
        }
        let schema = Self::derive(reference)?;
        log::debug!(
            "Derived {} category column(s) from row {}",
            schema.len(),
            row
        );
        Ok((schema, row))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Decode one encoding into a cell per label
    ///
    /// The encoding must carry the same labels in the same order as the schema.
    /// Values are the integer value of the final character; digits other than
    /// 0 and 1 are kept as they are.
    pub fn decode(&self, encoded: &str, row: usize) -> Result<Vec<Cell>> {
        if encoded.is_empty() {
            return Err(EtlError::decode(row, "empty encoding"));
        }
        let labels: Vec<&str> = encoded.split(LABEL_SEPARATOR).collect();
        if labels.len() != self.names.len() {
            return Err(EtlError::decode(
                row,
                format!(
                    "encodes {} labels, expected {}",
                    labels.len(),
                    self.names.len()
                ),
            ));
        }

        labels
            .iter()
            .zip(&self.names)
            .map(|(label, expected)| -> Result<Cell> {
                let (name, value) = split_label(label).ok_or_else(|| {
                    EtlError::decode(row, format!("label `{}` is too short to decode", label))
                })?;
                if name != expected.as_str() {
                    return Err(EtlError::decode(
                        row,
                        format!("found label `{}` where `{}` was expected", name, expected),
                    ));
                }
                value
                    .to_digit(10)
                    .map(|digit| Cell::Integer(i64::from(digit)))
                    .ok_or_else(|| {
                        EtlError::decode(row, format!("label `{}` has a non-numeric value", label))
                    })
            })
            .collect()
    }
}

/// Replace an encoded column with one integer column per label
///
/// The schema comes from the first row with an encoding. A NULL cell marks a
/// row padded by a left join and decodes to NULL in every label column; an
/// empty encoding is an error.
pub fn expand_categories(table: Table, column: &str) -> Result<Table> {
    let (schema, _) = CategorySchema::from_table(&table, column)?;
    let index = table
        .column_index(column)
        .ok_or_else(|| EtlError::Shape {
            message: format!("table has no `{}` column", column),
        })?;

    let (columns, rows) = table.into_parts();
    let columns: Vec<String> = columns
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != index)
        .map(|(_, c)| c)
        .chain(schema.names().iter().cloned())
        .collect();

    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(row_number, mut row)| -> Result<Row> {
            let labels = match row.remove(index) {
                Cell::Null => vec![Cell::Null; schema.len()],
                Cell::Text(encoded) => schema.decode(&encoded, row_number)?,
                Cell::Integer(i) => {
                    return Err(EtlError::decode(
                        row_number,
                        format!("`{}` holds the number {} instead of an encoding", column, i),
                    ));
                }
            };
            row.extend(labels);
            Ok(row)
        })
        .collect::<Result<Vec<_>>>()?;

    Table::new(columns, rows)
}

/// Transformer that decodes a categories column into label columns
pub struct CategoryExpander {
    column: String,
}

impl CategoryExpander {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
        }
    }
}

impl Default for CategoryExpander {
    fn default() -> Self {
        Self::new(CATEGORIES_COLUMN)
    }
}

impl Transformer for CategoryExpander {
    type Input = Table;
    type Output = Table;

    fn transform(&self, input: Self::Input) -> eyre::Result<Self::Output> {
        Ok(expand_categories(input, &self.column)?)
    }
}
