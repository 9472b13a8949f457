//! Joining two tables on a shared key column

use crate::error::{EtlError, Result};
use crate::table::{Cell, Row, Table};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Column both sources are joined on
pub const ID_COLUMN: &str = "id";

/// What to do with rows whose id has no partner on the other side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Drop unmatched rows without comment
    Inner,
    /// Keep unmatched left rows, filling right columns with NULL
    Left,
    /// Drop unmatched rows and warn about them
    #[default]
    Report,
}

impl std::fmt::Display for JoinPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JoinPolicy::Inner => "inner",
            JoinPolicy::Left => "left",
            JoinPolicy::Report => "report",
        };
        write!(f, "{}", name)
    }
}

/// The joined table plus the ids that found no partner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    pub table: Table,
    /// Left ids with no right row, in left order
    pub unmatched_left: Vec<String>,
    /// Right ids with no left row, in right order
    pub unmatched_right: Vec<String>,
}

/// Join `left` and `right` on `key`
///
/// Output columns are the left columns followed by the right columns minus `key`.
/// Non-key names present on both sides get `_x` (left) and `_y` (right) suffixes.
/// Rows follow left order; a left row matching several right rows fans out
/// in right order.
pub fn join_on(left: &Table, right: &Table, key: &str, policy: JoinPolicy) -> Result<Joined> {
    let key_index = |table: &Table, side: &str| {
        table.column_index(key).ok_or_else(|| EtlError::Shape {
            message: format!("{} table has no `{}` column", side, key),
        })
    };
    let left_key = key_index(left, "left")?;
    let right_key = key_index(right, "right")?;

    let right_names: HashSet<&str> = right
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != right_key)
        .map(|(_, c)| c.as_str())
        .collect();
    let left_names: HashSet<&str> = left
        .columns()
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != left_key)
        .map(|(_, c)| c.as_str())
        .collect();

    let mut columns: Vec<String> = left
        .columns()
        .iter()
        .enumerate()
        .map(|(i, c)| match i != left_key && right_names.contains(c.as_str()) {
            true => format!("{}_x", c),
            false => c.clone(),
        })
        .collect();
    columns.extend(
        right
            .columns()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != right_key)
            .map(|(_, c)| match left_names.contains(c.as_str()) {
                true => format!("{}_y", c),
                false => c.clone(),
            }),
    );
    let right_width = right.columns().len() - 1;

    let mut index: HashMap<&Cell, Vec<&Row>> = HashMap::new();
    for row in right.rows() {
        index.entry(&row[right_key]).or_default().push(row);
    }

    let mut rows = Vec::new();
    let mut unmatched_left = Vec::new();
    for row in left.rows() {
        match index.get(&row[left_key]) {
            Some(partners) => {
                for partner in partners {
                    let mut joined = row.clone();
                    joined.extend(
                        partner
                            .iter()
                            .enumerate()
                            .filter(|(i, _)| *i != right_key)
                            .map(|(_, cell)| cell.clone()),
                    );
                    rows.push(joined);
                }
            }
            None => {
                unmatched_left.push(row[left_key].to_string());
                if policy == JoinPolicy::Left {
                    let mut joined = row.clone();
                    joined.extend(std::iter::repeat_n(Cell::Null, right_width));
                    rows.push(joined);
                }
            }
        }
    }

    let left_keys: HashSet<&Cell> = left.rows().iter().map(|row| &row[left_key]).collect();
    let unmatched_right = right
        .rows()
        .iter()
        .map(|row| &row[right_key])
        .filter(|id| !left_keys.contains(id))
        .map(|id| id.to_string())
        .collect();

    Ok(Joined {
        table: Table::new(columns, rows)?,
        unmatched_left,
        unmatched_right,
    })
}

impl Joined {
    /// Log the unmatched ids at the level the policy asks for
    pub fn log_unmatched(&self, policy: JoinPolicy) {
        if self.unmatched_left.is_empty() && self.unmatched_right.is_empty() {
            return;
        }

        let summary = format!(
            "{} left row(s) and {} right row(s) had no matching {}",
            self.unmatched_left.len(),
            self.unmatched_right.len(),
            ID_COLUMN
        );
        match policy {
            JoinPolicy::Inner => log::debug!("{}; dropped", summary),
            JoinPolicy::Left => log::info!("{}; left rows kept with empty categories", summary),
            JoinPolicy::Report => {
                log::warn!("{}; dropped", summary);
                log::warn!("Unmatched left ids: {}", preview(&self.unmatched_left));
                log::warn!("Unmatched right ids: {}", preview(&self.unmatched_right));
            }
        }
    }
}

fn preview(ids: &[String]) -> String {
    const LIMIT: usize = 10;
    let shown = ids.iter().take(LIMIT).cloned().collect::<Vec<_>>().join(", ");
    match ids.len() > LIMIT {
        true => format!("{} (+{} more)", shown, ids.len() - LIMIT),
        false => shown,
    }
}
