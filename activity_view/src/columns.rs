use std::{fmt, str::FromStr};

use thiserror::Error;

/// The fixed set of table columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Start,
    End,
    Duration,
    Pace,
    Sport,
    Distance,
    Calories,
    AvgHr,
    Steps,
    Spo2,
    Vo2max,
    Coach,
    Training,
    Weather,
}

impl Column {
    pub const ALL: [Column; 15] = [
        Column::Id,
        Column::Start,
        Column::End,
        Column::Duration,
        Column::Pace,
        Column::Sport,
        Column::Distance,
        Column::Calories,
        Column::AvgHr,
        Column::Steps,
        Column::Spo2,
        Column::Vo2max,
        Column::Coach,
        Column::Training,
        Column::Weather,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Start => "start",
            Column::End => "end",
            Column::Duration => "duration",
            Column::Pace => "pace",
            Column::Sport => "sport",
            Column::Distance => "distance",
            Column::Calories => "calories",
            Column::AvgHr => "avg_hr",
            Column::Steps => "steps",
            Column::Spo2 => "spo2",
            Column::Vo2max => "vo2max",
            Column::Coach => "coach",
            Column::Training => "training",
            Column::Weather => "weather",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Start => "Start",
            Column::End => "End",
            Column::Duration => "Duration (min)",
            Column::Pace => "Pace",
            Column::Sport => "Sport",
            Column::Distance => "Distance (km)",
            Column::Calories => "Calories",
            Column::AvgHr => "Avg HR",
            Column::Steps => "Steps",
            Column::Spo2 => "SpO2 (%)",
            Column::Vo2max => "VO2max",
            Column::Coach => "Coach",
            Column::Training => "Training",
            Column::Weather => "Weather",
        }
    }

    pub fn default_visible(self) -> bool {
        matches!(
            self,
            Column::Id | Column::Start | Column::Duration | Column::Sport | Column::Distance | Column::Spo2 | Column::Weather
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown column {0:?}")]
pub struct UnknownColumn(pub String);

impl FromStr for Column {
    type Err = UnknownColumn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Column::ALL
            .into_iter()
            .find(|column| column.key() == key)
            .ok_or_else(|| UnknownColumn(s.to_string()))
    }
}

/// Which columns are shown. Every column always has an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilitySet {
    visible: [bool; Column::ALL.len()],
}

impl VisibilitySet {
    pub fn is_visible(&self, column: Column) -> bool {
        self.visible[column.index()]
    }

    /// A copy with only `column` flipped.
    #[must_use]
    pub fn toggled(mut self, column: Column) -> Self {
        self.visible[column.index()] = !self.visible[column.index()];
        self
    }

    pub fn toggle(&mut self, column: Column) {
        *self = self.toggled(column);
    }

    pub fn set(&mut self, column: Column, visible: bool) {
        self.visible[column.index()] = visible;
    }

    /// Visible columns in display order.
    pub fn columns(&self) -> Vec<Column> {
        Column::ALL.into_iter().filter(|column| self.is_visible(*column)).collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (Column, bool)> + '_ {
        Column::ALL.into_iter().map(|column| (column, self.is_visible(column)))
    }
}

impl Default for VisibilitySet {
    fn default() -> Self {
        Self {
            visible: Column::ALL.map(Column::default_visible),
        }
    }
}
