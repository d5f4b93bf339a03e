use std::sync::Arc;

pub const CONCEPT: &str = "Concept";
pub const JOURNAL_PROMPT: &str = "Journal Prompt (Gratitude/Positivity Skew)";
pub const ACTION_1: &str = "Action 1 (Gratitude/Positivity Skew)";
pub const ACTION_2: &str = "Action 2 (Gratitude/Positivity Skew)";

// Columns are shared by every record of a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    // Duplicate header names: the last column wins.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .rposition(|c| c == column)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }

    /// Tells two cards apart when shuffling: `Concept`, else the first column.
    pub fn identifier(&self) -> &str {
        self.get(CONCEPT)
            .or_else(|| self.values.first().map(String::as_str))
            .unwrap_or("")
    }

    pub fn concept(&self) -> &str {
        self.identifier()
    }

    pub fn prompt(&self) -> &str {
        self.get(JOURNAL_PROMPT).unwrap_or("")
    }

    pub fn actions(&self) -> Vec<String> {
        [ACTION_1, ACTION_2]
            .iter()
            .filter_map(|column| self.get(column))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Arc<[String]>,
    records: Vec<Arc<Record>>,
}

impl Dataset {
    pub(crate) fn new(columns: Arc<[String]>, records: Vec<Record>) -> Self {
        Self {
            columns,
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&Arc<Record>> {
        self.records.get(idx)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
