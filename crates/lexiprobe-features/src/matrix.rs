use crate::{
    example::{Example, SkipCounts},
    feature::{FeatureInfo, FeatureValue},
};

/// Feature values of one analysed example.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    /// Index into the example slice the matrix was extracted from.
    pub example: usize,
    /// One value per column, in column order.
    pub values: Vec<FeatureValue>,
}

/// Examples x active features, in input order.
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    pub columns: Vec<FeatureInfo>,
    pub rows: Vec<MatrixRow>,
    /// Examples dropped during extraction.
    pub skipped: SkipCounts,
}

impl FeatureMatrix {
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    /// Values of one column, in row order.
    pub fn column(&self, index: usize) -> impl Iterator<Item = FeatureValue> + '_ {
        self.rows.iter().map(move |row| row.values[index])
    }

    /// Dependent-variable values aligned with the rows.
    #[must_use]
    pub fn dependent_column(&self, examples: &[Example]) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| examples[row.example].dependent)
            .collect()
    }

    /// Rows of `examples` that made it into the matrix.
    pub fn examples<'a>(
        &'a self,
        examples: &'a [Example],
    ) -> impl Iterator<Item = &'a Example> + 'a {
        self.rows.iter().map(move |row| &examples[row.example])
    }
}
