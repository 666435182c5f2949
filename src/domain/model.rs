use serde::{Deserialize, Serialize};

/// One `(source, target, type, value)` row of a Sankey edge list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub flow_type: String,
    pub value: f64,
}

impl FlowEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        flow_type: impl Into<String>,
        value: f64,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            flow_type: flow_type.into(),
            value,
        }
    }

    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }
}

/// Ordered edge list. Order is insertion order; appended rows go last.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlowTable {
    edges: Vec<FlowEdge>,
}

impl FlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn push(&mut self, edge: FlowEdge) {
        self.edges.push(edge);
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlowEdge> {
        self.edges.iter()
    }

    /// Rebuilds the table by passing every edge through `f`.
    pub fn map_edges<F>(self, f: F) -> Self
    where
        F: FnMut(FlowEdge) -> FlowEdge,
    {
        self.edges.into_iter().map(f).collect()
    }

    pub fn find(&self, source: &str, target: &str) -> Option<&FlowEdge> {
        self.edges.iter().find(|e| e.connects(source, target))
    }
}

impl From<Vec<FlowEdge>> for FlowTable {
    fn from(edges: Vec<FlowEdge>) -> Self {
        Self { edges }
    }
}

impl FromIterator<FlowEdge> for FlowTable {
    fn from_iter<I: IntoIterator<Item = FlowEdge>>(iter: I) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}

impl Extend<FlowEdge> for FlowTable {
    fn extend<I: IntoIterator<Item = FlowEdge>>(&mut self, iter: I) {
        self.edges.extend(iter);
    }
}

impl IntoIterator for FlowTable {
    type Item = FlowEdge;
    type IntoIter = std::vec::IntoIter<FlowEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a FlowTable {
    type Item = &'a FlowEdge;
    type IntoIter = std::slice::Iter<'a, FlowEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Labeled flow matrix as read from the workbook. `values[r][c]` is the cell
/// at row label `r` and column label `c`; blank cells are already 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledMatrix {
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl LabeledMatrix {
    pub fn new(row_labels: Vec<String>, column_labels: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        Self {
            row_labels,
            column_labels,
            values,
        }
    }

    /// All-zero matrix over the given labels.
    pub fn zeros(row_labels: Vec<String>, column_labels: Vec<String>) -> Self {
        let values = vec![vec![0.0; column_labels.len()]; row_labels.len()];
        Self::new(row_labels, column_labels, values)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.column_labels.len())
    }

    pub fn is_square(&self) -> bool {
        self.row_labels.len() == self.column_labels.len()
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values
            .get(row)
            .and_then(|r| r.get(column))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn set(&mut self, row: &str, column: &str, value: f64) -> bool {
        let r = self.row_labels.iter().position(|l| l == row);
        let c = self.column_labels.iter().position(|l| l == column);
        match (r, c) {
            (Some(r), Some(c)) => {
                self.values[r][c] = value;
                true
            }
            _ => false,
        }
    }
}
