//! Matrix to Sankey edge-list transformation.
//!
//! Each stage takes the whole table and returns the rebuilt one. Stages match
//! rows by their current labels only, so the order in [`transform_matrix`]
//! matters: renames in one stage decide what later stages can see.

use crate::domain::model::{FlowEdge, FlowTable, LabeledMatrix};
use crate::domain::vocabulary::{
    qualified, BALANCING_FLOWS, DRI, EXPORTS, GENERATED_SCRAP, IMPORTS, IRON_ORE, PIG_IRON,
    PRODUCTION, REFERENCE_SOURCE, REFERENCE_TARGET, REFERENCE_TYPE, REFERENCE_VALUE,
    REVERSED_SOURCES, SCRAP_STEEL,
};

/// Runs every stage in order on a freshly loaded matrix.
pub fn transform_matrix(matrix: &LabeledMatrix) -> FlowTable {
    let transposed = transpose(matrix);
    let table = flatten(&transposed);
    tracing::debug!("Flattened {:?} matrix into {} edges", transposed.shape(), table.len());

    let stages: [(&str, fn(FlowTable) -> FlowTable); 8] = [
        ("expand_balancing_flows", expand_balancing_flows),
        ("swap_source_target", swap_source_target),
        ("qualify_by_type", qualify_by_type),
        ("rename_scrap", rename_scrap),
        ("qualify_balancing_flows", qualify_balancing_flows),
        ("add_iron_ore_production", add_iron_ore_production),
        ("absolute_values", absolute_values),
        ("add_reference_flow", add_reference_flow),
    ];

    stages.iter().fold(table, |table, (name, stage)| {
        let table = stage(table);
        tracing::debug!("{}: {} edges", name, table.len());
        table
    })
}

/// Swaps the matrix axes.
pub fn transpose(matrix: &LabeledMatrix) -> LabeledMatrix {
    let (rows, columns) = matrix.shape();
    let values = (0..columns)
        .map(|c| (0..rows).map(|r| matrix.get(r, c)).collect())
        .collect();

    LabeledMatrix::new(
        matrix.column_labels.clone(),
        matrix.row_labels.clone(),
        values,
    )
}

/// One edge per cell, row by row: the column label is both source and type,
/// the row label is the target.
pub fn flatten(matrix: &LabeledMatrix) -> FlowTable {
    let (rows, columns) = matrix.shape();
    let mut table = FlowTable::new();

    for r in 0..rows {
        let target = &matrix.row_labels[r];
        for c in 0..columns {
            let column = &matrix.column_labels[c];
            table.push(FlowEdge::new(
                column.as_str(),
                target.as_str(),
                column.as_str(),
                matrix.get(r, c),
            ));
        }
    }

    table
}

/// Turns edges into the balancing-flow sentinel into explicit exports
/// (positive) or imports (negative), each paired with a zero-valued
/// counterpart so every category has both. Zero-valued balancing edges keep
/// their sentinel target and get both counterparts.
pub fn expand_balancing_flows(table: FlowTable) -> FlowTable {
    let mut appended = Vec::new();

    let mut table = table.map_edges(|mut edge| {
        if edge.target != BALANCING_FLOWS {
            return edge;
        }

        let companion = |target: &str| FlowEdge::new(edge.source.as_str(), target, BALANCING_FLOWS, 0.0);

        if edge.value > 0.0 {
            appended.push(companion(IMPORTS));
            edge.target = EXPORTS.to_string();
            edge.flow_type = BALANCING_FLOWS.to_string();
        } else if edge.value < 0.0 {
            appended.push(companion(EXPORTS));
            edge.target = IMPORTS.to_string();
            edge.value = edge.value.abs();
            edge.flow_type = BALANCING_FLOWS.to_string();
        } else {
            appended.push(companion(EXPORTS));
            appended.push(companion(IMPORTS));
        }
        edge
    });

    tracing::debug!("Balancing flows added {} companion edges", appended.len());
    table.extend(appended);
    table
}

/// Reverses edges leaving waste, stock and scrap categories, then every edge
/// pointing at imports. Each rule is a separate pass, so an edge reversed by
/// one pass can be reversed again by a later one.
pub fn swap_source_target(table: FlowTable) -> FlowTable {
    let table = REVERSED_SOURCES.iter().fold(table, |table, category| {
        table.map_edges(|edge| {
            if edge.source == *category {
                reversed(edge)
            } else {
                edge
            }
        })
    });

    table.map_edges(|edge| if edge.target == IMPORTS { reversed(edge) } else { edge })
}

fn reversed(mut edge: FlowEdge) -> FlowEdge {
    std::mem::swap(&mut edge.source, &mut edge.target);
    edge
}

/// Qualifies generic export, import and production endpoints with the
/// edge's category. Balancing edges are left for [`qualify_balancing_flows`].
pub fn qualify_by_type(table: FlowTable) -> FlowTable {
    table.map_edges(|mut edge| {
        if edge.flow_type == BALANCING_FLOWS {
            return edge;
        }

        if edge.target == EXPORTS {
            edge.target = qualified(EXPORTS, &edge.flow_type);
        } else if edge.source == IMPORTS {
            edge.source = qualified(IMPORTS, &edge.flow_type);
        } else if edge.source == PRODUCTION {
            edge.source = qualified(PRODUCTION, &edge.flow_type);
        }
        edge
    })
}

pub fn rename_scrap(table: FlowTable) -> FlowTable {
    table.map_edges(|mut edge| {
        if edge.target == GENERATED_SCRAP {
            edge.target = SCRAP_STEEL.to_string();
        }
        edge
    })
}

/// Qualifies balancing exports and imports with the opposite endpoint, since
/// their type no longer names a product.
pub fn qualify_balancing_flows(table: FlowTable) -> FlowTable {
    table.map_edges(|mut edge| {
        if edge.flow_type != BALANCING_FLOWS {
            return edge;
        }

        if edge.target == EXPORTS {
            edge.target = qualified(EXPORTS, &edge.source);
        } else if edge.source == IMPORTS {
            edge.source = qualified(IMPORTS, &edge.target);
        }
        edge
    })
}

/// Appends the domestic iron ore production edge: everything consumed or
/// exported from iron ore plus its imports.
pub fn add_iron_ore_production(mut table: FlowTable) -> FlowTable {
    let exports = qualified(EXPORTS, IRON_ORE);
    let imports = qualified(IMPORTS, IRON_ORE);
    let terms = [
        (IRON_ORE, PIG_IRON),
        (IRON_ORE, DRI),
        (IRON_ORE, exports.as_str()),
        (imports.as_str(), IRON_ORE),
    ];

    let value: f64 = table
        .iter()
        .filter(|edge| terms.iter().any(|(s, t)| edge.connects(s, t)))
        .map(|edge| edge.value)
        .sum();

    tracing::debug!("Iron ore production: {}", value);
    table.push(FlowEdge::new(
        qualified(PRODUCTION, IRON_ORE),
        IRON_ORE,
        IRON_ORE,
        value,
    ));
    table
}

pub fn absolute_values(table: FlowTable) -> FlowTable {
    table.map_edges(|mut edge| {
        edge.value = edge.value.abs();
        edge
    })
}

/// Appends the fixed-size edge used as a visual scale in the diagram.
pub fn add_reference_flow(mut table: FlowTable) -> FlowTable {
    table.push(FlowEdge::new(
        REFERENCE_SOURCE,
        REFERENCE_TARGET,
        REFERENCE_TYPE,
        REFERENCE_VALUE,
    ));
    table
}
