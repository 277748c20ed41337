//! Nested HTML table rendering.
//!
//! Tables are rendered as chains: a root table followed by the child of its
//! first relation, level by level. Each chain becomes one `<table>` in which
//! a parent row's cells are emitted once with a `rowspan` covering all of its
//! flattened descendants. Children reached through any other relation start
//! their own chain.

use crate::diff::index::{child_relations, parent_relations};
use crate::diff::{ChangeStatus, DiffRow, DiffTable, Diffgram, RelationIndex};
use crate::errors::DiffError;
use crate::print_model::{HeaderShape, PrintModel};
use crate::render::bookmark::{anchor_id, TocEntry};
use crate::render::html::escape;
use crate::render::RenderedTable;
use crate::visibility::RowVisibility;

/// Tables flattened into one HTML table
///
/// `relations[i]` links `tables[i]` to `tables[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePlan {
    pub tables: Vec<usize>,
    pub relations: Vec<usize>,
}

impl TablePlan {
    pub fn root(&self) -> usize {
        self.tables[0]
    }
}

/// Split the Diffgram into chains, ordered by their root's dependency order
///
/// A table is chained under its parent only when it is the child of the
/// parent's first relation and has no other parent.
pub fn plan_tables(diffgram: &Diffgram) -> Vec<TablePlan> {
    let count = diffgram.tables().len();
    let mut next: Vec<Option<usize>> = vec![None; count];
    let mut chained = vec![false; count];

    for t in 0..count {
        if let Some(&relation) = child_relations(diffgram, t).first() {
            let child = diffgram.resolved_relations()[relation].child;
            if parent_relations(diffgram, child).len() == 1 {
                next[t] = Some(relation);
                chained[child] = true;
            }
        }
    }

    diffgram
        .dependency_order()
        .iter()
        .filter(|&&t| !chained[t])
        .map(|&root| {
            let mut plan = TablePlan {
                tables: vec![root],
                relations: Vec::new(),
            };
            let mut current = root;
            while let Some(relation) = next[current] {
                current = diffgram.resolved_relations()[relation].child;
                plan.relations.push(relation);
                plan.tables.push(current);
            }
            plan
        })
        .collect()
}

/// Everything one table render reads
pub(crate) struct RenderInput<'a> {
    pub diffgram: &'a Diffgram,
    pub print_model: &'a PrintModel,
    pub index: &'a RelationIndex,
    pub visibility: &'a RowVisibility,
}

/// One `<tr>` worth of segments
enum Segment {
    Row { level: usize, row: usize, span: usize },
    Empty { level: usize },
}

/// Render one chain
///
/// # Errors
///
/// `InvalidHeaderShape` when the root's header shape does not fit the
/// visible columns of the chain.
pub(crate) fn render_table(
    input: &RenderInput<'_>,
    plan: &TablePlan,
) -> Result<RenderedTable, DiffError> {
    let tables = input.diffgram.tables();
    let visible: Vec<Vec<usize>> = plan
        .tables
        .iter()
        .map(|&t| {
            (0..tables[t].columns.len())
                .filter(|&c| !input.print_model.is_hidden(t, c))
                .collect()
        })
        .collect();
    let width: usize = visible.iter().map(Vec::len).sum();

    let root = &tables[plan.root()];
    let mut out = RenderedTable::default();
    let html = &mut out.html;

    html.push_str(&format!(
        "<table class=\"confdiff\" data-table=\"{}\">\n",
        escape(&root.name)
    ));

    html.push_str("<thead>\n");
    match input.print_model.header_shape(plan.root()) {
        Some(shape) => {
            shape.validate(&root.name, width)?;
            push_shaped_header(html, shape);
        }
        None => push_label_header(html, input, plan, &visible),
    }
    html.push_str("</thead>\n<tbody>\n");

    for root_row in 0..root.rows.len() {
        let token = input.visibility.get(plan.root(), root_row).token();
        for line in flatten(input, plan, 0, root_row) {
            if token.is_empty() {
                html.push_str("<tr>");
            } else {
                html.push_str(&format!("<tr class=\"{}\">", token));
            }
            for segment in line {
                match segment {
                    Segment::Row { level, row, span } => {
                        let t = plan.tables[level];
                        let mut sink = CellSink {
                            html: &mut *html,
                            toc: &mut out.toc_entries,
                            jumps: &mut out.jump_targets,
                        };
                        push_row_cells(
                            &mut sink,
                            input,
                            t,
                            &tables[t].rows[row],
                            &visible[level],
                            span,
                        );
                    }
                    Segment::Empty { level } => {
                        let n = visible[level].len();
                        if n > 1 {
                            html.push_str(&format!(
                                "<td class=\"empty\" colspan=\"{}\"></td>",
                                n
                            ));
                        } else if n == 1 {
                            html.push_str("<td class=\"empty\"></td>");
                        }
                    }
                }
            }
            html.push_str("</tr>\n");
        }
    }

    html.push_str("</tbody>\n</table>\n");
    Ok(out)
}

/// Lines for `row` at `level` and everything beneath it
fn flatten(
    input: &RenderInput<'_>,
    plan: &TablePlan,
    level: usize,
    row: usize,
) -> Vec<Vec<Segment>> {
    let deepest = plan.tables.len() - 1;
    let children: &[usize] = if level < deepest {
        input.index.children(plan.relations[level], row)
    } else {
        &[]
    };

    if children.is_empty() {
        let mut line = vec![Segment::Row {
            level,
            row,
            span: 1,
        }];
        line.extend((level + 1..=deepest).map(|level| Segment::Empty { level }));
        return vec![line];
    }

    let mut lines: Vec<Vec<Segment>> = children
        .iter()
        .flat_map(|&child| flatten(input, plan, level + 1, child))
        .collect();
    let span = lines.len();
    lines[0].insert(0, Segment::Row { level, row, span });
    lines
}

/// Output buffers a row writes into
struct CellSink<'a> {
    html: &'a mut String,
    toc: &'a mut Vec<TocEntry>,
    jumps: &'a mut Vec<String>,
}

fn push_row_cells(
    sink: &mut CellSink<'_>,
    input: &RenderInput<'_>,
    table: usize,
    row: &DiffRow,
    columns: &[usize],
    span: usize,
) {
    for &c in columns {
        let directive = input.print_model.directive(table, c);
        let ignored = directive.is_some_and(|d| d.change_ignored);
        let changed = row.status == ChangeStatus::Modified && !ignored && row.column_changed(c);

        let text = row.value(c).map(|v| v.to_string()).unwrap_or_default();
        let mut content = if changed {
            let old = row.old_value(c).map(|v| v.to_string()).unwrap_or_default();
            format!(
                "<del class=\"old-value\">{}</del> <ins class=\"new-value\">{}</ins>",
                escape(&old),
                escape(&text)
            )
        } else {
            escape(&text)
        };

        let identifier = |column: Option<usize>| {
            column
                .and_then(|i| row.value(i))
                .and_then(|v| anchor_id(&v.display(), row.status))
        };
        let anchor = identifier(directive.and_then(|d| d.bookmark_index));
        let jump = identifier(directive.and_then(|d| d.jump_to_bookmark_index));

        if anchor.is_some() || jump.is_some() {
            let mut attrs = String::new();
            if let Some(id) = &anchor {
                attrs.push_str(&format!(" id=\"{}\"", escape(id)));
                sink.toc.push(TocEntry {
                    id: id.clone(),
                    label: text.clone(),
                    status: row.status,
                });
            }
            if let Some(id) = &jump {
                attrs.push_str(&format!(" href=\"#{}\"", escape(id)));
                sink.jumps.push(id.clone());
            }
            content = format!("<a{}>{}</a>", attrs, content);
        }

        let class = if changed {
            format!("{} changed", row.status.token())
        } else {
            row.status.token().to_string()
        };
        if span > 1 {
            sink.html.push_str(&format!(
                "<td class=\"{}\" rowspan=\"{}\">{}</td>",
                class, span, content
            ));
        } else {
            sink.html.push_str(&format!("<td class=\"{}\">{}</td>", class, content));
        }
    }
}

fn push_label_header(
    html: &mut String,
    input: &RenderInput<'_>,
    plan: &TablePlan,
    visible: &[Vec<usize>],
) {
    html.push_str("<tr>");
    for (level, columns) in visible.iter().enumerate() {
        let t = plan.tables[level];
        let table: &DiffTable = &input.diffgram.tables()[t];
        for &c in columns {
            let label = input
                .print_model
                .directive(t, c)
                .and_then(|d| d.label.as_deref())
                .unwrap_or(&table.columns[c].name);
            html.push_str(&format!("<th>{}</th>", escape(label)));
        }
    }
    html.push_str("</tr>\n");
}

fn push_shaped_header(html: &mut String, shape: &HeaderShape) {
    for r in 0..shape.height() {
        html.push_str("<tr>");
        for cell in shape.row(r) {
            html.push_str("<th");
            if cell.row_span > 1 {
                html.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
            }
            if cell.col_span > 1 {
                html.push_str(&format!(" colspan=\"{}\"", cell.col_span));
            }
            if let Some(width) = &cell.width {
                html.push_str(&format!(" style=\"width: {}\"", escape(width)));
            }
            html.push_str(&format!(">{}</th>", escape(&cell.label)));
        }
        html.push_str("</tr>\n");
    }
}
