//! Row-level adjacency over the relations of a Diffgram.

use crate::diff::model::Diffgram;
use crate::model::KeyTuple;
use std::collections::HashMap;

/// Parent/child row links, one entry per relation
///
/// Row positions refer to the Diffgram the index was built from. Sorting
/// reorders rows, so build the index after the last sort.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex {
    children: Vec<Vec<Vec<usize>>>,
    parent_of: Vec<Vec<Option<usize>>>,
}

impl RelationIndex {
    pub fn build(diffgram: &Diffgram) -> Self {
        let mut children = Vec::with_capacity(diffgram.resolved_relations().len());
        let mut parent_of = Vec::with_capacity(diffgram.resolved_relations().len());

        for relation in diffgram.resolved_relations() {
            let parent = &diffgram.tables()[relation.parent];
            let child = &diffgram.tables()[relation.child];

            let by_key: HashMap<KeyTuple, usize> = parent
                .rows
                .iter()
                .enumerate()
                .map(|(i, row)| (row.project(&parent.primary_key), i))
                .collect();

            let mut links = vec![Vec::new(); parent.rows.len()];
            let mut back = vec![None; child.rows.len()];
            for (i, row) in child.rows.iter().enumerate() {
                if let Some(&p) = by_key.get(&row.project(&relation.child_key)) {
                    links[p].push(i);
                    back[i] = Some(p);
                }
            }
            children.push(links);
            parent_of.push(back);
        }

        Self {
            children,
            parent_of,
        }
    }

    /// Child rows of `parent_row` through relation `relation`
    pub fn children(&self, relation: usize, parent_row: usize) -> &[usize] {
        self.children
            .get(relation)
            .and_then(|links| links.get(parent_row))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn parent_of(&self, relation: usize, child_row: usize) -> Option<usize> {
        self.parent_of
            .get(relation)
            .and_then(|back| back.get(child_row).copied().flatten())
    }
}

/// Relations whose parent is `table`, in declaration order
pub fn child_relations(diffgram: &Diffgram, table: usize) -> Vec<usize> {
    diffgram
        .resolved_relations()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.parent == table)
        .map(|(i, _)| i)
        .collect()
}

/// Relations whose child is `table`, in declaration order
pub fn parent_relations(diffgram: &Diffgram, table: usize) -> Vec<usize> {
    diffgram
        .resolved_relations()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.child == table)
        .map(|(i, _)| i)
        .collect()
}
