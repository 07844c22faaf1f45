// B+Tree engine: insert with leaf and internal splits, delete with leaf
// rebalancing and root collapse.
//
// Keys in a leaf strictly increase by index; an internal separator at cell
// i is an upper bound for every key under child i, and the right child
// holds everything greater than the last separator. Leaves form a forward
// chain in key order through their next-leaf pointers.

use std::io;

use crate::error::{DbError, Result};
use crate::node::{
    self, NodeType, INTERNAL_NODE_CELL_SIZE, INTERNAL_NODE_MAX_CELLS, LEAF_NODE_CELL_SIZE,
    LEAF_NODE_KEY_SIZE, LEAF_NODE_LEFT_SPLIT_COUNT, LEAF_NODE_MAX_CELLS, LEAF_NODE_MIN_CELLS,
    PAGE_SIZE,
};
use crate::pager::PageNumber;
use crate::row::Row;
use crate::table::{Cursor, Table};

impl Table {
    /// Insert one row, keyed by its id. Fails with `DuplicateKey` when the
    /// id is already present.
    pub fn insert(&mut self, row: &Row) -> Result<()> {
        let cursor = self.find(row.id)?;
        {
            let page = self.pager.get_page(cursor.page_num)?;
            let num_cells = node::leaf_num_cells(page);
            if cursor.cell_num < num_cells
                && node::leaf_key(page, cursor.cell_num as usize) == row.id
            {
                return Err(DbError::DuplicateKey);
            }
        }
        self.leaf_insert(&cursor, row.id, row)
    }

    /// Delete the row with `key`. Fails with `KeyNotFound` when absent.
    pub fn delete(&mut self, key: u32) -> Result<()> {
        let cursor = self.find(key)?;
        let page_num = cursor.page_num;
        {
            let page = self.pager.get_page(page_num)?;
            let num_cells = node::leaf_num_cells(page);
            let at = cursor.cell_num;
            if at >= num_cells || node::leaf_key(page, at as usize) != key {
                return Err(DbError::KeyNotFound(key));
            }
            if at + 1 < num_cells {
                let start = node::leaf_cell_offset(at as usize + 1);
                let end = node::leaf_cell_offset(num_cells as usize);
                page.copy_within(start..end, node::leaf_cell_offset(at as usize));
            }
            node::set_leaf_num_cells(page, num_cells - 1);
        }

        if page_num == self.root_page_num {
            // the root leaf may hold any number of cells, including none
            return Ok(());
        }
        let remaining = node::leaf_num_cells(self.pager.get_page(page_num)?) as usize;
        if remaining >= LEAF_NODE_MIN_CELLS {
            return Ok(());
        }
        self.rebalance_leaf(page_num)
    }

    fn leaf_insert(&mut self, cursor: &Cursor, key: u32, row: &Row) -> Result<()> {
        let page = self.pager.get_page(cursor.page_num)?;
        let num_cells = node::leaf_num_cells(page) as usize;
        if num_cells >= LEAF_NODE_MAX_CELLS {
            return self.leaf_split_and_insert(cursor, key, row);
        }

        let at = cursor.cell_num as usize;
        if at < num_cells {
            let start = node::leaf_cell_offset(at);
            let end = node::leaf_cell_offset(num_cells);
            page.copy_within(start..end, start + LEAF_NODE_CELL_SIZE);
        }
        node::set_leaf_num_cells(page, num_cells as u32 + 1);
        node::set_leaf_key(page, at, key);
        row.serialize(node::leaf_value_mut(page, at));
        Ok(())
    }

    /// Split a full leaf around an incoming cell. The upper half of the
    /// cells moves to a new right sibling, the chain is respliced, and the
    /// new node is announced to the parent (creating a new root when the
    /// split leaf was the root).
    fn leaf_split_and_insert(&mut self, cursor: &Cursor, key: u32, row: &Row) -> Result<()> {
        let old_page_num = cursor.page_num;
        let new_page_num = self.pager.unused_page_num();
        let at = cursor.cell_num as usize;

        let mut incoming = [0u8; LEAF_NODE_CELL_SIZE];
        node::write_u32(&mut incoming, 0, key);
        row.serialize(&mut incoming[LEAF_NODE_KEY_SIZE..]);

        // Stage all cells, existing plus incoming, in key order.
        let mut staged: Vec<[u8; LEAF_NODE_CELL_SIZE]> =
            Vec::with_capacity(LEAF_NODE_MAX_CELLS + 1);
        let (old_parent, old_next, old_max, was_root) = {
            let old = self.pager.get_page(old_page_num)?;
            let num_cells = node::leaf_num_cells(old) as usize;
            for i in 0..num_cells {
                if i == at {
                    staged.push(incoming);
                }
                let mut cell = [0u8; LEAF_NODE_CELL_SIZE];
                cell.copy_from_slice(node::leaf_cell(old, i));
                staged.push(cell);
            }
            if at == num_cells {
                staged.push(incoming);
            }
            (
                node::parent(old),
                node::leaf_next_leaf(old),
                node::leaf_key(old, num_cells - 1),
                node::is_root(old),
            )
        };

        {
            let new = self.pager.get_page(new_page_num)?;
            node::init_leaf(new);
            node::set_parent(new, old_parent);
            node::set_leaf_next_leaf(new, old_next);
            for (i, cell) in staged[LEAF_NODE_LEFT_SPLIT_COUNT..].iter().enumerate() {
                node::leaf_cell_mut(new, i).copy_from_slice(cell);
            }
            node::set_leaf_num_cells(new, (staged.len() - LEAF_NODE_LEFT_SPLIT_COUNT) as u32);
        }
        {
            let old = self.pager.get_page(old_page_num)?;
            for (i, cell) in staged[..LEAF_NODE_LEFT_SPLIT_COUNT].iter().enumerate() {
                node::leaf_cell_mut(old, i).copy_from_slice(cell);
            }
            node::set_leaf_num_cells(old, LEAF_NODE_LEFT_SPLIT_COUNT as u32);
            node::set_leaf_next_leaf(old, new_page_num);
        }

        if was_root {
            self.create_new_root(new_page_num)
        } else {
            let new_max = self.max_key(old_page_num)?;
            node::update_internal_key(self.pager.get_page(old_parent)?, old_max, new_max);
            self.internal_insert(old_parent, new_page_num)
        }
    }

    /// Replace the root in place: its old contents move to a fresh page
    /// that becomes the left child, and the root page is reinitialized as
    /// an internal node over the two halves. The root's page number never
    /// changes here.
    fn create_new_root(&mut self, right_child_page: PageNumber) -> Result<()> {
        let root_page = self.root_page_num;
        let left_child_page = self.pager.unused_page_num();

        let root_copy: [u8; PAGE_SIZE] = *self.pager.get_page(root_page)?;
        {
            let left = self.pager.get_page(left_child_page)?;
            left.copy_from_slice(&root_copy);
            node::set_root(left, false);
            node::set_parent(left, root_page);
        }
        let left_max = self.max_key(left_child_page)?;
        {
            let root = self.pager.get_page(root_page)?;
            node::init_internal(root);
            node::set_root(root, true);
            node::set_internal_num_keys(root, 1);
            node::set_internal_cell_child(root, 0, left_child_page);
            node::set_internal_key(root, 0, left_max);
            node::set_internal_right_child(root, right_child_page);
        }
        node::set_parent(self.pager.get_page(right_child_page)?, root_page);
        Ok(())
    }

    /// Add `child_page` under `parent_page`, keyed by the child's maximum
    /// key. Splits the parent when it is already at capacity.
    fn internal_insert(&mut self, parent_page: PageNumber, child_page: PageNumber) -> Result<()> {
        let num_keys = node::internal_num_keys(self.pager.get_page(parent_page)?) as usize;
        if num_keys >= INTERNAL_NODE_MAX_CELLS {
            return self.internal_split_and_insert(parent_page, child_page);
        }

        let child_max = self.max_key(child_page)?;
        let right_child_page = node::internal_right_child(self.pager.get_page(parent_page)?);
        let right_max = self.max_key(right_child_page)?;

        {
            let parent = self.pager.get_page(parent_page)?;
            if child_max > right_max {
                // new rightmost child; the old one moves into the cell body
                node::set_internal_cell_child(parent, num_keys, right_child_page);
                node::set_internal_key(parent, num_keys, right_max);
                node::set_internal_right_child(parent, child_page);
            } else {
                let index = node::internal_find_child(parent, child_max);
                let start = node::internal_cell_offset(index);
                let end = node::internal_cell_offset(num_keys);
                parent.copy_within(start..end, start + INTERNAL_NODE_CELL_SIZE);
                node::set_internal_cell_child(parent, index, child_page);
                node::set_internal_key(parent, index, child_max);
            }
            node::set_internal_num_keys(parent, num_keys as u32 + 1);
        }
        node::set_parent(self.pager.get_page(child_page)?, parent_page);
        Ok(())
    }

    /// Split a full internal node. The upper cells and the old right child
    /// move to a new sibling; the middle cell's child becomes the lower
    /// node's right child, its separator dissolving into the subtree
    /// maximum. The pending child then lands in whichever half covers its
    /// key range, and the new sibling is announced to the grandparent.
    fn internal_split_and_insert(
        &mut self,
        split_page: PageNumber,
        child_page: PageNumber,
    ) -> Result<()> {
        let old_max = self.max_key(split_page)?;
        let new_page = self.pager.unused_page_num();
        let keep = INTERNAL_NODE_MAX_CELLS / 2;

        let (split_parent, was_root, upper_cells, old_right_child, middle_child) = {
            let old = self.pager.get_page(split_page)?;
            let mut upper: Vec<[u8; INTERNAL_NODE_CELL_SIZE]> = Vec::new();
            for i in keep + 1..INTERNAL_NODE_MAX_CELLS {
                let mut cell = [0u8; INTERNAL_NODE_CELL_SIZE];
                cell.copy_from_slice(node::internal_cell(old, i));
                upper.push(cell);
            }
            (
                node::parent(old),
                node::is_root(old),
                upper,
                node::internal_right_child(old),
                node::internal_cell_child(old, keep),
            )
        };

        {
            let old = self.pager.get_page(split_page)?;
            node::set_internal_right_child(old, middle_child);
            node::set_internal_num_keys(old, keep as u32);
        }
        {
            let new = self.pager.get_page(new_page)?;
            node::init_internal(new);
            node::set_parent(new, split_parent);
            for (i, cell) in upper_cells.iter().enumerate() {
                node::internal_cell_mut(new, i).copy_from_slice(cell);
            }
            node::set_internal_num_keys(new, upper_cells.len() as u32);
            node::set_internal_right_child(new, old_right_child);
        }
        for cell in &upper_cells {
            let moved = node::read_u32(cell, 0);
            node::set_parent(self.pager.get_page(moved)?, new_page);
        }
        node::set_parent(self.pager.get_page(old_right_child)?, new_page);

        let child_max = self.max_key(child_page)?;
        let lower_max = self.max_key(split_page)?;
        if child_max > lower_max {
            self.internal_insert(new_page, child_page)?;
        } else {
            self.internal_insert(split_page, child_page)?;
        }

        if was_root {
            self.create_new_root(new_page)
        } else {
            let new_split_max = self.max_key(split_page)?;
            node::update_internal_key(self.pager.get_page(split_parent)?, old_max, new_split_max);
            self.internal_insert(split_parent, new_page)
        }
    }

    /// An underfull leaf first tries to borrow a cell from the preferred
    /// sibling (left when one exists); when the sibling is itself at
    /// minimum fill, the pair is merged instead.
    fn rebalance_leaf(&mut self, page_num: PageNumber) -> Result<()> {
        let parent_page = node::parent(self.pager.get_page(page_num)?);

        let (num_keys, child_index) = {
            let parent = self.pager.get_page(parent_page)?;
            let num_keys = node::internal_num_keys(parent) as usize;
            let mut index = None;
            for i in 0..=num_keys {
                if node::internal_child(parent, i) == page_num {
                    index = Some(i);
                    break;
                }
            }
            let index = index.ok_or_else(|| {
                DbError::Corrupt(format!("leaf {page_num} not referenced by its parent"))
            })?;
            (num_keys, index)
        };
        if num_keys == 0 {
            // a merged-out internal node keeps only its right child; with no
            // sibling to pull from, the leaf stays underfull
            return Ok(());
        }

        if child_index > 0 {
            let left_page =
                node::internal_child(self.pager.get_page(parent_page)?, child_index - 1);
            let left_cells = node::leaf_num_cells(self.pager.get_page(left_page)?) as usize;
            if left_cells > LEAF_NODE_MIN_CELLS {
                self.borrow_from_left(left_page, page_num, parent_page, child_index)
            } else {
                self.merge_leaves(left_page, page_num, parent_page, child_index - 1)
            }
        } else {
            let right_page = node::internal_child(self.pager.get_page(parent_page)?, 1);
            let right_cells = node::leaf_num_cells(self.pager.get_page(right_page)?) as usize;
            if right_cells > LEAF_NODE_MIN_CELLS {
                self.borrow_from_right(page_num, right_page, parent_page)
            } else {
                self.merge_leaves(page_num, right_page, parent_page, 0)
            }
        }
    }

    fn borrow_from_left(
        &mut self,
        left_page: PageNumber,
        page_num: PageNumber,
        parent_page: PageNumber,
        child_index: usize,
    ) -> Result<()> {
        let mut cell = [0u8; LEAF_NODE_CELL_SIZE];
        let new_left_max;
        {
            let left = self.pager.get_page(left_page)?;
            let n = node::leaf_num_cells(left) as usize;
            cell.copy_from_slice(node::leaf_cell(left, n - 1));
            node::set_leaf_num_cells(left, n as u32 - 1);
            new_left_max = node::leaf_key(left, n - 2);
        }
        {
            let page = self.pager.get_page(page_num)?;
            let n = node::leaf_num_cells(page) as usize;
            if n > 0 {
                let start = node::leaf_cell_offset(0);
                let end = node::leaf_cell_offset(n);
                page.copy_within(start..end, node::leaf_cell_offset(1));
            }
            node::leaf_cell_mut(page, 0).copy_from_slice(&cell);
            node::set_leaf_num_cells(page, n as u32 + 1);
        }
        // the donor's separator shrinks to its new maximum
        node::set_internal_key(
            self.pager.get_page(parent_page)?,
            child_index - 1,
            new_left_max,
        );
        Ok(())
    }

    fn borrow_from_right(
        &mut self,
        page_num: PageNumber,
        right_page: PageNumber,
        parent_page: PageNumber,
    ) -> Result<()> {
        let mut cell = [0u8; LEAF_NODE_CELL_SIZE];
        {
            let right = self.pager.get_page(right_page)?;
            let n = node::leaf_num_cells(right) as usize;
            cell.copy_from_slice(node::leaf_cell(right, 0));
            let start = node::leaf_cell_offset(1);
            let end = node::leaf_cell_offset(n);
            right.copy_within(start..end, node::leaf_cell_offset(0));
            node::set_leaf_num_cells(right, n as u32 - 1);
        }
        let moved_key = node::read_u32(&cell, 0);
        {
            let page = self.pager.get_page(page_num)?;
            let n = node::leaf_num_cells(page) as usize;
            node::leaf_cell_mut(page, n).copy_from_slice(&cell);
            node::set_leaf_num_cells(page, n as u32 + 1);
        }
        // the receiver is the leftmost child; its separator grows to the
        // borrowed key
        node::set_internal_key(self.pager.get_page(parent_page)?, 0, moved_key);
        Ok(())
    }

    /// Append the right leaf of a sibling pair onto the left one, splice
    /// the chain, and drop the separator from the parent. The abandoned
    /// page is not reclaimed.
    fn merge_leaves(
        &mut self,
        left_page: PageNumber,
        right_page: PageNumber,
        parent_page: PageNumber,
        sep_index: usize,
    ) -> Result<()> {
        let (right_cells, right_next) = {
            let right = self.pager.get_page(right_page)?;
            let n = node::leaf_num_cells(right) as usize;
            let mut cells = Vec::with_capacity(n);
            for i in 0..n {
                let mut cell = [0u8; LEAF_NODE_CELL_SIZE];
                cell.copy_from_slice(node::leaf_cell(right, i));
                cells.push(cell);
            }
            (cells, node::leaf_next_leaf(right))
        };
        {
            let left = self.pager.get_page(left_page)?;
            let n = node::leaf_num_cells(left) as usize;
            for (i, cell) in right_cells.iter().enumerate() {
                node::leaf_cell_mut(left, n + i).copy_from_slice(cell);
            }
            node::set_leaf_num_cells(left, (n + right_cells.len()) as u32);
            node::set_leaf_next_leaf(left, right_next);
        }
        {
            let parent = self.pager.get_page(parent_page)?;
            let num_keys = node::internal_num_keys(parent) as usize;
            if sep_index + 1 < num_keys {
                // the cell after the separator keeps its key but now routes
                // to the merged leaf
                let start = node::internal_cell_offset(sep_index + 1);
                let end = node::internal_cell_offset(num_keys);
                parent.copy_within(start..end, node::internal_cell_offset(sep_index));
                node::set_internal_cell_child(parent, sep_index, left_page);
            } else {
                node::set_internal_right_child(parent, left_page);
            }
            node::set_internal_num_keys(parent, num_keys as u32 - 1);
        }
        self.adjust_root()
    }

    /// When a merge empties an internal root, its sole surviving child
    /// becomes the new root and the table's root page moves there.
    fn adjust_root(&mut self) -> Result<()> {
        let root_page = self.root_page_num;
        let promoted = {
            let root = self.pager.get_page(root_page)?;
            if node::node_type(root)? == NodeType::Internal && node::internal_num_keys(root) == 0 {
                Some(node::internal_right_child(root))
            } else {
                None
            }
        };
        if let Some(child) = promoted {
            node::set_root(self.pager.get_page(root_page)?, false);
            let new_root = self.pager.get_page(child)?;
            node::set_root(new_root, true);
            node::set_parent(new_root, 0);
            self.root_page_num = child;
        }
        Ok(())
    }

    /// Largest key in the subtree rooted at `page_num`.
    fn max_key(&mut self, page_num: PageNumber) -> Result<u32> {
        let page = self.pager.get_page(page_num)?;
        match node::node_type(page)? {
            NodeType::Leaf => {
                let num_cells = node::leaf_num_cells(page);
                if num_cells == 0 {
                    return Err(DbError::Corrupt(format!("empty leaf {page_num} has no keys")));
                }
                Ok(node::leaf_key(page, num_cells as usize - 1))
            }
            NodeType::Internal => {
                let right_child = node::internal_right_child(page);
                self.max_key(right_child)
            }
        }
    }

    /// Dump the tree structure, one node per line, two-space indent per
    /// depth.
    pub fn print_tree(&mut self, out: &mut impl io::Write) -> Result<()> {
        self.print_node(out, self.root_page_num, 0)
    }

    fn print_node(
        &mut self,
        out: &mut impl io::Write,
        page_num: PageNumber,
        depth: usize,
    ) -> Result<()> {
        let page = self.pager.get_page(page_num)?;
        match node::node_type(page)? {
            NodeType::Leaf => {
                let num_cells = node::leaf_num_cells(page) as usize;
                indent(out, depth)?;
                writeln!(out, "- leaf (size {num_cells})")?;
                for i in 0..num_cells {
                    indent(out, depth + 1)?;
                    writeln!(out, "- {}", node::leaf_key(page, i))?;
                }
            }
            NodeType::Internal => {
                let num_keys = node::internal_num_keys(page) as usize;
                let mut children = Vec::with_capacity(num_keys);
                let mut keys = Vec::with_capacity(num_keys);
                for i in 0..num_keys {
                    children.push(node::internal_cell_child(page, i));
                    keys.push(node::internal_key(page, i));
                }
                let right_child = node::internal_right_child(page);

                indent(out, depth)?;
                writeln!(out, "- internal (size {num_keys})")?;
                for i in 0..num_keys {
                    self.print_node(out, children[i], depth + 1)?;
                    indent(out, depth + 1)?;
                    writeln!(out, "- key {}", keys[i])?;
                }
                self.print_node(out, right_child, depth + 1)?;
            }
        }
        Ok(())
    }
}

fn indent(out: &mut impl io::Write, level: usize) -> io::Result<()> {
    for _ in 0..level {
        write!(out, "  ")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn open_temp() -> (tempfile::TempDir, Table) {
        let dir = tempfile::tempdir().unwrap();
        let table = Table::open(dir.path().join("test.db")).unwrap();
        (dir, table)
    }

    fn insert_ids(table: &mut Table, ids: impl IntoIterator<Item = u32>) {
        for id in ids {
            table
                .insert(&Row::new(id, format!("user{id}"), format!("user{id}@example.com")))
                .unwrap();
        }
    }

    fn scan_keys(table: &mut Table) -> Vec<u32> {
        table.rows().unwrap().iter().map(|r| r.id).collect()
    }

    fn dump(table: &mut Table) -> String {
        let mut out = Vec::new();
        table.print_tree(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_out_of_order_insert_scans_sorted() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, [5, 1, 4, 2, 3]);
        assert_eq!(scan_keys(&mut table), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let (_dir, mut table) = open_temp();
        table.insert(&Row::new(1, "a", "a@x")).unwrap();
        let err = table.insert(&Row::new(1, "b", "b@x")).unwrap_err();
        assert!(matches!(err, DbError::DuplicateKey));

        let rows = table.rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "a");
    }

    #[test]
    fn test_delete_missing_key() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, [1, 2, 3]);
        let err = table.delete(9).unwrap_err();
        assert!(matches!(err, DbError::KeyNotFound(9)));
        assert_eq!(scan_keys(&mut table), vec![1, 2, 3]);
    }

    #[test]
    fn test_delete_from_root_leaf_may_empty_it() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, [1, 2]);
        table.delete(1).unwrap();
        table.delete(2).unwrap();
        assert!(scan_keys(&mut table).is_empty());
        let err = table.delete(2).unwrap_err();
        assert!(matches!(err, DbError::KeyNotFound(2)));
    }

    #[test]
    fn test_leaf_split_at_fourteen_rows() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, 1..=14);

        let expected = "\
- internal (size 1)
  - leaf (size 7)
    - 1
    - 2
    - 3
    - 4
    - 5
    - 6
    - 7
  - key 7
  - leaf (size 7)
    - 8
    - 9
    - 10
    - 11
    - 12
    - 13
    - 14
";
        assert_eq!(dump(&mut table), expected);
        assert_eq!(scan_keys(&mut table), (1..=14).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_with_insert_landing_in_left_half() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, (2..=14).rev());
        insert_ids(&mut table, [1]);
        assert_eq!(scan_keys(&mut table), (1..=14).collect::<Vec<_>>());
    }

    #[test]
    fn test_underfull_leaf_borrows_from_sibling() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, 1..=14);

        // Right leaf drops to five cells; the left sibling is above minimum
        // fill, so one cell migrates instead of merging.
        table.delete(14).unwrap();
        table.delete(13).unwrap();

        let text = dump(&mut table);
        assert!(text.contains("- internal (size 1)"));
        assert!(text.contains("- leaf (size 6)"));
        assert!(text.contains("- key 6"));
        assert_eq!(scan_keys(&mut table), (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_merge_collapses_root() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, 1..=14);
        table.delete(14).unwrap();
        table.delete(13).unwrap();
        table.delete(12).unwrap();

        let expected = "\
- leaf (size 11)
  - 1
  - 2
  - 3
  - 4
  - 5
  - 6
  - 7
  - 8
  - 9
  - 10
  - 11
";
        assert_eq!(dump(&mut table), expected);
        assert_eq!(scan_keys(&mut table), (1..=11).collect::<Vec<_>>());
    }

    #[test]
    fn test_insert_after_root_collapse() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, 1..=14);
        for id in [14, 13, 12] {
            table.delete(id).unwrap();
        }
        insert_ids(&mut table, 12..=20);
        assert_eq!(scan_keys(&mut table), (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn test_deep_tree_from_sequential_inserts() {
        let (_dir, mut table) = open_temp();
        insert_ids(&mut table, 1..=50);
        assert_eq!(scan_keys(&mut table), (1..=50).collect::<Vec<_>>());

        // Sequential load forces internal splits; the root must be internal
        // with internal children.
        let text = dump(&mut table);
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("- internal"));
        assert!(text.contains("\n  - internal"));
    }

    #[test]
    fn test_deep_tree_from_interleaved_inserts() {
        let (_dir, mut table) = open_temp();
        // odd keys first, then even, so later inserts land mid-leaf
        insert_ids(&mut table, (1..=60).filter(|id| id % 2 == 1));
        insert_ids(&mut table, (1..=60).filter(|id| id % 2 == 0));
        assert_eq!(scan_keys(&mut table), (1..=60).collect::<Vec<_>>());
    }
}
