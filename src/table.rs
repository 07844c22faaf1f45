// Table and cursor layer.
//
// A `Table` pairs the pager with the current root page. Cursors carry a
// position only (page number, cell index) and re-borrow pages through the
// pager on every access, so tree mutations never invalidate them mid-call.

use std::path::Path;

use crate::error::{DbError, Result};
use crate::node::{self, NodeType};
use crate::pager::{PageNumber, Pager};
use crate::row::Row;

pub struct Table {
    pub(crate) pager: Pager,
    pub(crate) root_page_num: PageNumber,
}

/// A position within the tree, scoped to a single logical operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub page_num: PageNumber,
    pub cell_num: u32,
    pub end_of_table: bool,
}

impl Table {
    /// Open a database file, initializing a fresh single-leaf tree when the
    /// file is new. For an existing file the root is located by its header
    /// flag, since root collapse can move it off page 0.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut pager = Pager::open(path)?;

        let root_page_num = if pager.num_pages() == 0 {
            let root = pager.get_page(0)?;
            node::init_leaf(root);
            node::set_root(root, true);
            0
        } else {
            let mut root = None;
            for page_num in 0..pager.num_pages() {
                if node::is_root(pager.get_page(page_num)?) {
                    root = Some(page_num);
                    break;
                }
            }
            root.ok_or_else(|| DbError::Corrupt("no root node in database file".into()))?
        };

        Ok(Self {
            pager,
            root_page_num,
        })
    }

    /// Flush every cached page and close the file.
    pub fn close(mut self) -> Result<()> {
        self.pager.close()
    }

    pub fn root_page_num(&self) -> PageNumber {
        self.root_page_num
    }

    /// Position a cursor at `key`, or at the slot where `key` would be
    /// inserted. Parent pointers are refreshed on the way down so that
    /// splits and merges can rely on them.
    pub fn find(&mut self, key: u32) -> Result<Cursor> {
        let mut page_num = self.root_page_num;
        loop {
            let page = self.pager.get_page(page_num)?;
            match node::node_type(page)? {
                NodeType::Leaf => return self.leaf_find(page_num, key),
                NodeType::Internal => {
                    let child_index = node::internal_find_child(page, key);
                    let child = node::internal_child(page, child_index);
                    node::set_parent(self.pager.get_page(child)?, page_num);
                    page_num = child;
                }
            }
        }
    }

    /// Position a cursor at the first row in key order.
    pub fn start(&mut self) -> Result<Cursor> {
        let mut page_num = self.root_page_num;
        loop {
            let page = self.pager.get_page(page_num)?;
            match node::node_type(page)? {
                NodeType::Leaf => {
                    return Ok(Cursor {
                        page_num,
                        cell_num: 0,
                        end_of_table: node::leaf_num_cells(page) == 0,
                    })
                }
                NodeType::Internal => {
                    let child = node::internal_child(page, 0);
                    node::set_parent(self.pager.get_page(child)?, page_num);
                    page_num = child;
                }
            }
        }
    }

    /// The row under the cursor.
    pub fn cursor_row(&mut self, cursor: &Cursor) -> Result<Row> {
        let page = self.pager.get_page(cursor.page_num)?;
        Ok(Row::deserialize(node::leaf_value(
            page,
            cursor.cell_num as usize,
        )))
    }

    /// The key under the cursor.
    pub fn cursor_key(&mut self, cursor: &Cursor) -> Result<u32> {
        let page = self.pager.get_page(cursor.page_num)?;
        Ok(node::leaf_key(page, cursor.cell_num as usize))
    }

    /// Step the cursor one cell forward, following the leaf chain across
    /// page boundaries.
    pub fn advance(&mut self, cursor: &mut Cursor) -> Result<()> {
        let page = self.pager.get_page(cursor.page_num)?;
        cursor.cell_num += 1;
        if cursor.cell_num >= node::leaf_num_cells(page) {
            let next = node::leaf_next_leaf(page);
            if next == 0 {
                cursor.end_of_table = true;
            } else {
                cursor.page_num = next;
                cursor.cell_num = 0;
            }
        }
        Ok(())
    }

    /// All rows in ascending key order.
    pub fn rows(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut cursor = self.start()?;
        while !cursor.end_of_table {
            rows.push(self.cursor_row(&cursor)?);
            self.advance(&mut cursor)?;
        }
        Ok(rows)
    }

    fn leaf_find(&mut self, page_num: PageNumber, key: u32) -> Result<Cursor> {
        let page = self.pager.get_page(page_num)?;
        let num_cells = node::leaf_num_cells(page);

        let mut min_index = 0;
        let mut one_past_max_index = num_cells;
        while min_index != one_past_max_index {
            let index = (min_index + one_past_max_index) / 2;
            let key_at_index = node::leaf_key(page, index as usize);
            if key == key_at_index {
                return Ok(Cursor {
                    page_num,
                    cell_num: index,
                    end_of_table: false,
                });
            }
            if key < key_at_index {
                one_past_max_index = index;
            } else {
                min_index = index + 1;
            }
        }

        Ok(Cursor {
            page_num,
            cell_num: min_index,
            end_of_table: false,
        })
    }
}
