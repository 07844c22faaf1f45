// Page-based I/O layer between the B-tree and the filesystem.
//
// The pager owns the database file and a fixed array of page slots. Pages
// are read lazily, one at a time, and written back only by an explicit
// flush; the cache is sized to hold every page the store can address, so
// there is no eviction.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{DbError, Result};
use crate::node::PAGE_SIZE;

/// A page number. Page 0 is the initial root.
pub type PageNumber = u32;

/// Hard cap on the number of pages in a database file.
pub const TABLE_MAX_PAGES: usize = 100;

#[derive(Debug)]
pub struct Pager {
    file: File,
    file_length: u64,
    /// Number of pages addressed so far (on disk or cached).
    num_pages: u32,
    pages: [Option<Box<[u8; PAGE_SIZE]>>; TABLE_MAX_PAGES],
}

impl Pager {
    /// Open the database file, creating it if missing. Fails when the file
    /// length is not a whole number of pages.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let file_length = file.seek(SeekFrom::End(0))?;
        if file_length % PAGE_SIZE as u64 != 0 {
            return Err(DbError::Corrupt(
                "database file is not a whole number of pages".into(),
            ));
        }

        Ok(Self {
            file,
            file_length,
            num_pages: (file_length / PAGE_SIZE as u64) as u32,
            pages: std::array::from_fn(|_| None),
        })
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// The page number a new node should be allocated at. The page comes
    /// into existence on the first `get_page` call for it.
    pub fn unused_page_num(&self) -> PageNumber {
        self.num_pages
    }

    /// Fetch a page, reading it from disk on first access. Pages beyond the
    /// end of the file start zeroed.
    pub fn get_page(&mut self, page_num: PageNumber) -> Result<&mut [u8; PAGE_SIZE]> {
        let slot = page_num as usize;
        if slot >= TABLE_MAX_PAGES {
            return Err(DbError::PageOutOfBounds(page_num));
        }

        if self.pages[slot].is_none() {
            let mut page = Box::new([0u8; PAGE_SIZE]);
            let pages_on_disk = (self.file_length / PAGE_SIZE as u64) as u32;
            if page_num < pages_on_disk {
                self.file
                    .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
                self.file.read_exact(&mut page[..])?;
            }
            self.pages[slot] = Some(page);
        }

        if page_num >= self.num_pages {
            self.num_pages = page_num + 1;
        }

        Ok(self.pages[slot].as_mut().unwrap())
    }

    /// Positional write of one cached page back to the file.
    pub fn flush(&mut self, page_num: PageNumber) -> Result<()> {
        let slot = page_num as usize;
        let page = self.pages[slot]
            .as_ref()
            .ok_or_else(|| DbError::Corrupt(format!("flush of unloaded page {page_num}")))?;

        self.file
            .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))?;
        self.file.write_all(&page[..])?;
        self.file_length = self
            .file_length
            .max((page_num as u64 + 1) * PAGE_SIZE as u64);
        Ok(())
    }

    /// Flush every cached page and release the cache. Durability happens
    /// here and nowhere else.
    pub fn close(&mut self) -> Result<()> {
        for page_num in 0..self.num_pages {
            if self.pages[page_num as usize].is_some() {
                self.flush(page_num)?;
                self.pages[page_num as usize] = None;
            }
        }
        self.file.sync_all()?;
        Ok(())
    }
}
