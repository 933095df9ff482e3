//! PDF page splicing.
//!
//! [`PdfSplicer`] copies page spans from one source document into a new
//! destination document held in memory. Each copied page brings its
//! content streams and resources along; objects shared between pages
//! (fonts, images) are copied once and reused. The destination only
//! reaches the filesystem when [`finalize`](PageCopier::finalize) runs,
//! so an aborted run leaves nothing behind.

// Clippy pedantic allows:
// - Page and object counts fit comfortably in their target types
#![allow(clippy::cast_possible_truncation)]

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use pagesort_core::{PageCopier, PagesortError, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Page attributes that may live on an ancestor node in the page tree.
///
/// Copied pages lose their original parent, so any of these found only
/// up the tree must be pulled down onto the page itself.
const INHERITED_PAGE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Copies page ranges from a source PDF into a new destination PDF.
///
/// Pages land in the destination in the order they are copied, not in
/// source order. Copying the same source page twice produces two
/// independent page objects, so repeated ranges still yield a
/// well-formed page tree.
pub struct PdfSplicer {
    source: Document,
    source_path: PathBuf,
    source_pages: Vec<ObjectId>,
    dest: Document,
    dest_path: PathBuf,
    id_map: HashMap<ObjectId, ObjectId>,
    kids: Vec<ObjectId>,
}

impl PdfSplicer {
    /// Open a source document and prepare an empty destination.
    ///
    /// The destination path is only remembered here; no file is created
    /// until [`finalize`](PageCopier::finalize).
    ///
    /// # Errors
    ///
    /// Returns [`PagesortError::SourceRead`] if the source cannot be
    /// loaded as a PDF.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(source: P, dest: Q) -> Result<Self> {
        let source_path = source.as_ref().to_path_buf();
        let document = Document::load(&source_path).map_err(|e| PagesortError::SourceRead {
            path: source_path.clone(),
            message: e.to_string(),
        })?;
        let source_pages: Vec<ObjectId> = document.page_iter().collect();
        log::debug!(
            "opened source {} with {} page(s)",
            source_path.display(),
            source_pages.len()
        );

        Ok(Self {
            source: document,
            source_path,
            source_pages,
            dest: Document::with_version("1.5"),
            dest_path: dest.as_ref().to_path_buf(),
            id_map: HashMap::new(),
            kids: Vec::new(),
        })
    }

    fn source_error(&self, message: String) -> PagesortError {
        PagesortError::SourceRead {
            path: self.source_path.clone(),
            message,
        }
    }

    /// Copy one source page into the destination as a fresh page object.
    fn copy_page(&mut self, page: u32) -> Result<()> {
        let index = (page - 1) as usize;
        let page_id = match self.source_pages.get(index) {
            Some(&id) => id,
            None => {
                return Err(PagesortError::PageOutOfBounds {
                    page,
                    total: self.source_pages.len() as u32,
                })
            }
        };

        let fresh = self.page_dict_with_inherited(page_id)?;

        // Everything the page needs, except the page itself: the page
        // gets a fresh object per inclusion further down.
        let mut visited = BTreeSet::new();
        visited.insert(page_id);
        for (_, value) in fresh.iter() {
            self.collect_refs(value, &mut visited);
        }

        let mut added = Vec::new();
        for &object_id in &visited {
            if object_id == page_id || self.id_map.contains_key(&object_id) {
                continue;
            }
            let object = self
                .source
                .get_object(object_id)
                .map_err(|e| PagesortError::SourceRead {
                    path: self.source_path.clone(),
                    message: e.to_string(),
                })?
                .clone();
            let new_id = self.dest.add_object(object);
            self.id_map.insert(object_id, new_id);
            added.push(new_id);
        }

        for new_id in added {
            if let Ok(object) = self.dest.get_object_mut(new_id) {
                remap_references(object, &self.id_map);
            }
        }

        let mut page_object = Object::Dictionary(fresh);
        remap_references(&mut page_object, &self.id_map);
        let new_page_id = self.dest.add_object(page_object);
        self.kids.push(new_page_id);

        log::debug!("copied source page {page} as destination page {}", self.kids.len());
        Ok(())
    }

    /// Clone a page dictionary, folding inheritable attributes down from
    /// its ancestors and dropping the parent link.
    fn page_dict_with_inherited(&self, page_id: ObjectId) -> Result<Dictionary> {
        let object = self
            .source
            .get_object(page_id)
            .map_err(|e| self.source_error(e.to_string()))?;
        let mut dict = match object {
            Object::Dictionary(dict) => dict.clone(),
            _ => {
                return Err(
                    self.source_error(format!("page object {page_id:?} is not a dictionary"))
                )
            }
        };

        let mut ancestor = parent_of(&dict);
        dict.remove(b"Parent");

        let mut seen = BTreeSet::new();
        while let Some(parent_id) = ancestor {
            if !seen.insert(parent_id) {
                break;
            }
            let parent = match self.source.get_object(parent_id) {
                Ok(Object::Dictionary(parent)) => parent,
                _ => break,
            };
            for key in INHERITED_PAGE_KEYS {
                if !dict.has(key) {
                    if let Ok(value) = parent.get(key) {
                        dict.set(key, value.clone());
                    }
                }
            }
            ancestor = parent_of(parent);
        }

        Ok(dict)
    }

    /// Walk references reachable from `object`, recording every source
    /// object id found. Unreadable targets are left out so the copy
    /// keeps whatever dangling references the source already had.
    fn collect_refs(&self, object: &Object, visited: &mut BTreeSet<ObjectId>) {
        match object {
            Object::Reference(id) => {
                if visited.insert(*id) {
                    match self.source.get_object(*id) {
                        Ok(target) => self.collect_refs(target, visited),
                        Err(_) => {
                            log::warn!("source object {id:?} is unreadable, leaving reference dangling");
                            visited.remove(id);
                        }
                    }
                }
            }
            Object::Array(items) => {
                for item in items {
                    self.collect_refs(item, visited);
                }
            }
            Object::Dictionary(dict) => {
                for (_, value) in dict.iter() {
                    self.collect_refs(value, visited);
                }
            }
            Object::Stream(stream) => {
                for (_, value) in stream.dict.iter() {
                    self.collect_refs(value, visited);
                }
            }
            _ => {}
        }
    }
}

impl PageCopier for PdfSplicer {
    fn page_count(&self) -> u32 {
        self.source_pages.len() as u32
    }

    fn copy_range(&mut self, page_from: u32, page_to: u32) -> Result<()> {
        if page_to < page_from {
            log::warn!("range {page_from}-{page_to} runs backwards, copying nothing");
            return Ok(());
        }

        let total = self.page_count();
        if page_from < 1 {
            return Err(PagesortError::PageOutOfBounds {
                page: page_from,
                total,
            });
        }
        if page_to > total {
            return Err(PagesortError::PageOutOfBounds {
                page: page_to,
                total,
            });
        }

        for page in page_from..=page_to {
            self.copy_page(page)?;
        }
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let kids: Vec<Object> = self.kids.iter().map(|&id| id.into()).collect();
        let count = self.kids.len() as i64;
        let pages_id = self.dest.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        });

        for &page_id in &self.kids {
            if let Ok(Object::Dictionary(dict)) = self.dest.get_object_mut(page_id) {
                dict.set("Parent", pages_id);
            }
        }

        let catalog_id = self.dest.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.dest.trailer.set("Root", catalog_id);
        self.dest
            .trailer
            .set("Size", i64::from(self.dest.max_id) + 1);

        self.dest
            .save(&self.dest_path)
            .map_err(|e| PagesortError::DestinationWrite {
                path: self.dest_path.clone(),
                message: e.to_string(),
            })?;

        log::info!(
            "wrote {} page(s) to {}",
            self.kids.len(),
            self.dest_path.display()
        );
        Ok(())
    }
}

/// Metadata read from a source PDF without copying anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    /// Number of pages in the document.
    pub pages: u32,
    /// PDF version string, e.g. `"1.5"`.
    pub version: String,
    /// Title from the document information dictionary, if present.
    pub title: Option<String>,
    /// Author from the document information dictionary, if present.
    pub author: Option<String>,
    /// Subject from the document information dictionary, if present.
    pub subject: Option<String>,
}

/// Read page count, version, and document information from a PDF.
///
/// # Errors
///
/// Returns [`PagesortError::SourceRead`] if the file cannot be loaded
/// as a PDF.
pub fn inspect_source<P: AsRef<Path>>(path: P) -> Result<SourceInfo> {
    let path = path.as_ref();
    let doc = Document::load(path).map_err(|e| PagesortError::SourceRead {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    // Info is usually an indirect reference, but an inline dictionary
    // is legal too.
    let info = doc.trailer.get(b"Info").ok().and_then(|object| match object {
        Object::Reference(id) => doc
            .get_object(*id)
            .ok()
            .and_then(|target| target.as_dict().ok()),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    });

    Ok(SourceInfo {
        pages: doc.page_iter().count() as u32,
        version: doc.version.clone(),
        title: info.and_then(|dict| text_field(dict, b"Title")),
        author: info.and_then(|dict| text_field(dict, b"Author")),
        subject: info.and_then(|dict| text_field(dict, b"Subject")),
    })
}

fn text_field(dict: &Dictionary, key: &[u8]) -> Option<String> {
    dict.get(key)
        .ok()
        .and_then(|object| object.as_str().ok())
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

fn parent_of(dict: &Dictionary) -> Option<ObjectId> {
    match dict.get(b"Parent") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    }
}

/// Rewrite references according to `id_map`, recursing through arrays,
/// dictionaries, and stream dictionaries. Unmapped references are left
/// as they are.
fn remap_references(object: &mut Object, id_map: &HashMap<ObjectId, ObjectId>) {
    match object {
        Object::Reference(id) => {
            if let Some(&new_id) = id_map.get(id) {
                *id = new_id;
            }
        }
        Object::Array(items) => {
            for item in items {
                remap_references(item, id_map);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                remap_references(value, id_map);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                remap_references(value, id_map);
            }
        }
        _ => {}
    }
}
