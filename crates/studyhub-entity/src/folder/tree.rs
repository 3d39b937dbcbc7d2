//! Keyed folder tree and the materials mutation operations.
//!
//! Folders are stored in a map from id to entry; each entry keeps an
//! explicit parent reference plus ordered child ids and owned files. The
//! nested document form is rendered on demand with [`FolderTree::to_nested`].

use std::collections::HashMap;

use studyhub_core::error::AppError;
use studyhub_core::result::AppResult;
use studyhub_core::types::{FileId, FolderId};

use super::model::{Folder, normalize_tags, validate_folder_id, validate_folder_name};
use super::node::{FolderNode, FolderSummary};
use crate::file::{StoredFile, blob_path, validate_file_name};

/// One folder with its ordered children and owned files.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderEntry {
    /// The folder record.
    pub folder: Folder,
    /// Child folder ids, in order.
    pub children: Vec<FolderId>,
    /// Owned files, in order.
    pub files: Vec<StoredFile>,
}

impl FolderEntry {
    fn new(folder: Folder) -> Self {
        Self {
            folder,
            children: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// Everything detached by [`FolderTree::remove_subtree`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemovedSubtree {
    /// The removed folder followed by all its descendants, depth-first.
    pub folder_ids: Vec<FolderId>,
    /// Every file that was owned by a removed folder.
    pub files: Vec<StoredFile>,
}

/// The study-materials folder tree.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    entries: HashMap<FolderId, FolderEntry>,
    roots: Vec<FolderId>,
}

impl FolderTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from flat records.
    ///
    /// `folders` and `files` must already be in sibling order. Fails if a
    /// folder id repeats, a parent or owning folder is missing, or the
    /// parent links contain a cycle.
    pub fn from_parts(folders: Vec<Folder>, files: Vec<StoredFile>) -> AppResult<Self> {
        let mut tree = Self::new();
        let links: Vec<(FolderId, Option<FolderId>)> = folders
            .iter()
            .map(|f| (f.id.clone(), f.parent_id.clone()))
            .collect();

        for folder in folders {
            if tree.entries.contains_key(&folder.id) {
                return Err(AppError::conflict(format!(
                    "Duplicate folder id '{}'",
                    folder.id
                )));
            }
            tree.entries.insert(folder.id.clone(), FolderEntry::new(folder));
        }

        for (id, parent) in links {
            match parent {
                None => tree.roots.push(id),
                Some(parent_id) => {
                    let parent = tree.entries.get_mut(&parent_id).ok_or_else(|| {
                        AppError::internal(format!(
                            "Folder '{id}' references missing parent '{parent_id}'"
                        ))
                    })?;
                    parent.children.push(id);
                }
            }
        }

        if tree.reachable_count() != tree.entries.len() {
            return Err(AppError::internal("Folder hierarchy contains a cycle"));
        }

        for file in files {
            let entry = tree.entries.get_mut(&file.folder_id).ok_or_else(|| {
                AppError::internal(format!(
                    "File '{}' references missing folder '{}'",
                    file.id, file.folder_id
                ))
            })?;
            entry.files.push(file);
        }

        Ok(tree)
    }

    /// Import the nested document form. Parent links are taken from the
    /// nesting, and files without a blob path get the conventional one.
    pub fn from_nested(nodes: Vec<FolderNode>) -> AppResult<Self> {
        let mut tree = Self::new();
        for node in nodes {
            tree.import_node(node, None)?;
        }
        Ok(tree)
    }

    fn import_node(&mut self, node: FolderNode, parent_id: Option<FolderId>) -> AppResult<()> {
        validate_folder_id(&node.id)?;
        let folder = Folder {
            id: node.id.clone(),
            name: node.name,
            tags: normalize_tags(node.tags),
            parent_id,
            created_by: None,
            created_at: node.created_at,
        };
        self.insert_folder(folder)?;

        for mut file in node.files {
            validate_file_name(&file.name)?;
            if file.storage_path.is_empty() {
                file.storage_path = blob_path(&node.id, &file.name);
            }
            self.add_file(&node.id, file)?;
        }

        for child in node.sub_folders {
            self.import_node(child, Some(node.id.clone()))?;
        }
        Ok(())
    }

    fn reachable_count(&self) -> usize {
        let mut stack: Vec<&FolderId> = self.roots.iter().collect();
        let mut count = 0;
        while let Some(id) = stack.pop() {
            count += 1;
            if let Some(entry) = self.entries.get(id) {
                stack.extend(entry.children.iter());
            }
        }
        count
    }

    /// Number of folders in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the tree has no folders.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of files across all folders.
    pub fn file_count(&self) -> usize {
        self.entries.values().map(|e| e.files.len()).sum()
    }

    /// Root folder ids, in order.
    pub fn roots(&self) -> &[FolderId] {
        &self.roots
    }

    /// Whether a folder with this id exists anywhere in the tree.
    pub fn contains(&self, id: &FolderId) -> bool {
        self.entries.contains_key(id)
    }

    /// Look up a folder entry by id.
    pub fn find(&self, id: &FolderId) -> Option<&FolderEntry> {
        self.entries.get(id)
    }

    /// Look up a folder record by id.
    pub fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.entries.get(id).map(|e| &e.folder)
    }

    /// Index of a folder among its siblings.
    pub fn position_of(&self, id: &FolderId) -> Option<usize> {
        let folder = self.folder(id)?;
        let siblings = match &folder.parent_id {
            None => &self.roots,
            Some(parent_id) => &self.entries.get(parent_id)?.children,
        };
        siblings.iter().position(|s| s == id)
    }

    /// Append a folder to the root list or to its parent's children.
    ///
    /// Returns the folder's index among its siblings.
    pub fn insert_folder(&mut self, folder: Folder) -> AppResult<usize> {
        validate_folder_name(&folder.name)?;
        if self.entries.contains_key(&folder.id) {
            return Err(AppError::conflict(format!(
                "Folder id '{}' already exists",
                folder.id
            )));
        }

        let id = folder.id.clone();
        let position = match &folder.parent_id {
            None => {
                self.roots.push(id.clone());
                self.roots.len() - 1
            }
            Some(parent_id) => {
                let parent = self.entries.get_mut(parent_id).ok_or_else(|| {
                    AppError::not_found(format!("Parent folder '{parent_id}' not found"))
                })?;
                parent.children.push(id.clone());
                parent.children.len() - 1
            }
        };

        self.entries.insert(id, FolderEntry::new(folder));
        Ok(position)
    }

    /// All descendants of a folder, depth-first, excluding the folder itself.
    pub fn descendants(&self, id: &FolderId) -> Vec<FolderId> {
        let mut out = Vec::new();
        if let Some(entry) = self.entries.get(id) {
            for child in &entry.children {
                out.push(child.clone());
                out.extend(self.descendants(child));
            }
        }
        out
    }

    /// Remove a folder and everything beneath it.
    ///
    /// Returns `None` when the folder does not exist, so repeated deletes
    /// of the same id are no-ops.
    pub fn remove_subtree(&mut self, id: &FolderId) -> Option<RemovedSubtree> {
        let parent_id = self.entries.get(id)?.folder.parent_id.clone();

        let mut folder_ids = vec![id.clone()];
        folder_ids.extend(self.descendants(id));

        match parent_id {
            None => self.roots.retain(|r| r != id),
            Some(parent_id) => {
                if let Some(parent) = self.entries.get_mut(&parent_id) {
                    parent.children.retain(|c| c != id);
                }
            }
        }

        let mut files = Vec::new();
        for folder_id in &folder_ids {
            if let Some(entry) = self.entries.remove(folder_id) {
                files.extend(entry.files);
            }
        }

        Some(RemovedSubtree { folder_ids, files })
    }

    /// Folders from the root down to and including `id`.
    pub fn ancestors(&self, id: &FolderId) -> Vec<&Folder> {
        let mut chain = Vec::new();
        let mut cursor = self.folder(id);
        while let Some(folder) = cursor {
            if chain.len() > self.entries.len() {
                break;
            }
            chain.push(folder);
            cursor = folder.parent_id.as_ref().and_then(|p| self.folder(p));
        }
        chain.reverse();
        chain
    }

    /// Slash-joined folder names from the root, e.g. `/Math/Week 1`.
    pub fn path_of(&self, id: &FolderId) -> Option<String> {
        if !self.contains(id) {
            return None;
        }
        let names: Vec<&str> = self.ancestors(id).iter().map(|f| f.name.as_str()).collect();
        Some(format!("/{}", names.join("/")))
    }

    /// Rename and/or retag a folder.
    pub fn update_folder(
        &mut self,
        id: &FolderId,
        name: Option<String>,
        tags: Option<Vec<String>>,
    ) -> AppResult<&Folder> {
        if let Some(name) = &name {
            validate_folder_name(name)?;
        }
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{id}' not found")))?;

        if let Some(name) = name {
            entry.folder.name = name.trim().to_string();
        }
        if let Some(tags) = tags {
            entry.folder.tags = normalize_tags(tags);
        }
        Ok(&entry.folder)
    }

    /// Find any file by id.
    pub fn find_file(&self, file_id: &FileId) -> Option<&StoredFile> {
        self.entries
            .values()
            .flat_map(|e| e.files.iter())
            .find(|f| &f.id == file_id)
    }

    /// Find a file by id within a specific folder.
    pub fn file_in(&self, folder_id: &FolderId, file_id: &FileId) -> Option<&StoredFile> {
        self.entries
            .get(folder_id)?
            .files
            .iter()
            .find(|f| &f.id == file_id)
    }

    /// Find a file by name within a specific folder.
    pub fn file_named(&self, folder_id: &FolderId, name: &str) -> Option<&StoredFile> {
        self.entries
            .get(folder_id)?
            .files
            .iter()
            .find(|f| f.name == name)
    }

    /// Append a file to a folder.
    ///
    /// Returns the file's index within the folder.
    pub fn add_file(&mut self, folder_id: &FolderId, mut file: StoredFile) -> AppResult<usize> {
        if !self.contains(folder_id) {
            return Err(AppError::not_found(format!("Folder '{folder_id}' not found")));
        }
        if self.file_named(folder_id, &file.name).is_some() {
            return Err(AppError::conflict(format!(
                "A file named '{}' already exists in this folder",
                file.name
            )));
        }
        if self.find_file(&file.id).is_some() {
            return Err(AppError::conflict(format!(
                "File id '{}' already exists",
                file.id
            )));
        }

        file.folder_id = folder_id.clone();
        let entry = self
            .entries
            .get_mut(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{folder_id}' not found")))?;
        entry.files.push(file);
        Ok(entry.files.len() - 1)
    }

    /// Remove a file from a folder and return it.
    pub fn remove_file(&mut self, folder_id: &FolderId, file_id: &FileId) -> AppResult<StoredFile> {
        let entry = self
            .entries
            .get_mut(folder_id)
            .ok_or_else(|| AppError::not_found(format!("Folder '{folder_id}' not found")))?;
        let index = entry
            .files
            .iter()
            .position(|f| &f.id == file_id)
            .ok_or_else(|| {
                AppError::not_found(format!("File '{file_id}' not found in folder '{folder_id}'"))
            })?;
        Ok(entry.files.remove(index))
    }

    /// Move a file from `src` to the end of `dst`.
    ///
    /// `relocate` builds the destination record (new blob path and URL) from
    /// the current one. The tree is left unchanged on any error. Returns the
    /// file's index within `dst`.
    pub fn move_file<F>(
        &mut self,
        file_id: &FileId,
        src: &FolderId,
        dst: &FolderId,
        relocate: F,
    ) -> AppResult<usize>
    where
        F: FnOnce(&StoredFile) -> StoredFile,
    {
        if src == dst {
            return Err(AppError::validation(
                "Source and destination folders must differ",
            ));
        }
        if !self.contains(dst) {
            return Err(AppError::not_found(format!(
                "Destination folder '{dst}' not found"
            )));
        }

        let src_entry = self
            .entries
            .get(src)
            .ok_or_else(|| AppError::not_found(format!("Source folder '{src}' not found")))?;
        let index = src_entry
            .files
            .iter()
            .position(|f| &f.id == file_id)
            .ok_or_else(|| {
                AppError::not_found(format!("File '{file_id}' not found in folder '{src}'"))
            })?;

        let mut relocated = relocate(&src_entry.files[index]);
        relocated.folder_id = dst.clone();
        if self.file_named(dst, &relocated.name).is_some() {
            return Err(AppError::conflict(format!(
                "A file named '{}' already exists in the destination folder",
                relocated.name
            )));
        }

        if let Some(src_entry) = self.entries.get_mut(src) {
            src_entry.files.remove(index);
        }
        let dst_entry = self
            .entries
            .get_mut(dst)
            .ok_or_else(|| AppError::not_found(format!("Destination folder '{dst}' not found")))?;
        dst_entry.files.push(relocated);
        Ok(dst_entry.files.len() - 1)
    }

    /// Pre-order walk of every folder with its depth.
    pub fn walk(&self) -> Vec<(usize, &FolderEntry)> {
        let mut out = Vec::with_capacity(self.entries.len());
        let mut stack: Vec<(usize, &FolderId)> = self.roots.iter().rev().map(|r| (0, r)).collect();
        while let Some((depth, id)) = stack.pop() {
            if let Some(entry) = self.entries.get(id) {
                out.push((depth, entry));
                stack.extend(entry.children.iter().rev().map(|c| (depth + 1, c)));
            }
        }
        out
    }

    /// Folders whose name or tags contain `query`, in tree order.
    pub fn search(&self, query: &str) -> Vec<&Folder> {
        self.walk()
            .into_iter()
            .map(|(_, entry)| &entry.folder)
            .filter(|f| f.matches(query))
            .collect()
    }

    /// Flat listing of every folder, in tree order.
    pub fn summaries(&self) -> Vec<FolderSummary> {
        self.walk()
            .into_iter()
            .map(|(depth, entry)| FolderSummary {
                id: entry.folder.id.clone(),
                name: entry.folder.name.clone(),
                path: self.path_of(&entry.folder.id).unwrap_or_default(),
                depth,
                tags: entry.folder.tags.clone(),
                child_count: entry.children.len(),
                file_count: entry.files.len(),
                created_at: entry.folder.created_at,
            })
            .collect()
    }

    /// Render the whole tree in nested document form.
    pub fn to_nested(&self) -> Vec<FolderNode> {
        self.roots.iter().filter_map(|id| self.subtree(id)).collect()
    }

    /// Render one folder and its descendants in nested document form.
    pub fn subtree(&self, id: &FolderId) -> Option<FolderNode> {
        let entry = self.entries.get(id)?;
        Some(FolderNode {
            id: entry.folder.id.clone(),
            name: entry.folder.name.clone(),
            tags: entry.folder.tags.clone(),
            files: entry.files.clone(),
            created_at: entry.folder.created_at,
            parent_id: entry.folder.parent_id.clone(),
            sub_folders: entry
                .children
                .iter()
                .filter_map(|child| self.subtree(child))
                .collect(),
        })
    }
}
