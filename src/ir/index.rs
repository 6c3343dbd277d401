//! Lookup structures built once per split from a parsed COCO document.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use super::io_coco_json::CocoDocument;
use super::model::ImageRecord;
use super::{CategoryId, ImageId};

/// Category name → YOLO class index.
///
/// Indices are assigned by sorting the distinct names lexicographically, so
/// the mapping depends only on the set of names and never on category ids or
/// the order they appear in the document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassMap {
    names: Vec<String>,
}

impl ClassMap {
    /// Builds the mapping from any collection of names; duplicates collapse.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let distinct: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Self {
            names: distinct.into_iter().collect(),
        }
    }

    /// Returns the class index for `name`, if the name is known.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .ok()
    }

    /// Class names ordered by index.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Per-split indices over a [`CocoDocument`].
///
/// Borrows from the document; nothing is copied besides the sorted class
/// names.
#[derive(Debug)]
pub struct CocoIndex<'a> {
    images: HashMap<ImageId, &'a ImageRecord>,
    category_names: HashMap<CategoryId, &'a str>,
    class_map: ClassMap,
    duplicate_image_ids: Vec<ImageId>,
}

impl<'a> CocoIndex<'a> {
    /// Indexes images and categories.
    ///
    /// Duplicate image ids keep the last record and are reported through
    /// [`CocoIndex::duplicate_image_ids`]. Duplicate category ids also keep
    /// the last name; only names still reachable by id enter the class map.
    pub fn build(document: &'a CocoDocument) -> Self {
        let mut images = HashMap::with_capacity(document.images.len());
        let mut duplicate_image_ids = Vec::new();

        for image in &document.images {
            if let Some(previous) = images.insert(image.id, image) {
                warn!(
                    image_id = %image.id,
                    replaced = %previous.file_name,
                    kept = %image.file_name,
                    "duplicate image id; keeping the last record"
                );
                duplicate_image_ids.push(image.id);
            }
        }

        let mut category_names = HashMap::with_capacity(document.categories.len());
        for category in &document.categories {
            if let Some(previous) = category_names.insert(category.id, category.name.as_str()) {
                warn!(
                    category_id = %category.id,
                    replaced = previous,
                    kept = %category.name,
                    "duplicate category id; keeping the last name"
                );
            }
        }

        let class_map = ClassMap::from_names(category_names.values().copied());

        Self {
            images,
            category_names,
            class_map,
            duplicate_image_ids,
        }
    }

    pub fn image(&self, id: ImageId) -> Option<&'a ImageRecord> {
        self.images.get(&id).copied()
    }

    pub fn category_name(&self, id: CategoryId) -> Option<&'a str> {
        self.category_names.get(&id).copied()
    }

    pub fn class_map(&self) -> &ClassMap {
        &self.class_map
    }

    /// Image ids seen more than once, in document order.
    pub fn duplicate_image_ids(&self) -> &[ImageId] {
        &self.duplicate_image_ids
    }
}
