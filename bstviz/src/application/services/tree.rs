//! Tree service
//!
//! Resolves where keys come from, builds the search tree and lays it out.

use std::path::PathBuf;
use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, DomainResultExt, IoResultExt};
use crate::config::{Settings, MAX_RANDOM_SIZE};
use crate::domain::{BstArena, DomainError, DomainResult, Key, Layout, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Where the keys of a tree come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// Keys given inline, inserted in order
    Keys(Vec<Key>),
    /// Text file with separated keys
    File(PathBuf),
    /// Random unique keys; `None` fields fall back to settings
    Random {
        size: Option<usize>,
        seed: Option<u64>,
    },
    /// Demo keys from settings
    Configured,
}

/// A built tree together with its layout snapshot.
#[derive(Debug)]
pub struct TreeView {
    /// Keys in insertion order
    pub insertion_order: Vec<Key>,
    pub tree: BstArena,
    pub layout: Layout,
}

impl TreeView {
    pub fn new(insertion_order: Vec<Key>, tree: BstArena) -> Self {
        let layout = Layout::assign(&tree);
        Self {
            insertion_order,
            tree,
            layout,
        }
    }

    /// Keys of the given handles, skipping handles not in the tree.
    pub fn keys_of(&self, handles: &[Index]) -> Vec<Key> {
        handles
            .iter()
            .filter_map(|idx| self.tree.node(*idx).map(|node| node.key()))
            .collect()
    }

    pub fn path(&self, key: Key) -> DomainResult<Vec<Key>> {
        let path = self.tree.node_path(key)?;
        Ok(self.keys_of(&path))
    }

    pub fn ancestor(&self, a: Key, b: Key) -> DomainResult<Key> {
        let idx = self.tree.first_common_ancestor(a, b)?;
        self.tree
            .node(idx)
            .map(|node| node.key())
            .ok_or_else(|| DomainError::InvariantViolation(format!("dangling handle {idx:?}")))
    }

    pub fn route(&self, a: Key, b: Key) -> DomainResult<Vec<Key>> {
        let route = self.tree.route(a, b)?;
        Ok(self.keys_of(&route))
    }
}

/// Service for building and querying search trees.
pub struct TreeService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
    builder: TreeBuilder,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self {
            fs,
            settings,
            builder: TreeBuilder::new(),
        }
    }

    /// Resolve the key sequence for `source`, preserving insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve_keys(&self, source: &KeySource) -> ApplicationResult<Vec<Key>> {
        let keys = match source {
            KeySource::Keys(keys) => keys.clone(),
            KeySource::File(path) => {
                let content = self
                    .fs
                    .read_to_string(path)
                    .with_path_context("read key file", path)?;
                self.builder.parse_keys(&content).with_file_context(path)?
            }
            KeySource::Random { size, seed } => {
                let size = size.unwrap_or(self.settings.random.size);
                if size > MAX_RANDOM_SIZE {
                    return Err(ApplicationError::Config {
                        message: format!("random size must be at most {MAX_RANDOM_SIZE}, got {size}"),
                    });
                }
                let seed = seed.or(self.settings.random.seed);
                self.builder.random_keys(size, seed)
            }
            KeySource::Configured => self.settings.keys.clone(),
        };
        debug!("resolve_keys: {} keys", keys.len());
        Ok(keys)
    }

    /// Build the tree for `source` and compute its layout.
    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, source: &KeySource) -> ApplicationResult<TreeView> {
        let keys = self.resolve_keys(source)?;
        let tree = self.builder.build_from_keys(&keys);
        Ok(TreeView::new(keys, tree))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;

    fn service() -> TreeService {
        TreeService::new(Arc::new(RealFileSystem), Arc::new(Settings::default()))
    }

    #[test]
    fn given_inline_keys_when_building_then_view_matches_insertion() {
        let view = service()
            .build(&KeySource::Keys(vec![60, 45, 70, 46, 75]))
            .unwrap();

        assert_eq!(view.insertion_order, vec![60, 45, 70, 46, 75]);
        assert_eq!(view.tree.keys(), vec![45, 46, 60, 70, 75]);
        assert_eq!(view.layout.len(), 5);
    }

    #[test]
    fn given_configured_source_when_building_then_uses_settings_keys() {
        let view = service().build(&KeySource::Configured).unwrap();
        assert_eq!(view.insertion_order, Settings::default().keys);
    }

    #[test]
    fn given_oversized_random_source_when_building_then_config_error() {
        let result = service().build(&KeySource::Random {
            size: Some(MAX_RANDOM_SIZE + 1),
            seed: Some(1),
        });
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_view_when_querying_then_returns_keys() {
        let view = service()
            .build(&KeySource::Keys(vec![60, 45, 70, 46, 75]))
            .unwrap();

        assert_eq!(view.path(46).unwrap(), vec![60, 45, 46]);
        assert_eq!(view.ancestor(46, 75).unwrap(), 60);
        assert_eq!(view.route(46, 70).unwrap(), vec![46, 45, 60, 70]);
        assert_eq!(view.path(99), Err(DomainError::NotFound(99)));
    }
}
