pub mod abtree;
pub mod config;
pub mod map;

pub use abtree::{AbTreeError, AbTreeResult, AbTreeSet, Cursor, Iter, Node, NodeId};
pub use config::{BalanceRatio, ConfigError, ConfigResult, TreeConfig};
pub use map::{AbTreeMap, Entry};
